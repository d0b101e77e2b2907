use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Permission required to change release data or the EULA.
pub const RELEASE_MANAGE: &str = "release:manage";

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Operator name
    pub permissions: Vec<String>,
    pub exp: usize, // Expiration timestamp
}

/// Sign a token for `subject` that expires after `ttl`.
pub fn sign(
    subject: &str,
    permissions: Vec<String>,
    secret: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = (Utc::now() + ttl).timestamp();

    let claims = Claims {
        sub: subject.to_owned(),
        permissions,
        exp: expiration.max(0) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify and decode a token.
pub fn verify(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
