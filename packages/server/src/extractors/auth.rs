use axum::{extract::FromRequestParts, http::request::Parts};
use common::auth;

use crate::error::ActionError;
use crate::state::AppState;

/// Operator extracted from the `Authorization: Bearer <token>` header.
///
/// A missing, malformed or unverifiable token is rejected as
/// `insufficient permissions`, the same as a token lacking a permission.
pub struct AuthUser {
    pub subject: String,
    pub permissions: Vec<String>,
}

impl AuthUser {
    pub fn require_permission(&self, permission: &str) -> Result<(), ActionError> {
        if self.permissions.iter().any(|p| p == permission) {
            Ok(())
        } else {
            tracing::debug!(subject = %self.subject, permission, "Operator lacks permission");
            Err(ActionError::PermissionDenied)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ActionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
        else {
            tracing::debug!("Rejecting request without a token");
            return Err(ActionError::PermissionDenied);
        };

        let claims = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| "not a bearer token".to_owned())
            .and_then(|token| {
                auth::verify(token, &state.config.auth.jwt_secret).map_err(|e| e.to_string())
            })
            .map_err(|reason| {
                tracing::debug!(reason, "Rejecting request with an invalid token");
                ActionError::PermissionDenied
            })?;

        Ok(AuthUser {
            subject: claims.sub,
            permissions: claims.permissions,
        })
    }
}

/// An operator holding `release:manage`.
pub struct ReleaseManager(pub AuthUser);

impl FromRequestParts<AppState> for ReleaseManager {
    type Rejection = ActionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require_permission(auth::RELEASE_MANAGE)?;
        Ok(ReleaseManager(user))
    }
}
