use std::net::SocketAddr;
use std::sync::Arc;

use ::common::RecordStore;
use ::common::auth::{self, RELEASE_MANAGE};
use ::common::options::{MemoryOptionStore, OptionStore, StoreError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig, StoreBackend, StoreConfig,
};
use server::state::AppState;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

pub const SHASUM: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

pub mod routes {
    pub const VERSIONS: &str = "/api/v1/version";
    pub const EULA: &str = "/api/v1/eula";
    pub const UPDATE_VERSION_DATA: &str = "/api/v1/admin/update_version_data";
    pub const UPDATE_EULA: &str = "/api/v1/admin/update_eula";
    pub const PURGE: &str = "/api/v1/admin/purge";
    pub const WIDGET_SCRIPT: &str = "/assets/download-button.js";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn shortcode(name: &str) -> String {
        format!("/api/v1/shortcodes/{name}")
    }
}

/// A running test server, backed by an in-memory option store unless
/// spawned with another backend.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub records: RecordStore,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            content_type,
            text,
            body,
        }
    }
}

/// Option store whose every operation fails, like an unreachable database.
pub struct UnavailableStore;

#[async_trait]
impl OptionStore for UnavailableStore {
    async fn get(&self, _name: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn set(&self, _name: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn delete(&self, _name: &str) -> Result<bool, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_backend(Arc::new(MemoryOptionStore::new())).await
    }

    pub async fn spawn_with_backend(backend: Arc<dyn OptionStore>) -> Self {
        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: String::new(),
            },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                options_prefix: "release_tracker".to_string(),
            },
        };

        let records = RecordStore::new(backend, &app_config.store.options_prefix);
        let state = AppState {
            records: records.clone(),
            config: app_config,
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            records,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// A token carrying `release:manage`.
    pub fn manager_token(&self) -> String {
        self.token_with(vec![RELEASE_MANAGE.to_string()])
    }

    pub fn token_with(&self, permissions: Vec<String>) -> String {
        auth::sign("ops", permissions, JWT_SECRET, chrono::Duration::hours(1))
            .expect("Failed to sign test token")
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_raw_with_token(&self, path: &str, body: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body(body.to_owned())
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_agent(&self, path: &str, agent: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("User-Agent", agent)
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Publish a table through the admin action, asserting success.
    pub async fn publish(&self, data: Value) {
        let res = self
            .post_with_token(
                routes::UPDATE_VERSION_DATA,
                &json!({ "data": data }),
                &self.manager_token(),
            )
            .await;
        assert_eq!(res.status, 200, "update_version_data failed: {}", res.text);
        assert_eq!(res.body["status"], "OK");
    }
}

/// A complete, valid release entry.
pub fn release(name: &str, version: &str, file: &str) -> Value {
    json!({
        "name": name,
        "version": version,
        "download_url": format!("https://downloads.example.com/{file}"),
        "shasum": SHASUM,
        "payload_url": "",
    })
}
