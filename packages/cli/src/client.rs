use std::time::Duration;

use anyhow::{Context, bail};
use common::{Eula, PlatformTable};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

/// Every request fails once this elapses; nothing is retried.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
pub struct ActionStatus {
    pub status: String,
    #[serde(default)]
    pub removed: Option<usize>,
}

impl ActionStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

/// Blocking client for the tracker HTTP API.
pub struct TrackerClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl TrackerClient {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> anyhow::Result<T> {
        debug!(url, "Sending request");
        let res = request
            .send()
            .with_context(|| format!("Request to {url} failed"))?;
        let status = res.status();
        let text = res
            .text()
            .with_context(|| format!("Failed to read response from {url}"))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Unexpected response from {url} (HTTP {status}): {text}"))
    }

    pub fn versions(&self) -> anyhow::Result<PlatformTable> {
        let url = self.url("/version");
        self.send(self.http.post(&url).json(&json!({})), &url)
    }

    pub fn eula(&self) -> anyhow::Result<Eula> {
        let url = self.url("/eula");
        self.send(self.http.post(&url).json(&json!({})), &url)
    }

    fn admin(&self, action: &str, body: serde_json::Value) -> anyhow::Result<ActionStatus> {
        let Some(token) = self.token.as_deref() else {
            bail!("A token is required for `{action}`; pass --token or set TRACKER_TOKEN");
        };
        let url = self.url(&format!("/admin/{action}"));
        self.send(self.http.post(&url).bearer_auth(token).json(&body), &url)
    }

    pub fn update_version_data(&self, table: &PlatformTable) -> anyhow::Result<ActionStatus> {
        self.admin("update_version_data", json!({ "data": table }))
    }

    pub fn update_eula(&self, version: &str, text: &str) -> anyhow::Result<ActionStatus> {
        self.admin("update_eula", json!({ "version": version, "text": text }))
    }

    pub fn purge(&self) -> anyhow::Result<ActionStatus> {
        self.admin("purge", json!({}))
    }
}
