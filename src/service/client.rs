//! Async HTTP client for the arena's remote services
//!
//! One JSON-over-POST client shared by the decision and generation
//! endpoints. Every failure mode (transport, non-success status, body that
//! does not decode) comes back as a recoverable `ArenaError`.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::config::ServiceConfig;
use crate::core::error::{ArenaError, Result};

/// HTTP client for the decision and generation services
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    decision_url: String,
    generation_url: String,
    timeout: Duration,
}

impl ServiceClient {
    /// Create a client with explicit configuration
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ArenaError::Service(e.to_string()))?;
        Ok(Self {
            client,
            decision_url: config.decision_url.clone(),
            generation_url: config.generation_url.clone(),
            timeout,
        })
    }

    /// Create a client from environment variables
    ///
    /// Required: ARENA_SERVICE_URL
    /// Optional: ARENA_SERVICE_TIMEOUT_MS (defaults to 2500)
    pub fn from_env() -> Result<Self> {
        if std::env::var("ARENA_SERVICE_URL").is_err() {
            return Err(ArenaError::Service("ARENA_SERVICE_URL not set".into()));
        }
        Self::new(&ServiceConfig::default().with_env_overrides())
    }

    pub fn decision_url(&self) -> &str {
        &self.decision_url
    }

    pub fn generation_url(&self) -> &str {
        &self.generation_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST a JSON body and decode a JSON response
    pub async fn post_json<Req, Resp>(&self, url: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ArenaError::Service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ArenaError::Service(format!("API error {}: {}", status, error_text)));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| ArenaError::MalformedResponse(e.to_string()))
    }
}
