// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles both routers over a temp SQLite database and
//! drives them in-process with `tower::ServiceExt::oneshot`, so tests need
//! no bound ports for the mock itself.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use smssink_config::SmsSinkConfig;
use smssink_config::model::{StorageConfig, WebhookConfig};
use smssink_core::{SmsSinkError, StorageAdapter};
use smssink_gateway::{GatewayState, admin_router, api_router};
use smssink_storage::SqliteStorage;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    api_key: String,
    debug: bool,
    webhook: WebhookConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            api_key: "test-token".to_string(),
            debug: false,
            // Short offsets keep callback tests fast.
            webhook: WebhookConfig {
                sent_delay_ms: 50,
                delivered_delay_ms: 150,
                timeout_secs: 2,
                ..WebhookConfig::default()
            },
        }
    }

    /// Seed a different API key on first open.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Force debug mode on through configuration.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Override callback offsets, in milliseconds from dispatch start.
    pub fn with_callback_delays(mut self, sent_ms: u64, delivered_ms: u64) -> Self {
        self.webhook.sent_delay_ms = sent_ms;
        self.webhook.delivered_delay_ms = delivered_ms;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, SmsSinkError> {
        let temp_dir = tempfile::TempDir::new().map_err(SmsSinkError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = SmsSinkConfig {
            debug: self.debug,
            webhook: self.webhook,
            storage: StorageConfig {
                database_path: db_path.to_string_lossy().to_string(),
                ..StorageConfig::default()
            },
            ..SmsSinkConfig::default()
        };
        config.auth.default_api_key = self.api_key.clone();

        let storage = SqliteStorage::new(config.storage.clone())
            .with_default_api_key(config.auth.default_api_key.clone());
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        let state = GatewayState::new(&config, storage.clone())?;

        Ok(TestHarness {
            state,
            storage,
            api_key: self.api_key,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment over a temp database.
pub struct TestHarness {
    /// Shared handler state, for direct access to the journal or dispatcher.
    pub state: GatewayState,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter>,
    /// Key the harness sends with `send_message`.
    pub api_key: String,
    /// Effective configuration.
    pub config: SmsSinkConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The provider-compatible router.
    pub fn api(&self) -> Router {
        api_router(self.state.clone())
    }

    /// The admin router.
    pub fn admin(&self) -> Router {
        admin_router(self.state.clone())
    }

    /// Issue one request against `router`. The body is parsed as JSON;
    /// an empty body yields `Value::Null` and a non-JSON body a string.
    pub async fn request(
        router: Router,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<&Value>,
    ) -> Result<(StatusCode, Value), SmsSinkError> {
        Self::request_raw(router, method, uri, auth, body.map(Value::to_string)).await
    }

    /// Like [`request`](Self::request) but with an unparsed body.
    pub async fn request_raw(
        router: Router,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<String>,
    ) -> Result<(StatusCode, Value), SmsSinkError> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .map_err(|e| SmsSinkError::Internal(format!("invalid test request: {e}")))?;

        let Ok(response) = router.oneshot(request).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| SmsSinkError::Internal(format!("unreadable response body: {e}")))?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        Ok((status, json))
    }

    /// POST /v2/messages with the harness key as a bearer token.
    pub async fn send_message(&self, body: &Value) -> Result<(StatusCode, Value), SmsSinkError> {
        let auth = format!("Bearer {}", self.api_key);
        Self::request(self.api(), "POST", "/v2/messages", Some(&auth), Some(body)).await
    }

    /// POST /v2/webhooks/messages.
    pub async fn push_inbound(&self, body: &Value) -> Result<(StatusCode, Value), SmsSinkError> {
        Self::request(self.api(), "POST", "/v2/webhooks/messages", None, Some(body)).await
    }

    /// GET against the admin router.
    pub async fn admin_get(&self, uri: &str) -> Result<(StatusCode, Value), SmsSinkError> {
        Self::request(self.admin(), "GET", uri, None, None).await
    }

    /// POST against the admin router.
    pub async fn admin_post(
        &self,
        uri: &str,
        body: &Value,
    ) -> Result<(StatusCode, Value), SmsSinkError> {
        Self::request(self.admin(), "POST", uri, None, Some(body)).await
    }

    /// DELETE against the admin router.
    pub async fn admin_delete(&self, uri: &str) -> Result<(StatusCode, Value), SmsSinkError> {
        Self::request(self.admin(), "DELETE", uri, None, None).await
    }

    /// Journal messages, newest first.
    pub async fn journal_messages(&self) -> Result<Vec<String>, SmsSinkError> {
        let (_, logs) = self.admin_get("/api/logs?limit=1000").await?;
        Ok(logs
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| e["message"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn harness_seeds_configured_key() {
        let harness = TestHarness::builder()
            .with_api_key("harness-key")
            .build()
            .await
            .unwrap();
        let (status, credential) = harness.admin_get("/api/credentials").await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(credential["api_key"], "harness-key");
    }

    #[tokio::test]
    async fn send_message_uses_harness_key() {
        let harness = TestHarness::builder().build().await.unwrap();
        let (status, body) = harness
            .send_message(&json!({
                "from": "+15550001111",
                "to": "+15550002222",
                "text": "hi",
                "messaging_profile_id": "profile"
            }))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["type"], "SMS");
        assert!(
            harness
                .journal_messages()
                .await
                .unwrap()
                .contains(&"Outbound message sent successfully".to_string())
        );
    }

    #[tokio::test]
    async fn forced_debug_shows_in_settings() {
        let harness = TestHarness::builder().with_debug(true).build().await.unwrap();
        let (_, settings) = harness.admin_get("/api/settings").await.unwrap();
        assert_eq!(settings["debug_mode"], true);
    }
}
