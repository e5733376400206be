// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capturing endpoint for status callbacks.
//!
//! `CallbackSink` wraps a wiremock server that answers every POST with a
//! fixed status, so tests can point `webhook_url` or `webhook_failover_url`
//! at it and assert on what arrived.

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// A local webhook receiver that records every request.
pub struct CallbackSink {
    server: MockServer,
}

impl CallbackSink {
    /// Start a sink that accepts callbacks with `200 OK`.
    pub async fn accepting() -> Self {
        Self::responding_with(200).await
    }

    /// Start a sink that answers every callback with `status`.
    pub async fn responding_with(status: u16) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        Self { server }
    }

    /// URL to hand to the outbound API.
    pub fn url(&self) -> String {
        format!("{}/callbacks", self.server.uri())
    }

    /// Every request received so far, in arrival order.
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Request bodies parsed as JSON, in arrival order.
    pub async fn bodies(&self) -> Vec<Value> {
        self.requests()
            .await
            .iter()
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }

    /// `data.event_type` of each received callback.
    pub async fn event_types(&self) -> Vec<String> {
        self.bodies()
            .await
            .iter()
            .filter_map(|b| b["data"]["event_type"].as_str().map(str::to_string))
            .collect()
    }

    /// Wait until at least `count` requests have arrived or `timeout` passes.
    /// Returns whatever arrived.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<Value> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let bodies = self.bodies().await;
            if bodies.len() >= count || tokio::time::Instant::now() >= deadline {
                return bodies;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_posted_bodies() {
        let sink = CallbackSink::accepting().await;
        let response = reqwest::Client::new()
            .post(sink.url())
            .json(&serde_json::json!({"data": {"event_type": "message.sent"}}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let bodies = sink.wait_for(1, Duration::from_secs(1)).await;
        assert_eq!(bodies.len(), 1);
        assert_eq!(sink.event_types().await, vec!["message.sent".to_string()]);
        assert_eq!(sink.requests().await[0].url.path(), "/callbacks");
    }

    #[tokio::test]
    async fn wait_for_gives_up_after_timeout() {
        let sink = CallbackSink::responding_with(500).await;
        let bodies = sink.wait_for(1, Duration::from_millis(50)).await;
        assert!(bodies.is_empty());
    }
}
