// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Detached delivery of status callbacks with single-shot failover.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use smssink_config::model::WebhookConfig;
use smssink_core::types::now_timestamp;
use smssink_core::{ActivityLog, LogCategory, SmsSinkError};

use crate::payload::{CallbackEvent, DeliveryStatus, MessageDetails, WebhookEnvelope};

/// Placeholder value for the provider's signature header.
const MOCK_SIGNATURE: &str = "mock-signature";

/// Why a single POST did not count as delivered.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("webhook returned non-2xx status {0}")]
    Status(u16),
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Where a callback event ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Primary,
    Failover,
    Failed,
}

/// Posts `message.sent` and `message.delivered` callbacks for accepted
/// outbound messages.
#[derive(Debug, Clone)]
pub struct CallbackDispatcher {
    client: reqwest::Client,
    journal: ActivityLog,
    sent_delay: Duration,
    delivered_delay: Duration,
}

impl CallbackDispatcher {
    pub fn new(config: &WebhookConfig, journal: ActivityLog) -> Result<Self, SmsSinkError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SmsSinkError::Webhook {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            journal,
            sent_delay: Duration::from_millis(config.sent_delay_ms),
            delivered_delay: Duration::from_millis(config.delivered_delay_ms),
        })
    }

    /// The callback sequence, in delivery order.
    pub fn events(&self) -> [CallbackEvent; 2] {
        [
            CallbackEvent {
                status: DeliveryStatus::Sent,
                delay: self.sent_delay,
            },
            CallbackEvent {
                status: DeliveryStatus::Delivered,
                delay: self.delivered_delay,
            },
        ]
    }

    /// Start the callback sequence in the background and return at once.
    ///
    /// No task is spawned when the message carries no webhook URL. The task
    /// handle is not retained: pending callbacks die with the runtime.
    pub fn schedule(&self, details: MessageDetails) {
        if details.webhook_url.is_empty() {
            return;
        }
        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.run(details).await;
        });
    }

    /// Run the full callback sequence to completion.
    pub async fn run(&self, details: MessageDetails) -> Vec<DeliveryOutcome> {
        if details.webhook_url.is_empty() {
            return Vec::new();
        }

        let start = Instant::now();
        let started_at = chrono::Utc::now();
        let mut outcomes = Vec::with_capacity(2);

        for event in self.events() {
            sleep_until(start + event.delay).await;
            let envelope = WebhookEnvelope::build(&details, event, started_at, self.sent_delay);
            outcomes.push(self.deliver(&details, &envelope).await);
        }
        outcomes
    }

    async fn deliver(&self, details: &MessageDetails, envelope: &WebhookEnvelope) -> DeliveryOutcome {
        let event_type = envelope.data.event_type.as_str();
        let body = match serde_json::to_vec(envelope) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, event_type, "failed to serialize webhook payload");
                self.journal
                    .error(
                        LogCategory::Webhook,
                        "Failed to marshal webhook payload",
                        json!({"error": e.to_string(), "event_type": event_type}),
                    )
                    .await;
                return DeliveryOutcome::Failed;
            }
        };

        let primary = details.webhook_url.as_str();
        let error = match self.post(primary, &body).await {
            Ok(()) => {
                info!(url = primary, event_type, message_id = %details.id, "webhook delivered");
                self.journal
                    .info(
                        LogCategory::Webhook,
                        "Webhook sent successfully",
                        json!({"url": primary, "event_type": event_type, "message_id": details.id}),
                    )
                    .await;
                return DeliveryOutcome::Primary;
            }
            Err(e) => e,
        };

        warn!(url = primary, event_type, error = %error, "primary webhook URL failed");
        self.journal
            .warning(
                LogCategory::Webhook,
                "Primary webhook URL failed",
                json!({
                    "url": primary,
                    "error": error.to_string(),
                    "event_type": event_type,
                    "message_id": details.id,
                }),
            )
            .await;

        let Some(failover) = details.failover_url() else {
            return DeliveryOutcome::Failed;
        };

        match self.post(failover, &body).await {
            Ok(()) => {
                info!(url = failover, event_type, message_id = %details.id, "webhook delivered to failover URL");
                self.journal
                    .info(
                        LogCategory::Webhook,
                        "Webhook sent to failover URL",
                        json!({"url": failover, "event_type": event_type, "message_id": details.id}),
                    )
                    .await;
                DeliveryOutcome::Failover
            }
            Err(e) => {
                warn!(url = failover, event_type, error = %e, "failover webhook URL also failed");
                self.journal
                    .error(
                        LogCategory::Webhook,
                        "Failover webhook URL also failed",
                        json!({
                            "url": failover,
                            "error": e.to_string(),
                            "event_type": event_type,
                            "message_id": details.id,
                        }),
                    )
                    .await;
                DeliveryOutcome::Failed
            }
        }
    }

    async fn post(&self, url: &str, body: &[u8]) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header("telnyx-timestamp", now_timestamp())
            .header("telnyx-signature-ed25519", MOCK_SIGNATURE)
            .body(body.to_vec())
            .send()
            .await?;

        let status = response.status();
        debug!(url, status = %status, "webhook response received");
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Status(status.as_u16()))
        }
    }
}
