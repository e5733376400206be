// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `POST /v2/messages`: accept an outbound send.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use chrono::{TimeDelta, Utc};
use serde::Serialize;
use serde_json::json;

use smssink_core::types::{PhoneEndpoint, RecipientStatus, format_timestamp};
use smssink_core::{Direction, LogCategory, MessageRecord, MessageType};
use smssink_webhook::MessageDetails;

use super::user_agent;
use crate::error::ApiError;
use crate::request::{SendMessageRequest, normalize_to};
use crate::server::GatewayState;
use crate::validator::{ValidatedMessage, validate};

/// `{"data": {...}}` returned for an accepted send.
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub data: OutboundMessage,
}

/// The accepted message, in the provider's response shape.
#[derive(Debug, Serialize)]
pub struct OutboundMessage {
    pub id: String,
    pub record_type: &'static str,
    pub direction: Direction,
    pub messaging_profile_id: String,
    pub from: PhoneEndpoint,
    pub to: Vec<RecipientStatus>,
    pub text: String,
    pub media: Vec<String>,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub valid_until: String,
    pub webhook_url: String,
    pub webhook_failover_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_profile_webhooks: Option<bool>,
    pub encoding: &'static str,
    pub parts: u32,
    pub tags: Vec<String>,
    pub cost: Option<serde_json::Value>,
    pub received_at: Option<String>,
    pub sent_at: Option<String>,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl OutboundMessage {
    fn queued(record: &MessageRecord, message: &ValidatedMessage) -> Self {
        let valid_until = format_timestamp(Utc::now() + TimeDelta::hours(24));
        Self {
            id: record.id.clone(),
            record_type: "message",
            direction: Direction::Outbound,
            messaging_profile_id: message.messaging_profile_id.clone(),
            from: PhoneEndpoint {
                phone_number: message.from.clone(),
                carrier: String::new(),
                line_type: String::new(),
            },
            to: vec![RecipientStatus {
                phone_number: message.to.clone(),
                status: "queued".to_string(),
                carrier: String::new(),
                line_type: String::new(),
            }],
            text: message.text.clone().unwrap_or_default(),
            media: message.media_urls.clone(),
            message_type: message.message_type,
            valid_until,
            webhook_url: message.webhook_url.clone().unwrap_or_default(),
            webhook_failover_url: message.webhook_failover_url.clone().unwrap_or_default(),
            use_profile_webhooks: message.use_profile_webhooks,
            encoding: "GSM-7",
            parts: 1,
            tags: Vec::new(),
            cost: None,
            received_at: None,
            sent_at: None,
            completed_at: None,
            created_at: record.created_at.clone(),
            updated_at: record.created_at.clone(),
        }
    }
}

/// POST /v2/messages
///
/// Parse, authorize, validate, persist, respond. When a `webhook_url` was
/// supplied the status callbacks are scheduled in the background; their
/// outcome never reaches this response.
pub async fn send_message(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let agent = user_agent(&headers);

    if state.debug_enabled().await {
        state
            .journal
            .info(
                LogCategory::Message,
                "Raw request body received",
                json!({"body": String::from_utf8_lossy(&body), "user_agent": agent}),
            )
            .await;
    }

    let request: SendMessageRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            state
                .journal
                .error(
                    LogCategory::Message,
                    "Invalid JSON payload in outbound message request",
                    json!({"error": e.to_string(), "user_agent": agent}),
                )
                .await;
            return Err(ApiError::bad_request(format!(
                "[SmsSink] Invalid JSON payload: {e}"
            )));
        }
    };

    let credential = match state.storage.get_credential().await {
        Ok(credential) => credential,
        Err(e) => {
            tracing::error!(error = %e, "failed to load credential");
            state
                .journal
                .error(
                    LogCategory::Auth,
                    "Failed to load API credentials",
                    json!({"error": e.to_string()}),
                )
                .await;
            return Err(ApiError::internal("[SmsSink] Failed to load credentials."));
        }
    };

    let auth = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let message = match validate(auth, &request, &credential.api_key) {
        Ok(message) => message,
        Err(rejection) => {
            let category = if rejection.code == crate::error::CODE_UNAUTHORIZED {
                LogCategory::Auth
            } else {
                LogCategory::Message
            };
            tracing::debug!(status = %rejection.status, detail = %rejection.detail, "outbound send rejected");
            state
                .journal
                .error(
                    category,
                    "Validation failed for outbound message",
                    json!({
                        "status_code": rejection.status.as_u16(),
                        "detail": rejection.detail,
                        "from": request.from,
                        "to": normalize_to(request.to.as_ref()),
                    }),
                )
                .await;
            return Err(rejection);
        }
    };

    let record = MessageRecord::new(
        Direction::Outbound,
        message.from.clone(),
        message.to.clone(),
        message.text.clone(),
        message.media_urls.clone(),
        Some(message.messaging_profile_id.clone()),
    );

    if let Err(e) = state.storage.insert_message(&record).await {
        tracing::error!(error = %e, "failed to persist outbound message");
        state
            .journal
            .error(
                LogCategory::Message,
                "Failed to save outbound message to database",
                json!({"error": e.to_string(), "from": message.from, "to": message.to}),
            )
            .await;
        return Err(ApiError::internal("[SmsSink] Failed to save message."));
    }

    tracing::info!(
        message_id = %record.id,
        message_type = %message.message_type,
        media_count = message.media_urls.len(),
        "outbound message accepted"
    );
    state
        .journal
        .info(
            LogCategory::Message,
            "Outbound message sent successfully",
            json!({
                "message_id": record.id,
                "from": message.from,
                "to": message.to,
                "type": message.message_type,
                "has_text": message.text.is_some(),
                "media_count": message.media_urls.len(),
            }),
        )
        .await;

    let response = SendMessageResponse {
        data: OutboundMessage::queued(&record, &message),
    };

    if let Some(webhook_url) = message.webhook_url.clone() {
        state.callbacks.schedule(MessageDetails {
            id: record.id.clone(),
            from: message.from,
            to: message.to,
            text: message.text,
            media_urls: message.media_urls,
            messaging_profile_id: Some(message.messaging_profile_id),
            message_type: message.message_type,
            webhook_url,
            webhook_failover_url: message.webhook_failover_url,
        });
    }

    Ok(Json(response))
}
