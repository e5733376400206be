// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `POST /v2/webhooks/messages`: ingest a message pushed to the mock.
//!
//! Accepts the provider's event envelope or a flat body. No authentication,
//! and no text/media requirement.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde_json::{Value, json};

use smssink_core::{Direction, LogCategory, MessageRecord};

use crate::error::ApiError;
use crate::request::{InboundEnvelope, InboundPayload};
use crate::server::GatewayState;

/// Which wire shape a body was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundShape {
    Envelope,
    Flat,
}

pub type Resolved = (MessageRecord, InboundShape, Option<String>);

/// Resolve a parsed body into a record, trying the envelope first.
///
/// The envelope is recognized when its inner `from` is present; otherwise
/// the top-level fields are read. `Ok(None)` means the chosen shape lacks
/// `from` or `to`.
pub fn resolve(body: Value) -> Result<Option<Resolved>, serde_json::Error> {
    if let Ok(envelope) = serde_json::from_value::<InboundEnvelope>(body.clone()) {
        let payload = &envelope.data.payload;
        if !payload.from_number().is_empty() {
            if payload.to_number().is_empty() {
                return Ok(None);
            }
            let id = payload.id.clone().filter(|id| !id.is_empty());
            let record = into_record(payload, id);
            return Ok(Some((record, InboundShape::Envelope, envelope.data.event_type)));
        }
    }

    let flat: InboundPayload = serde_json::from_value(body)?;
    if flat.from_number().is_empty() || flat.to_number().is_empty() {
        return Ok(None);
    }
    // Flat bodies always get a server-side id.
    Ok(Some((into_record(&flat, None), InboundShape::Flat, None)))
}

fn into_record(payload: &InboundPayload, id: Option<String>) -> MessageRecord {
    let media = payload.media_urls.clone().unwrap_or_default();
    let text = payload.text.clone();
    let profile = payload.messaging_profile_id.clone();
    match id {
        Some(id) => MessageRecord::with_id(
            id,
            Direction::Inbound,
            payload.from_number(),
            payload.to_number(),
            text,
            media,
            profile,
        ),
        None => MessageRecord::new(
            Direction::Inbound,
            payload.from_number(),
            payload.to_number(),
            text,
            media,
            profile,
        ),
    }
}

/// POST /v2/webhooks/messages
pub async fn receive_inbound(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let parsed = serde_json::from_slice::<Value>(&body).and_then(resolve);
    let (record, shape, event_type) = match parsed {
        Ok(Some(resolved)) => resolved,
        Ok(None) => {
            state
                .journal
                .error(
                    LogCategory::Webhook,
                    "Missing required fields in webhook",
                    json!({"body_size": body.len()}),
                )
                .await;
            return Err(ApiError::bad_request(
                "[SmsSink] The 'from' and 'to' parameters are required.",
            ));
        }
        Err(e) => {
            state
                .journal
                .error(
                    LogCategory::Webhook,
                    "Invalid JSON payload in webhook",
                    json!({"error": e.to_string()}),
                )
                .await;
            return Err(ApiError::bad_request(format!(
                "[SmsSink] Invalid JSON payload: {e}"
            )));
        }
    };

    if let Err(e) = state.storage.insert_message(&record).await {
        tracing::error!(error = %e, message_id = %record.id, "failed to persist inbound message");
        state
            .journal
            .error(
                LogCategory::Webhook,
                "Failed to save inbound webhook message",
                json!({
                    "error": e.to_string(),
                    "message_id": record.id,
                    "from": record.sender,
                    "to": record.recipient,
                }),
            )
            .await;
        return Err(ApiError::internal("[SmsSink] Failed to save message."));
    }

    let summary = match shape {
        InboundShape::Envelope => "Inbound message received via provider webhook",
        InboundShape::Flat => "Inbound message received via simple webhook",
    };
    tracing::info!(message_id = %record.id, ?shape, "inbound message received");
    state
        .journal
        .info(
            LogCategory::Webhook,
            summary,
            json!({
                "message_id": record.id,
                "from": record.sender,
                "to": record.recipient,
                "event_type": event_type,
                "media_count": record.media_urls.len(),
            }),
        )
        .await;

    Ok(Json(json!({"status": "received"})))
}
