// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin API: message history, credential, journal, and settings.
//!
//! Unauthenticated. Intended for the operator's dashboard and test tooling
//! on the local machine.

use std::str::FromStr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use smssink_core::{
    Credential, Direction, LogCategory, LogEntry, LogFilter, LogLevel, MessageRecord,
};

use crate::error::ApiError;
use crate::request::SimulateInboundRequest;
use crate::server::{DEBUG_MODE_SETTING, GatewayState};

fn success() -> Json<Value> {
    Json(json!({"status": "success"}))
}

/// GET /api/messages
pub async fn list_messages(
    State(state): State<GatewayState>,
) -> Result<Json<Vec<MessageRecord>>, ApiError> {
    state.storage.list_messages().await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "failed to list messages");
        ApiError::internal("[SmsSink] Failed to retrieve messages.")
    })
}

/// DELETE /api/messages
pub async fn clear_messages(State(state): State<GatewayState>) -> Result<Json<Value>, ApiError> {
    let removed = state.storage.clear_messages().await.map_err(|e| {
        tracing::error!(error = %e, "failed to clear messages");
        ApiError::internal("[SmsSink] Failed to clear messages.")
    })?;
    tracing::info!(removed, "message history cleared");
    Ok(success())
}

/// POST /api/messages/inbound
///
/// Stores an inbound message as if the provider had delivered it. Unlike
/// the webhook receiver this requires text or media.
pub async fn simulate_inbound(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<MessageRecord>, ApiError> {
    let request: SimulateInboundRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            state
                .journal
                .error(
                    LogCategory::Message,
                    "Invalid JSON payload in simulate inbound",
                    json!({"error": e.to_string()}),
                )
                .await;
            return Err(ApiError::bad_request(format!(
                "[SmsSink] Invalid JSON payload: {e}"
            )));
        }
    };

    let from = request.from.unwrap_or_default();
    let to = request.to.unwrap_or_default();
    if from.is_empty() || to.is_empty() {
        state
            .journal
            .error(
                LogCategory::Message,
                "Missing required fields in simulate inbound",
                json!({"from": from, "to": to}),
            )
            .await;
        return Err(ApiError::bad_request(
            "[SmsSink] The 'from' and 'to' parameters are required.",
        ));
    }

    let media = request.media_urls.unwrap_or_default();
    let has_text = request.text.as_deref().is_some_and(|t| !t.is_empty());
    if !has_text && media.is_empty() {
        state
            .journal
            .error(
                LogCategory::Message,
                "Missing text or media_urls in simulate inbound",
                json!({"from": from, "to": to}),
            )
            .await;
        return Err(ApiError::bad_request(
            "[SmsSink] Either 'text' or 'media_urls' parameter is required.",
        ));
    }

    let record = MessageRecord::new(
        Direction::Inbound,
        from,
        to,
        request.text,
        media,
        request.messaging_profile_id,
    );
    if let Err(e) = state.storage.insert_message(&record).await {
        tracing::error!(error = %e, "failed to persist simulated message");
        state
            .journal
            .error(
                LogCategory::Message,
                "Failed to save simulated inbound message",
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

    state
        .journal
        .info(
            LogCategory::Message,
            "Simulated inbound message created",
            json!({
                "message_id": record.id,
                "from": record.sender,
                "to": record.recipient,
                "media_count": record.media_urls.len(),
            }),
        )
        .await;
    Ok(Json(record))
}

/// GET /api/credentials
pub async fn get_credentials(
    State(state): State<GatewayState>,
) -> Result<Json<Credential>, ApiError> {
    state.storage.get_credential().await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "failed to read credential");
        ApiError::internal("[SmsSink] Failed to retrieve credentials.")
    })
}

#[derive(Debug, Deserialize)]
struct SetCredentialRequest {
    #[serde(default)]
    api_key: String,
}

/// POST /api/credentials
pub async fn set_credentials(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<Credential>, ApiError> {
    let request: SetCredentialRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::bad_request("[SmsSink] Invalid JSON payload."))?;
    if request.api_key.is_empty() {
        return Err(ApiError::bad_request(
            "[SmsSink] The 'api_key' parameter is required.",
        ));
    }

    let credential = state
        .storage
        .set_credential(&request.api_key)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to store credential");
            ApiError::internal("[SmsSink] Failed to save credentials.")
        })?;

    state
        .journal
        .info(
            LogCategory::Auth,
            "API key updated",
            json!({"updated_at": credential.updated_at}),
        )
        .await;
    Ok(Json(credential))
}

/// Raw query for `GET /api/logs`. Values stay strings so bad input can be
/// handled leniently instead of rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub level: Option<String>,
    pub category: Option<String>,
    pub limit: Option<String>,
}

impl LogsQuery {
    /// Build the storage filter. `None` means a filter value names no known
    /// level or category, so nothing can match.
    pub fn to_filter(&self) -> Option<LogFilter> {
        fn parse<T: FromStr>(value: Option<&str>) -> Option<Option<T>> {
            match value.filter(|v| !v.is_empty()) {
                None => Some(None),
                Some(v) => T::from_str(v).ok().map(Some),
            }
        }

        let level = parse::<LogLevel>(self.level.as_deref())?;
        let category = parse::<LogCategory>(self.category.as_deref())?;
        let limit = self
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<i64>().ok())
            .map(|l| LogFilter::clamp_limit(u32::try_from(l.max(0)).unwrap_or(u32::MAX)))
            .unwrap_or(LogFilter::default().limit);
        Some(LogFilter {
            level,
            category,
            limit,
        })
    }
}

/// GET /api/logs
pub async fn list_logs(
    State(state): State<GatewayState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<LogEntry>>, ApiError> {
    let Some(filter) = query.to_filter() else {
        return Ok(Json(Vec::new()));
    };
    state.storage.list_logs(&filter).await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "failed to list journal");
        ApiError::internal("[SmsSink] Failed to retrieve logs.")
    })
}

/// DELETE /api/logs
pub async fn clear_logs(State(state): State<GatewayState>) -> Result<Json<Value>, ApiError> {
    let removed = state.storage.clear_logs().await.map_err(|e| {
        tracing::error!(error = %e, "failed to clear journal");
        ApiError::internal("[SmsSink] Failed to clear logs.")
    })?;
    state
        .journal
        .info(
            LogCategory::System,
            "All logs cleared",
            json!({"removed": removed}),
        )
        .await;
    Ok(success())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    pub debug_mode: bool,
}

#[derive(Debug, Deserialize)]
struct SettingsUpdate {
    debug_mode: Option<bool>,
}

/// GET /api/settings
pub async fn get_settings(State(state): State<GatewayState>) -> Json<Settings> {
    Json(Settings {
        debug_mode: state.debug_enabled().await,
    })
}

/// POST /api/settings
pub async fn set_settings(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<Settings>, ApiError> {
    let update: SettingsUpdate = serde_json::from_slice(&body)
        .map_err(|_| ApiError::bad_request("[SmsSink] Invalid JSON payload."))?;

    if let Some(debug_mode) = update.debug_mode {
        let value = if debug_mode { "true" } else { "false" };
        state
            .storage
            .set_setting(DEBUG_MODE_SETTING, value)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to store settings");
                ApiError::internal("[SmsSink] Failed to save settings.")
            })?;
        state
            .journal
            .info(
                LogCategory::System,
                "Debug mode changed",
                json!({"debug_mode": debug_mode}),
            )
            .await;
    }

    Ok(Json(Settings {
        debug_mode: state.debug_enabled().await,
    }))
}
