// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routers, shared state, and listener lifecycle.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use smssink_config::SmsSinkConfig;
use smssink_config::model::ServerConfig;
use smssink_core::{ActivityLog, SmsSinkError, StorageAdapter};
use smssink_webhook::CallbackDispatcher;

use crate::error::ApiError;
use crate::handlers;

/// Setting key holding the runtime debug toggle.
pub const DEBUG_MODE_SETTING: &str = "debug_mode";

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub storage: Arc<dyn StorageAdapter>,
    pub journal: ActivityLog,
    pub callbacks: CallbackDispatcher,
    /// Debug mode forced on by configuration, regardless of the stored setting.
    pub force_debug: bool,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(config: &SmsSinkConfig, storage: Arc<dyn StorageAdapter>) -> Result<Self, SmsSinkError> {
        let journal = ActivityLog::new(storage.clone());
        let callbacks = CallbackDispatcher::new(&config.webhook, journal.clone())?;
        Ok(Self {
            storage,
            journal,
            callbacks,
            force_debug: config.debug,
            start_time: Instant::now(),
        })
    }

    /// Whether raw request bodies should be journaled. A failed settings
    /// read counts as off.
    pub async fn debug_enabled(&self) -> bool {
        if self.force_debug {
            return true;
        }
        match self.storage.get_setting(DEBUG_MODE_SETTING).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read debug_mode setting");
                false
            }
        }
    }
}

async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::method_not_allowed(format!(
        "[SmsSink] Method {method} is not supported for this endpoint."
    ))
}

/// Provider-compatible API.
pub fn api_router(state: GatewayState) -> Router {
    Router::new()
        .route("/v2/messages", post(handlers::messages::send_message))
        .route(
            "/v2/webhooks/messages",
            post(handlers::inbound::receive_inbound),
        )
        .route("/health", get(handlers::health::get_health))
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Admin API for inspecting and resetting mock state.
pub fn admin_router(state: GatewayState) -> Router {
    Router::new()
        .route(
            "/api/messages",
            get(handlers::admin::list_messages).delete(handlers::admin::clear_messages),
        )
        .route(
            "/api/messages/inbound",
            post(handlers::admin::simulate_inbound),
        )
        .route(
            "/api/credentials",
            get(handlers::admin::get_credentials).post(handlers::admin::set_credentials),
        )
        .route(
            "/api/logs",
            get(handlers::admin::list_logs).delete(handlers::admin::clear_logs),
        )
        .route(
            "/api/settings",
            get(handlers::admin::get_settings).post(handlers::admin::set_settings),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `host:port`.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener, SmsSinkError> {
    let addr = format!("{host}:{port}");
    TcpListener::bind(&addr)
        .await
        .map_err(|e| SmsSinkError::Transport {
            message: format!("failed to bind {addr}: {e}"),
            source: Some(Box::new(e)),
        })
}

/// Bind both listeners from configuration and serve until `shutdown` fires.
pub async fn serve(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), SmsSinkError> {
    let api = bind(&config.host, config.api_port).await?;
    let admin = bind(&config.host, config.ui_port).await?;
    serve_listeners(api, admin, state, shutdown).await
}

/// Serve both routers on already-bound listeners until `shutdown` fires.
pub async fn serve_listeners(
    api: TcpListener,
    admin: TcpListener,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), SmsSinkError> {
    if let (Ok(api_addr), Ok(admin_addr)) = (api.local_addr(), admin.local_addr()) {
        tracing::info!(%api_addr, %admin_addr, "SmsSink listening");
    }

    let api_shutdown = shutdown.clone();
    let api_server = axum::serve(api, api_router(state.clone()))
        .with_graceful_shutdown(async move { api_shutdown.cancelled().await });
    let admin_server = axum::serve(admin, admin_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await });

    let (api_result, admin_result) = tokio::join!(api_server, admin_server);
    for result in [api_result, admin_result] {
        result.map_err(|e| SmsSinkError::Transport {
            message: format!("server error: {e}"),
            source: Some(Box::new(e)),
        })?;
    }
    tracing::info!("listeners stopped");
    Ok(())
}
