// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `smssink serve` command implementation.
//!
//! Opens storage, seeds the credential, purges stale journal entries, then
//! runs both listeners until SIGINT or SIGTERM.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use smssink_config::SmsSinkConfig;
use smssink_core::{LogCategory, SmsSinkError, StorageAdapter};
use smssink_gateway::GatewayState;

use crate::admin::open_storage;
use crate::shutdown;

/// Run the mock until a shutdown signal arrives.
pub async fn run_serve(config: SmsSinkConfig) -> Result<(), SmsSinkError> {
    init_tracing(&config.server.log_level);

    let storage: Arc<dyn StorageAdapter> = Arc::new(open_storage(&config).await?);

    match storage
        .purge_logs_older_than(config.storage.log_retention_days)
        .await
    {
        Ok(0) => {}
        Ok(purged) => info!(purged, "purged stale journal entries"),
        Err(e) => warn!(error = %e, "failed to purge journal"),
    }

    let state = GatewayState::new(&config, storage.clone())?;
    state
        .journal
        .info(
            LogCategory::System,
            "SmsSink started",
            json!({
                "version": env!("CARGO_PKG_VERSION"),
                "api_port": config.server.api_port,
                "ui_port": config.server.ui_port,
            }),
        )
        .await;
    info!(
        api_port = config.server.api_port,
        ui_port = config.server.ui_port,
        database = %config.storage.database_path,
        "starting SmsSink"
    );

    let cancel = shutdown::install_signal_handler();
    let result = smssink_gateway::serve(&config.server, state, cancel).await;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close storage cleanly");
    }
    info!("SmsSink stopped");
    result
}

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("smssink={log_level},tower_http={log_level},warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
