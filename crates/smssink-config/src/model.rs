// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for SmsSink.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level SmsSink configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmsSinkConfig {
    /// Force debug mode (raw request bodies are journaled). Also settable at
    /// runtime through the admin settings endpoint.
    #[serde(default)]
    pub debug: bool,

    /// Listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Credential bootstrap settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Status callback settings.
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address both listeners bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port of the provider-compatible API (`/v2/...`).
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Port of the admin API (`/api/...`).
    #[serde(default = "default_ui_port")]
    pub ui_port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_port: default_api_port(),
            ui_port: default_ui_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    23456
}

fn default_ui_port() -> u16 {
    23457
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// Activity journal entries older than this many days are purged at startup.
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            log_retention_days: default_log_retention_days(),
        }
    }
}

fn default_database_path() -> String {
    "smssink.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

fn default_log_retention_days() -> u32 {
    7
}

/// Credential bootstrap configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// API key stored on first run when no credential exists yet.
    #[serde(default = "default_api_key")]
    pub default_api_key: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("default_api_key", &"[redacted]")
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_api_key: default_api_key(),
        }
    }
}

fn default_api_key() -> String {
    "test-token".to_string()
}

/// Status callback configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookConfig {
    /// Per-attempt HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every callback.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Offset of the `message.sent` callback from dispatch start.
    #[serde(default = "default_sent_delay_ms")]
    pub sent_delay_ms: u64,

    /// Offset of the `message.delivered` callback from dispatch start.
    #[serde(default = "default_delivered_delay_ms")]
    pub delivered_delay_ms: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            sent_delay_ms: default_sent_delay_ms(),
            delivered_delay_ms: default_delivered_delay_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    "SmsSink/1.0".to_string()
}

fn default_sent_delay_ms() -> u64 {
    500
}

fn default_delivered_delay_ms() -> u64 {
    1500
}
