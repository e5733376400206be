// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./smssink.toml` > `~/.config/smssink/smssink.toml` > `/etc/smssink/smssink.toml`
//! with environment variable overrides via `SMSSINK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SmsSinkConfig;

/// Config file name looked up in every directory of the hierarchy.
pub const CONFIG_FILE_NAME: &str = "smssink.toml";

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/smssink/smssink.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/smssink/smssink.toml` (system-wide)
/// 3. `~/.config/smssink/smssink.toml` (user XDG config)
/// 4. `./smssink.toml` (local directory)
/// 5. `SMSSINK_*` environment variables
pub fn load_config() -> Result<SmsSinkConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SmsSinkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SmsSinkConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SmsSinkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SmsSinkConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SmsSinkConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// `~/.config/smssink/smssink.toml`, when a config directory exists.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("smssink").join(CONFIG_FILE_NAME))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SMSSINK_WEBHOOK_SENT_DELAY_MS` must map to
/// `webhook.sent_delay_ms`, not `webhook.sent.delay.ms`. Unsectioned names
/// such as `SMSSINK_DEBUG` stay top-level.
fn env_provider() -> Env {
    Env::prefixed("SMSSINK_").map(|key| {
        // Figment hands over the key with its original case.
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("webhook_", "webhook.", 1);
        mapped.into()
    })
}
