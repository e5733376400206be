// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for SmsSink.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `SMSSINK_*` environment variable overrides, and
//! miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use smssink_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("API port: {}", config.server.api_port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{AuthConfig, ServerConfig, SmsSinkConfig, StorageConfig, WebhookConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid `SmsSinkConfig` or every diagnostic found.
pub fn load_and_validate() -> Result<SmsSinkConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<SmsSinkConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<SmsSinkConfig, Vec<ConfigError>> {
    if !path.exists() {
        return Err(vec![ConfigError::Other(format!(
            "config file `{}` does not exist",
            path.display()
        ))]);
    }
    finish(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

fn finish(
    loaded: Result<SmsSinkConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<SmsSinkConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(
                api_port = config.server.api_port,
                ui_port = config.server.ui_port,
                database = %config.storage.database_path,
                "configuration loaded"
            );
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Read a config file keyed by the absolute path figment reports in metadata.
fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    Some((absolute.display().to_string(), content))
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    [
        Some(Path::new(loader::CONFIG_FILE_NAME).to_path_buf()),
        loader::user_config_path(),
        Some(Path::new(loader::SYSTEM_CONFIG_PATH).to_path_buf()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| read_source(&path))
    .collect()
}
