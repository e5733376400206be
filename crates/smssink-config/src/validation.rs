// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: listener addresses,
//! port collisions, and callback timing.

use crate::diagnostic::ConfigError;
use crate::model::SmsSinkConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of failing on the first one.
pub fn validate_config(config: &SmsSinkConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        invalid("server.host must not be empty".to_string());
    } else {
        let is_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_ip && !is_hostname {
            invalid(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    // Port 0 asks the OS for an ephemeral port, so two zeros never collide.
    if config.server.api_port != 0 && config.server.api_port == config.server.ui_port {
        invalid(format!(
            "server.api_port and server.ui_port must differ, both are {}",
            config.server.api_port
        ));
    }

    if !LOG_LEVELS.contains(&config.server.log_level.to_ascii_lowercase().as_str()) {
        invalid(format!(
            "server.log_level `{}` must be one of {}",
            config.server.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".to_string());
    }

    if config.auth.default_api_key.trim().is_empty() {
        invalid("auth.default_api_key must not be empty".to_string());
    }

    if config.webhook.timeout_secs == 0 {
        invalid("webhook.timeout_secs must be at least 1".to_string());
    }

    if config.webhook.user_agent.trim().is_empty() {
        invalid("webhook.user_agent must not be empty".to_string());
    }

    // The send response must reach the client before the first callback fires.
    if config.webhook.sent_delay_ms == 0 {
        invalid("webhook.sent_delay_ms must be at least 1".to_string());
    }

    if config.webhook.delivered_delay_ms < config.webhook.sent_delay_ms {
        invalid(format!(
            "webhook.delivered_delay_ms ({}) must not be less than webhook.sent_delay_ms ({})",
            config.webhook.delivered_delay_ms, config.webhook.sent_delay_ms
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &SmsSinkConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&SmsSinkConfig::default()).is_ok());
    }

    #[test]
    fn colliding_ports_fail() {
        let mut config = SmsSinkConfig::default();
        config.server.ui_port = config.server.api_port;
        assert!(messages(&config)[0].contains("must differ"));
    }

    #[test]
    fn ephemeral_ports_may_both_be_zero() {
        let mut config = SmsSinkConfig::default();
        config.server.api_port = 0;
        config.server.ui_port = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn delivered_before_sent_fails() {
        let mut config = SmsSinkConfig::default();
        config.webhook.sent_delay_ms = 2000;
        config.webhook.delivered_delay_ms = 1000;
        assert!(messages(&config)[0].contains("delivered_delay_ms"));
    }

    #[test]
    fn zero_sent_delay_fails() {
        let mut config = SmsSinkConfig::default();
        config.webhook.sent_delay_ms = 0;
        let errors = messages(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("webhook.sent_delay_ms must be at least 1"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = SmsSinkConfig::default();
        config.storage.database_path = " ".to_string();
        config.auth.default_api_key = String::new();
        config.webhook.timeout_secs = 0;
        config.server.log_level = "loud".to_string();
        assert_eq!(validate_config(&config).unwrap_err().len(), 4);
    }

    #[test]
    fn bad_host_fails() {
        let mut config = SmsSinkConfig::default();
        config.server.host = "not a host!".to_string();
        assert!(messages(&config)[0].contains("server.host"));
    }
}
