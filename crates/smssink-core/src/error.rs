// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for SmsSink.

use thiserror::Error;

/// The primary error type used across SmsSink library crates.
///
/// HTTP-facing failures are rendered separately by the gateway; this enum
/// covers the internal plumbing (configuration, persistence, outbound HTTP).
#[derive(Debug, Error)]
pub enum SmsSinkError {
    /// Configuration errors (invalid TOML, bad values, unparseable headers).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Listener errors (bind failure, server crash).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound webhook client errors.
    #[error("webhook error: {message}")]
    Webhook {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SmsSinkError {
    /// Wrap any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(err),
        }
    }
}
