// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for SmsSink, a local mock of a messaging provider's HTTP API.
//!
//! This crate provides the error type, the domain and wire types, the
//! [`StorageAdapter`] seam implemented by the persistence layer, and the
//! best-effort [`ActivityLog`] journal.

pub mod activity;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use activity::ActivityLog;
pub use error::SmsSinkError;
pub use traits::StorageAdapter;
pub use types::{
    Credential, Direction, HealthStatus, LogCategory, LogEntry, LogFilter, LogLevel,
    MessageRecord, MessageType, NewLogEntry,
};
