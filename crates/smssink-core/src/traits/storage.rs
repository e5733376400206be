// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::SmsSinkError;
use crate::types::{Credential, HealthStatus, LogEntry, LogFilter, MessageRecord, NewLogEntry};

/// Adapter for storage and persistence backends.
///
/// Implementations must be safe for concurrent readers and writers; the
/// handlers share one instance behind an `Arc`.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Initializes the backend (migrations, connection, default credential).
    async fn initialize(&self) -> Result<(), SmsSinkError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), SmsSinkError>;

    /// Cheap liveness probe.
    async fn health_check(&self) -> Result<HealthStatus, SmsSinkError>;

    // --- Message history ---

    /// Persist a message record.
    async fn insert_message(&self, record: &MessageRecord) -> Result<(), SmsSinkError>;

    /// All message records, newest first.
    async fn list_messages(&self) -> Result<Vec<MessageRecord>, SmsSinkError>;

    /// Remove every message record. Returns the number removed.
    async fn clear_messages(&self) -> Result<usize, SmsSinkError>;

    // --- Credential ---

    /// The active shared secret.
    async fn get_credential(&self) -> Result<Credential, SmsSinkError>;

    /// Replace the active shared secret and return the stored value.
    async fn set_credential(&self, api_key: &str) -> Result<Credential, SmsSinkError>;

    // --- Activity journal ---

    /// Append one journal entry.
    async fn append_log(&self, entry: &NewLogEntry) -> Result<(), SmsSinkError>;

    /// Journal entries matching the filter, newest first.
    async fn list_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, SmsSinkError>;

    /// Remove every journal entry. Returns the number removed.
    async fn clear_logs(&self) -> Result<usize, SmsSinkError>;

    /// Remove journal entries older than `days` days. Returns the number removed.
    async fn purge_logs_older_than(&self, days: u32) -> Result<usize, SmsSinkError>;

    // --- Settings ---

    /// Read a setting value.
    async fn get_setting(&self, key: &str) -> Result<Option<String>, SmsSinkError>;

    /// Write a setting value.
    async fn set_setting(&self, key: &str, value: &str) -> Result<(), SmsSinkError>;
}
