// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator-visible activity journal.
//!
//! Handlers and the callback dispatcher record what happened to each request
//! here. Journal writes never fail the caller: a storage error is reported
//! through `tracing` and otherwise dropped.

use std::sync::Arc;

use serde_json::Value;

use crate::traits::StorageAdapter;
use crate::types::{LogCategory, LogLevel, NewLogEntry};

/// Best-effort writer for the activity journal.
#[derive(Clone)]
pub struct ActivityLog {
    storage: Option<Arc<dyn StorageAdapter>>,
}

impl std::fmt::Debug for ActivityLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityLog")
            .field("attached", &self.storage.is_some())
            .finish()
    }
}

impl ActivityLog {
    /// Journal into the given storage backend.
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    /// A journal with no backend. Entries are discarded.
    pub fn detached() -> Self {
        Self { storage: None }
    }

    /// Append an entry, swallowing storage failures.
    pub async fn record(
        &self,
        level: LogLevel,
        category: LogCategory,
        message: &str,
        details: Option<Value>,
    ) {
        let Some(storage) = &self.storage else {
            return;
        };

        let entry = NewLogEntry {
            level,
            category,
            message: message.to_string(),
            details,
        };

        if let Err(e) = storage.append_log(&entry).await {
            tracing::warn!(
                error = %e,
                category = %category,
                "failed to append activity journal entry"
            );
        }
    }

    pub async fn info(&self, category: LogCategory, message: &str, details: Value) {
        self.record(LogLevel::Info, category, message, Some(details))
            .await;
    }

    pub async fn warning(&self, category: LogCategory, message: &str, details: Value) {
        self.record(LogLevel::Warning, category, message, Some(details))
            .await;
    }

    pub async fn error(&self, category: LogCategory, message: &str, details: Value) {
        self.record(LogLevel::Error, category, message, Some(details))
            .await;
    }
}
