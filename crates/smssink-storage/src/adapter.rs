// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use smssink_config::model::{AuthConfig, StorageConfig};
use smssink_core::types::{format_timestamp, now_timestamp};
use smssink_core::{
    Credential, HealthStatus, LogEntry, LogFilter, MessageRecord, NewLogEntry, SmsSinkError,
    StorageAdapter,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules. The
/// database is opened on the first call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    default_api_key: String,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](StorageAdapter::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            default_api_key: AuthConfig::default().default_api_key,
            db: OnceCell::new(),
        }
    }

    /// Key seeded into an empty credential table.
    pub fn with_default_api_key(mut self, key: impl Into<String>) -> Self {
        self.default_api_key = key.into();
        self
    }

    fn db(&self) -> Result<&Database, SmsSinkError> {
        self.db.get().ok_or_else(|| SmsSinkError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), SmsSinkError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        if queries::credentials::seed_credential(&db, &self.default_api_key).await? {
            info!("seeded default API credential");
        }
        self.db.set(db).map_err(|_| SmsSinkError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), SmsSinkError> {
        self.db()?.close().await?;
        debug!("storage closed");
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, SmsSinkError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("storage not initialized".into()));
        };
        let probe = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> { conn.execute_batch("SELECT 1;") })
            .await;
        Ok(match probe {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    // --- Message history ---

    async fn insert_message(&self, record: &MessageRecord) -> Result<(), SmsSinkError> {
        queries::messages::insert_message(self.db()?, record).await
    }

    async fn list_messages(&self) -> Result<Vec<MessageRecord>, SmsSinkError> {
        queries::messages::list_messages(self.db()?).await
    }

    async fn clear_messages(&self) -> Result<usize, SmsSinkError> {
        queries::messages::clear_messages(self.db()?).await
    }

    // --- Credential ---

    async fn get_credential(&self) -> Result<Credential, SmsSinkError> {
        let db = self.db()?;
        if let Some(credential) = queries::credentials::get_credential(db).await? {
            return Ok(credential);
        }
        // The row was removed out from under us; fall back to the seed key.
        queries::credentials::seed_credential(db, &self.default_api_key).await?;
        Ok(queries::credentials::get_credential(db)
            .await?
            .unwrap_or_else(|| Credential {
                api_key: self.default_api_key.clone(),
                updated_at: now_timestamp(),
            }))
    }

    async fn set_credential(&self, api_key: &str) -> Result<Credential, SmsSinkError> {
        queries::credentials::set_credential(self.db()?, api_key).await
    }

    // --- Activity journal ---

    async fn append_log(&self, entry: &NewLogEntry) -> Result<(), SmsSinkError> {
        queries::logs::append_log(self.db()?, entry).await
    }

    async fn list_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, SmsSinkError> {
        queries::logs::list_logs(self.db()?, filter).await
    }

    async fn clear_logs(&self) -> Result<usize, SmsSinkError> {
        queries::logs::clear_logs(self.db()?).await
    }

    async fn purge_logs_older_than(&self, days: u32) -> Result<usize, SmsSinkError> {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(i64::from(days));
        queries::logs::purge_before(self.db()?, &format_timestamp(cutoff)).await
    }

    // --- Settings ---

    async fn get_setting(&self, key: &str) -> Result<Option<String>, SmsSinkError> {
        queries::settings::get_setting(self.db()?, key).await
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<(), SmsSinkError> {
        queries::settings::set_setting(self.db()?, key, value).await
    }
}
