// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements are serialized through tokio-rusqlite's single background
//! thread. Do NOT open additional connections for writes.

use std::path::Path;

use smssink_core::SmsSinkError;
use tracing::debug;

/// Convert a tokio-rusqlite error into `SmsSinkError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SmsSinkError {
    SmsSinkError::storage(e)
}

/// Handle to the SmsSink database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path`, apply PRAGMAs, and
    /// run pending migrations. `:memory:` opens a private in-memory database.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, SmsSinkError> {
        let conn = if path == ":memory:" {
            tokio_rusqlite::Connection::open_in_memory()
                .await
                .map_err(SmsSinkError::storage)?
        } else {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(SmsSinkError::storage)?;
            }
            tokio_rusqlite::Connection::open(path)
                .await
                .map_err(SmsSinkError::storage)?
        };

        let applied = conn
            .call(move |conn| -> Result<_, rusqlite::Error> {
                if wal_mode {
                    let _mode: String = conn.pragma_update_and_check(
                        None,
                        "journal_mode",
                        "WAL",
                        |row| row.get(0),
                    )?;
                }
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.pragma_update(None, "foreign_keys", "ON")?;
                conn.busy_timeout(std::time::Duration::from_secs(5))?;
                Ok(crate::migrations::run_migrations(conn))
            })
            .await
            .map_err(map_tr_err)??;

        debug!(path, wal_mode, applied, "database opened");
        Ok(Self { conn })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    ///
    /// Later calls on this handle fail with a storage error.
    pub async fn close(&self) -> Result<(), SmsSinkError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.clone().close().await.map_err(SmsSinkError::storage)
    }
}
