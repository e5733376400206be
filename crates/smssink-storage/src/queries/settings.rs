// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime key/value settings.

use rusqlite::{OptionalExtension, params};
use smssink_core::SmsSinkError;
use smssink_core::types::now_timestamp;

use crate::database::{Database, map_tr_err};

pub async fn get_setting(db: &Database, key: &str) -> Result<Option<String>, SmsSinkError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            conn.query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn set_setting(db: &Database, key: &str, value: &str) -> Result<(), SmsSinkError> {
    let key = key.to_string();
    let value = value.to_string();
    let now = now_timestamp();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
