// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Singleton credential row (`id = 1`).

use rusqlite::{OptionalExtension, params};
use smssink_core::types::now_timestamp;
use smssink_core::{Credential, SmsSinkError};

use crate::database::{Database, map_tr_err};

/// Insert `default_key` unless a credential already exists.
pub async fn seed_credential(db: &Database, default_key: &str) -> Result<bool, SmsSinkError> {
    let key = default_key.to_string();
    let now = now_timestamp();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO credentials (id, api_key, updated_at) VALUES (1, ?1, ?2)",
                params![key, now],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(map_tr_err)
}

/// The stored credential, if any.
pub async fn get_credential(db: &Database) -> Result<Option<Credential>, SmsSinkError> {
    db.connection()
        .call(|conn| -> Result<Option<Credential>, rusqlite::Error> {
            conn.query_row(
                "SELECT api_key, updated_at FROM credentials WHERE id = 1",
                [],
                |row| {
                    Ok(Credential {
                        api_key: row.get(0)?,
                        updated_at: row.get(1)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the credential, creating the row when missing.
pub async fn set_credential(db: &Database, api_key: &str) -> Result<Credential, SmsSinkError> {
    let credential = Credential {
        api_key: api_key.to_string(),
        updated_at: now_timestamp(),
    };
    let row = credential.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO credentials (id, api_key, updated_at) VALUES (1, ?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET api_key = excluded.api_key, updated_at = excluded.updated_at",
                params![row.api_key, row.updated_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(credential)
}
