// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Activity journal operations.

use rusqlite::params;
use rusqlite::types::Value;
use smssink_core::types::now_timestamp;
use smssink_core::{LogEntry, LogFilter, NewLogEntry, SmsSinkError};

use super::parse_column;
use crate::database::{Database, map_tr_err};

/// Append a journal entry stamped with the current time.
pub async fn append_log(db: &Database, entry: &NewLogEntry) -> Result<(), SmsSinkError> {
    let details = entry
        .details
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(SmsSinkError::storage)?;
    let level = entry.level.to_string();
    let category = entry.category.to_string();
    let message = entry.message.clone();
    let now = now_timestamp();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO logs (created_at, level, category, message, details)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![now, level, category, message, details],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Journal entries matching `filter`, newest first.
pub async fn list_logs(db: &Database, filter: &LogFilter) -> Result<Vec<LogEntry>, SmsSinkError> {
    let mut clauses = Vec::new();
    let mut values = Vec::new();
    if let Some(level) = filter.level {
        clauses.push("level = ?");
        values.push(Value::Text(level.to_string()));
    }
    if let Some(category) = filter.category {
        clauses.push("category = ?");
        values.push(Value::Text(category.to_string()));
    }
    values.push(Value::Integer(i64::from(LogFilter::clamp_limit(filter.limit))));

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    let sql = format!(
        "SELECT id, created_at, level, category, message, details FROM logs
         {where_clause} ORDER BY created_at DESC, id DESC LIMIT ?"
    );

    db.connection()
        .call(move |conn| -> Result<Vec<LogEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params_from_iter(values.iter()), |row| {
                let details: Option<String> = row.get(5)?;
                Ok(LogEntry {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                    level: parse_column(row, 2)?,
                    category: parse_column(row, 3)?,
                    message: row.get(4)?,
                    // A malformed payload is surfaced as a plain string.
                    details: details.map(|raw| {
                        serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
                    }),
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete every journal entry. Returns the number removed.
pub async fn clear_logs(db: &Database) -> Result<usize, SmsSinkError> {
    db.connection()
        .call(|conn| -> Result<usize, rusqlite::Error> { conn.execute("DELETE FROM logs", []) })
        .await
        .map_err(map_tr_err)
}

/// Delete entries created strictly before `cutoff` (an RFC 3339 timestamp).
pub async fn purge_before(db: &Database, cutoff: &str) -> Result<usize, SmsSinkError> {
    let cutoff = cutoff.to_string();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute("DELETE FROM logs WHERE created_at < ?1", params![cutoff])
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use smssink_core::{LogCategory, LogLevel};

    use super::*;
    use crate::queries::test_db;

    fn entry(level: LogLevel, category: LogCategory, message: &str) -> NewLogEntry {
        NewLogEntry {
            level,
            category,
            message: message.to_string(),
            details: Some(json!({"message": message})),
        }
    }

    async fn seeded() -> Database {
        let db = test_db().await;
        append_log(&db, &entry(LogLevel::Info, LogCategory::Message, "one"))
            .await
            .unwrap();
        append_log(&db, &entry(LogLevel::Warning, LogCategory::Webhook, "two"))
            .await
            .unwrap();
        append_log(&db, &entry(LogLevel::Error, LogCategory::Webhook, "three"))
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn unfiltered_listing_is_newest_first() {
        let db = seeded().await;
        let logs = list_logs(&db, &LogFilter::default()).await.unwrap();
        let messages: Vec<_> = logs.iter().map(|l| l.message.as_str()).collect();
        assert_eq!(messages, ["three", "two", "one"]);
        assert_eq!(logs[0].details, Some(json!({"message": "three"})));
    }

    #[tokio::test]
    async fn filters_combine() {
        let db = seeded().await;
        let filter = LogFilter {
            category: Some(LogCategory::Webhook),
            ..LogFilter::default()
        };
        assert_eq!(list_logs(&db, &filter).await.unwrap().len(), 2);

        let filter = LogFilter {
            level: Some(LogLevel::Error),
            category: Some(LogCategory::Webhook),
            ..LogFilter::default()
        };
        let logs = list_logs(&db, &filter).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "three");
    }

    #[tokio::test]
    async fn limit_is_applied() {
        let db = seeded().await;
        let filter = LogFilter {
            limit: 1,
            ..LogFilter::default()
        };
        assert_eq!(list_logs(&db, &filter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn entry_without_details_reads_back_as_none() {
        let db = test_db().await;
        let mut e = entry(LogLevel::Info, LogCategory::System, "bare");
        e.details = None;
        append_log(&db, &e).await.unwrap();
        let logs = list_logs(&db, &LogFilter::default()).await.unwrap();
        assert!(logs[0].details.is_none());
    }

    #[tokio::test]
    async fn purge_removes_only_older_entries() {
        let db = seeded().await;
        assert_eq!(purge_before(&db, "2000-01-01T00:00:00.000Z").await.unwrap(), 0);
        assert_eq!(purge_before(&db, "2999-01-01T00:00:00.000Z").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn clear_empties_journal() {
        let db = seeded().await;
        assert_eq!(clear_logs(&db).await.unwrap(), 3);
        assert!(list_logs(&db, &LogFilter::default()).await.unwrap().is_empty());
    }
}
