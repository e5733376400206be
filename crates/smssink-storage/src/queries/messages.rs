// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message history operations.

use rusqlite::params;
use smssink_core::{MessageRecord, SmsSinkError};

use super::{json_column, parse_column};
use crate::database::{Database, map_tr_err};

/// Insert a message record.
pub async fn insert_message(db: &Database, record: &MessageRecord) -> Result<(), SmsSinkError> {
    let record = record.clone();
    let media = serde_json::to_string(&record.media_urls).map_err(SmsSinkError::storage)?;
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO messages (id, created_at, sender, recipient, content, media_urls, messaging_profile_id, direction)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.created_at,
                    record.sender,
                    record.recipient,
                    record.content,
                    media,
                    record.messaging_profile_id,
                    record.direction.to_string(),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Every stored message, newest first. Rows created in the same millisecond
/// keep reverse insertion order.
pub async fn list_messages(db: &Database) -> Result<Vec<MessageRecord>, SmsSinkError> {
    db.connection()
        .call(|conn| -> Result<Vec<MessageRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, created_at, sender, recipient, content, media_urls, messaging_profile_id, direction
                 FROM messages ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(MessageRecord {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                    sender: row.get(2)?,
                    recipient: row.get(3)?,
                    content: row.get(4)?,
                    media_urls: json_column(row, 5)?,
                    messaging_profile_id: row.get(6)?,
                    direction: parse_column(row, 7)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete every message. Returns the number of rows removed.
pub async fn clear_messages(db: &Database) -> Result<usize, SmsSinkError> {
    db.connection()
        .call(|conn| -> Result<usize, rusqlite::Error> { conn.execute("DELETE FROM messages", []) })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use smssink_core::Direction;

    use super::*;
    use crate::queries::test_db;

    fn record(id: &str, created_at: &str, direction: Direction) -> MessageRecord {
        let mut record = MessageRecord::with_id(
            id,
            direction,
            "+15550001111",
            "+15550002222",
            Some("hi".to_string()),
            vec![],
            None,
        );
        record.created_at = created_at.to_string();
        record
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let db = test_db().await;
        insert_message(&db, &record("a", "2026-01-01T00:00:00.000Z", Direction::Outbound))
            .await
            .unwrap();
        insert_message(&db, &record("b", "2026-01-01T00:00:05.000Z", Direction::Inbound))
            .await
            .unwrap();

        let listed = list_messages(&db).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(listed[0].direction, Direction::Inbound);
    }

    #[tokio::test]
    async fn same_timestamp_breaks_ties_by_insertion() {
        let db = test_db().await;
        let at = "2026-01-01T00:00:00.000Z";
        for id in ["first", "second", "third"] {
            insert_message(&db, &record(id, at, Direction::Outbound))
                .await
                .unwrap();
        }
        let ids: Vec<_> = list_messages(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn media_and_nulls_survive_storage() {
        let db = test_db().await;
        let original = MessageRecord::new(
            Direction::Outbound,
            "+1",
            "+2",
            None,
            vec!["https://x/a.jpg".to_string(), "https://x/b.png".to_string()],
            Some("profile-1".to_string()),
        );
        insert_message(&db, &original).await.unwrap();
        let stored = list_messages(&db).await.unwrap().remove(0);
        assert_eq!(stored, original);
        assert!(stored.content.is_none());
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let db = test_db().await;
        let r = record("dup", "2026-01-01T00:00:00.000Z", Direction::Inbound);
        insert_message(&db, &r).await.unwrap();
        assert!(insert_message(&db, &r).await.is_err());
    }

    #[tokio::test]
    async fn clear_reports_removed_count() {
        let db = test_db().await;
        insert_message(&db, &record("a", "2026-01-01T00:00:00.000Z", Direction::Outbound))
            .await
            .unwrap();
        insert_message(&db, &record("b", "2026-01-01T00:00:01.000Z", Direction::Outbound))
            .await
            .unwrap();
        assert_eq!(clear_messages(&db).await.unwrap(), 2);
        assert!(list_messages(&db).await.unwrap().is_empty());
        assert_eq!(clear_messages(&db).await.unwrap(), 0);
    }
}
