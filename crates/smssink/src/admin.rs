// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline `messages` and `credentials` commands.
//!
//! These open the database directly, so they work whether or not a server
//! is running against the same file.

use std::sync::Arc;

use serde_json::json;

use smssink_config::SmsSinkConfig;
use smssink_core::{ActivityLog, LogCategory, MessageRecord, SmsSinkError, StorageAdapter};
use smssink_storage::SqliteStorage;

/// Open and initialize storage as configured, seeding the default key.
pub async fn open_storage(config: &SmsSinkConfig) -> Result<SqliteStorage, SmsSinkError> {
    let storage = SqliteStorage::new(config.storage.clone())
        .with_default_api_key(config.auth.default_api_key.clone());
    storage.initialize().await?;
    Ok(storage)
}

fn format_message(record: &MessageRecord) -> String {
    let body = match (&record.content, record.media_urls.len()) {
        (Some(text), 0) => text.clone(),
        (Some(text), n) => format!("{text} [+{n} media]"),
        (None, n) => format!("[{n} media]"),
    };
    format!(
        "{}  {:<8}  {}  {} -> {}  {}",
        record.created_at,
        record.direction,
        record.message_type(),
        record.sender,
        record.recipient,
        body
    )
}

/// `smssink messages list`
pub async fn list_messages(config: &SmsSinkConfig, json: bool) -> Result<(), SmsSinkError> {
    let storage = open_storage(config).await?;
    let messages = storage.list_messages().await?;
    if json {
        let rendered = serde_json::to_string_pretty(&messages)
            .map_err(|e| SmsSinkError::Internal(format!("failed to render messages: {e}")))?;
        println!("{rendered}");
    } else if messages.is_empty() {
        println!("no messages");
    } else {
        for record in &messages {
            println!("{}", format_message(record));
        }
    }
    storage.close().await
}

/// `smssink messages clear`
pub async fn clear_messages(config: &SmsSinkConfig) -> Result<(), SmsSinkError> {
    let storage = open_storage(config).await?;
    let removed = storage.clear_messages().await?;
    println!("removed {removed} message(s)");
    storage.close().await
}

/// `smssink credentials show`
pub async fn show_credential(config: &SmsSinkConfig) -> Result<(), SmsSinkError> {
    let storage = open_storage(config).await?;
    let credential = storage.get_credential().await?;
    println!("api_key:    {}", credential.api_key);
    println!("updated_at: {}", credential.updated_at);
    storage.close().await
}

/// `smssink credentials set <key>`
pub async fn set_credential(config: &SmsSinkConfig, api_key: &str) -> Result<(), SmsSinkError> {
    if api_key.trim().is_empty() {
        return Err(SmsSinkError::Config("api key must not be empty".into()));
    }
    let storage = Arc::new(open_storage(config).await?);
    let credential = storage.set_credential(api_key).await?;
    ActivityLog::new(storage.clone())
        .info(
            LogCategory::Auth,
            "API key updated",
            json!({"updated_at": credential.updated_at, "source": "cli"}),
        )
        .await;
    println!("api key updated at {}", credential.updated_at);
    storage.close().await
}

#[cfg(test)]
mod tests {
    use smssink_core::{Direction, LogFilter};
    use tempfile::TempDir;

    use super::*;

    fn config_in(dir: &TempDir) -> SmsSinkConfig {
        let mut config = SmsSinkConfig::default();
        config.storage.database_path = dir.path().join("cli.db").to_string_lossy().to_string();
        config
    }

    #[test]
    fn formats_text_and_media() {
        let mut record = MessageRecord::new(
            Direction::Inbound,
            "+1",
            "+2",
            Some("hello".into()),
            vec![],
            None,
        );
        assert!(format_message(&record).ends_with("SMS  +1 -> +2  hello"));
        record.media_urls = vec!["https://x/a.png".into()];
        assert!(format_message(&record).ends_with("MMS  +1 -> +2  hello [+1 media]"));
        record.content = None;
        assert!(format_message(&record).ends_with("[1 media]"));
    }

    #[tokio::test]
    async fn set_then_show_credential() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        set_credential(&config, "cli-key").await.unwrap();

        let storage = open_storage(&config).await.unwrap();
        assert_eq!(storage.get_credential().await.unwrap().api_key, "cli-key");
        let logs = storage.list_logs(&LogFilter::default()).await.unwrap();
        assert_eq!(logs[0].message, "API key updated");
        assert_eq!(logs[0].category, LogCategory::Auth);
    }

    #[tokio::test]
    async fn blank_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = set_credential(&config_in(&dir), "  ").await.unwrap_err();
        assert!(matches!(err, SmsSinkError::Config(_)));
    }

    #[tokio::test]
    async fn clear_removes_history() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        {
            let storage = open_storage(&config).await.unwrap();
            let record = MessageRecord::new(Direction::Inbound, "+1", "+2", Some("x".into()), vec![], None);
            storage.insert_message(&record).await.unwrap();
            storage.close().await.unwrap();
        }
        list_messages(&config, true).await.unwrap();
        clear_messages(&config).await.unwrap();

        let storage = open_storage(&config).await.unwrap();
        assert!(storage.list_messages().await.unwrap().is_empty());
    }
}
