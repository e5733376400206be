// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain and wire types shared by the storage, gateway, and webhook crates.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Carrier name reported in status callbacks.
pub const MOCK_CARRIER: &str = "SmsSink Mock Carrier";

/// Line type reported in status callbacks.
pub const MOCK_LINE_TYPE: &str = "Wireless";

/// Render a timestamp the way every SmsSink payload and row carries it
/// (RFC 3339, millisecond precision, `Z` suffix).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time as a formatted timestamp.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Health status reported by storage health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Fully operational.
    Healthy,
    /// Not operational.
    Unhealthy(String),
}

/// Which way a message travelled. Fixed at creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
}

/// Message classification derived from media presence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum MessageType {
    Sms,
    Mms,
}

impl MessageType {
    /// `MMS` when any media is attached, `SMS` otherwise.
    pub fn classify(media_urls: &[String]) -> Self {
        if media_urls.is_empty() {
            Self::Sms
        } else {
            Self::Mms
        }
    }
}

/// A persisted message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Server-generated identifier (UUID v4 unless supplied by an inbound envelope).
    pub id: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub sender: String,
    pub recipient: String,
    /// Message body. Empty text is stored as `None`.
    pub content: Option<String>,
    /// Attached media URLs. Never absent; serializes as `[]` when empty.
    #[serde(default)]
    pub media_urls: Vec<String>,
    pub messaging_profile_id: Option<String>,
    pub direction: Direction,
}

impl MessageRecord {
    /// Build a new record with a fresh id and the current timestamp.
    pub fn new(
        direction: Direction,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        content: Option<String>,
        media_urls: Vec<String>,
        messaging_profile_id: Option<String>,
    ) -> Self {
        Self::with_id(
            uuid::Uuid::new_v4().to_string(),
            direction,
            sender,
            recipient,
            content,
            media_urls,
            messaging_profile_id,
        )
    }

    /// Build a new record with a caller-supplied id.
    pub fn with_id(
        id: impl Into<String>,
        direction: Direction,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        content: Option<String>,
        media_urls: Vec<String>,
        messaging_profile_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            created_at: now_timestamp(),
            sender: sender.into(),
            recipient: recipient.into(),
            content: content.filter(|c| !c.is_empty()),
            media_urls,
            messaging_profile_id: messaging_profile_id.filter(|p| !p.is_empty()),
            direction,
        }
    }

    /// Message type derived from the attached media.
    pub fn message_type(&self) -> MessageType {
        MessageType::classify(&self.media_urls)
    }
}

/// The single shared secret guarding the outbound API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub api_key: String,
    pub updated_at: String,
}

/// Severity of an activity journal entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// Subsystem an activity journal entry belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogCategory {
    Message,
    Webhook,
    Auth,
    System,
}

/// An activity journal entry about to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    pub level: LogLevel,
    pub category: LogCategory,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

/// A stored activity journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub created_at: String,
    pub level: LogLevel,
    pub category: LogCategory,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

/// Default number of journal entries returned by a listing.
pub const DEFAULT_LOG_LIMIT: u32 = 100;

/// Upper bound on journal entries returned by a listing.
pub const MAX_LOG_LIMIT: u32 = 1000;

/// Filter for listing journal entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub level: Option<LogLevel>,
    pub category: Option<LogCategory>,
    pub limit: u32,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            level: None,
            category: None,
            limit: DEFAULT_LOG_LIMIT,
        }
    }
}

impl LogFilter {
    /// Clamp a requested limit into `1..=MAX_LOG_LIMIT`; zero falls back to the default.
    pub fn clamp_limit(limit: u32) -> u32 {
        match limit {
            0 => DEFAULT_LOG_LIMIT,
            n => n.min(MAX_LOG_LIMIT),
        }
    }
}

/// A phone number as it appears in provider payloads (`from`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneEndpoint {
    pub phone_number: String,
    pub carrier: String,
    pub line_type: String,
}

/// A recipient entry in provider payloads (`to[]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientStatus {
    pub phone_number: String,
    pub status: String,
    pub carrier: String,
    pub line_type: String,
}
