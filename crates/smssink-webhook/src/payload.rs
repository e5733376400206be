// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callback payload shapes, matching the provider's event envelope.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use smssink_core::types::{
    MOCK_CARRIER, MOCK_LINE_TYPE, MessageType, PhoneEndpoint, RecipientStatus, format_timestamp,
};

/// What the dispatcher needs to know about an accepted outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDetails {
    pub id: String,
    pub from: String,
    pub to: String,
    pub text: Option<String>,
    pub media_urls: Vec<String>,
    pub messaging_profile_id: Option<String>,
    pub message_type: MessageType,
    pub webhook_url: String,
    pub webhook_failover_url: Option<String>,
}

impl MessageDetails {
    /// The failover target, if one was supplied and is non-empty.
    pub fn failover_url(&self) -> Option<&str> {
        self.webhook_failover_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }
}

/// Delivery state reported by a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
}

impl DeliveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Delivered => "delivered",
        }
    }

    pub fn event_type(self) -> &'static str {
        match self {
            Self::Sent => "message.sent",
            Self::Delivered => "message.delivered",
        }
    }
}

/// One step of the callback sequence. `delay` is measured from dispatch
/// start, not from the previous event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackEvent {
    pub status: DeliveryStatus,
    pub delay: Duration,
}

/// `{"data": {...}}` wrapper posted to the webhook URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEventData {
    pub event_type: String,
    /// Fresh per event.
    pub id: String,
    pub occurred_at: String,
    pub payload: StatusPayload,
    pub record_type: String,
}

/// The message as seen in a status callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusPayload {
    pub id: String,
    pub record_type: String,
    pub direction: String,
    pub messaging_profile_id: Option<String>,
    pub from: PhoneEndpoint,
    pub to: Vec<RecipientStatus>,
    pub text: String,
    pub media: Vec<String>,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

fn offset(start: DateTime<Utc>, delay: Duration) -> DateTime<Utc> {
    start + TimeDelta::from_std(delay).unwrap_or(TimeDelta::zero())
}

impl WebhookEnvelope {
    /// Build the envelope for `event` of a sequence that started at
    /// `started_at`. `sent_delay` locates the `message.sent` event, whose
    /// time the `delivered` payload repeats as `sent_at`.
    pub fn build(
        details: &MessageDetails,
        event: CallbackEvent,
        started_at: DateTime<Utc>,
        sent_delay: Duration,
    ) -> Self {
        let occurred_at = format_timestamp(offset(started_at, event.delay));
        let (sent_at, completed_at) = match event.status {
            DeliveryStatus::Sent => (Some(occurred_at.clone()), None),
            DeliveryStatus::Delivered => (
                Some(format_timestamp(offset(started_at, sent_delay))),
                Some(occurred_at.clone()),
            ),
        };
        Self {
            data: WebhookEventData {
                event_type: event.status.event_type().to_string(),
                id: uuid::Uuid::new_v4().to_string(),
                occurred_at,
                record_type: "event".to_string(),
                payload: StatusPayload {
                    id: details.id.clone(),
                    record_type: "message".to_string(),
                    direction: "outbound".to_string(),
                    messaging_profile_id: details.messaging_profile_id.clone(),
                    from: PhoneEndpoint {
                        phone_number: details.from.clone(),
                        carrier: MOCK_CARRIER.to_string(),
                        line_type: MOCK_LINE_TYPE.to_string(),
                    },
                    to: vec![RecipientStatus {
                        phone_number: details.to.clone(),
                        status: event.status.as_str().to_string(),
                        carrier: MOCK_CARRIER.to_string(),
                        line_type: MOCK_LINE_TYPE.to_string(),
                    }],
                    text: details.text.clone().unwrap_or_default(),
                    media: details.media_urls.clone(),
                    message_type: details.message_type,
                    status: event.status,
                    sent_at,
                    completed_at,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> MessageDetails {
        MessageDetails {
            id: "msg-1".into(),
            from: "+15550001111".into(),
            to: "+15550002222".into(),
            text: None,
            media_urls: vec!["https://x/a.jpg".into()],
            messaging_profile_id: Some("profile".into()),
            message_type: MessageType::Mms,
            webhook_url: "http://hook".into(),
            webhook_failover_url: Some(String::new()),
        }
    }

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn sent_event_carries_only_sent_at() {
        let event = CallbackEvent {
            status: DeliveryStatus::Sent,
            delay: Duration::from_millis(500),
        };
        let envelope = WebhookEnvelope::build(&details(), event, start(), event.delay);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["data"]["event_type"], "message.sent");
        assert_eq!(json["data"]["record_type"], "event");
        assert_eq!(json["data"]["occurred_at"], "2026-03-01T12:00:00.500Z");
        let payload = &json["data"]["payload"];
        assert_eq!(payload["status"], "sent");
        assert_eq!(payload["sent_at"], "2026-03-01T12:00:00.500Z");
        assert!(payload.get("completed_at").is_none());
        assert_eq!(payload["type"], "MMS");
        assert_eq!(payload["text"], "");
        assert_eq!(payload["from"]["carrier"], MOCK_CARRIER);
        assert_eq!(payload["to"][0]["status"], "sent");
        assert_eq!(payload["to"][0]["line_type"], MOCK_LINE_TYPE);
    }

    #[test]
    fn delivered_event_repeats_sent_time() {
        let event = CallbackEvent {
            status: DeliveryStatus::Delivered,
            delay: Duration::from_millis(1500),
        };
        let envelope =
            WebhookEnvelope::build(&details(), event, start(), Duration::from_millis(500));
        let payload = &envelope.data.payload;
        assert_eq!(payload.sent_at.as_deref(), Some("2026-03-01T12:00:00.500Z"));
        assert_eq!(payload.completed_at.as_deref(), Some("2026-03-01T12:00:01.500Z"));
        assert_eq!(envelope.data.occurred_at, "2026-03-01T12:00:01.500Z");
    }

    #[test]
    fn event_ids_are_fresh() {
        let event = CallbackEvent {
            status: DeliveryStatus::Sent,
            delay: Duration::ZERO,
        };
        let a = WebhookEnvelope::build(&details(), event, start(), Duration::ZERO);
        let b = WebhookEnvelope::build(&details(), event, start(), Duration::ZERO);
        assert_ne!(a.data.id, b.data.id);
        assert_eq!(a.data.payload.id, "msg-1");
    }

    #[test]
    fn empty_failover_is_ignored() {
        assert_eq!(details().failover_url(), None);
        let mut d = details();
        d.webhook_failover_url = Some("http://backup".into());
        assert_eq!(d.failover_url(), Some("http://backup"));
    }
}
