// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire shapes of incoming request bodies.

use serde::Deserialize;

/// A phone number given either bare or as `{"phone_number": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Address {
    Number(String),
    Object { phone_number: String },
}

impl Address {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Number(n) => n,
            Self::Object { phone_number } => phone_number,
        }
    }
}

/// `to` as a single address or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Recipient {
    One(Address),
    Many(Vec<Address>),
}

impl Recipient {
    /// The single recipient this mock delivers to: the value itself, or the
    /// first list element. Empty when the list is empty.
    pub fn normalize(&self) -> &str {
        match self {
            Self::One(address) => address.as_str(),
            Self::Many(list) => list.first().map(Address::as_str).unwrap_or_default(),
        }
    }
}

/// `to` normalized, or `""` when absent.
pub fn normalize_to(to: Option<&Recipient>) -> &str {
    to.map(Recipient::normalize).unwrap_or_default()
}

/// Body of `POST /v2/messages`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessageRequest {
    pub from: Option<String>,
    pub to: Option<Recipient>,
    pub text: Option<String>,
    pub media_urls: Option<Vec<String>>,
    pub messaging_profile_id: Option<String>,
    pub webhook_url: Option<String>,
    pub webhook_failover_url: Option<String>,
    pub use_profile_webhooks: Option<bool>,
}

/// Message fields of an inbound push, shared by the enveloped and flat shapes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundPayload {
    pub id: Option<String>,
    pub from: Option<Address>,
    pub to: Option<Recipient>,
    pub text: Option<String>,
    pub media_urls: Option<Vec<String>>,
    pub messaging_profile_id: Option<String>,
}

impl InboundPayload {
    pub fn from_number(&self) -> &str {
        self.from.as_ref().map(Address::as_str).unwrap_or_default()
    }

    pub fn to_number(&self) -> &str {
        normalize_to(self.to.as_ref())
    }
}

/// `{"data": {"event_type": ..., "payload": {...}}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEnvelope {
    pub data: InboundEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundEventData {
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub payload: InboundPayload,
}

/// Body of `POST /api/messages/inbound`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulateInboundRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub text: Option<String>,
    pub media_urls: Option<Vec<String>>,
    pub messaging_profile_id: Option<String>,
}
