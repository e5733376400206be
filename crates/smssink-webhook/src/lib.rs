// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery-status callbacks for outbound messages.
//!
//! After an outbound send is accepted, the [`CallbackDispatcher`] replays the
//! provider's `message.sent` and `message.delivered` events against the
//! caller's webhook URL, falling back once to the failover URL per event.

pub mod dispatcher;
pub mod payload;

pub use dispatcher::{CallbackDispatcher, DeliveryError, DeliveryOutcome};
pub use payload::{CallbackEvent, DeliveryStatus, MessageDetails, WebhookEnvelope};
