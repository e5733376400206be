// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers, one module per surface.

pub mod admin;
pub mod health;
pub mod inbound;
pub mod messages;

use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;

/// `User-Agent` of the request, or `""`.
pub(crate) fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
