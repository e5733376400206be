// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface of SmsSink.
//!
//! Two axum routers share one [`GatewayState`]: the provider-compatible API
//! (`/v2/messages`, `/v2/webhooks/messages`, `/health`) and the admin API
//! (`/api/...`) used by the dashboard and the CLI.

pub mod error;
pub mod handlers;
pub mod request;
pub mod server;
pub mod validator;

pub use error::ApiError;
pub use server::{GatewayState, admin_router, api_router, serve, serve_listeners};
