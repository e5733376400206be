// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for SmsSink integration tests.
//!
//! # Components
//!
//! - [`TestHarness`] - Both routers over a temp SQLite database
//! - [`CallbackSink`] - Local HTTP endpoint that captures status callbacks

pub mod callback_sink;
pub mod harness;

pub use callback_sink::CallbackSink;
pub use harness::{TestHarness, TestHarnessBuilder};
