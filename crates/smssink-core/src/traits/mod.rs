// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the HTTP layer and its collaborators.

pub mod storage;

pub use storage::StorageAdapter;
