// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL files under `migrations/` are compiled into the binary and applied on
//! every [`Database::open`](crate::Database::open).

use smssink_core::SmsSinkError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply all pending migrations. Refinery records applied versions in
/// `refinery_schema_history`, so reruns are no-ops.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<usize, SmsSinkError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(SmsSinkError::storage)?;
    Ok(report.applied_migrations().len())
}
