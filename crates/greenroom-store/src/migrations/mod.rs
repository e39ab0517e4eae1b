//! Schema migrations.
//!
//! The schema version lives in SQLite's `user_version` pragma.  [`run`]
//! compares it against the version the code expects on every open and
//! applies the missing steps in order, so old database files upgrade in
//! place.

pub mod v001_initial;

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Schema version the code expects.  A new migration module bumps this by
/// one.
const CURRENT_VERSION: u32 = 1;

/// Bring the connected database up to the current schema version.
pub fn run(conn: &Connection) -> Result<()> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if found == CURRENT_VERSION {
        tracing::debug!(version = found, "database schema up to date");
        return Ok(());
    }

    tracing::info!(from = found, to = CURRENT_VERSION, "migrating database schema");

    if found < 1 {
        v001_initial::up(conn).map_err(|e| StoreError::Migration(format!("v001_initial: {e}")))?;
        conn.pragma_update(None, "user_version", 1)?;
    }

    Ok(())
}
