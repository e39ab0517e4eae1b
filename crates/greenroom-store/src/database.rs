//! Connection handling for the embedded database.
//!
//! [`Database`] wraps a single `rusqlite::Connection`.  Opening it runs any
//! pending schema migrations, so a handle that exists is always at the
//! current schema.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations;

/// Handle to the local SQLite database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at its default per-user location, creating the file
    /// and any parent directories on first use.
    ///
    /// Resolves to the platform data directory, e.g.
    /// `~/.local/share/greenroom/greenroom.db` on Linux.
    pub fn new() -> Result<Self> {
        let dirs =
            ProjectDirs::from("com", "greenroom", "greenroom").ok_or(StoreError::NoDataDir)?;
        std::fs::create_dir_all(dirs.data_dir())?;

        let db_path = dirs.data_dir().join("greenroom.db");
        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open the database at an explicit path.  Tests point this at a
    /// temporary directory.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // SQLite leaves both off by default; the messages table relies on
        // its foreign key.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        Ok(Self { conn })
    }

    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Mutable borrow of the connection, needed to start a transaction.
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Filesystem path of the open database, if it has one.
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }
}
