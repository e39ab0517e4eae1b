use thiserror::Error;

/// Failure cases surfaced by the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Anything SQLite refused to do.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No platform data directory could be resolved for the default path.
    #[error("No application data directory available")]
    NoDataDir,

    /// Filesystem error while preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lookup that expected a record found none.
    #[error("Record not found")]
    NotFound,

    /// A schema migration step failed.
    #[error("Schema migration failed: {0}")]
    Migration(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, StoreError>;
