//! Error types for gradebook-db

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// gradebook-db error types
#[derive(Error, Debug)]
pub enum Error {
    /// A field violated its domain constraint (score outside [0, 100],
    /// empty name or ID). Rejected before any write.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Primary-key collision on add. No partial write occurs; the stored
    /// record is unchanged.
    #[error("student ID already exists: {0}")]
    DuplicateKey(String),

    /// SQLite storage error
    #[error("storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Durable medium unavailable (snapshot copy, legacy archive move)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Legacy CSV reader could not be constructed. Row-level parse
    /// failures are skipped during migration, not surfaced here.
    #[error("legacy file error: {0}")]
    Csv(#[from] csv::Error),
}
