//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The RPC refused the request itself; resending it cannot succeed.
    #[error("getEvents rejected ({code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("getEvents returned neither a result nor an error")]
    EmptyResponse,

    /// The saved resume point is not a valid ledger sequence.
    #[error("Stored cursor ledger {0} is out of range")]
    CorruptCursor(i64),
}

pub type Result<T> = std::result::Result<T, IndexerError>;
