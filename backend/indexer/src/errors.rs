//! Error type shared by the indexer's database, RPC and config layers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The node rejected the request outright.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("getEvents returned neither a result nor an error")]
    EmptyResult,

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, IndexerError>;
