use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the local store and the note operations built on it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    #[error("Unexpected column value: {0}")]
    Column(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON columns (tags, location, sensor data)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
