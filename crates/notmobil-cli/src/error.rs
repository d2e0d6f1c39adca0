use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] notmobil_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] notmobil_core::config::ConfigError),
    #[error("Authentication error: {0}")]
    Auth(#[from] notmobil_core::auth::AuthError),
    #[error("Remote error: {0}")]
    Remote(#[from] notmobil_core::remote::RemoteError),
    #[error("AI error: {0}")]
    Ai(#[from] notmobil_core::ai::AiError),
    #[error("No note content provided")]
    EmptyContent,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Search query cannot be empty")]
    EmptySearchQuery,
    #[error("Note not found for id/prefix: {0}")]
    NoteNotFound(String),
    #[error("{0}")]
    AmbiguousNoteId(String),
    #[error("Nothing to change")]
    NothingToChange,
    #[error("Sync interval must be at least one second")]
    InvalidInterval,
    #[error("Sync did not run: {0}")]
    SyncAborted(String),
    #[error("Failed to resolve the user config directory")]
    NoConfigDir,
}
