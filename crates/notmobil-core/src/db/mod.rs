//! Local note store backed by libSQL

mod connection;
mod migrations;
mod repository;
mod settings_repository;

pub use connection::Database;
pub use repository::{LibSqlNoteRepository, NoteRepository};
pub use settings_repository::{LibSqlSettingsRepository, SettingsRepository};
