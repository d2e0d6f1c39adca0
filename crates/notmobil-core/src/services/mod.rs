//! Shared services used by hosts.

mod notes;

pub use notes::NoteService;
