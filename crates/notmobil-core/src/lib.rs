//! notmobil-core - Core library for NotMobil
//!
//! This crate contains the note model, the local libSQL store, the remote note
//! service contract with its HTTP client, credential resolution, and the sync
//! engine that reconciles the two.

pub mod ai;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod services;
pub mod state;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{Note, Settings};
pub use state::SyncState;
pub use sync::{NoteStore, SyncEngine, SyncReport};
