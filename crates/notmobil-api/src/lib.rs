//! Reference note API for NotMobil sync.
//!
//! Issues HS256 session tokens, keeps each user's notes in memory and answers
//! the text assistance endpoints with keyword and extractive fallbacks.

pub mod ai;
pub mod auth;
pub mod config;
pub mod error;
pub mod notes;
pub mod routes;

pub use config::AppConfig;
pub use routes::{app_router, AppState};
