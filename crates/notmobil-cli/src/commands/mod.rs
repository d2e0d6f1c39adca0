pub mod add;
pub mod ai;
pub mod auth_cmd;
pub mod common;
pub mod delete;
pub mod edit;
pub mod list;
pub mod search;
pub mod settings;
pub mod show;
pub mod sync;
