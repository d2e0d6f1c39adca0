//! NotMobil CLI - notes from the terminal, synced with the note API
//!
//! Owns the local store, keeps the login session and triggers sync passes,
//! either once or on a fixed interval.

mod cli;
mod commands;
mod error;
mod session_store;

#[cfg(test)]
mod tests;

use clap::Parser;
use notmobil_core::config::ClientConfig;
use tracing_subscriber::filter::LevelFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::ai::run_ai;
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::AppContext;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::list::{run_list, run_tags};
use crate::commands::search::run_search;
use crate::commands::settings::run_settings;
use crate::commands::show::run_show;
use crate::commands::sync::run_sync;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "notmobil=info"
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::resolve(ClientConfig::from_env()?, cli.db_path, cli.api_url)?;

    match cli.command {
        Commands::Add {
            title,
            content,
            tags,
        } => run_add(&title, &content, &tags, &ctx).await,
        Commands::List { limit, tag, json } => run_list(limit, tag.as_deref(), json, &ctx).await,
        Commands::Search { query, limit, json } => run_search(&query, limit, json, &ctx).await,
        Commands::Show { id, json } => run_show(&id, json, &ctx).await,
        Commands::Tags => run_tags(&ctx).await,
        Commands::Edit {
            id,
            title,
            content,
            tags,
        } => run_edit(&id, title, content, tags, &ctx).await,
        Commands::Delete { id } => run_delete(&id, &ctx).await,
        Commands::Sync { every, watch } => run_sync(every, watch, &ctx).await,
        Commands::Auth { command } => run_auth(command, &ctx).await,
        Commands::Ai { command } => run_ai(command, &ctx).await,
        Commands::Settings { command } => run_settings(command, &ctx).await,
    }
}
