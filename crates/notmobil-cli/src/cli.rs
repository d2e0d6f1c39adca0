use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "notmobil")]
#[command(about = "Local-first notes with cloud sync")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Note API base URL (overrides NOTMOBIL_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note title
        #[arg(short, long, default_value = "")]
        title: String,
        /// Note content
        content: Vec<String>,
        /// Tag to attach (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },
    /// List recent notes
    List {
        /// Number of notes to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Filter notes by tag name
        #[arg(long)]
        tag: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search notes by title and content
    Search {
        /// Search query
        query: String,
        /// Number of notes to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single note
    Show {
        /// Note ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tags with note counts
    Tags,
    /// Edit an existing note
    Edit {
        /// Note ID or unique ID prefix
        id: String,
        /// Replace the title
        #[arg(long)]
        title: Option<String>,
        /// Replace the content
        #[arg(long)]
        content: Option<String>,
        /// Replace the tags (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Option<Vec<String>>,
    },
    /// Delete a note from this device
    Delete {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Reconcile local notes with the note API
    Sync {
        /// Keep running and sync every SECS seconds
        #[arg(long, value_name = "SECS")]
        every: Option<u64>,
        /// Keep running at the configured interval
        #[arg(long, conflicts_with = "every")]
        watch: bool,
    },
    /// Manage the login session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Text assistance for a note
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },
    /// Show or change local preferences
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Log in and store the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a valid session is stored
    Status,
}

#[derive(Subcommand)]
pub enum AiCommands {
    /// Summarize a note
    Summarize {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Suggest tags for a note
    Tags {
        /// Note ID or unique ID prefix
        id: String,
        /// Add the suggested tags to the note
        #[arg(long)]
        apply: bool,
    },
    /// Classify a note into a category
    Classify {
        /// Note ID or unique ID prefix
        id: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    System,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print current settings
    Show,
    /// Change one or more settings
    Set {
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
        /// Enable or disable background sync
        #[arg(long)]
        sync_enabled: Option<bool>,
        /// Enable or disable reminders
        #[arg(long)]
        notifications_enabled: Option<bool>,
        /// Personal API key passed to the summarizer
        #[arg(long, conflicts_with = "clear_ai_api_key")]
        ai_api_key: Option<String>,
        /// Remove the stored API key
        #[arg(long)]
        clear_ai_api_key: bool,
    },
}
