use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use chrono::Utc;
use notmobil_core::ai::AiClient;
use notmobil_core::auth::{AuthClient, SessionCredentials};
use notmobil_core::config::ClientConfig;
use notmobil_core::remote::HttpNoteService;
use notmobil_core::services::NoteService;
use notmobil_core::Note;
use serde::Serialize;

use crate::error::CliError;
use crate::session_store::FileSessionStore;

/// Resolved runtime settings shared by every command.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: ClientConfig,
    pub db_path: PathBuf,
    pub session_path: PathBuf,
}

impl AppContext {
    pub fn resolve(
        mut config: ClientConfig,
        cli_db_path: Option<PathBuf>,
        cli_api_url: Option<String>,
    ) -> Result<Self, CliError> {
        if let Some(url) = cli_api_url {
            config.api_url = notmobil_core::util::normalize_base_url(&url).ok_or_else(|| {
                notmobil_core::config::ConfigError::Invalid(
                    "--api-url must start with http:// or https://".to_string(),
                )
            })?;
        }
        let db_path = cli_db_path
            .or_else(|| config.db_path.clone())
            .map_or_else(default_db_path, Ok)?;
        let session_path = FileSessionStore::default_path().ok_or(CliError::NoConfigDir)?;

        Ok(Self {
            config,
            db_path,
            session_path,
        })
    }

    pub async fn open_service(&self) -> Result<NoteService, CliError> {
        Ok(NoteService::open_path(&self.db_path).await?)
    }

    pub fn auth_client(&self) -> Result<AuthClient<FileSessionStore>, CliError> {
        Ok(AuthClient::new(
            &self.config.api_url,
            self.config.http_timeout,
            FileSessionStore::new(self.session_path.clone()),
        )?)
    }

    pub fn credentials(&self) -> Result<SessionCredentials<FileSessionStore>, CliError> {
        Ok(SessionCredentials::new(self.auth_client()?))
    }

    pub fn remote(&self) -> Result<HttpNoteService, CliError> {
        Ok(HttpNoteService::new(
            &self.config.api_url,
            self.config.http_timeout,
        )?)
    }

    pub fn ai_client(&self) -> Result<AiClient, CliError> {
        Ok(AiClient::new(&self.config.api_url, self.config.http_timeout)?)
    }
}

pub fn default_db_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("notmobil").join("notmobil.db"))
        .ok_or(CliError::NoConfigDir)
}

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub relative_time: String,
    pub is_synced: bool,
    pub tags: Vec<String>,
}

/// Find a note by exact id, falling back to a unique id prefix.
pub async fn resolve_note(service: &NoteService, query: &str) -> Result<Note, CliError> {
    let query = normalize_note_identifier(query)?;
    if let Some(note) = service.get_note(&query).await? {
        return Ok(note);
    }

    let mut matches: Vec<Note> = service
        .list_all_notes()
        .await?
        .into_iter()
        .filter(|note| note.id.starts_with(&query))
        .collect();

    match matches.len() {
        0 => Err(CliError::NoteNotFound(query)),
        1 => Ok(matches.remove(0)),
        _ => {
            let options = matches
                .iter()
                .take(3)
                .map(|note| note.id.chars().take(13).collect::<String>())
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousNoteId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

/// Print notes as aligned lines, or as a JSON array with `as_json`.
pub fn print_notes(notes: &[Note], as_json: bool) -> Result<(), CliError> {
    if as_json {
        let items: Vec<NoteListItem> = notes.iter().map(note_to_list_item).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if notes.is_empty() {
        println!("No notes");
    } else {
        for line in format_note_lines(notes) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    notes
        .iter()
        .map(|note| {
            let short_id = note.id.chars().take(13).collect::<String>();
            let preview = note_preview(note, 40);
            let relative_time = format_relative_time(note.updated_at, now_ms);
            let marker = if note.is_synced { ' ' } else { '*' };
            let tags = render_tags(note);
            if tags.is_empty() {
                format!("{short_id:<13}{marker} {preview:<40}  {relative_time}")
            } else {
                format!("{short_id:<13}{marker} {preview:<40}  {relative_time:<10}  {tags}")
            }
        })
        .collect()
}

pub fn format_note_detail(note: &Note) -> String {
    let mut lines = vec![
        format!("id:       {}", note.id),
        format!("title:    {}", note.title),
        format!("created:  {}", format_timestamp(note.created_at)),
        format!("updated:  {}", format_timestamp(note.updated_at)),
        format!(
            "synced:   {}",
            if note.is_synced { "yes" } else { "pending" }
        ),
    ];
    if !note.tags.is_empty() {
        lines.push(format!("tags:     {}", render_tags(note)));
    }
    if let Some(location) = &note.location {
        let address = location.address.as_deref().unwrap_or("");
        lines.push(format!(
            "location: {:.5}, {:.5} {address}",
            location.latitude, location.longitude
        ));
    }
    lines.push(String::new());
    lines.push(note.content.clone());
    lines.join("\n")
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    let now_ms = Utc::now().timestamp_millis();
    NoteListItem {
        id: note.id.clone(),
        title: note.title.clone(),
        preview: note_preview(note, 80),
        content: note.content.clone(),
        created_at: note.created_at,
        updated_at: note.updated_at,
        relative_time: format_relative_time(note.updated_at, now_ms),
        is_synced: note.is_synced,
        tags: note.tags.clone(),
    }
}

pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let first_line = note.title_preview(usize::MAX);
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn render_tags(note: &Note) -> String {
    note.tags
        .iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else {
        format!("{}w ago", diff / week)
    }
}

/// Content from the positional words, or piped stdin when none were given.
pub fn resolve_note_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }
    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }
    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_search_query(query: &str) -> Result<String, CliError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySearchQuery)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

/// Title and body joined, as sent to the text assistance endpoints.
pub fn note_text(note: &Note) -> String {
    match (note.title.trim(), note.content.trim()) {
        ("", content) => content.to_string(),
        (title, "") => title.to_string(),
        (title, content) => format!("{title}\n\n{content}"),
    }
}
