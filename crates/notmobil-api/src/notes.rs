//! Per-user note collections kept in memory.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

/// A note as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredNote {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub is_synced: bool,
    pub tags: Vec<String>,
    pub location: Option<Value>,
    pub sensor_data: Option<Value>,
    pub user_id: String,
}

/// Request body for create and update; absent fields are `None`.
///
/// Location and sensor payloads are opaque to the server.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteInput {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub location: Option<Value>,
    pub sensor_data: Option<Value>,
}

impl NoteInput {
    fn client_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Created {
    New(StoredNote),
    /// The client id was already stored for this user; the body was applied to it
    Existing(StoredNote),
}

#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    notes: RwLock<HashMap<String, Vec<StoredNote>>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every note owned by `user_id`, in creation order
    pub async fn list(&self, user_id: &str) -> Vec<StoredNote> {
        self.notes
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Option<StoredNote> {
        self.notes
            .read()
            .await
            .get(user_id)
            .and_then(|notes| notes.iter().find(|note| note.id == id).cloned())
    }

    /// Store a new note, keeping the client's id when it sent one.
    ///
    /// Repeating a create with an id that already exists overlays the body on
    /// the stored note, as an update would, instead of adding a duplicate.
    pub async fn create(&self, user_id: &str, input: NoteInput, now: i64) -> Created {
        let mut guard = self.notes.write().await;
        let notes = guard.entry(user_id.to_string()).or_default();

        if let Some(id) = input.client_id() {
            if let Some(existing) = notes.iter_mut().find(|note| note.id == id) {
                overlay(existing, input, now);
                return Created::Existing(existing.clone());
            }
        }

        let id = input
            .client_id()
            .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string);
        let note = StoredNote {
            id,
            title: input.title.unwrap_or_default(),
            content: input.content.unwrap_or_default(),
            created_at: input.created_at.unwrap_or(now),
            updated_at: input.updated_at.unwrap_or(now),
            is_synced: true,
            tags: input.tags.unwrap_or_default(),
            location: input.location,
            sensor_data: input.sensor_data,
            user_id: user_id.to_string(),
        };
        notes.push(note.clone());
        Created::New(note)
    }

    /// Overlay the present fields of `input` on the stored note
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        input: NoteInput,
        now: i64,
    ) -> Option<StoredNote> {
        let mut guard = self.notes.write().await;
        let note = guard
            .get_mut(user_id)?
            .iter_mut()
            .find(|note| note.id == id)?;
        overlay(note, input, now);
        Some(note.clone())
    }

    /// Whether a note was removed
    pub async fn delete(&self, user_id: &str, id: &str) -> bool {
        let mut guard = self.notes.write().await;
        let Some(notes) = guard.get_mut(user_id) else {
            return false;
        };
        let before = notes.len();
        notes.retain(|note| note.id != id);
        notes.len() != before
    }
}

fn overlay(note: &mut StoredNote, input: NoteInput, now: i64) {
    if let Some(title) = input.title {
        note.title = title;
    }
    if let Some(content) = input.content {
        note.content = content;
    }
    if let Some(tags) = input.tags {
        note.tags = tags;
    }
    if input.location.is_some() {
        note.location = input.location;
    }
    if input.sensor_data.is_some() {
        note.sensor_data = input.sensor_data;
    }
    note.updated_at = input.updated_at.unwrap_or(now);
    note.is_synced = true;
}
