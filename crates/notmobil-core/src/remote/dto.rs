//! Wire representation of a note.

use serde::{Deserialize, Serialize};

use crate::models::{LocationData, Note, SensorData};

/// Note payload exchanged with the remote note service.
///
/// Every field except `title` and `content` is optional on the wire; unknown
/// fields such as the server's owner id are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_synced: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_data: Option<SensorData>,
}

impl From<&Note> for NoteDto {
    fn from(note: &Note) -> Self {
        Self {
            id: Some(note.id.clone()),
            title: note.title.clone(),
            content: note.content.clone(),
            created_at: Some(note.created_at),
            updated_at: Some(note.updated_at),
            is_synced: Some(note.is_synced),
            tags: Some(note.tags.clone()),
            location: note.location.clone(),
            sensor_data: note.sensor_data.clone(),
        }
    }
}

impl NoteDto {
    /// Id carried by the payload, if it is non-blank
    #[must_use]
    pub fn note_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Convert a pulled payload into a local note.
    ///
    /// Missing id becomes `""`, missing timestamps become `now`, missing tags
    /// become empty and a missing synced flag reads as `false`.
    #[must_use]
    pub fn into_note(self, now: i64) -> Note {
        Note {
            id: self.note_id().unwrap_or_default().to_string(),
            title: self.title,
            content: self.content,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
            is_synced: self.is_synced.unwrap_or(false),
            tags: self.tags.unwrap_or_default(),
            location: self.location,
            sensor_data: self.sensor_data.filter(|data| !data.is_empty()),
            last_synced_at: None,
        }
    }

    /// Overlay a create response on the note that was pushed.
    ///
    /// Fields the server returned win; fields it omitted keep the pushed
    /// values, so an echo without timestamps does not rewrite `created_at`.
    #[must_use]
    pub fn merge_into(self, pushed: &Note) -> Note {
        Note {
            id: self
                .note_id()
                .map_or_else(|| pushed.id.clone(), str::to_string),
            title: self.title,
            content: self.content,
            created_at: self.created_at.unwrap_or(pushed.created_at),
            updated_at: self.updated_at.unwrap_or(pushed.updated_at),
            is_synced: pushed.is_synced,
            tags: self.tags.unwrap_or_else(|| pushed.tags.clone()),
            location: self.location.or_else(|| pushed.location.clone()),
            sensor_data: self
                .sensor_data
                .filter(|data| !data.is_empty())
                .or_else(|| pushed.sensor_data.clone()),
            last_synced_at: pushed.last_synced_at,
        }
    }
}
