//! Note model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LocationData, SensorData};
use crate::util::now_millis;

/// Generate a fresh client-side note id.
#[must_use]
pub fn new_note_id() -> String {
    Uuid::new_v4().to_string()
}

/// A note in the system, the unit of synchronization.
///
/// `id` is the only key used to match local and remote copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Client-assigned identifier, never reassigned locally
    pub id: String,
    pub title: String,
    pub content: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
    /// `false` while local changes await confirmation from the remote service
    pub is_synced: bool,
    /// Display order is preserved; matching ignores order and case
    pub tags: Vec<String>,
    pub location: Option<LocationData>,
    pub sensor_data: Option<SensorData>,
    /// Last time the remote service confirmed this note (Unix ms).
    ///
    /// Local bookkeeping only, never sent on the wire.
    pub last_synced_at: Option<i64>,
}

impl Note {
    /// Create a new unsynced note with a fresh id
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: new_note_id(),
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
            is_synced: false,
            tags: Vec::new(),
            location: None,
            sensor_data: None,
            last_synced_at: None,
        }
    }

    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: LocationData) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn with_sensor_data(mut self, sensor_data: SensorData) -> Self {
        self.sensor_data = (!sensor_data.is_empty()).then_some(sensor_data);
        self
    }

    /// Record a local mutation: bump `updated_at` and mark unsynced.
    pub fn touch(&mut self) {
        self.updated_at = now_millis().max(self.updated_at);
        self.is_synced = false;
    }

    /// Apply a local edit. `None` leaves the field as-is.
    pub fn edit(
        &mut self,
        title: Option<String>,
        content: Option<String>,
        tags: Option<Vec<String>>,
    ) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        if let Some(tags) = tags {
            self.tags = normalize_tags(tags);
        }
        self.touch();
    }

    /// Whether the remote service has ever confirmed this note.
    ///
    /// Decides between create and update when pushing.
    #[must_use]
    pub const fn was_ever_synced(&self) -> bool {
        self.last_synced_at.is_some()
    }

    /// Mark the note as confirmed by the remote service at `at` (Unix ms).
    pub fn mark_synced(&mut self, at: i64) {
        self.is_synced = true;
        self.last_synced_at = Some(at);
    }

    /// Case-insensitive tag membership
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Title if present, otherwise the first content line, truncated to `max_len` characters
    #[must_use]
    pub fn title_preview(&self, max_len: usize) -> String {
        let source = if self.title.trim().is_empty() {
            self.content.lines().next().unwrap_or("")
        } else {
            self.title.as_str()
        };
        source.trim().chars().take(max_len).collect()
    }

    /// Check if both title and content are blank
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }
}

/// Trim tags, drop empties and case-insensitive duplicates, keep first-seen order.
fn normalize_tags<I, T>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.into();
        let tag = tag.trim();
        if tag.is_empty() || normalized.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            continue;
        }
        normalized.push(tag.to_string());
    }
    normalized
}
