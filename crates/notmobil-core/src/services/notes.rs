//! Thread-safe note store shared by the UI path and the sync engine.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::db::{
    Database, LibSqlNoteRepository, LibSqlSettingsRepository, NoteRepository, SettingsRepository,
};
use crate::models::{Note, Settings};
use crate::sync::NoteStore;
use crate::{Error, Result};

/// Serializes every database access behind one lock and publishes the full
/// note list, newest first, after each mutation.
#[derive(Clone)]
pub struct NoteService {
    db: Arc<Mutex<Database>>,
    notes_tx: Arc<watch::Sender<Vec<Note>>>,
}

impl NoteService {
    /// Open a note service backed by the database at `db_path`.
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!("Opening note database at {}", db_path.display());
        let db = Database::open(&db_path).await?;
        Self::from_database(db).await
    }

    /// Open an in-memory note service (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Self::from_database(db).await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let initial = LibSqlNoteRepository::new(db.connection()).list_all().await?;
        let (notes_tx, _) = watch::channel(initial);
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            notes_tx: Arc::new(notes_tx),
        })
    }

    /// Live view of all notes ordered by `updated_at` descending.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Note>> {
        self.notes_tx.subscribe()
    }

    /// Persist a new local note. It stays unsynced until a sync pass confirms it.
    pub async fn create_note(&self, mut note: Note) -> Result<Note> {
        if note.is_empty() {
            return Err(Error::InvalidInput(
                "note title or content is required".to_string(),
            ));
        }
        note.is_synced = false;

        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        repo.upsert(&note).await?;
        self.publish(&repo).await;
        Ok(note)
    }

    /// Apply a local edit and mark the note unsynced.
    pub async fn edit_note(
        &self,
        id: &str,
        title: Option<String>,
        content: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Result<Note> {
        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        let mut note = repo
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        note.edit(title, content, tags);
        if note.is_empty() {
            return Err(Error::InvalidInput(
                "note title or content is required".to_string(),
            ));
        }
        repo.update(&note).await?;
        self.publish(&repo).await;
        Ok(note)
    }

    pub async fn get_note(&self, id: &str) -> Result<Option<Note>> {
        let db = self.db.lock().await;
        LibSqlNoteRepository::new(db.connection()).get(id).await
    }

    /// List notes newest-first.
    pub async fn list_notes(&self, limit: usize, offset: usize) -> Result<Vec<Note>> {
        let db = self.db.lock().await;
        LibSqlNoteRepository::new(db.connection())
            .list(limit, offset)
            .await
    }

    pub async fn list_all_notes(&self) -> Result<Vec<Note>> {
        let db = self.db.lock().await;
        LibSqlNoteRepository::new(db.connection()).list_all().await
    }

    pub async fn search_notes(&self, query: &str, limit: usize) -> Result<Vec<Note>> {
        let db = self.db.lock().await;
        LibSqlNoteRepository::new(db.connection())
            .search(query, limit)
            .await
    }

    pub async fn list_notes_by_tag(
        &self,
        tag: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Note>> {
        let db = self.db.lock().await;
        LibSqlNoteRepository::new(db.connection())
            .list_by_tag(tag, limit, offset)
            .await
    }

    /// Tags with the number of notes carrying each.
    pub async fn list_tags(&self) -> Result<Vec<(String, usize)>> {
        let db = self.db.lock().await;
        LibSqlNoteRepository::new(db.connection()).list_tags().await
    }

    pub async fn load_settings(&self) -> Result<Settings> {
        let db = self.db.lock().await;
        LibSqlSettingsRepository::new(db.connection()).load().await
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let db = self.db.lock().await;
        LibSqlSettingsRepository::new(db.connection())
            .save(settings)
            .await
    }

    async fn publish(&self, repo: &LibSqlNoteRepository<'_>) {
        match repo.list_all().await {
            Ok(notes) => {
                self.notes_tx.send_replace(notes);
            }
            Err(error) => tracing::warn!("Failed to refresh note view: {}", error),
        }
    }
}

impl NoteStore for NoteService {
    async fn unsynced_notes(&self) -> Result<Vec<Note>> {
        let db = self.db.lock().await;
        LibSqlNoteRepository::new(db.connection()).unsynced().await
    }

    async fn upsert_note(&self, note: &Note) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        repo.upsert(note).await?;
        self.publish(&repo).await;
        Ok(())
    }

    async fn update_note(&self, note: &Note) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        repo.update(note).await?;
        self.publish(&repo).await;
        Ok(())
    }

    /// Local delete; the remote copy is left untouched.
    async fn delete_note(&self, id: &str) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        repo.delete(id).await?;
        self.publish(&repo).await;
        Ok(())
    }

    async fn mark_synced(&self, id: &str, synced_at: i64) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        repo.mark_synced(id, synced_at).await?;
        self.publish(&repo).await;
        Ok(())
    }

    async fn replace_note(&self, old_id: &str, note: &Note) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        repo.replace_id(old_id, note).await?;
        self.publish(&repo).await;
        Ok(())
    }
}
