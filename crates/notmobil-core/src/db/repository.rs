//! Note repository implementation

use crate::error::{Error, Result};
use crate::models::Note;
use libsql::params::Params;
use libsql::{Connection, Row, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;

const NOTE_COLUMNS: &str = "id, title, content, created_at, updated_at, is_synced, tags, \
                            location, sensor_data, last_synced_at";

/// Trait for note storage operations (async)
#[allow(async_fn_in_trait)]
pub trait NoteRepository {
    /// Insert a note, replacing any existing row with the same id
    async fn upsert(&self, note: &Note) -> Result<()>;

    /// Overwrite an existing note's mutable fields (`created_at` is kept)
    async fn update(&self, note: &Note) -> Result<()>;

    /// Hard delete a note by id
    async fn delete(&self, id: &str) -> Result<()>;

    /// Get a note by id
    async fn get(&self, id: &str) -> Result<Option<Note>>;

    /// List notes, most recently updated first
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Note>>;

    /// All notes, most recently updated first
    async fn list_all(&self) -> Result<Vec<Note>>;

    /// Snapshot of every note awaiting remote confirmation
    async fn unsynced(&self) -> Result<Vec<Note>>;

    /// Flip the synced flag on, leaving every other field untouched
    async fn mark_synced(&self, id: &str, synced_at: i64) -> Result<()>;

    /// Atomically remove `old_id` and store `note` under its own id
    async fn replace_id(&self, old_id: &str, note: &Note) -> Result<()>;

    /// Substring search over title and content
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Note>>;

    /// List notes carrying `tag` (case-insensitive)
    async fn list_by_tag(&self, tag: &str, limit: usize, offset: usize) -> Result<Vec<Note>>;

    /// Get all tags with note counts
    async fn list_tags(&self) -> Result<Vec<(String, usize)>>;
}

/// libSQL implementation of `NoteRepository`
pub struct LibSqlNoteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlNoteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    async fn query_notes(&self, sql: &str, params: Params) -> Result<Vec<Note>> {
        let mut rows = self.conn.query(sql, params).await?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next().await? {
            notes.push(parse_note(&row)?);
        }
        Ok(notes)
    }

    async fn insert_or_replace(&self, note: &Note) -> Result<()> {
        let sql = format!(
            "INSERT OR REPLACE INTO notes ({NOTE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        self.conn
            .execute(
                &sql,
                Params::Positional(vec![
                    Value::Text(note.id.clone()),
                    Value::Text(note.title.clone()),
                    Value::Text(note.content.clone()),
                    Value::Integer(note.created_at),
                    Value::Integer(note.updated_at),
                    Value::Integer(i64::from(note.is_synced)),
                    Value::Text(serde_json::to_string(&note.tags)?),
                    json_or_null(note.location.as_ref())?,
                    json_or_null(note.sensor_data.as_ref())?,
                    int_or_null(note.last_synced_at),
                ]),
            )
            .await?;
        Ok(())
    }
}

impl NoteRepository for LibSqlNoteRepository<'_> {
    async fn upsert(&self, note: &Note) -> Result<()> {
        if note.id.trim().is_empty() {
            return Err(Error::InvalidInput("note id cannot be empty".into()));
        }
        self.insert_or_replace(note).await
    }

    async fn update(&self, note: &Note) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE notes
                 SET title = ?, content = ?, updated_at = ?, is_synced = ?, tags = ?,
                     location = ?, sensor_data = ?, last_synced_at = ?
                 WHERE id = ?",
                Params::Positional(vec![
                    Value::Text(note.title.clone()),
                    Value::Text(note.content.clone()),
                    Value::Integer(note.updated_at),
                    Value::Integer(i64::from(note.is_synced)),
                    Value::Text(serde_json::to_string(&note.tags)?),
                    json_or_null(note.location.as_ref())?,
                    json_or_null(note.sensor_data.as_ref())?,
                    int_or_null(note.last_synced_at),
                    Value::Text(note.id.clone()),
                ]),
            )
            .await?;

        if rows == 0 {
            return Err(Error::NotFound(note.id.clone()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?", [id])
            .await?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Note>> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?");
        let mut notes = self
            .query_notes(&sql, Params::Positional(vec![Value::Text(id.to_string())]))
            .await?;
        Ok(notes.pop())
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Note>> {
        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY updated_at DESC, id ASC LIMIT ? OFFSET ?"
        );
        self.query_notes(
            &sql,
            Params::Positional(vec![to_sql_int(limit), to_sql_int(offset)]),
        )
        .await
    }

    async fn list_all(&self) -> Result<Vec<Note>> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY updated_at DESC, id ASC");
        self.query_notes(&sql, Params::None).await
    }

    async fn unsynced(&self) -> Result<Vec<Note>> {
        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE is_synced = 0 ORDER BY updated_at ASC, id ASC"
        );
        self.query_notes(&sql, Params::None).await
    }

    async fn mark_synced(&self, id: &str, synced_at: i64) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE notes SET is_synced = 1, last_synced_at = ? WHERE id = ?",
                Params::Positional(vec![Value::Integer(synced_at), Value::Text(id.to_string())]),
            )
            .await?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn replace_id(&self, old_id: &str, note: &Note) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", ()).await?;

        let result = async {
            self.conn
                .execute("DELETE FROM notes WHERE id = ?", [old_id])
                .await?;
            self.upsert(note).await
        }
        .await;

        match result {
            Ok(()) => {
                if let Err(e) = self.conn.execute("COMMIT", ()).await {
                    self.conn.execute("ROLLBACK", ()).await.ok();
                    return Err(e.into());
                }
                Ok(())
            }
            Err(e) => {
                self.conn.execute("ROLLBACK", ()).await.ok();
                Err(e)
            }
        }
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Note>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list(limit, 0).await;
        }

        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes
             WHERE title LIKE '%' || ?1 || '%' OR content LIKE '%' || ?1 || '%'
             ORDER BY updated_at DESC, id ASC
             LIMIT ?2"
        );
        self.query_notes(
            &sql,
            Params::Positional(vec![Value::Text(query.to_string()), to_sql_int(limit)]),
        )
        .await
    }

    async fn list_by_tag(&self, tag: &str, limit: usize, offset: usize) -> Result<Vec<Note>> {
        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes
             WHERE EXISTS (
                 SELECT 1 FROM json_each(notes.tags)
                 WHERE json_each.value = ?1 COLLATE NOCASE
             )
             ORDER BY updated_at DESC, id ASC
             LIMIT ?2 OFFSET ?3"
        );
        self.query_notes(
            &sql,
            Params::Positional(vec![
                Value::Text(tag.trim().to_string()),
                to_sql_int(limit),
                to_sql_int(offset),
            ]),
        )
        .await
    }

    async fn list_tags(&self) -> Result<Vec<(String, usize)>> {
        let mut rows = self
            .conn
            .query(
                "SELECT MIN(tag.value) AS name, COUNT(DISTINCT notes.id) AS count
                 FROM notes, json_each(notes.tags) AS tag
                 GROUP BY lower(tag.value)
                 ORDER BY count DESC, name ASC",
                (),
            )
            .await?;

        let mut tags = Vec::new();
        while let Some(row) = rows.next().await? {
            let name: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            tags.push((name, usize::try_from(count).unwrap_or_default()));
        }
        Ok(tags)
    }
}

/// Parse a note from a database row laid out as `NOTE_COLUMNS`
fn parse_note(row: &Row) -> Result<Note> {
    let tags: String = row.get(6)?;
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
        is_synced: row.get::<i64>(5)? != 0,
        tags: serde_json::from_str(&tags)?,
        location: optional_json(row.get_value(7)?)?,
        sensor_data: optional_json(row.get_value(8)?)?,
        last_synced_at: match row.get_value(9)? {
            Value::Integer(value) => Some(value),
            _ => None,
        },
    })
}

fn optional_json<T: DeserializeOwned>(value: Value) -> Result<Option<T>> {
    match value {
        Value::Null => Ok(None),
        Value::Text(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        other => Err(Error::Column(format!(
            "expected JSON text column, found {other:?}"
        ))),
    }
}

fn json_or_null<T: Serialize>(value: Option<&T>) -> Result<Value> {
    Ok(match value {
        Some(value) => Value::Text(serde_json::to_string(value)?),
        None => Value::Null,
    })
}

fn int_or_null(value: Option<i64>) -> Value {
    value.map_or(Value::Null, Value::Integer)
}

fn to_sql_int(value: usize) -> Value {
    Value::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{AmbientReading, LocationData, MotionReading, SensorData};
    use pretty_assertions::assert_eq;

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn note_at(title: &str, updated_at: i64) -> Note {
        let mut note = Note::new(title, format!("{title} body"));
        note.created_at = updated_at;
        note.updated_at = updated_at;
        note
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_upsert_and_get_roundtrips_metadata() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let note = Note::new("Trip", "Ferry at 9")
            .with_tags(["travel", "Important"])
            .with_location(LocationData {
                latitude: 41.0082,
                longitude: 28.9784,
                address: Some("Istanbul".to_string()),
            })
            .with_sensor_data(SensorData {
                accelerometer: Some(MotionReading {
                    x: 0.5,
                    y: -1.0,
                    z: 9.75,
                    timestamp: 10,
                }),
                gyroscope: None,
                ambient: Some(AmbientReading {
                    temperature: Some(18.5),
                    humidity: Some(60.0),
                    pressure: None,
                    timestamp: 11,
                }),
            });
        repo.upsert(&note).await.unwrap();

        let fetched = repo.get(&note.id).await.unwrap().unwrap();
        assert_eq!(fetched, note);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_upsert_replaces_existing_row() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let mut note = Note::new("v1", "body");
        repo.upsert(&note).await.unwrap();
        note.title = "v2".to_string();
        note.mark_synced(99);
        repo.upsert(&note).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "v2");
        assert!(all[0].is_synced);
        assert_eq!(all[0].last_synced_at, Some(99));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_upsert_rejects_empty_id() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let mut note = Note::new("t", "c");
        note.id = String::new();
        assert!(matches!(
            repo.upsert(&note).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_keeps_created_at_and_requires_row() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let note = note_at("a", 100);
        repo.upsert(&note).await.unwrap();

        let mut edited = note.clone();
        edited.created_at = 1;
        edited.edit(Some("b".to_string()), None, None);
        repo.update(&edited).await.unwrap();

        let fetched = repo.get(&note.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "b");
        assert_eq!(fetched.created_at, 100);
        assert!(!fetched.is_synced);

        let missing = Note::new("ghost", "");
        assert!(matches!(
            repo.update(&missing).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let note = Note::new("To delete", "");
        repo.upsert(&note).await.unwrap();
        repo.delete(&note.id).await.unwrap();

        assert!(repo.get(&note.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&note.id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_orders_by_updated_at_desc() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        repo.upsert(&note_at("old", 1)).await.unwrap();
        repo.upsert(&note_at("new", 3)).await.unwrap();
        repo.upsert(&note_at("mid", 2)).await.unwrap();

        let titles: Vec<String> = repo
            .list(10, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|note| note.title)
            .collect();
        assert_eq!(titles, vec!["new", "mid", "old"]);

        let page = repo.list(1, 1).await.unwrap();
        assert_eq!(page[0].title, "mid");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unsynced_and_mark_synced() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let pending = note_at("pending", 1);
        let mut done = note_at("done", 2);
        done.mark_synced(2);
        repo.upsert(&pending).await.unwrap();
        repo.upsert(&done).await.unwrap();

        let unsynced = repo.unsynced().await.unwrap();
        assert_eq!(unsynced.len(), 1);
        assert_eq!(unsynced[0].id, pending.id);

        repo.mark_synced(&pending.id, 50).await.unwrap();
        let fetched = repo.get(&pending.id).await.unwrap().unwrap();
        assert!(fetched.is_synced);
        assert_eq!(fetched.last_synced_at, Some(50));
        assert_eq!(fetched.updated_at, pending.updated_at);
        assert_eq!(fetched.title, pending.title);
        assert!(repo.unsynced().await.unwrap().is_empty());

        assert!(matches!(
            repo.mark_synced("missing", 1).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_replace_id_rekeys_atomically() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let local = Note::new("local", "body");
        repo.upsert(&local).await.unwrap();

        let mut server = local.clone();
        server.id = "server-id".to_string();
        server.mark_synced(7);
        repo.replace_id(&local.id, &server).await.unwrap();

        assert!(repo.get(&local.id).await.unwrap().is_none());
        let stored = repo.get("server-id").await.unwrap().unwrap();
        assert!(stored.is_synced);
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_replace_id_rolls_back_on_invalid_note() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let local = Note::new("local", "body");
        repo.upsert(&local).await.unwrap();

        let mut invalid = local.clone();
        invalid.id = "  ".to_string();
        assert!(repo.replace_id(&local.id, &invalid).await.is_err());

        assert!(repo.get(&local.id).await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_search() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        repo.upsert(&Note::new("Hello world", "")).await.unwrap();
        repo.upsert(&Note::new("Other", "goodbye world")).await.unwrap();
        repo.upsert(&Note::new("Something", "else")).await.unwrap();

        assert_eq!(repo.search("world", 10).await.unwrap().len(), 2);
        assert_eq!(repo.search("  ", 10).await.unwrap().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_tags() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        repo.upsert(&Note::new("a", "").with_tags(["rust", "work"]))
            .await
            .unwrap();
        repo.upsert(&Note::new("b", "").with_tags(["Rust"]))
            .await
            .unwrap();
        repo.upsert(&Note::new("c", "")).await.unwrap();

        let rust_notes = repo.list_by_tag("RUST", 10, 0).await.unwrap();
        assert_eq!(rust_notes.len(), 2);

        let tags = repo.list_tags().await.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].1, 2);
        assert!(tags[0].0.eq_ignore_ascii_case("rust"));
        assert_eq!(tags[1], ("work".to_string(), 1));
    }
}
