use std::path::Path;

use libsql::{Builder, Connection};

use super::migrations;
use crate::error::Result;

/// A migrated local libSQL database and its single connection.
pub struct Database {
    // dropping the handle would invalidate `conn`
    _handle: libsql::Database,
    conn: Connection,
}

impl Database {
    /// Open or create the database file at `path`
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let location = path.as_ref().to_string_lossy().into_owned();
        Self::open_local(&location).await
    }

    pub async fn open_in_memory() -> Result<Self> {
        Self::open_local(":memory:").await
    }

    async fn open_local(location: &str) -> Result<Self> {
        let handle = Builder::new_local(location).build().await?;
        let conn = handle.connect()?;

        // WAL is not available in memory
        if let Err(error) = conn.execute("PRAGMA journal_mode = WAL", ()).await {
            tracing::debug!("journal_mode = WAL not applied: {}", error);
        }
        conn.execute("PRAGMA synchronous = NORMAL", ()).await.ok();

        migrations::run(&conn).await?;
        Ok(Self {
            _handle: handle,
            conn,
        })
    }

    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn in_memory_database_answers_queries() {
        let db = Database::open_in_memory().await.unwrap();
        let mut rows = db.connection().query("SELECT 1", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reopened_file_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");

        drop(Database::open(&path).await.unwrap());
        let reopened = Database::open(&path).await.unwrap();

        let mut rows = reopened
            .connection()
            .query(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('notes', 'settings')",
                (),
            )
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 2);
    }
}
