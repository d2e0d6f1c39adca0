//! Preferences stored as key/value rows.

use std::collections::HashMap;

use libsql::Connection;

use crate::error::Result;
use crate::models::{Settings, ThemeMode};
use crate::util::normalize_text_option;

const THEME: &str = "theme";
const SYNC_ENABLED: &str = "sync_enabled";
const NOTIFICATIONS_ENABLED: &str = "notifications_enabled";
const AI_API_KEY: &str = "ai_api_key";

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    /// Stored preferences; unknown or missing keys fall back to defaults
    async fn load(&self) -> Result<Settings>;

    async fn save(&self, settings: &Settings) -> Result<()>;
}

pub struct LibSqlSettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlSettingsRepository<'a> {
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    async fn rows(&self) -> Result<HashMap<String, String>> {
        let mut rows = self.conn.query("SELECT key, value FROM settings", ()).await?;
        let mut values = HashMap::new();
        while let Some(row) = rows.next().await? {
            values.insert(row.get::<String>(0)?, row.get::<String>(1)?);
        }
        Ok(values)
    }
}

impl SettingsRepository for LibSqlSettingsRepository<'_> {
    async fn load(&self) -> Result<Settings> {
        let values = self.rows().await?;
        let defaults = Settings::default();
        let flag = |key: &str, default: bool| values.get(key).map_or(default, |v| parse_flag(v));

        Ok(Settings {
            theme: values
                .get(THEME)
                .and_then(|value| ThemeMode::parse(value))
                .unwrap_or(defaults.theme),
            sync_enabled: flag(SYNC_ENABLED, defaults.sync_enabled),
            notifications_enabled: flag(NOTIFICATIONS_ENABLED, defaults.notifications_enabled),
            ai_api_key: normalize_text_option(values.get(AI_API_KEY).cloned()),
        })
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        let tx = self.conn.transaction().await?;
        for (key, value) in [
            (THEME, settings.theme.as_str()),
            (SYNC_ENABLED, flag_str(settings.sync_enabled)),
            (NOTIFICATIONS_ENABLED, flag_str(settings.notifications_enabled)),
        ] {
            tx.execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [key, value],
            )
            .await?;
        }
        match settings.ai_api_key.as_deref() {
            Some(api_key) => {
                tx.execute(
                    "INSERT INTO settings (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    [AI_API_KEY, api_key],
                )
                .await?;
            }
            None => {
                tx.execute("DELETE FROM settings WHERE key = ?1", [AI_API_KEY])
                    .await?;
            }
        }
        tx.commit().await?;
        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

const fn flag_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_table_loads_defaults() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = LibSqlSettingsRepository::new(db.connection());

        assert_eq!(repo.load().await.unwrap(), Settings::default());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn saved_settings_load_back_and_key_can_be_cleared() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = LibSqlSettingsRepository::new(db.connection());

        let settings = Settings {
            theme: ThemeMode::Dark,
            sync_enabled: false,
            notifications_enabled: false,
            ai_api_key: Some("key-123".to_string()),
        };
        repo.save(&settings).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), settings);

        let cleared = Settings {
            ai_api_key: None,
            ..settings
        };
        repo.save(&cleared).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), cleared);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unreadable_values_fall_back_to_defaults() {
        let db = Database::open_in_memory().await.unwrap();
        db.connection()
            .execute(
                "INSERT INTO settings (key, value) VALUES ('theme', 'sepia'), ('sync_enabled', 'off')",
                (),
            )
            .await
            .unwrap();

        let settings = LibSqlSettingsRepository::new(db.connection())
            .load()
            .await
            .unwrap();
        assert_eq!(settings.theme, ThemeMode::System);
        assert!(!settings.sync_enabled);
    }
}
