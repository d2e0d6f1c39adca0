//! Application settings model

use serde::{Deserialize, Serialize};

/// Theme mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
    /// Follow system preference
    #[default]
    System,
}

impl ThemeMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Case-insensitive inverse of [`ThemeMode::as_str`]
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// Local application preferences
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Theme mode
    pub theme: ThemeMode,
    /// Whether the periodic sync trigger should run
    pub sync_enabled: bool,
    /// Whether reminder notifications are shown
    pub notifications_enabled: bool,
    /// Optional user-supplied key forwarded to the summarization endpoint
    pub ai_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::System,
            sync_enabled: true,
            notifications_enabled: true,
            ai_api_key: None,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Settings")
            .field("theme", &self.theme)
            .field("sync_enabled", &self.sync_enabled)
            .field("notifications_enabled", &self.notifications_enabled)
            .field(
                "ai_api_key",
                &self.ai_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.theme, ThemeMode::System);
        assert!(settings.sync_enabled);
        assert!(settings.ai_api_key.is_none());
    }

    #[test]
    fn test_settings_debug_redacts_api_key() {
        let settings = Settings {
            ai_api_key: Some("secret-key".to_string()),
            ..Settings::default()
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn theme_names_parse_back() {
        for theme in [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System] {
            assert_eq!(ThemeMode::parse(theme.as_str()), Some(theme));
        }
        assert_eq!(ThemeMode::parse(" DARK "), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::parse("sepia"), None);
    }
}
