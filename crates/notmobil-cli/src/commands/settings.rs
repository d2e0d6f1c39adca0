use notmobil_core::models::ThemeMode;
use notmobil_core::Settings;

use crate::cli::{SettingsCommands, ThemeArg};
use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_settings(command: SettingsCommands, ctx: &AppContext) -> Result<(), CliError> {
    let service = ctx.open_service().await?;
    match command {
        SettingsCommands::Show => {
            let settings = service.load_settings().await?;
            for line in format_settings(&settings) {
                println!("{line}");
            }
        }
        SettingsCommands::Set {
            theme,
            sync_enabled,
            notifications_enabled,
            ai_api_key,
            clear_ai_api_key,
        } => {
            let mut settings = service.load_settings().await?;
            let changed = apply_settings(
                &mut settings,
                theme,
                sync_enabled,
                notifications_enabled,
                ai_api_key,
                clear_ai_api_key,
            );
            if !changed {
                return Err(CliError::NothingToChange);
            }
            service.save_settings(&settings).await?;
            for line in format_settings(&settings) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

pub fn apply_settings(
    settings: &mut Settings,
    theme: Option<ThemeArg>,
    sync_enabled: Option<bool>,
    notifications_enabled: Option<bool>,
    ai_api_key: Option<String>,
    clear_ai_api_key: bool,
) -> bool {
    let before = settings.clone();
    if let Some(theme) = theme {
        settings.theme = match theme {
            ThemeArg::Light => ThemeMode::Light,
            ThemeArg::Dark => ThemeMode::Dark,
            ThemeArg::System => ThemeMode::System,
        };
    }
    if let Some(enabled) = sync_enabled {
        settings.sync_enabled = enabled;
    }
    if let Some(enabled) = notifications_enabled {
        settings.notifications_enabled = enabled;
    }
    if clear_ai_api_key {
        settings.ai_api_key = None;
    } else if let Some(key) = notmobil_core::util::normalize_text_option(ai_api_key) {
        settings.ai_api_key = Some(key);
    }
    *settings != before
}

pub fn format_settings(settings: &Settings) -> Vec<String> {
    vec![
        format!("theme:                 {:?}", settings.theme),
        format!("sync_enabled:          {}", settings.sync_enabled),
        format!("notifications_enabled: {}", settings.notifications_enabled),
        format!(
            "ai_api_key:            {}",
            if settings.ai_api_key.is_some() {
                "[set]"
            } else {
                "[not set]"
            }
        ),
    ]
}
