use std::path::PathBuf;

use notmobil_core::auth::{AuthSession, AuthUser, SessionPersistence};
use notmobil_core::config::ClientConfig;
use notmobil_core::models::ThemeMode;
use notmobil_core::services::NoteService;
use notmobil_core::sync::{PullOutcome, PushFailure, SyncReport};
use notmobil_core::{Note, NoteStore, Settings};
use pretty_assertions::assert_eq;

use crate::cli::ThemeArg;
use crate::commands::add::run_add;
use crate::commands::common::{
    format_note_lines, format_relative_time, normalize_content, normalize_note_identifier,
    normalize_search_query, note_preview, note_text, resolve_note, AppContext,
};
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::settings::apply_settings;
use crate::commands::sync::{background_sync_enabled, format_sync_report, run_sync};
use crate::error::CliError;
use crate::session_store::FileSessionStore;

fn test_context(dir: &tempfile::TempDir) -> AppContext {
    AppContext {
        config: ClientConfig {
            api_url: "http://127.0.0.1:9/api".to_string(),
            http_timeout: std::time::Duration::from_millis(200),
            ..ClientConfig::default()
        },
        db_path: dir.path().join("notes.db"),
        session_path: dir.path().join("session.json"),
    }
}

#[test]
fn normalize_content_trims_and_rejects_empty() {
    assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_content(" \n\t "), None);
}

#[test]
fn normalizers_reject_blank_input() {
    assert!(matches!(
        normalize_search_query("   "),
        Err(CliError::EmptySearchQuery)
    ));
    assert!(matches!(
        normalize_note_identifier(""),
        Err(CliError::EmptyNoteId)
    ));
    assert_eq!(normalize_note_identifier(" abc ").unwrap(), "abc");
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
    assert_eq!(format_relative_time(now - 3 * 24 * 60 * 60_000, now), "3d ago");
}

#[test]
fn note_preview_truncates_and_falls_back_to_content() {
    let note = Note::new("", "first   line of the body\nsecond");
    assert_eq!(note_preview(&note, 80), "first line of the body");
    assert_eq!(note_preview(&note, 10), "first l...");
}

#[test]
fn note_lines_mark_unsynced_notes() {
    let mut synced = Note::new("synced", "");
    synced.mark_synced(1);
    let pending = Note::new("pending", "").with_tags(["work"]);

    let lines = format_note_lines(&[synced, pending]);
    assert_eq!(lines[0].chars().nth(13), Some(' '));
    assert_eq!(lines[1].chars().nth(13), Some('*'));
    assert!(lines[1].ends_with("#work"));
}

#[test]
fn note_text_joins_title_and_content() {
    assert_eq!(note_text(&Note::new("Title", "Body")), "Title\n\nBody");
    assert_eq!(note_text(&Note::new(" ", "Body")), "Body");
    assert_eq!(note_text(&Note::new("Title", "")), "Title");
}

#[test]
fn apply_settings_reports_changes() {
    let mut settings = Settings::default();
    assert!(!apply_settings(&mut settings, None, None, None, None, false));

    assert!(apply_settings(
        &mut settings,
        Some(ThemeArg::Dark),
        Some(false),
        None,
        Some(" key ".to_string()),
        false,
    ));
    assert_eq!(settings.theme, ThemeMode::Dark);
    assert!(!settings.sync_enabled);
    assert_eq!(settings.ai_api_key.as_deref(), Some("key"));

    assert!(apply_settings(&mut settings, None, None, None, None, true));
    assert_eq!(settings.ai_api_key, None);
}

#[test]
fn sync_report_lines_cover_failures_and_pull() {
    let report = SyncReport {
        created: 1,
        updated: 2,
        push_failures: vec![PushFailure {
            note_id: "n1".to_string(),
            message: "HTTP 503".to_string(),
        }],
        pulled: 4,
        skipped: 0,
        pull: PullOutcome::Completed,
        aborted: None,
    };

    let lines = format_sync_report(&report);
    assert_eq!(lines[0], "Pushed 3 note(s) (1 created, 2 updated), 1 failed");
    assert_eq!(lines[1], "  n1: HTTP 503");
    assert_eq!(lines[2], "Pulled 4 note(s)");
    assert_eq!(lines[3], "Status: Error");

    let aborted = SyncReport {
        aborted: Some("Not logged in".to_string()),
        ..SyncReport::default()
    };
    assert_eq!(format_sync_report(&aborted), vec!["Sync skipped: Not logged in"]);
}

#[test]
fn scheduled_pass_skips_tick_when_settings_unreadable() {
    let locked = Err(notmobil_core::Error::Column("database is locked".to_string()));
    assert!(!background_sync_enabled(locked));

    let disabled = Settings {
        sync_enabled: false,
        ..Settings::default()
    };
    assert!(!background_sync_enabled(Ok(disabled)));
    assert!(background_sync_enabled(Ok(Settings::default())));
}

#[test]
fn file_session_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));
    assert!(store.load_session().unwrap().is_none());

    let session = AuthSession {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        user: AuthUser {
            id: "user1".to_string(),
            email: "test@test.com".to_string(),
            name: Some("Test User".to_string()),
        },
    };
    store.save_session(&session).unwrap();
    assert_eq!(store.load_session().unwrap(), Some(session));

    store.clear_session().unwrap();
    store.clear_session().unwrap();
    assert!(!store.path().exists());
}

#[test]
fn context_prefers_cli_overrides() {
    let config = ClientConfig {
        db_path: Some(PathBuf::from("/from/env.db")),
        ..ClientConfig::default()
    };
    let ctx = AppContext::resolve(
        config.clone(),
        Some(PathBuf::from("/from/flag.db")),
        Some("https://notes.example/api/".to_string()),
    );
    if let Ok(ctx) = ctx {
        assert_eq!(ctx.db_path, PathBuf::from("/from/flag.db"));
        assert_eq!(ctx.config.api_url, "https://notes.example/api");
    }

    assert!(matches!(
        AppContext::resolve(config, None, Some("notes.example".to_string())),
        Err(CliError::Config(_))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn resolve_note_accepts_unique_prefix() {
    let service = NoteService::open_in_memory().await.unwrap();
    let mut first = Note::new("first", "");
    first.id = "abc-111".to_string();
    let mut second = Note::new("second", "");
    second.id = "abd-222".to_string();
    service.upsert_note(&first).await.unwrap();
    service.upsert_note(&second).await.unwrap();

    assert_eq!(resolve_note(&service, "abc").await.unwrap().id, "abc-111");
    assert_eq!(resolve_note(&service, "abd-222").await.unwrap().id, "abd-222");
    assert!(matches!(
        resolve_note(&service, "ab").await,
        Err(CliError::AmbiguousNoteId(_))
    ));
    assert!(matches!(
        resolve_note(&service, "zzz").await,
        Err(CliError::NoteNotFound(_))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn add_edit_delete_flow() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_context(&dir);

    run_add(
        "Groceries",
        &["milk".to_string(), "eggs".to_string()],
        &["shopping".to_string()],
        &ctx,
    )
    .await
    .unwrap();

    let service = ctx.open_service().await.unwrap();
    let notes = service.list_all_notes().await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "milk eggs");
    assert_eq!(notes[0].tags, vec!["shopping"]);
    let id = notes[0].id.clone();
    drop(service);

    assert!(matches!(
        run_edit(&id, None, None, None, &ctx).await,
        Err(CliError::NothingToChange)
    ));
    run_edit(&id, Some("Market".to_string()), None, None, &ctx)
        .await
        .unwrap();
    let service = ctx.open_service().await.unwrap();
    assert_eq!(
        service.get_note(&id).await.unwrap().unwrap().title,
        "Market"
    );
    drop(service);

    run_delete(&id[..8], &ctx).await.unwrap();
    let service = ctx.open_service().await.unwrap();
    assert!(service.list_all_notes().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_without_session_fails_without_touching_notes() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_context(&dir);
    run_add("Pending", &["body".to_string()], &[], &ctx)
        .await
        .unwrap();

    assert!(matches!(
        run_sync(None, false, &ctx).await,
        Err(CliError::SyncAborted(_))
    ));
    assert!(matches!(
        run_sync(Some(0), false, &ctx).await,
        Err(CliError::InvalidInterval)
    ));

    let service = ctx.open_service().await.unwrap();
    let notes = service.list_all_notes().await.unwrap();
    assert_eq!(notes.len(), 1);
    assert!(!notes[0].is_synced);
}
