use std::time::Duration;

use notmobil_core::sync::{PullOutcome, SyncReport};
use notmobil_core::{Settings, SyncEngine, SyncState};

use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_sync(every: Option<u64>, watch: bool, ctx: &AppContext) -> Result<(), CliError> {
    let service = ctx.open_service().await?;
    let engine = SyncEngine::new(service, ctx.remote()?, ctx.credentials()?);

    let interval = match (every, watch) {
        (Some(0), _) => return Err(CliError::InvalidInterval),
        (Some(secs), _) => Duration::from_secs(secs),
        (None, true) => ctx.config.sync_interval,
        (None, false) => {
            let report = engine.synchronize().await;
            for line in format_sync_report(&report) {
                println!("{line}");
            }
            return match report.aborted {
                Some(reason) => Err(CliError::SyncAborted(reason)),
                None => Ok(()),
            };
        }
    };

    tracing::info!("Syncing every {}s, press Ctrl-C to stop", interval.as_secs());
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !background_sync_enabled(engine.store().load_settings().await) {
                    continue;
                }
                tracing::debug!(state = ?SyncState::Syncing, "Starting sync pass");
                let report = engine.synchronize().await;
                for line in format_sync_report(&report) {
                    tracing::info!("{line}");
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!("Stopping sync loop");
                return Ok(());
            }
        }
    }
}

/// Whether a scheduled pass should run; an unreadable store skips this tick only.
pub fn background_sync_enabled(settings: notmobil_core::Result<Settings>) -> bool {
    match settings {
        Ok(settings) if settings.sync_enabled => true,
        Ok(_) => {
            tracing::debug!("Background sync disabled in settings, skipping pass");
            false
        }
        Err(error) => {
            tracing::warn!("Failed to read settings, retrying next pass: {}", error);
            false
        }
    }
}

pub fn format_sync_report(report: &SyncReport) -> Vec<String> {
    if let Some(reason) = &report.aborted {
        return vec![format!("Sync skipped: {reason}")];
    }

    let mut lines = vec![format!(
        "Pushed {} note(s) ({} created, {} updated), {} failed",
        report.pushed(),
        report.created,
        report.updated,
        report.push_failures.len()
    )];
    for failure in &report.push_failures {
        lines.push(format!("  {}: {}", failure.note_id, failure.message));
    }

    lines.push(match &report.pull {
        PullOutcome::Completed if report.skipped > 0 => format!(
            "Pulled {} note(s), skipped {} without id",
            report.pulled, report.skipped
        ),
        PullOutcome::Completed => format!("Pulled {} note(s)", report.pulled),
        PullOutcome::Failed { message, .. } => format!("Pull failed: {message}"),
        PullOutcome::NotRun => "Pull did not run".to_string(),
    });
    lines.push(format!("Status: {:?}", report.state()));
    lines
}
