//! Push-then-pull reconciliation between the local store and the remote service.
//!
//! A pass first pushes every unsynced note (create when the remote has never
//! confirmed it, update otherwise), then pulls the full remote list and writes
//! each entry locally as synced. Failures never escape [`SyncEngine::synchronize`];
//! they are logged and summarized in the returned [`SyncReport`], and the next
//! scheduled pass retries.

use crate::auth::{Credential, CredentialProvider};
use crate::models::Note;
use crate::remote::{NoteDto, RemoteError, RemoteNoteService};
use crate::state::SyncState;
use crate::util::now_millis;
use crate::Result;


/// Local persistence the engine reconciles against.
///
/// Implementations serialize writes so that a sync write and a concurrent
/// user edit of the same note never interleave into a mixed record.
#[allow(async_fn_in_trait)]
pub trait NoteStore {
    /// Snapshot of notes flagged unsynced at the time of the call
    async fn unsynced_notes(&self) -> Result<Vec<Note>>;

    /// Insert or replace by id
    async fn upsert_note(&self, note: &Note) -> Result<()>;

    /// Update an existing note by id
    async fn update_note(&self, note: &Note) -> Result<()>;

    async fn delete_note(&self, id: &str) -> Result<()>;

    /// Flip the synced flag without touching any other field
    async fn mark_synced(&self, id: &str, synced_at: i64) -> Result<()>;

    /// Atomically re-key `old_id` to `note.id` and store `note`
    async fn replace_note(&self, old_id: &str, note: &Note) -> Result<()>;
}

/// Result of the pull phase of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PullOutcome {
    #[default]
    NotRun,
    Completed,
    Failed {
        message: String,
        offline: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushFailure {
    pub note_id: String,
    pub message: String,
}

/// Summary of one reconciliation pass, for logging and host status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Notes confirmed through a create call
    pub created: usize,
    /// Notes confirmed through an update call
    pub updated: usize,
    pub push_failures: Vec<PushFailure>,
    /// Remote notes written locally
    pub pulled: usize,
    /// Remote entries ignored for lack of an id
    pub skipped: usize,
    pub pull: PullOutcome,
    /// Set when the pass ended before pushing anything
    pub aborted: Option<String>,
}

impl SyncReport {
    /// Number of notes pushed successfully
    #[must_use]
    pub const fn pushed(&self) -> usize {
        self.created + self.updated
    }

    /// Host-facing status derived from the pass
    #[must_use]
    pub fn state(&self) -> SyncState {
        if self.aborted.is_some() {
            return SyncState::Error;
        }
        match &self.pull {
            PullOutcome::Failed { offline: true, .. } => SyncState::Offline,
            PullOutcome::Failed { .. } | PullOutcome::NotRun => SyncState::Error,
            PullOutcome::Completed if self.push_failures.is_empty() => SyncState::Synced,
            PullOutcome::Completed => SyncState::Error,
        }
    }
}

enum Pushed {
    Created,
    Updated,
}

#[derive(Debug, thiserror::Error)]
enum PushError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("local write failed: {0}")]
    Store(#[from] crate::Error),
}

pub struct SyncEngine<S, R, C> {
    store: S,
    remote: R,
    credentials: C,
}

impl<S, R, C> SyncEngine<S, R, C>
where
    S: NoteStore,
    R: RemoteNoteService,
    C: CredentialProvider,
{
    pub const fn new(store: S, remote: R, credentials: C) -> Self {
        Self {
            store,
            remote,
            credentials,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    pub const fn credentials(&self) -> &C {
        &self.credentials
    }

    /// Run one push-then-pull pass. Never fails; see the returned report.
    pub async fn synchronize(&self) -> SyncReport {
        let mut report = SyncReport::default();

        let credential = match self.credentials.resolve().await {
            Ok(credential) => credential,
            Err(error) => {
                tracing::warn!("Sync skipped, no usable credential: {}", error);
                report.aborted = Some(error.to_string());
                return report;
            }
        };

        let pending = match self.store.unsynced_notes().await {
            Ok(pending) => pending,
            Err(error) => {
                tracing::error!("Sync skipped, failed to read unsynced notes: {}", error);
                report.aborted = Some(error.to_string());
                return report;
            }
        };

        tracing::debug!(pending = pending.len(), "Pushing unsynced notes");
        for note in &pending {
            match self.push_note(&credential, note).await {
                Ok(Pushed::Created) => report.created += 1,
                Ok(Pushed::Updated) => report.updated += 1,
                Err(error) => {
                    tracing::warn!(note_id = %note.id, "Failed to push note: {}", error);
                    report.push_failures.push(PushFailure {
                        note_id: note.id.clone(),
                        message: error.to_string(),
                    });
                }
            }
        }

        self.pull(&credential, &mut report).await;

        tracing::info!(
            created = report.created,
            updated = report.updated,
            failed = report.push_failures.len(),
            pulled = report.pulled,
            state = ?report.state(),
            "Sync pass finished"
        );
        report
    }

    async fn push_note(
        &self,
        credential: &Credential,
        note: &Note,
    ) -> std::result::Result<Pushed, PushError> {
        let payload = NoteDto::from(note);

        if note.id.trim().is_empty() || !note.was_ever_synced() {
            let stored = self.remote.create_note(credential, &payload).await?;
            let mut confirmed = stored.merge_into(note);
            confirmed.mark_synced(now_millis());

            if confirmed.id == note.id {
                self.store.upsert_note(&confirmed).await?;
            } else {
                tracing::debug!(
                    local_id = %note.id,
                    remote_id = %confirmed.id,
                    "Remote assigned a new id, re-keying local note"
                );
                self.store.replace_note(&note.id, &confirmed).await?;
            }
            return Ok(Pushed::Created);
        }

        self.remote
            .update_note(credential, &note.id, &payload)
            .await?;
        self.store.mark_synced(&note.id, now_millis()).await?;
        Ok(Pushed::Updated)
    }

    async fn pull(&self, credential: &Credential, report: &mut SyncReport) {
        let remote_notes = match self.remote.list_notes(credential).await {
            Ok(notes) => notes,
            Err(error) => {
                tracing::warn!("Failed to fetch remote notes: {}", error);
                report.pull = PullOutcome::Failed {
                    offline: error.is_offline(),
                    message: error.to_string(),
                };
                return;
            }
        };

        tracing::debug!(count = remote_notes.len(), "Writing remote notes locally");
        let now = now_millis();
        for dto in remote_notes {
            let mut note = dto.into_note(now);
            if note.id.is_empty() {
                tracing::warn!(title = %note.title_preview(40), "Skipping remote note without id");
                report.skipped += 1;
                continue;
            }
            note.mark_synced(now);

            if let Err(error) = self.store.upsert_note(&note).await {
                tracing::error!(note_id = %note.id, "Failed to store remote note: {}", error);
                report.pull = PullOutcome::Failed {
                    message: error.to_string(),
                    offline: false,
                };
                return;
            }
            report.pulled += 1;
        }

        report.pull = PullOutcome::Completed;
    }
}
