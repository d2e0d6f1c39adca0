//! Host-facing sync status.

/// Where the last reconciliation pass left the store.
///
/// `Offline` means the pull could not reach the service, `Error` covers any
/// other failed or aborted pass, and `Syncing` is reported while a pass runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Offline,
    Syncing,
    Synced,
    Error,
}
