use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one drain pass over a queue. Failed items stay queued for the
/// next pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub success: u32,
    pub failed: u32,
}

impl SyncReport {
    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    #[default]
    Idle,
    Syncing,
    /// At least one queued item failed its last replay and remains queued.
    /// Shown to the UI as a persistent sync error rather than retried with
    /// backoff internally.
    Error,
}

/// UI-facing view of the sync manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStatusSnapshot {
    pub state: SyncState,
    pub last_sync: Option<DateTime<Utc>>,
    pub actions: SyncReport,
    pub photos: SyncReport,
}
