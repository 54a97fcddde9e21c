use crate::application::ports::connectivity::Connectivity;
use crate::application::ports::offline_store::OfflineStore;
use crate::application::ports::remote::{RemoteBlobStorage, RemoteDataSource};
use crate::domain::entities::{
    payload_row_id, OfflinePhoto, PendingAction, SyncReport, SyncState, SyncStatusSnapshot,
};
use crate::domain::value_objects::{ActionKind, EntityKind};
use crate::shared::error::AppError;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Drains the pending-action and photo queues into the remote store and
/// exposes a UI-facing status snapshot. At-least-once: an item leaves its
/// queue only after the remote confirms it, and a failed item stays put for
/// the next pass.
pub struct SyncService {
    store: Arc<dyn OfflineStore>,
    remote: Arc<dyn RemoteDataSource>,
    blobs: Arc<dyn RemoteBlobStorage>,
    connectivity: Arc<dyn Connectivity>,
    photo_bucket: String,
    status: RwLock<SyncStatusSnapshot>,
}

/// Aborts the reconnect-triggered sync task when dropped.
pub struct SyncTaskGuard {
    handle: JoinHandle<()>,
}

impl Drop for SyncTaskGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl SyncService {
    pub fn new(
        store: Arc<dyn OfflineStore>,
        remote: Arc<dyn RemoteDataSource>,
        blobs: Arc<dyn RemoteBlobStorage>,
        connectivity: Arc<dyn Connectivity>,
        photo_bucket: String,
    ) -> Self {
        Self {
            store,
            remote,
            blobs,
            connectivity,
            photo_bucket,
            status: RwLock::new(SyncStatusSnapshot::default()),
        }
    }

    pub async fn status(&self) -> SyncStatusSnapshot {
        self.status.read().await.clone()
    }

    /// Replays the pending-action queue in enqueue order. A failed replay is
    /// counted and left queued; later actions still run, so one poisoned
    /// action cannot wedge the queue. Requires connectivity.
    pub async fn sync_pending_changes(&self) -> Result<SyncReport, AppError> {
        if !self.connectivity.is_online() {
            return Err(AppError::Offline("pending-action sync".to_string()));
        }

        let mut report = SyncReport::default();
        let mut confirmed_updates: Vec<(EntityKind, String)> = Vec::new();
        for action in self.store.pending_actions().await? {
            match self.replay_action(&action).await {
                Ok(()) => {
                    self.store.remove_action(action.id).await?;
                    if action.kind == ActionKind::Update {
                        if let Some(id) = payload_row_id(&action.payload) {
                            confirmed_updates.push((action.entity.clone(), id.to_string()));
                        }
                    }
                    report.record_success();
                }
                Err(err) => {
                    tracing::warn!(
                        id = action.id,
                        kind = %action.kind,
                        entity = %action.entity,
                        error = %err,
                        "action replay failed; left queued"
                    );
                    report.record_failure();
                }
            }
        }

        // `synced` asserts the remote agrees with the local copy. With more
        // than one queued edit for a row, the local copy holds the latest
        // edit, so the flag flips only once no edit for that row remains
        // queued.
        let remaining = self.store.pending_actions().await?;
        for (entity, id) in confirmed_updates {
            let still_queued = remaining
                .iter()
                .any(|a| a.entity == entity && payload_row_id(&a.payload) == Some(id.as_str()));
            if !still_queued {
                self.store.mark_entity_synced(&entity, &id).await?;
            }
        }

        tracing::info!(success = report.success, failed = report.failed, "action queue drained");
        Ok(report)
    }

    async fn replay_action(&self, action: &PendingAction) -> Result<(), AppError> {
        let table = action.entity.as_str();
        match action.kind {
            ActionKind::Create => {
                self.remote.insert(table, &action.payload).await?;
            }
            ActionKind::Update => {
                let id = self.require_row_id(action)?;
                let patch = strip_row_id(&action.payload);
                self.remote.update(table, &id, &patch).await?;
            }
            ActionKind::Delete => {
                let id = self.require_row_id(action)?;
                self.remote.delete(table, &id).await?;
            }
        }
        Ok(())
    }

    fn require_row_id(&self, action: &PendingAction) -> Result<String, AppError> {
        payload_row_id(&action.payload)
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Queued {} action {} has no row id",
                    action.kind, action.id
                ))
            })
    }

    /// Uploads every queued photo and records its metadata row. Same
    /// continue-on-error contract as the action queue.
    pub async fn sync_offline_photos(&self) -> Result<SyncReport, AppError> {
        if !self.connectivity.is_online() {
            return Err(AppError::Offline("photo sync".to_string()));
        }

        let mut report = SyncReport::default();
        for photo in self.store.unsynced_photos().await? {
            match self.upload_photo(&photo).await {
                Ok(()) => {
                    self.store.mark_photo_synced(&photo.id).await?;
                    report.record_success();
                }
                Err(err) => {
                    tracing::warn!(photo = %photo.id, job = %photo.job_id, error = %err, "photo upload failed; left queued");
                    report.record_failure();
                }
            }
        }

        tracing::info!(success = report.success, failed = report.failed, "photo queue drained");
        Ok(report)
    }

    async fn upload_photo(&self, photo: &OfflinePhoto) -> Result<(), AppError> {
        let path = format!(
            "{}/{}.{}",
            photo.job_id,
            photo.id,
            photo_extension(&photo.bytes)
        );
        self.blobs
            .upload(&self.photo_bucket, &path, &photo.bytes)
            .await?;

        // Metadata row goes in after the blob so a crash between the two
        // leaves an orphan blob, never a dangling reference.
        let row = json!({
            "id": photo.id,
            "job_id": photo.job_id,
            "storage_path": path,
            "kind": photo.kind,
            "caption": photo.caption,
            "taken_at": photo.created_at,
        });
        self.remote.insert("job_photos", &row).await
    }

    /// One full drain: actions first so entity mutations land before the
    /// photos that reference them, then photos. Updates the status snapshot
    /// around the pass.
    pub async fn run_sync_pass(&self) -> Result<SyncStatusSnapshot, AppError> {
        {
            let mut status = self.status.write().await;
            status.state = SyncState::Syncing;
        }

        let outcome = async {
            let actions = self.sync_pending_changes().await?;
            let photos = self.sync_offline_photos().await?;
            Ok::<_, AppError>((actions, photos))
        }
        .await;

        let mut status = self.status.write().await;
        match outcome {
            Ok((actions, photos)) => {
                status.state = if actions.is_clean() && photos.is_clean() {
                    SyncState::Idle
                } else {
                    SyncState::Error
                };
                status.last_sync = Some(Utc::now());
                status.actions = actions;
                status.photos = photos;
                Ok(status.clone())
            }
            Err(err) => {
                status.state = SyncState::Error;
                Err(err)
            }
        }
    }

    /// Runs a sync pass on every offline-to-online transition for as long as
    /// the returned guard lives.
    pub fn spawn_on_reconnect(self: &Arc<Self>) -> SyncTaskGuard {
        let service = Arc::clone(self);
        let mut rx = self.connectivity.watch_online();
        let handle = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let online = *rx.borrow_and_update();
                if !online {
                    continue;
                }
                tracing::info!("connection restored; starting sync pass");
                if let Err(err) = service.run_sync_pass().await {
                    tracing::error!(error = %err, "reconnect sync pass failed");
                }
            }
        });
        SyncTaskGuard { handle }
    }

    /// Runs a sync pass every `interval_secs` while online, for as long as
    /// the returned guard lives. Passes that would start offline are skipped
    /// rather than errored; the reconnect trigger covers that case.
    pub fn spawn_periodic(self: &Arc<Self>, interval_secs: u64) -> SyncTaskGuard {
        let service = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(std::time::Duration::from_secs(interval_secs.max(1)));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // First tick fires immediately; swallow it so the timer measures
            // from spawn, not from zero.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !service.connectivity.is_online() {
                    continue;
                }
                if let Err(err) = service.run_sync_pass().await {
                    tracing::error!(error = %err, "periodic sync pass failed");
                }
            }
        });
        SyncTaskGuard { handle }
    }
}

/// File extension from the image's magic bytes. Unknown encodings fall back
/// to jpg, the field-camera default.
fn photo_extension(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "png"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "webp"
    } else {
        "jpg"
    }
}

fn strip_row_id(payload: &Value) -> Value {
    match payload {
        Value::Object(map) => {
            let mut patch = map.clone();
            patch.remove("id");
            Value::Object(patch)
        }
        other => other.clone(),
    }
}
