use crate::domain::entities::{
    CacheEntry, CachedEntity, OfflinePhoto, PendingAction, PendingActionDraft,
};
use crate::domain::value_objects::{CacheKey, EntityKind, PhotoId};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Durable local store with four independent partitions: the entity cache,
/// the TTL query cache, the pending-action queue, and the photo queue.
/// Writes are atomic per partition; cross-partition atomicity is not
/// provided (the entity store is corrected by sync, the query cache heals
/// via TTL expiry).
#[async_trait]
pub trait OfflineStore: Send + Sync {
    // Entity cache

    async fn put_entity(&self, entity: CachedEntity) -> Result<(), AppError>;
    async fn get_entity(
        &self,
        kind: &EntityKind,
        id: &str,
    ) -> Result<Option<CachedEntity>, AppError>;
    async fn list_entities(&self, kind: &EntityKind) -> Result<Vec<CachedEntity>, AppError>;
    async fn list_unsynced_entities(
        &self,
        kind: &EntityKind,
    ) -> Result<Vec<CachedEntity>, AppError>;
    async fn mark_entity_synced(&self, kind: &EntityKind, id: &str) -> Result<(), AppError>;

    // TTL query cache

    /// Returns the entry if present and unexpired. An expired entry is
    /// deleted as a side effect of the read and reported as a miss.
    async fn get_cache_entry(&self, key: &CacheKey) -> Result<Option<CacheEntry>, AppError>;
    async fn put_cache_entry(&self, entry: CacheEntry) -> Result<(), AppError>;
    async fn delete_cache_entry(&self, key: &CacheKey) -> Result<(), AppError>;
    /// Deletes every entry whose key starts with `prefix`; zero matches is a
    /// no-op. Returns the number of entries removed.
    async fn invalidate_prefix(&self, prefix: &str) -> Result<u64, AppError>;

    // Pending-action queue

    /// Appends with the next auto-assigned queue position.
    async fn append_action(&self, draft: PendingActionDraft) -> Result<PendingAction, AppError>;
    /// All queued actions in ascending queue position (replay order).
    async fn pending_actions(&self) -> Result<Vec<PendingAction>, AppError>;
    /// Callers invoke this only after the remote confirmed the mutation.
    async fn remove_action(&self, id: i64) -> Result<(), AppError>;

    // Photo queue

    async fn add_photo(&self, photo: OfflinePhoto) -> Result<(), AppError>;
    async fn unsynced_photos(&self) -> Result<Vec<OfflinePhoto>, AppError>;
    async fn photos_for_job(&self, job_id: &str) -> Result<Vec<OfflinePhoto>, AppError>;
    async fn mark_photo_synced(&self, id: &PhotoId) -> Result<(), AppError>;
}
