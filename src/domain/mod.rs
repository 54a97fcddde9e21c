pub mod entities;
pub mod value_objects;

pub use entities::{
    CacheEntry, CachedEntity, OfflinePhoto, PendingAction, PendingActionDraft, SyncReport,
    SyncState, SyncStatusSnapshot,
};
pub use value_objects::{ActionKind, CacheKey, EntityKind, PhotoId, PhotoKind};
