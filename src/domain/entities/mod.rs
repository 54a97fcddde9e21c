pub mod cache_entry;
pub mod cached_entity;
pub mod offline_photo;
pub mod pending_action;
pub mod sync_report;

pub use cache_entry::CacheEntry;
pub use cached_entity::CachedEntity;
pub use offline_photo::OfflinePhoto;
pub use pending_action::{payload_row_id, PendingAction, PendingActionDraft};
pub use sync_report::{SyncReport, SyncState, SyncStatusSnapshot};
