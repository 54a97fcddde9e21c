pub mod entity_service;
pub mod fetch_service;
pub mod photo_service;
pub mod queue_service;
pub mod sync_service;

pub use entity_service::EntityService;
pub use fetch_service::FetchService;
pub use photo_service::PhotoService;
pub use queue_service::QueueService;
pub use sync_service::{SyncService, SyncTaskGuard};
