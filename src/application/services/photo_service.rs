use crate::application::ports::offline_store::OfflineStore;
use crate::domain::entities::OfflinePhoto;
use crate::domain::value_objects::{PhotoId, PhotoKind};
use crate::shared::error::AppError;
use std::sync::Arc;

/// Offline photo queue. Thin over the store; the upload path lives in the
/// sync manager.
pub struct PhotoService {
    store: Arc<dyn OfflineStore>,
}

impl PhotoService {
    pub fn new(store: Arc<dyn OfflineStore>) -> Self {
        Self { store }
    }

    pub async fn save_photo_offline(
        &self,
        job_id: &str,
        bytes: Vec<u8>,
        kind: PhotoKind,
        caption: Option<String>,
    ) -> Result<PhotoId, AppError> {
        if bytes.is_empty() {
            return Err(AppError::Validation("Photo payload is empty".to_string()));
        }

        let photo = OfflinePhoto::new(job_id.to_string(), bytes, kind, caption);
        let id = photo.id.clone();
        self.store.add_photo(photo).await?;

        tracing::debug!(photo = %id, job = job_id, "photo stored for upload");
        Ok(id)
    }

    pub async fn unsynced_photos(&self) -> Result<Vec<OfflinePhoto>, AppError> {
        self.store.unsynced_photos().await
    }

    pub async fn photos_for_job(&self, job_id: &str) -> Result<Vec<OfflinePhoto>, AppError> {
        self.store.photos_for_job(job_id).await
    }

    pub async fn mark_photo_synced(&self, id: &PhotoId) -> Result<(), AppError> {
        self.store.mark_photo_synced(id).await
    }
}
