use crate::domain::value_objects::{PhotoId, PhotoKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A photo captured in the field and not yet uploaded. Kept out of the
/// generic action queue because the payload is binary and large; drained by
/// a photo-specific upload path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflinePhoto {
    pub id: PhotoId,
    pub job_id: String,
    pub bytes: Vec<u8>,
    pub kind: PhotoKind,
    pub caption: Option<String>,
    pub synced: bool,
    pub created_at: DateTime<Utc>,
}

impl OfflinePhoto {
    pub fn new(job_id: String, bytes: Vec<u8>, kind: PhotoKind, caption: Option<String>) -> Self {
        Self {
            id: PhotoId::generate(),
            job_id,
            bytes,
            kind,
            caption,
            synced: false,
            created_at: Utc::now(),
        }
    }
}
