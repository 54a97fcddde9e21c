use crate::domain::value_objects::EntityKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One locally cached domain row. `synced` is authoritative for "does the
/// remote store agree with this local copy": it flips to false on a local
/// mutation and back to true only after a confirmed remote write or a
/// server refetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEntity {
    pub kind: EntityKind,
    pub id: String,
    pub data: Value,
    pub synced: bool,
    pub updated_at: DateTime<Utc>,
}

impl CachedEntity {
    pub fn new(kind: EntityKind, id: String, data: Value, synced: bool) -> Self {
        Self {
            kind,
            id,
            data,
            synced,
            updated_at: Utc::now(),
        }
    }
}
