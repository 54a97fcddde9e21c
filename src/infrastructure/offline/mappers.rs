use super::rows::{CacheEntryRow, EntityRow, PendingActionRow, PhotoRow};
use crate::domain::entities::{CacheEntry, CachedEntity, OfflinePhoto, PendingAction};
use crate::domain::value_objects::{ActionKind, CacheKey, EntityKind, PhotoId, PhotoKind};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};

pub fn entity_from_row(row: EntityRow) -> Result<CachedEntity, AppError> {
    let kind = EntityKind::new(row.kind).map_err(AppError::Validation)?;
    let data = serde_json::from_str(&row.data)?;

    Ok(CachedEntity {
        kind,
        id: row.id,
        data,
        synced: row.synced,
        updated_at: millis_to_datetime(row.updated_at)?,
    })
}

pub fn cache_entry_from_row(row: CacheEntryRow) -> Result<CacheEntry, AppError> {
    let key = CacheKey::new(row.key).map_err(AppError::Validation)?;
    let data = serde_json::from_str(&row.data)?;

    Ok(CacheEntry {
        key,
        data,
        expires_at: millis_to_datetime(row.expires_at)?,
    })
}

pub fn pending_action_from_row(row: PendingActionRow) -> Result<PendingAction, AppError> {
    let kind = ActionKind::parse(&row.kind).map_err(AppError::Validation)?;
    let entity = EntityKind::new(row.entity).map_err(AppError::Validation)?;
    let payload = serde_json::from_str(&row.payload)?;

    Ok(PendingAction {
        id: row.id,
        kind,
        entity,
        payload,
        created_at: millis_to_datetime(row.created_at)?,
    })
}

pub fn photo_from_row(row: PhotoRow) -> Result<OfflinePhoto, AppError> {
    let id = PhotoId::new(row.id).map_err(AppError::Validation)?;
    let kind = PhotoKind::parse(&row.kind).map_err(AppError::Validation)?;

    Ok(OfflinePhoto {
        id,
        job_id: row.job_id,
        bytes: row.bytes,
        kind,
        caption: row.caption,
        synced: row.synced,
        created_at: millis_to_datetime(row.created_at)?,
    })
}

/// A stored timestamp that chrono cannot represent means the row is corrupt;
/// that surfaces as a store failure, never a silently substituted time.
pub fn millis_to_datetime(ms: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or_else(|| AppError::Database(format!("Unrepresentable timestamp in store: {ms}")))
}
