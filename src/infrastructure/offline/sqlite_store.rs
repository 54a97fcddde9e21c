use super::mappers;
use super::rows::{CacheEntryRow, EntityRow, PendingActionRow, PhotoRow};
use crate::application::ports::offline_store::OfflineStore;
use crate::domain::entities::{
    CacheEntry, CachedEntity, OfflinePhoto, PendingAction, PendingActionDraft,
};
use crate::domain::value_objects::{CacheKey, EntityKind, PhotoId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

/// SQLite-backed durable store. Each partition is a table; every write is a
/// single statement, so partition-level atomicity comes from SQLite itself.
pub struct SqliteOfflineStore {
    pool: SqlitePool,
}

impl SqliteOfflineStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfflineStore for SqliteOfflineStore {
    async fn put_entity(&self, entity: CachedEntity) -> Result<(), AppError> {
        let data = serde_json::to_string(&entity.data)?;

        sqlx::query(
            r#"
            INSERT INTO entities (kind, id, data, synced, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(kind, id) DO UPDATE SET
                data = excluded.data,
                synced = excluded.synced,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(entity.kind.as_str())
        .bind(&entity.id)
        .bind(&data)
        .bind(entity.synced)
        .bind(entity.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_entity(
        &self,
        kind: &EntityKind,
        id: &str,
    ) -> Result<Option<CachedEntity>, AppError> {
        let row = sqlx::query_as::<_, EntityRow>(
            "SELECT * FROM entities WHERE kind = ?1 AND id = ?2",
        )
        .bind(kind.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(mappers::entity_from_row).transpose()
    }

    async fn list_entities(&self, kind: &EntityKind) -> Result<Vec<CachedEntity>, AppError> {
        let rows = sqlx::query_as::<_, EntityRow>(
            "SELECT * FROM entities WHERE kind = ?1 ORDER BY updated_at DESC",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(mappers::entity_from_row).collect()
    }

    async fn list_unsynced_entities(
        &self,
        kind: &EntityKind,
    ) -> Result<Vec<CachedEntity>, AppError> {
        let rows = sqlx::query_as::<_, EntityRow>(
            "SELECT * FROM entities WHERE kind = ?1 AND synced = 0 ORDER BY updated_at ASC",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(mappers::entity_from_row).collect()
    }

    async fn mark_entity_synced(&self, kind: &EntityKind, id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE entities SET synced = 1 WHERE kind = ?1 AND id = ?2")
            .bind(kind.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_cache_entry(&self, key: &CacheKey) -> Result<Option<CacheEntry>, AppError> {
        let row = sqlx::query_as::<_, CacheEntryRow>(
            "SELECT * FROM cache_entries WHERE key = ?1",
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        // Lazy eviction: an expired entry is a miss and is purged here.
        if row.expires_at < Utc::now().timestamp_millis() {
            self.delete_cache_entry(key).await?;
            return Ok(None);
        }

        mappers::cache_entry_from_row(row).map(Some)
    }

    async fn put_cache_entry(&self, entry: CacheEntry) -> Result<(), AppError> {
        let data = serde_json::to_string(&entry.data)?;

        sqlx::query(
            r#"
            INSERT INTO cache_entries (key, data, expires_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                data = excluded.data,
                expires_at = excluded.expires_at
            "#,
        )
        .bind(entry.key.as_str())
        .bind(&data)
        .bind(entry.expires_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_cache_entry(&self, key: &CacheKey) -> Result<(), AppError> {
        sqlx::query("DELETE FROM cache_entries WHERE key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn invalidate_prefix(&self, prefix: &str) -> Result<u64, AppError> {
        // substr comparison instead of LIKE so %-characters in keys need no
        // escaping.
        let result = sqlx::query(
            "DELETE FROM cache_entries WHERE substr(key, 1, length(?1)) = ?1",
        )
        .bind(prefix)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn append_action(&self, draft: PendingActionDraft) -> Result<PendingAction, AppError> {
        let payload = serde_json::to_string(&draft.payload)?;
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO pending_actions (kind, entity, payload, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(draft.kind.as_str())
        .bind(draft.entity.as_str())
        .bind(&payload)
        .bind(created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(PendingAction {
            id: result.last_insert_rowid(),
            kind: draft.kind,
            entity: draft.entity,
            payload: draft.payload,
            created_at,
        })
    }

    async fn pending_actions(&self) -> Result<Vec<PendingAction>, AppError> {
        let rows = sqlx::query_as::<_, PendingActionRow>(
            "SELECT * FROM pending_actions ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(mappers::pending_action_from_row)
            .collect()
    }

    async fn remove_action(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM pending_actions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn add_photo(&self, photo: OfflinePhoto) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO photos (id, job_id, bytes, kind, caption, synced, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(photo.id.as_str())
        .bind(&photo.job_id)
        .bind(&photo.bytes)
        .bind(photo.kind.as_str())
        .bind(&photo.caption)
        .bind(photo.synced)
        .bind(photo.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn unsynced_photos(&self) -> Result<Vec<OfflinePhoto>, AppError> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            "SELECT * FROM photos WHERE synced = 0 ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(mappers::photo_from_row).collect()
    }

    async fn photos_for_job(&self, job_id: &str) -> Result<Vec<OfflinePhoto>, AppError> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            "SELECT * FROM photos WHERE job_id = ?1 ORDER BY created_at ASC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(mappers::photo_from_row).collect()
    }

    async fn mark_photo_synced(&self, id: &PhotoId) -> Result<(), AppError> {
        sqlx::query("UPDATE photos SET synced = 1 WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ActionKind, PhotoKind};
    use crate::infrastructure::database::ConnectionPool;
    use chrono::Duration;
    use serde_json::json;

    async fn setup_store() -> SqliteOfflineStore {
        let pool = ConnectionPool::from_memory().await.unwrap();
        pool.migrate().await.unwrap();
        SqliteOfflineStore::new(pool.get_pool().clone())
    }

    fn key(value: &str) -> CacheKey {
        CacheKey::new(value.to_string()).unwrap()
    }

    fn kind(value: &str) -> EntityKind {
        EntityKind::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn cache_entry_round_trip() {
        let store = setup_store().await;

        let entry = CacheEntry::new(key("jobs-today"), json!([{"id": "j1"}]), Duration::minutes(10));
        store.put_cache_entry(entry).await.unwrap();

        let got = store.get_cache_entry(&key("jobs-today")).await.unwrap().unwrap();
        assert_eq!(got.data, json!([{"id": "j1"}]));
    }

    #[tokio::test]
    async fn expired_cache_entry_is_a_miss_and_is_purged() {
        let store = setup_store().await;

        let mut entry = CacheEntry::new(key("jobs-today"), json!(1), Duration::minutes(10));
        entry.expires_at = Utc::now() - Duration::seconds(1);
        store.put_cache_entry(entry).await.unwrap();

        assert!(store.get_cache_entry(&key("jobs-today")).await.unwrap().is_none());

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cache_entries")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn invalidate_prefix_removes_only_matching_keys() {
        let store = setup_store().await;

        for k in ["jobs-today", "jobs-week", "customers-list"] {
            let entry = CacheEntry::new(key(k), json!(1), Duration::minutes(10));
            store.put_cache_entry(entry).await.unwrap();
        }

        let removed = store.invalidate_prefix("jobs-").await.unwrap();
        assert_eq!(removed, 2);

        assert!(store.get_cache_entry(&key("jobs-today")).await.unwrap().is_none());
        assert!(store.get_cache_entry(&key("customers-list")).await.unwrap().is_some());

        // Zero matches is a no-op, not an error.
        assert_eq!(store.invalidate_prefix("invoices-").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn pending_actions_come_back_in_append_order() {
        let store = setup_store().await;

        for n in 0..3 {
            let draft = PendingActionDraft::new(
                ActionKind::Update,
                kind("jobs"),
                json!({"id": format!("j{n}")}),
            );
            store.append_action(draft).await.unwrap();
        }

        let actions = store.pending_actions().await.unwrap();
        assert_eq!(actions.len(), 3);
        assert!(actions.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(actions[0].payload, json!({"id": "j0"}));
    }

    #[tokio::test]
    async fn remove_action_deletes_one_entry() {
        let store = setup_store().await;

        let first = store
            .append_action(PendingActionDraft::new(
                ActionKind::Create,
                kind("jobs"),
                json!({"title": "a"}),
            ))
            .await
            .unwrap();
        store
            .append_action(PendingActionDraft::new(
                ActionKind::Create,
                kind("jobs"),
                json!({"title": "b"}),
            ))
            .await
            .unwrap();

        store.remove_action(first.id).await.unwrap();

        let remaining = store.pending_actions().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].payload, json!({"title": "b"}));
    }

    #[tokio::test]
    async fn unsynced_photos_exclude_marked_ones() {
        let store = setup_store().await;

        let photo = OfflinePhoto::new("job1".into(), vec![1, 2, 3], PhotoKind::Before, None);
        let photo_id = photo.id.clone();
        store.add_photo(photo).await.unwrap();
        store
            .add_photo(OfflinePhoto::new(
                "job1".into(),
                vec![4, 5],
                PhotoKind::After,
                Some("done".into()),
            ))
            .await
            .unwrap();

        assert_eq!(store.unsynced_photos().await.unwrap().len(), 2);

        store.mark_photo_synced(&photo_id).await.unwrap();

        let unsynced = store.unsynced_photos().await.unwrap();
        assert_eq!(unsynced.len(), 1);
        assert_eq!(unsynced[0].kind, PhotoKind::After);

        // The job index still sees both.
        assert_eq!(store.photos_for_job("job1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unsynced_entities_are_scoped_to_kind() {
        let store = setup_store().await;

        store
            .put_entity(CachedEntity::new(
                kind("jobs"),
                "j1".into(),
                json!({"stage": "quoted"}),
                false,
            ))
            .await
            .unwrap();
        store
            .put_entity(CachedEntity::new(
                kind("customers"),
                "c1".into(),
                json!({"name": "Ada"}),
                true,
            ))
            .await
            .unwrap();

        let unsynced = store.list_unsynced_entities(&kind("jobs")).await.unwrap();
        assert_eq!(unsynced.len(), 1);
        assert_eq!(unsynced[0].id, "j1");

        store.mark_entity_synced(&kind("jobs"), "j1").await.unwrap();
        assert!(store
            .list_unsynced_entities(&kind("jobs"))
            .await
            .unwrap()
            .is_empty());
    }
}
