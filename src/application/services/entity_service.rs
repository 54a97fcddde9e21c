use crate::application::ports::offline_store::OfflineStore;
use crate::domain::entities::{CachedEntity, PendingActionDraft};
use crate::domain::value_objects::{ActionKind, EntityKind};
use crate::shared::error::AppError;
use serde_json::Value;
use std::sync::Arc;

/// Entity-cache operations, partitioned by entity kind (jobs, customers,
/// checklist items, ...).
pub struct EntityService {
    store: Arc<dyn OfflineStore>,
}

impl EntityService {
    pub fn new(store: Arc<dyn OfflineStore>) -> Self {
        Self { store }
    }

    /// Records a row as fetched from the remote store; marks it synced.
    pub async fn cache_entity(
        &self,
        kind: EntityKind,
        id: String,
        data: Value,
    ) -> Result<(), AppError> {
        self.store
            .put_entity(CachedEntity::new(kind, id, data, true))
            .await
    }

    pub async fn cached_entity(
        &self,
        kind: &EntityKind,
        id: &str,
    ) -> Result<Option<Value>, AppError> {
        let entity = self.store.get_entity(kind, id).await?;
        Ok(entity.map(|e| e.data))
    }

    pub async fn cached_entities(&self, kind: &EntityKind) -> Result<Vec<Value>, AppError> {
        let entities = self.store.list_entities(kind).await?;
        Ok(entities.into_iter().map(|e| e.data).collect())
    }

    pub async fn unsynced_entities(&self, kind: &EntityKind) -> Result<Vec<CachedEntity>, AppError> {
        self.store.list_unsynced_entities(kind).await
    }

    /// Records a local mutation made while offline: overwrites the cached
    /// row with `synced = false` and queues the matching update action. The
    /// flag flips back only through `cache_entity` after a confirmed write
    /// or refetch.
    pub async fn update_entity_offline(
        &self,
        kind: EntityKind,
        id: String,
        data: Value,
    ) -> Result<(), AppError> {
        let mut payload = match data.clone() {
            Value::Object(map) => map,
            _ => {
                return Err(AppError::Validation(
                    "Entity data must be a JSON object".to_string(),
                ));
            }
        };
        payload.insert("id".to_string(), Value::String(id.clone()));

        self.store
            .put_entity(CachedEntity::new(kind.clone(), id, data, false))
            .await?;
        self.store
            .append_action(PendingActionDraft::new(
                ActionKind::Update,
                kind,
                Value::Object(payload),
            ))
            .await?;

        Ok(())
    }
}
