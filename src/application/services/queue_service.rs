use crate::application::ports::offline_store::OfflineStore;
use crate::domain::entities::{payload_row_id, PendingAction, PendingActionDraft};
use crate::domain::value_objects::{ActionKind, EntityKind};
use crate::shared::error::AppError;
use serde_json::Value;
use std::sync::Arc;

/// Front door of the pending-action queue. This is the only path by which an
/// offline mutation reaches the remote store.
pub struct QueueService {
    store: Arc<dyn OfflineStore>,
}

impl QueueService {
    pub fn new(store: Arc<dyn OfflineStore>) -> Self {
        Self { store }
    }

    /// Appends a mutation. Update/delete payloads must carry the remote row
    /// identifier under `id`; the payload is immutable once queued. Only a
    /// store I/O failure makes this fail.
    pub async fn queue_action(
        &self,
        kind: ActionKind,
        entity: EntityKind,
        payload: Value,
    ) -> Result<PendingAction, AppError> {
        if !payload.is_object() {
            return Err(AppError::Validation(
                "Pending action payload must be a JSON object".to_string(),
            ));
        }
        if kind.requires_row_id() && payload_row_id(&payload).is_none() {
            return Err(AppError::Validation(format!(
                "{kind} action for {entity} must carry a string `id` field"
            )));
        }

        let action = self
            .store
            .append_action(PendingActionDraft::new(kind, entity, payload))
            .await?;

        tracing::debug!(id = action.id, kind = %action.kind, entity = %action.entity, "queued action");
        Ok(action)
    }

    /// All queued actions in replay (enqueue) order.
    pub async fn pending_actions(&self) -> Result<Vec<PendingAction>, AppError> {
        self.store.pending_actions().await
    }

    /// Caller contract: only after the remote confirmed the mutation.
    pub async fn clear_pending_action(&self, id: i64) -> Result<(), AppError> {
        self.store.remove_action(id).await
    }
}
