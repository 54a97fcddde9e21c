use crate::domain::value_objects::{ActionKind, EntityKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A mutation recorded while the remote store was unreachable. Immutable
/// once queued; removed only after the remote confirms the replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAction {
    /// Monotonically increasing queue position. Replay order.
    pub id: i64,
    pub kind: ActionKind,
    pub entity: EntityKind,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

/// A pending action before the store assigns its queue position.
#[derive(Debug, Clone)]
pub struct PendingActionDraft {
    pub kind: ActionKind,
    pub entity: EntityKind,
    pub payload: Value,
}

impl PendingActionDraft {
    pub fn new(kind: ActionKind, entity: EntityKind, payload: Value) -> Self {
        Self {
            kind,
            entity,
            payload,
        }
    }
}

/// Extracts the remote row identifier an update/delete payload must carry.
pub fn payload_row_id(payload: &Value) -> Option<&str> {
    payload.get("id").and_then(Value::as_str)
}
