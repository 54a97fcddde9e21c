use crate::domain::value_objects::CacheKey;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// TTL-bounded cache entry keyed by logical query identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub data: Value,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: CacheKey, data: Value, ttl: Duration) -> Self {
        Self {
            key,
            data,
            expires_at: Utc::now() + ttl,
        }
    }

    /// An expired entry is logically absent and must be treated as a miss.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}
