use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub sync: SyncConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Default TTL for query-cache entries, in seconds. Short on purpose:
    /// job stages and checklist state change often, so freshness beats hit
    /// rate.
    pub default_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Drain the pending queue automatically on reconnect.
    pub auto_sync: bool,
    /// Interval for periodic sync passes, in seconds. 0 disables the timer;
    /// reconnect-triggered passes still run.
    pub sync_interval: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Remote bucket that receives drained job photos.
    pub photo_bucket: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:data/fieldsync.db".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            cache: CacheConfig {
                default_ttl_secs: 600, // 10 minutes
            },
            sync: SyncConfig {
                auto_sync: true,
                sync_interval: 300, // 5 minutes
            },
            storage: StorageConfig {
                photo_bucket: "job-photos".to_string(),
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("FIELDSYNC_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v;
            }
        }
        if let Ok(v) = std::env::var("FIELDSYNC_CACHE_TTL_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.cache.default_ttl_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("FIELDSYNC_AUTO_SYNC") {
            cfg.sync.auto_sync = parse_bool(&v, cfg.sync.auto_sync);
        }
        if let Ok(v) = std::env::var("FIELDSYNC_SYNC_INTERVAL") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.sync_interval = value;
            }
        }
        if let Ok(v) = std::env::var("FIELDSYNC_PHOTO_BUCKET") {
            if !v.trim().is_empty() {
                cfg.storage.photo_bucket = v;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.database.url.trim().is_empty() {
            return Err("Database url cannot be empty".to_string());
        }
        if self.cache.default_ttl_secs == 0 {
            return Err("Cache default_ttl_secs must be greater than 0".to_string());
        }
        if self.storage.photo_bucket.trim().is_empty() {
            return Err("Storage photo_bucket cannot be empty".to_string());
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
