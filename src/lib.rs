//! Offline-first data core for a field-service app: a durable local store,
//! a TTL query cache, pending-action and photo queues, and a sync manager
//! that drains them when connectivity returns.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use shared::config::AppConfig;
pub use shared::error::{AppError, Result};
pub use state::OfflineCore;
