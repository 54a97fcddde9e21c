use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// Equality filter set for a remote query. The remote schema is an external
/// contract; rows and filters stay opaque JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    pub eq: Vec<(String, Value)>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.eq.push((column.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.eq.is_empty()
    }
}

/// Generic query/mutate capability of the hosted database.
#[async_trait]
pub trait RemoteDataSource: Send + Sync {
    async fn query(&self, table: &str, filter: &QueryFilter) -> Result<Vec<Value>, AppError>;
    async fn insert(&self, table: &str, row: &Value) -> Result<(), AppError>;
    async fn update(&self, table: &str, id: &str, patch: &Value) -> Result<(), AppError>;
    async fn delete(&self, table: &str, id: &str) -> Result<(), AppError>;
}

/// Remote binary storage for drained photos.
#[async_trait]
pub trait RemoteBlobStorage: Send + Sync {
    async fn upload(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<(), AppError>;
}
