use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Local store I/O failure. Fatal for the operation in progress; callers
    /// must not swallow it since silent failure here means data loss.
    #[error("Database error: {0}")]
    Database(String),

    /// Online-only operation attempted while offline with no cached fallback.
    #[error("Offline and no cached data available: {0}")]
    Offline(String),

    /// The remote authority rejected a query or mutation. Propagated verbatim.
    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for the connectivity error the fetch layer raises when offline
    /// with an empty cache. UI shells branch on this to show an offline
    /// banner instead of a generic failure.
    pub fn is_offline(&self) -> bool {
        matches!(self, AppError::Offline(_))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Internal(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
