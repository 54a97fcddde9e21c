use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct EntityRow {
    pub kind: String,
    pub id: String,
    pub data: String,
    pub synced: bool,
    pub updated_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct CacheEntryRow {
    pub key: String,
    pub data: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct PendingActionRow {
    pub id: i64,
    pub kind: String,
    pub entity: String,
    pub payload: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct PhotoRow {
    pub id: String,
    pub job_id: String,
    pub bytes: Vec<u8>,
    pub kind: String,
    pub caption: Option<String>,
    pub synced: bool,
    pub created_at: i64,
}
