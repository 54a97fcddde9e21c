pub mod mappers;
pub mod rows;
pub mod sqlite_store;

pub use sqlite_store::SqliteOfflineStore;
