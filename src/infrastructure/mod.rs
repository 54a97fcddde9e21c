pub mod database;
pub mod network;
pub mod offline;
