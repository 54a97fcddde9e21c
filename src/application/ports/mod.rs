pub mod connectivity;
pub mod offline_store;
pub mod remote;

pub use connectivity::Connectivity;
pub use offline_store::OfflineStore;
pub use remote::{QueryFilter, RemoteBlobStorage, RemoteDataSource};
