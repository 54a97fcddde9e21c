use crate::application::ports::{Connectivity, OfflineStore, RemoteBlobStorage, RemoteDataSource};
use crate::application::services::{
    EntityService, FetchService, PhotoService, QueueService, SyncService, SyncTaskGuard,
};
use crate::infrastructure::database::ConnectionPool;
use crate::infrastructure::network::ConnectionMonitor;
use crate::infrastructure::offline::SqliteOfflineStore;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;

/// Fully wired offline core. The application shell builds one of these at
/// startup, hands `monitor` to whatever reports connectivity, and calls the
/// services from its command handlers.
pub struct OfflineCore {
    config: AppConfig,
    pool: ConnectionPool,
    pub monitor: Arc<ConnectionMonitor>,
    pub fetch: FetchService,
    pub entities: EntityService,
    pub queue: QueueService,
    pub photos: PhotoService,
    pub sync: Arc<SyncService>,
}

impl OfflineCore {
    /// Opens the local database, runs migrations, and wires every service
    /// against the given remote backends. Starts in the online state; the
    /// shell reports the real state via `monitor` as soon as it knows it.
    pub async fn new(
        config: AppConfig,
        remote: Arc<dyn RemoteDataSource>,
        blobs: Arc<dyn RemoteBlobStorage>,
    ) -> Result<Self, AppError> {
        config.validate().map_err(AppError::Config)?;

        let pool = ConnectionPool::new(&config.database.url, config.database.max_connections).await?;
        pool.migrate().await?;

        let store: Arc<dyn OfflineStore> =
            Arc::new(SqliteOfflineStore::new(pool.get_pool().clone()));
        let monitor = Arc::new(ConnectionMonitor::new(true));
        let connectivity: Arc<dyn Connectivity> = monitor.clone();

        let fetch = FetchService::new(
            store.clone(),
            connectivity.clone(),
            config.cache.default_ttl_secs,
        );
        let entities = EntityService::new(store.clone());
        let queue = QueueService::new(store.clone());
        let photos = PhotoService::new(store.clone());
        let sync = Arc::new(SyncService::new(
            store,
            remote,
            blobs,
            connectivity,
            config.storage.photo_bucket.clone(),
        ));

        Ok(Self {
            config,
            pool,
            monitor,
            fetch,
            entities,
            queue,
            photos,
            sync,
        })
    }

    /// Background sync triggers per the configuration: a reconnect-driven
    /// pass when auto-sync is on, plus a periodic pass when an interval is
    /// set. Dropping the guards stops both.
    pub fn start_background_sync(&self) -> Vec<SyncTaskGuard> {
        let mut guards = Vec::new();
        if self.config.sync.auto_sync {
            guards.push(self.sync.spawn_on_reconnect());
        }
        if self.config.sync.sync_interval > 0 {
            guards.push(self.sync.spawn_periodic(self.config.sync.sync_interval));
        }
        guards
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub async fn shutdown(&self) {
        self.pool.close().await;
    }
}
