use crate::application::ports::connectivity::Connectivity;
use crate::application::ports::offline_store::OfflineStore;
use crate::application::ports::remote::{QueryFilter, RemoteDataSource};
use crate::domain::entities::CacheEntry;
use crate::domain::value_objects::CacheKey;
use crate::shared::error::AppError;
use chrono::Duration;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Read path of the core: a TTL cache over the durable store plus
/// stale-while-revalidate fetching and the optimistic-update protocol.
pub struct FetchService {
    store: Arc<dyn OfflineStore>,
    connectivity: Arc<dyn Connectivity>,
    default_ttl: Duration,
}

impl FetchService {
    pub fn new(
        store: Arc<dyn OfflineStore>,
        connectivity: Arc<dyn Connectivity>,
        default_ttl_secs: u64,
    ) -> Self {
        Self {
            store,
            connectivity,
            default_ttl: Duration::seconds(default_ttl_secs as i64),
        }
    }

    /// Cache read. Expired entries are treated as a miss and purged by the
    /// store; a miss is `None`, never an error.
    pub async fn get_cached(&self, key: &CacheKey) -> Result<Option<Value>, AppError> {
        let entry = self.store.get_cache_entry(key).await?;
        Ok(entry.map(|e| e.data))
    }

    /// Unconditional overwrite with `expires_at = now + ttl`.
    pub async fn set_cache(&self, key: CacheKey, data: Value, ttl: Duration) -> Result<(), AppError> {
        self.store.put_cache_entry(CacheEntry::new(key, data, ttl)).await
    }

    pub async fn set_cache_default(&self, key: CacheKey, data: Value) -> Result<(), AppError> {
        self.set_cache(key, data, self.default_ttl).await
    }

    /// Drops every cached query whose key starts with `prefix`. Used after a
    /// mutation that affects a whole query family ("jobs-*" after any job
    /// write). Zero matches is a no-op.
    pub async fn invalidate_cache(&self, prefix: &str) -> Result<u64, AppError> {
        self.store.invalidate_prefix(prefix).await
    }

    /// Offline: cached value or a connectivity error. Online: run the remote
    /// query, cache the result under the default TTL, return it; remote
    /// failures propagate as-is (stale data is only acceptable when
    /// genuinely offline). Safe to call concurrently for one key; last
    /// write wins.
    pub async fn fetch_with_cache<Q, QFut>(
        &self,
        key: &CacheKey,
        query: Q,
    ) -> Result<Value, AppError>
    where
        Q: FnOnce() -> QFut,
        QFut: Future<Output = Result<Value, AppError>>,
    {
        if !self.connectivity.is_online() {
            return match self.get_cached(key).await? {
                Some(cached) => Ok(cached),
                None => Err(AppError::Offline(key.to_string())),
            };
        }

        let fresh = query().await?;
        self.set_cache(key.clone(), fresh.clone(), self.default_ttl).await?;
        Ok(fresh)
    }

    /// `fetch_with_cache` over the remote query capability: runs the filtered
    /// table query when online and falls back to the cached row set when
    /// offline. This is the read path the screen-level hooks wrap.
    pub async fn fetch_rows(
        &self,
        key: &CacheKey,
        remote: &dyn RemoteDataSource,
        table: &str,
        filter: &QueryFilter,
    ) -> Result<Value, AppError> {
        self.fetch_with_cache(key, || async move {
            let rows = remote.query(table, filter).await?;
            Ok(Value::Array(rows))
        })
        .await
    }

    /// Optimistic-update protocol: apply the pure `apply` transition to the
    /// cached value and persist it immediately, then await `commit`.
    ///
    /// On success the key is revalidated through `refetch` so server-derived
    /// fields reconcile into the cache. On failure the same revalidation
    /// path reverts the optimistic guess, then the commit error is returned
    /// for the caller to surface. Either way the cache never keeps the
    /// unconfirmed optimistic value past this call: if the revert refetch
    /// itself fails, the entry is dropped instead.
    ///
    /// Connectivity is not special-cased here; an offline caller supplies a
    /// `commit` future that redirects into the pending-action queue.
    pub async fn optimistic_update<A, CFut, R, RFut>(
        &self,
        key: &CacheKey,
        apply: A,
        commit: CFut,
        refetch: R,
    ) -> Result<(), AppError>
    where
        A: FnOnce(Option<Value>) -> Value,
        CFut: Future<Output = Result<(), AppError>>,
        R: Fn() -> RFut,
        RFut: Future<Output = Result<Value, AppError>>,
    {
        // Single logical read-modify-write of one record: apply is pure and
        // runs without suspension between the read and the write.
        let current = self.get_cached(key).await?;
        let optimistic = apply(current);
        self.set_cache(key.clone(), optimistic, self.default_ttl).await?;

        match commit.await {
            Ok(()) => {
                match refetch().await {
                    Ok(fresh) => {
                        self.set_cache(key.clone(), fresh, self.default_ttl).await?;
                    }
                    Err(err) => {
                        // Commit landed but revalidation did not; drop the
                        // entry so the next read fetches authoritative state.
                        tracing::warn!(key = %key, error = %err, "revalidation after commit failed");
                        self.store.delete_cache_entry(key).await?;
                    }
                }
                Ok(())
            }
            Err(commit_err) => {
                match refetch().await {
                    Ok(fresh) => {
                        self.set_cache(key.clone(), fresh, self.default_ttl).await?;
                    }
                    Err(_) => {
                        self.store.delete_cache_entry(key).await?;
                    }
                }
                Err(commit_err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::ConnectionPool;
    use crate::infrastructure::offline::SqliteOfflineStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use tokio::sync::watch;

    struct TestConnectivity {
        online: AtomicBool,
        tx: watch::Sender<bool>,
    }

    impl TestConnectivity {
        fn new(online: bool) -> Self {
            let (tx, _rx) = watch::channel(online);
            Self {
                online: AtomicBool::new(online),
                tx,
            }
        }
    }

    impl Connectivity for TestConnectivity {
        fn is_online(&self) -> bool {
            self.online.load(Ordering::SeqCst)
        }

        fn watch_online(&self) -> watch::Receiver<bool> {
            self.tx.subscribe()
        }
    }

    async fn setup(online: bool) -> FetchService {
        let pool = ConnectionPool::from_memory().await.unwrap();
        pool.migrate().await.unwrap();
        let store = Arc::new(SqliteOfflineStore::new(pool.get_pool().clone()));
        FetchService::new(store, Arc::new(TestConnectivity::new(online)), 600)
    }

    fn key(value: &str) -> CacheKey {
        CacheKey::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn offline_read_returns_cached_value_without_hitting_network() {
        let service = setup(false).await;
        service
            .set_cache_default(key("jobs-today"), json!([{"id": "j1"}]))
            .await
            .unwrap();

        let queried = Arc::new(AtomicU32::new(0));
        let counter = queried.clone();
        let value = service
            .fetch_with_cache(&key("jobs-today"), move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(json!("fresh")) }
            })
            .await
            .unwrap();

        assert_eq!(value, json!([{"id": "j1"}]));
        assert_eq!(queried.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn offline_read_without_cache_is_a_connectivity_error() {
        let service = setup(false).await;

        let err = service
            .fetch_with_cache(&key("jobs-today"), || async { Ok(json!("fresh")) })
            .await
            .unwrap_err();

        assert!(err.is_offline());
    }

    #[tokio::test]
    async fn online_read_fetches_and_caches() {
        let service = setup(true).await;

        let value = service
            .fetch_with_cache(&key("jobs-today"), || async { Ok(json!(["fresh"])) })
            .await
            .unwrap();
        assert_eq!(value, json!(["fresh"]));

        // The result is now available to an offline reader.
        assert_eq!(
            service.get_cached(&key("jobs-today")).await.unwrap(),
            Some(json!(["fresh"]))
        );
    }

    #[tokio::test]
    async fn online_query_failure_propagates_without_stale_fallback() {
        let service = setup(true).await;
        service
            .set_cache_default(key("jobs-today"), json!("stale"))
            .await
            .unwrap();

        let err = service
            .fetch_with_cache(&key("jobs-today"), || async {
                Err(AppError::Remote("boom".into()))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Remote(_)));
    }

    #[tokio::test]
    async fn optimistic_update_commits_and_revalidates() {
        let service = setup(true).await;
        service
            .set_cache_default(key("job-j1"), json!({"is_checked": false}))
            .await
            .unwrap();

        service
            .optimistic_update(
                &key("job-j1"),
                |current| {
                    let mut value = current.unwrap();
                    value["is_checked"] = json!(true);
                    value
                },
                async { Ok(()) },
                // Server echoes the write plus a derived field.
                || async { Ok(json!({"is_checked": true, "updated_at": "2026-01-01"})) },
            )
            .await
            .unwrap();

        assert_eq!(
            service.get_cached(&key("job-j1")).await.unwrap(),
            Some(json!({"is_checked": true, "updated_at": "2026-01-01"}))
        );
    }

    #[tokio::test]
    async fn optimistic_update_reverts_on_commit_failure() {
        let service = setup(true).await;
        service
            .set_cache_default(key("job-j1"), json!({"is_checked": false}))
            .await
            .unwrap();

        let err = service
            .optimistic_update(
                &key("job-j1"),
                |current| {
                    let mut value = current.unwrap();
                    value["is_checked"] = json!(true);
                    value
                },
                async { Err(AppError::Remote("constraint violation".into())) },
                || async { Ok(json!({"is_checked": false})) },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Remote(_)));
        // Cache ends equal to a fresh server fetch, not the optimistic guess.
        assert_eq!(
            service.get_cached(&key("job-j1")).await.unwrap(),
            Some(json!({"is_checked": false}))
        );
    }

    #[tokio::test]
    async fn optimistic_guess_never_survives_a_failed_revert() {
        let service = setup(true).await;
        service
            .set_cache_default(key("job-j1"), json!({"is_checked": false}))
            .await
            .unwrap();

        let err = service
            .optimistic_update(
                &key("job-j1"),
                |_| json!({"is_checked": true}),
                async { Err(AppError::Remote("rejected".into())) },
                || async { Err(AppError::Remote("refetch also failed".into())) },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Remote(_)));
        assert_eq!(service.get_cached(&key("job-j1")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalidate_cache_is_prefix_scoped() {
        let service = setup(true).await;
        service.set_cache_default(key("jobs-a"), json!(1)).await.unwrap();
        service.set_cache_default(key("jobs-b"), json!(2)).await.unwrap();
        service.set_cache_default(key("invoices-a"), json!(3)).await.unwrap();

        assert_eq!(service.invalidate_cache("jobs-").await.unwrap(), 2);
        assert_eq!(service.get_cached(&key("invoices-a")).await.unwrap(), Some(json!(3)));
    }
}
