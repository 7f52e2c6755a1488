use crate::SessionCache;
use crate::error::{ErrorKind, Result};
use crate::key::CacheKey;
use dashmap::DashMap;
use marquee_catalog::Session;
use marquee_catalog::error::Result as CatalogResult;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    expires_at: Instant,
}
impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now <= self.expires_at
    }
}

/// Results of remote calls, kept for a fixed time-to-live.
///
/// Values of any cloneable type can be stored; each hit hands out a clone.
/// Expired entries are never returned and are replaced wholesale on the next
/// miss (or dropped by [`purge_expired`](Self::purge_expired)).
///
/// Identical misses racing each other both run their remote call and the
/// last write wins. All cached calls are idempotent reads, so the duplicate
/// work is harmless.
pub struct ResultCache {
    sessions: Arc<SessionCache>,
    ttl: Duration,
    entries: DashMap<CacheKey, Entry>,
}
impl ResultCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

    pub fn new(sessions: Arc<SessionCache>) -> Self {
        Self {
            sessions,
            ttl: Self::DEFAULT_TTL,
            entries: DashMap::new(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn sessions(&self) -> &Arc<SessionCache> {
        &self.sessions
    }

    fn lookup<T: Clone + 'static>(&self, key: &CacheKey) -> Option<T> {
        let entry = self.entries.get(key)?;
        if !entry.is_live(Instant::now()) {
            return None;
        }
        // A type mismatch (two call sites sharing a key by mistake) is a miss.
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Return the cached value for `key`, or compute it.
    ///
    /// On a miss, a session for `language` is taken from the session cache
    /// and handed to `compute`. A successful result is stored until `now +
    /// ttl`; errors are returned as-is and never stored. Cancellation leaves
    /// the cache untouched.
    ///
    /// # Errors
    /// Everything [`SessionCache::get_session`] can fail with, plus
    /// [`Catalog`](ErrorKind::Catalog) for a failed remote call.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        key: CacheKey,
        language: &str,
        cancel: &CancellationToken,
        compute: F,
    ) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = CatalogResult<T>>,
    {
        if let Some(value) = self.lookup::<T>(&key) {
            tracing::debug!(key = %key, "Result cache hit");
            return Ok(value);
        }
        tracing::debug!(key = %key, "Result cache miss");

        let session = self.sessions.get_session(language, cancel).await?;
        let value = tokio::select! {
            biased;
            _ = cancel.cancelled() => exn::bail!(ErrorKind::Cancelled),
            result = compute(session) => result.map_err(ErrorKind::catalog)?,
        };
        let entry = Entry {
            value: Arc::new(value.clone()),
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.insert(key, entry);
        Ok(value)
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_catalog::client::{Call, MockCatalog};
    use marquee_catalog::error::ErrorKind as CatalogErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache(client: &Arc<MockCatalog>) -> ResultCache {
        let sessions = SessionCache::new(client.clone(), Some("api-key".to_string()));
        ResultCache::new(Arc::new(sessions))
    }

    async fn counted(
        cache: &ResultCache,
        key: &str,
        calls: &AtomicUsize,
        cancel: &CancellationToken,
    ) -> Result<String> {
        cache
            .get_or_compute(CacheKey::new(key), "en", cancel, |session| async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(format!("{}#{n}", session.language))
            })
            .await
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_hit_then_expiry() {
        let client = Arc::new(MockCatalog::default());
        let results = cache(&client);
        let calls = AtomicUsize::new(0);
        let cancel = CancellationToken::new();

        assert_eq!(counted(&results, "op", &calls, &cancel).await.unwrap(), "en#1");
        tokio::time::advance(Duration::from_secs(59 * 60)).await;
        assert_eq!(counted(&results, "op", &calls, &cancel).await.unwrap(), "en#1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(counted(&results, "op", &calls, &cancel).await.unwrap(), "en#2");
        assert_eq!(counted(&results, "op", &calls, &cancel).await.unwrap(), "en#2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_hit_does_not_touch_sessions() {
        let client = Arc::new(MockCatalog::default());
        let results = cache(&client);
        let calls = AtomicUsize::new(0);
        let cancel = CancellationToken::new();
        counted(&results, "op", &calls, &cancel).await.unwrap();
        results.sessions().invalidate("en").await;
        counted(&results, "op", &calls, &cancel).await.unwrap();
        assert_eq!(client.calls(Call::Login), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_are_independent() {
        let client = Arc::new(MockCatalog::default());
        let results = cache(&client);
        let calls = AtomicUsize::new(0);
        let cancel = CancellationToken::new();
        counted(&results, "a", &calls, &cancel).await.unwrap();
        counted(&results, "b", &calls, &cancel).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let client = Arc::new(MockCatalog::default());
        let results = cache(&client);
        let cancel = CancellationToken::new();
        let err = results
            .get_or_compute(CacheKey::new("op"), "en", &cancel, |_| async {
                Err::<u32, _>(exn::Exn::from(CatalogErrorKind::remote(503, "unavailable")))
            })
            .await
            .unwrap_err();
        assert!(matches!(&*err, ErrorKind::Catalog(CatalogErrorKind::RemoteService { status: 503, .. })));
        assert!(results.is_empty());

        let value = results.get_or_compute(CacheKey::new("op"), "en", &cancel, |_| async { Ok(7u32) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stores_nothing() {
        let client = Arc::new(MockCatalog::default());
        let results = cache(&client);
        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });
        let err = results
            .get_or_compute(CacheKey::new("slow"), "en", &cancel, |_| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(1u32)
            })
            .await
            .unwrap_err();
        assert_eq!(*err, ErrorKind::Cancelled);
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_session_failure_skips_compute() {
        let client = Arc::new(MockCatalog::default());
        let results = ResultCache::new(Arc::new(SessionCache::new(client.clone(), None)));
        let calls = AtomicUsize::new(0);
        let err = counted(&results, "op", &calls, &CancellationToken::new()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::MissingApiKey);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    // Accepted relaxation: racing identical misses each run the remote call.
    #[tokio::test(start_paused = true)]
    async fn test_concurrent_misses_both_compute() {
        let client = Arc::new(MockCatalog::default());
        let results = cache(&client);
        let calls = &AtomicUsize::new(0);
        let cancel = CancellationToken::new();
        let slow = || {
            results.get_or_compute(CacheKey::new("op"), "en", &cancel, move |_| async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok(n)
            })
        };
        let (first, second) = tokio::join!(slow(), slow());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_ne!(first.unwrap(), second.unwrap());
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_type_mismatch_is_a_miss() {
        let client = Arc::new(MockCatalog::default());
        let results = cache(&client);
        let cancel = CancellationToken::new();
        results.get_or_compute(CacheKey::new("op"), "en", &cancel, |_| async { Ok(1u32) }).await.unwrap();
        let text = results
            .get_or_compute(CacheKey::new("op"), "en", &cancel, |_| async { Ok("one".to_string()) })
            .await
            .unwrap();
        assert_eq!(text, "one");
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let client = Arc::new(MockCatalog::default());
        let results = cache(&client).with_ttl(Duration::from_secs(10));
        let calls = AtomicUsize::new(0);
        let cancel = CancellationToken::new();
        counted(&results, "old", &calls, &cancel).await.unwrap();
        tokio::time::advance(Duration::from_secs(8)).await;
        counted(&results, "new", &calls, &cancel).await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(results.purge_expired(), 1);
        assert_eq!(results.len(), 1);
        results.clear();
        assert!(results.is_empty());
    }
}
