//! Process-wide cache for the ceremony list.
//!
//! Owned by `AppState`; ceremony writes call [`CatalogCache::invalidate`]
//! and shutdown calls [`CatalogCache::clear`].

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct Entry<T> {
    loaded_at: Instant,
    items: Arc<Vec<T>>,
}

pub struct CatalogCache<T> {
    inner: Arc<RwLock<Option<Entry<T>>>>,
    ttl: Duration,
}

impl<T> Clone for CatalogCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            ttl: self.ttl,
        }
    }
}

impl<T> CatalogCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached list while it is fresh, otherwise runs `load`
    /// and stores its result. Load errors are returned and nothing is cached.
    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<Arc<Vec<T>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        if let Some(items) = self.fresh(&*self.inner.read().await) {
            return Ok(items);
        }

        let mut guard = self.inner.write().await;
        // another request may have refilled it while we waited
        if let Some(items) = self.fresh(&guard) {
            return Ok(items);
        }

        let items = Arc::new(load().await?);
        *guard = Some(Entry {
            loaded_at: Instant::now(),
            items: Arc::clone(&items),
        });
        tracing::debug!(count = items.len(), "Catalog cache refreshed");

        Ok(items)
    }

    pub async fn invalidate(&self) {
        if self.inner.write().await.take().is_some() {
            tracing::debug!("Catalog cache invalidated");
        }
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    fn fresh(&self, entry: &Option<Entry<T>>) -> Option<Arc<Vec<T>>> {
        entry
            .as_ref()
            .filter(|e| e.loaded_at.elapsed() < self.ttl)
            .map(|e| Arc::clone(&e.items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn load_counting(
        cache: &CatalogCache<u32>,
        calls: &AtomicUsize,
    ) -> Result<Arc<Vec<u32>>, String> {
        cache
            .get_or_load(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![1, 2, 3])
            })
            .await
    }

    #[tokio::test]
    async fn serves_from_cache_within_ttl() {
        let cache = CatalogCache::new(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        load_counting(&cache, &calls).await.unwrap();
        let items = load_counting(&cache, &calls).await.unwrap();

        assert_eq!(*items, vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let cache = CatalogCache::new(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        load_counting(&cache, &calls).await.unwrap();
        cache.invalidate().await;
        load_counting(&cache, &calls).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_entries_are_reloaded() {
        let cache = CatalogCache::new(Duration::from_millis(10));
        let calls = AtomicUsize::new(0);

        load_counting(&cache, &calls).await.unwrap();
        tokio::time::sleep(Duration::from_millis(25)).await;
        load_counting(&cache, &calls).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let cache: CatalogCache<u32> = CatalogCache::new(Duration::from_secs(300));

        let err = cache
            .get_or_load(|| async { Err::<Vec<u32>, _>("db down".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err, "db down");

        let calls = AtomicUsize::new(0);
        load_counting(&cache, &calls).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_empties_the_cache() {
        let cache = CatalogCache::new(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        load_counting(&cache, &calls).await.unwrap();
        cache.clear().await;
        load_counting(&cache, &calls).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
