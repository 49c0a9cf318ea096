use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use search_core::UnifiedResult;
use search_logging::search_trace;

use crate::{FetchError, SearchSource, SourceRequest};

/// Key/value memo whose entries expire `ttl` after insertion.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, V)>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_at(key.into(), value, Instant::now());
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.lock();
        let (stored, value) = entries.get(key)?;
        if now.duration_since(*stored) < self.ttl {
            return Some(value.clone());
        }
        entries.remove(key);
        None
    }

    fn set_at(&self, key: String, value: V, now: Instant) {
        let mut entries = self.lock();
        let ttl = self.ttl;
        entries.retain(|_, (stored, _)| now.duration_since(*stored) < ttl);
        entries.insert(key, (now, value));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (Instant, V)>> {
        // A poisoned memo is still a valid memo.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Memoizes another source's results per query.
///
/// History-saving requests always reach the inner source so the backend
/// records them; their results still refresh the memo.
pub struct CachedSource<S> {
    inner: S,
    cache: TtlCache<Vec<UnifiedResult>>,
}

impl<S: SearchSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }
}

#[async_trait::async_trait]
impl<S: SearchSource> SearchSource for CachedSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn records_history(&self) -> bool {
        self.inner.records_history()
    }

    async fn search(&self, request: &SourceRequest<'_>) -> Result<Vec<UnifiedResult>, FetchError> {
        let bypass = request.save_history && self.inner.records_history();
        if !bypass {
            if let Some(hit) = self.cache.get(request.query) {
                search_trace!("cache hit source={} query={}", self.inner.name(), request.query);
                return Ok(hit);
            }
        }

        let results = self.inner.search(request).await?;
        self.cache.set(request.query, results.clone());
        Ok(results)
    }
}
