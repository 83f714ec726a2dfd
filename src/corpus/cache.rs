//! Fetched-body cache
//!
//! Bounded LRU over (document id, as-of date) so re-renders of the same
//! version do not hit the upstream provider again. Uses
//! `tokio::sync::RwLock` for async-safe access.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::RwLock;

use super::types::{DocumentKey, FormattedBody};

const DEFAULT_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct BodyCache {
    inner: Arc<RwLock<CacheInner>>,
}

struct CacheInner {
    entries: LruCache<DocumentKey, FormattedBody>,
    hits: u64,
    misses: u64,
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

impl BodyCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap());
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            })),
        }
    }

    pub async fn get(&self, key: &DocumentKey) -> Option<FormattedBody> {
        let mut inner = self.inner.write().await;
        match inner.entries.get(key).cloned() {
            Some(body) => {
                inner.hits += 1;
                Some(body)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    pub async fn put(&self, key: DocumentKey, body: FormattedBody) {
        let mut inner = self.inner.write().await;
        inner.entries.put(key, body);
    }

    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.read().await;
        CacheStats {
            entries: inner.entries.len(),
            capacity: inner.entries.cap().get(),
            hits: inner.hits,
            misses: inner.misses,
        }
    }

    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
    }
}

impl Default for BodyCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
