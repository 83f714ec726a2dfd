//! Versioned document corpus
//!
//! Access to the external corpus of consolidated legal texts: a provider
//! trait with its HTTP implementation, a bounded body cache, and the
//! sanitizer every fetched body passes through before rendering.

pub mod cache;
pub mod client;
pub mod sanitize;
pub mod types;

use std::sync::Arc;

use tracing::debug;

pub use cache::{BodyCache, CacheStats};
pub use client::{CorpusProvider, HttpCorpusClient};
pub use sanitize::sanitize_body;
pub use types::{CorpusError, DocumentKey, FormattedBody};

/// Cached, sanitizing front over a [`CorpusProvider`].
#[derive(Clone)]
pub struct CorpusService {
    provider: Arc<dyn CorpusProvider>,
    cache: BodyCache,
}

impl CorpusService {
    pub fn new(provider: Arc<dyn CorpusProvider>, cache: BodyCache) -> Self {
        Self { provider, cache }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch one document version, serving repeats from the cache.
    /// Bodies are sanitized once, before caching.
    pub async fn get(&self, key: &DocumentKey) -> Result<FormattedBody, CorpusError> {
        if let Some(found) = self.cache.get(key).await {
            debug!(document = %key, "corpus cache hit");
            return Ok(found);
        }

        let mut fetched = self.provider.fetch(&key.id, key.as_of).await?;
        fetched.body = sanitize_body(&fetched.body)?;
        debug!(document = %key, bytes = fetched.body.len(), "corpus fetch");

        self.cache.put(key.clone(), fetched.clone()).await;
        Ok(fetched)
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}
