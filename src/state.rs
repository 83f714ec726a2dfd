//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::assist::AssistService;
use crate::config::Config;
use crate::corpus::CorpusService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pub config: Config,
    pub db: SqlitePool,
    pub corpus: CorpusService,
    pub assist: AssistService,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config, db: SqlitePool, corpus: CorpusService, assist: AssistService) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                corpus,
                assist,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the corpus service
    pub fn corpus(&self) -> &CorpusService {
        &self.inner.corpus
    }

    /// Get the assist service
    pub fn assist(&self) -> &AssistService {
        &self.inner.assist
    }
}
