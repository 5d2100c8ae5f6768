#![forbid(unsafe_code)]

use crate::config::DEFAULT_MAX_BODY_BYTES;
use std::path::{Path, PathBuf};
use tissue_storage::{SqliteStore, StoreError};

/// Shared by all workers. Holds no connection: each request opens its own
/// store handle through [`AppState::open_store`] and drops it when done.
#[derive(Clone, Debug)]
pub struct AppState {
    database: PathBuf,
    body_limit: usize,
}

impl AppState {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            body_limit: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    /// Largest request body a handler will buffer.
    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    pub fn database(&self) -> &Path {
        &self.database
    }

    pub fn open_store(&self) -> Result<SqliteStore, StoreError> {
        SqliteStore::open(&self.database)
    }
}
