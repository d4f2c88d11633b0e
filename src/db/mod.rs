use std::sync::{Arc, Mutex};

pub mod memory;
pub mod models;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use models::Match;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("match store lock poisoned")]
    Poisoned,
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Holds the current set of match records, keyed by fixture identity.
///
/// Lookups only use the (home, away) pair of the given match; scores and
/// timestamps on the argument are ignored.
pub trait MatchStore: Send {
    /// Insert or replace the record with the same identity.
    fn save(&mut self, game: Match) -> Result<Match, StoreError>;

    fn delete(&mut self, game: &Match) -> Result<(), StoreError>;

    fn delete_all(&mut self) -> Result<(), StoreError>;

    fn find_by_identity(&self, game: &Match) -> Result<Option<Match>, StoreError>;

    /// All records, in no particular order.
    fn list_all(&self) -> Result<Vec<Match>, StoreError>;

    /// Human-readable backend name for logging.
    fn name(&self) -> &str;
}

/// Thread-safe handle to a store (single store behind a mutex).
///
/// Every operation that reads several records and then writes one must run
/// inside a single `with_exclusive_access` call.
pub struct SharedStore<S> {
    inner: Arc<Mutex<S>>,
}

impl<S: MatchStore> SharedStore<S> {
    pub fn new(store: S) -> Self {
        SharedStore {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` with the store locked for the whole closure.
    pub fn with_exclusive_access<T, E>(&self, f: impl FnOnce(&mut S) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut store = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        f(&mut *store)
    }
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        SharedStore {
            inner: Arc::clone(&self.inner),
        }
    }
}
