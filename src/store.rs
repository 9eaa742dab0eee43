//! Store Module
//!
//! The embedded database instance that owns all records and indices.
//!
//! ## Responsibilities
//! - Own the ordered record set and the index registry
//! - Arbitrate transactions: one writer, many readers
//! - Commit or roll back every write transaction atomically
//! - Keep every index consistent with committed state
//!
//! ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
//!
//! - **`update`**: takes the write half of one `parking_lot::RwLock` for
//!   the whole closure. Mutations land in place; a rollback journal of
//!   (key, previous value) pairs undoes them on error or panic. Readers
//!   cannot take the lock mid-transaction, so intermediate state is
//!   never observable.
//! - **`view`**: takes the read half for the whole closure. Any number
//!   of views run concurrently; each sees the committed state as of its
//!   start, unchanged until it returns.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::{Extractor, Index};
use crate::tx::Tx;

/// The embedded key-value store
///
/// In-memory only: [`Config::MEMORY_PATH`] is the sole supported
/// location, and nothing survives process exit.
pub struct Store {
    /// Records, indices, and the closed flag, behind one lock
    inner: RwLock<Inner>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Open a store with the given config
    ///
    /// Only the in-memory sentinel path is supported; any other path is
    /// recognized as a request for durable storage and refused.
    pub fn open(config: Config) -> Result<Self> {
        if !config.is_memory() {
            return Err(Error::PersistenceUnsupported(config.path));
        }

        tracing::debug!("opened in-memory store");

        Ok(Self {
            inner: RwLock::new(Inner::new()),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses a default config with the specified location
    pub fn open_path(path: &str) -> Result<Self> {
        Self::open(Config::builder().path(path).build())
    }

    /// Close the store
    ///
    /// Releases record and index storage. Every subsequent operation,
    /// including a second close, fails with [`Error::Closed`].
    pub fn close(&self) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.closed {
            return Err(Error::Closed);
        }

        inner.closed = true;
        inner.records = BTreeMap::new();
        inner.indexes = BTreeMap::new();

        tracing::debug!("store closed");
        Ok(())
    }

    /// Run a read-write transaction
    ///
    /// The closure's mutations commit if it returns `Ok`. If it returns
    /// `Err` or panics, everything rolls back atomically, indices
    /// included. The closure's error is surfaced to the caller
    /// unchanged; a panic is resumed after rollback.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Tx) -> Result<T>,
    {
        let mut guard = self.inner.write();
        if guard.closed {
            return Err(Error::Closed);
        }

        let mut tx = Tx::write(&mut guard);
        match panic::catch_unwind(AssertUnwindSafe(|| f(&mut tx))) {
            // Commit: mutations are already in place, discard the journal
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                tracing::debug!("update aborted, rolling back: {}", err);
                tx.rollback();
                Err(err)
            }
            Err(payload) => {
                tracing::warn!("update panicked, rolling back");
                tx.rollback();
                panic::resume_unwind(payload)
            }
        }
    }

    /// Run a read-only transaction
    ///
    /// Does not block other concurrent `view` calls. Mutation methods on
    /// the transaction fail with [`Error::ReadOnly`]; the closure's
    /// result is returned as-is.
    pub fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Tx) -> Result<T>,
    {
        let guard = self.inner.read();
        if guard.closed {
            return Err(Error::Closed);
        }

        let mut tx = Tx::read(&guard);
        f(&mut tx)
    }

    /// Register a named index and build it eagerly
    ///
    /// Existing records whose key matches `pattern` are indexed before
    /// the call returns. Fails with [`Error::DuplicateIndex`] if the
    /// name is taken, leaving the existing index untouched.
    pub fn create_index(&self, name: &str, pattern: &str, extractor: Extractor) -> Result<()> {
        let mut guard = self.inner.write();
        if guard.closed {
            return Err(Error::Closed);
        }
        if guard.indexes.contains_key(name) {
            return Err(Error::DuplicateIndex(name.to_string()));
        }

        let inner = &mut *guard;
        let mut index = Index::new(name, pattern, extractor);
        for (key, value) in &inner.records {
            index.insert(key, value);
        }

        tracing::debug!("index '{}' created over {} entries", index.name(), index.len());
        inner.indexes.insert(name.to_string(), index);
        Ok(())
    }

    /// Remove a named index
    ///
    /// Records are unaffected. Fails with [`Error::IndexNotFound`] for
    /// an unknown name.
    pub fn drop_index(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.closed {
            return Err(Error::Closed);
        }

        match inner.indexes.remove(name) {
            Some(index) => {
                tracing::debug!("index '{}' dropped", index.name());
                Ok(())
            }
            None => Err(Error::IndexNotFound(name.to_string())),
        }
    }

    /// Names of all registered indices, sorted
    pub fn index_names(&self) -> Result<Vec<String>> {
        let inner = self.inner.read();
        if inner.closed {
            return Err(Error::Closed);
        }

        Ok(inner.indexes.keys().cloned().collect())
    }
}

// =============================================================================
// Inner State
// =============================================================================

/// Record set and index registry, guarded by the store's lock
pub(crate) struct Inner {
    /// Ordered records: key → value
    records: BTreeMap<String, String>,

    /// Registered indices by name
    indexes: BTreeMap<String, Index>,

    /// Set once by `close`; checked by every operation
    closed: bool,
}

impl Inner {
    fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            indexes: BTreeMap::new(),
            closed: false,
        }
    }

    /// Insert or overwrite a record, keeping every index in step
    ///
    /// Returns the previous value. This and `delete_record` are the only
    /// two mutation primitives; forward application and rollback both go
    /// through them, so index maintenance stays symmetric.
    pub(crate) fn set_record(&mut self, key: &str, value: &str) -> Option<String> {
        let prev = self.records.insert(key.to_string(), value.to_string());

        for index in self.indexes.values_mut() {
            if let Some(old) = prev.as_deref() {
                index.remove(key, old);
            }
            index.insert(key, value);
        }

        prev
    }

    /// Remove a record and its index entries
    ///
    /// Returns the removed value, or `None` if the key was absent.
    pub(crate) fn delete_record(&mut self, key: &str) -> Option<String> {
        let prev = self.records.remove(key)?;

        for index in self.indexes.values_mut() {
            index.remove(key, &prev);
        }

        Some(prev)
    }

    /// Look up a record's value
    pub(crate) fn record(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(String::as_str)
    }

    /// Iterate records in ascending key order
    pub(crate) fn records(
        &self,
    ) -> impl DoubleEndedIterator<Item = (&str, &str)> {
        self.records
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up an index by name
    pub(crate) fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.get(name)
    }

    /// Number of live records
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}
