//! Transaction Module
//!
//! The only sanctioned way to read and write records.
//!
//! ## Responsibilities
//! - Expose get/set/delete and ordered iteration within one lock scope
//! - Enforce the read-only/read-write mode structurally
//! - Journal every mutation so the store can roll back on any exit path
//!
//! A transaction never outlives the `update`/`view` call that created
//! it; the borrow on the store's inner state guarantees that statically.

use crate::error::{Error, Result};
use crate::index::Projection;
use crate::store::Inner;

/// A scoped read-only or read-write operation context
///
/// Handed by reference to the closure passed to
/// [`Store::update`](crate::Store::update) (writable) or
/// [`Store::view`](crate::Store::view) (read-only).
pub struct Tx<'a> {
    access: Access<'a>,
}

/// Access mode, carrying the matching borrow of the store state
///
/// Read-only transactions hold a shared borrow, so mutation is ruled
/// out below the API surface as well: `set` and `delete` report
/// [`Error::ReadOnly`] without ever reaching the record set.
enum Access<'a> {
    Read(&'a Inner),
    Write {
        inner: &'a mut Inner,
        journal: Vec<JournalEntry>,
    },
}

/// One rollback step: restore `key` to `prev` (`None` = absent)
struct JournalEntry {
    key: String,
    prev: Option<String>,
}

impl<'a> Tx<'a> {
    /// Read-only transaction over a shared borrow
    pub(crate) fn read(inner: &'a Inner) -> Self {
        Self {
            access: Access::Read(inner),
        }
    }

    /// Read-write transaction with an empty journal
    pub(crate) fn write(inner: &'a mut Inner) -> Self {
        Self {
            access: Access::Write {
                inner,
                journal: Vec::new(),
            },
        }
    }

    /// Undo every journaled mutation, newest first
    ///
    /// Replays through the same primitives as forward application, so
    /// indices are restored along with the records.
    pub(crate) fn rollback(self) {
        if let Access::Write { inner, journal } = self.access {
            for entry in journal.into_iter().rev() {
                match entry.prev {
                    Some(prev) => {
                        inner.set_record(&entry.key, &prev);
                    }
                    None => {
                        inner.delete_record(&entry.key);
                    }
                }
            }
        }
    }

    fn inner(&self) -> &Inner {
        match &self.access {
            Access::Read(inner) => inner,
            Access::Write { inner, .. } => inner,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get the value for a key
    ///
    /// Fails with [`Error::NotFound`] if the key is absent. Within a
    /// write transaction, pending writes are visible.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.inner().record(key).ok_or(Error::NotFound)
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.inner().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit records in ascending order
    ///
    /// With `index == ""`, order is ascending by key; otherwise by the
    /// named index's projection, key as tie-break. Iteration stops when
    /// the visitor returns `false`. Fails with [`Error::IndexNotFound`]
    /// for an unknown index name.
    pub fn ascend<F>(&self, index: &str, visitor: F) -> Result<()>
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.scan(index, false, visitor)
    }

    /// Visit records in descending order
    ///
    /// The exact reverse of [`Tx::ascend`] under the same index.
    pub fn descend<F>(&self, index: &str, visitor: F) -> Result<()>
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.scan(index, true, visitor)
    }

    fn scan<F>(&self, index: &str, reverse: bool, mut visitor: F) -> Result<()>
    where
        F: FnMut(&str, &str) -> bool,
    {
        let inner = self.inner();

        if index.is_empty() {
            let iter: Box<dyn Iterator<Item = (&str, &str)> + '_> = if reverse {
                Box::new(inner.records().rev())
            } else {
                Box::new(inner.records())
            };
            for (key, value) in iter {
                if !visitor(key, value) {
                    break;
                }
            }
            return Ok(());
        }

        let idx = inner
            .index(index)
            .ok_or_else(|| Error::IndexNotFound(index.to_string()))?;

        let iter: Box<dyn Iterator<Item = &(Projection, String)> + '_> = if reverse {
            Box::new(idx.iter().rev())
        } else {
            Box::new(idx.iter())
        };
        for (_, key) in iter {
            // Indices never reference a missing record; the lookup is the
            // value fetch, not an existence probe.
            if let Some(value) = inner.record(key) {
                if !visitor(key, value) {
                    break;
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert or overwrite a record
    ///
    /// Returns the previous value and whether one was replaced. Every
    /// matching index is updated before this returns; the mutation
    /// becomes visible to other transactions only at commit. Fails with
    /// [`Error::ReadOnly`] inside a view.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(Option<String>, bool)> {
        match &mut self.access {
            Access::Read(_) => Err(Error::ReadOnly),
            Access::Write { inner, journal } => {
                let prev = inner.set_record(key, value);
                journal.push(JournalEntry {
                    key: key.to_string(),
                    prev: prev.clone(),
                });

                let replaced = prev.is_some();
                Ok((prev, replaced))
            }
        }
    }

    /// Remove a record
    ///
    /// Returns the removed value. Fails with [`Error::NotFound`] if the
    /// key is absent and [`Error::ReadOnly`] inside a view.
    pub fn delete(&mut self, key: &str) -> Result<String> {
        match &mut self.access {
            Access::Read(_) => Err(Error::ReadOnly),
            Access::Write { inner, journal } => match inner.delete_record(key) {
                Some(prev) => {
                    journal.push(JournalEntry {
                        key: key.to_string(),
                        prev: Some(prev.clone()),
                    });
                    Ok(prev)
                }
                None => Err(Error::NotFound),
            },
        }
    }
}
