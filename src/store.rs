//! # KV Store Module
//!
//! A process-wide key-value store shared by every request handler for the
//! lifetime of one runtime instance. Values are JSON values, so scripts
//! can round-trip strings, numbers, and structured data without a schema.
//!
//! Concurrency: the store sits on a sharded concurrent map, so each
//! operation is mutually exclusive with every other operation touching
//! the same key. [`KvStore::incr`] performs its read-modify-write under
//! the entry lock; concurrent increments never lose updates.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Shared key-value store owned by the runtime instance.
///
/// There is no per-request isolation: all handlers observe the same
/// mapping. The store is only ever mutated through the operations below
/// and is cleared wholesale by [`KvStore::clear`].
#[derive(Debug, Default)]
pub struct KvStore {
    map: DashMap<String, Value>,
}

impl KvStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key`, overwriting unconditionally.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        debug!(target: "mockd::store", key = %key, "store set");
        self.map.insert(key, value.into());
    }

    /// Fetch the value stored under `key`.
    ///
    /// Returns `None` when the key is absent. A stored JSON `null` comes
    /// back as `Some(Value::Null)`, distinguishable from absence.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    /// Remove `key` if present. Removing an absent key is a no-op.
    ///
    /// Returns `true` if an entry was removed.
    pub fn del(&self, key: &str) -> bool {
        let removed = self.map.remove(key).is_some();
        debug!(target: "mockd::store", key = %key, removed, "store del");
        removed
    }

    /// Increment the integer stored under `key` and return the new value.
    ///
    /// An absent key is treated as 0, so the first increment yields 1.
    /// A present non-integer value fails with [`Error::TypeMismatch`] and
    /// leaves the entry untouched. The read-modify-write happens under
    /// the entry lock; no increments are lost under concurrency.
    pub fn incr(&self, key: &str) -> Result<i64> {
        match self.map.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let current = entry.get().as_i64().ok_or_else(|| Error::TypeMismatch {
                    key: key.to_string(),
                })?;
                let next = current + 1;
                entry.insert(Value::from(next));
                Ok(next)
            }
            Entry::Vacant(entry) => {
                entry.insert(Value::from(1));
                Ok(1)
            }
        }
    }

    /// Remove every entry unconditionally.
    pub fn clear(&self) {
        debug!(target: "mockd::store", entries = self.map.len(), "store clear");
        self.map.clear();
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
