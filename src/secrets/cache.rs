//! In-process secret cache.
//!
//! A single [`Mutex`] guards the whole map, so every get, put, and delete is
//! serialized against every other one regardless of key. Entries never expire;
//! they live until deleted or until the owning vault is dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::value::SecretValue;

/// Mutex-serialized name to value map.
#[derive(Default)]
pub struct LocalSecretCache {
    entries: Mutex<HashMap<String, SecretValue>>,
}

impl LocalSecretCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    // Each operation leaves the map consistent before it can panic, so a
    // poisoned lock still guards valid data.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, SecretValue>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the value stored under `name`, or `None` on a miss.
    pub fn get(&self, name: &str) -> Option<SecretValue> {
        self.lock().get(name).cloned()
    }

    /// Stores `value` under `name`, returning the value it replaced.
    pub fn put(&self, name: impl Into<String>, value: SecretValue) -> Option<SecretValue> {
        self.lock().insert(name.into(), value)
    }

    /// Removes `name`, returning the removed value. Absent names are a no-op.
    pub fn delete(&self, name: &str) -> Option<SecretValue> {
        self.lock().remove(name)
    }

    /// Whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl fmt::Debug for LocalSecretCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSecretCache").field("entries", &self.len()).finish()
    }
}
