// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Thread-safe key to channel map backing the open groups.
//!
//! Lookups and insertions share one short critical section, so the factory
//! runs only on the winning path and exactly one caller observes
//! `created == true` per open episode of a key.

use crate::comparer::{ComparedKey, KeyComparer};
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// Concurrent map from key to group channel.
pub struct KeyedRegistry<K, V> {
    comparer: Arc<dyn KeyComparer<K>>,
    entries: Mutex<HashMap<ComparedKey<K>, V>>,
}

impl<K: Clone + 'static, V: Clone> KeyedRegistry<K, V> {
    pub fn new(comparer: Arc<dyn KeyComparer<K>>) -> Self {
        Self {
            comparer,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the entry for `key`, inserting `factory()` if absent.
    ///
    /// The flag is `true` only for the caller whose value was inserted.
    /// `factory` runs while the registry is locked and must not touch it.
    pub fn get_or_create<F>(&self, key: K, factory: F) -> (V, bool)
    where
        F: FnOnce() -> V,
    {
        let mut entries = self.entries.lock();
        match entries.entry(ComparedKey::new(key, self.comparer.clone())) {
            Entry::Occupied(entry) => (entry.get().clone(), false),
            Entry::Vacant(entry) => {
                let value = factory();
                entry.insert(value.clone());
                (value, true)
            }
        }
    }

    /// Remove the entry for `key`; `false` if there was none.
    pub fn remove(&self, key: &K) -> bool {
        let lookup = ComparedKey::new(key.clone(), self.comparer.clone());
        self.entries.lock().remove(&lookup).is_some()
    }

    /// Point-in-time copy of every registered value.
    pub fn snapshot_values(&self) -> Vec<V> {
        self.entries.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
