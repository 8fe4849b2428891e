// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Key equality used by the group registry.
//!
//! A [`KeyComparer`] decides which keys belong to the same group. Comparers
//! must be consistent: keys that compare equal must hash equally.
//!
//! ```
//! use keyflux_group::{KeyComparer, NaturalEq};
//! use std::collections::hash_map::DefaultHasher;
//! use std::hash::Hasher;
//!
//! struct CaseInsensitive;
//!
//! impl KeyComparer<String> for CaseInsensitive {
//!     fn equals(&self, a: &String, b: &String) -> bool {
//!         a.eq_ignore_ascii_case(b)
//!     }
//!
//!     fn hash_key(&self, key: &String, state: &mut dyn Hasher) {
//!         for byte in key.bytes() {
//!             state.write_u8(byte.to_ascii_lowercase());
//!         }
//!     }
//! }
//!
//! assert!(CaseInsensitive.equals(&"Dog".to_string(), &"DOG".to_string()));
//! assert!(!NaturalEq.equals(&"Dog".to_string(), &"DOG".to_string()));
//! ```

use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Equality and hashing for group keys.
pub trait KeyComparer<K>: Send + Sync + 'static {
    fn equals(&self, a: &K, b: &K) -> bool;

    fn hash_key(&self, key: &K, state: &mut dyn Hasher);
}

/// The key type's own `Eq` and `Hash`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaturalEq;

impl<K: Hash + Eq> KeyComparer<K> for NaturalEq {
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }

    fn hash_key(&self, key: &K, mut state: &mut dyn Hasher) {
        key.hash(&mut state);
    }
}

/// A key bundled with the comparer that gives it `Hash` and `Eq`.
pub(crate) struct ComparedKey<K> {
    key: K,
    comparer: Arc<dyn KeyComparer<K>>,
}

impl<K> ComparedKey<K> {
    pub(crate) fn new(key: K, comparer: Arc<dyn KeyComparer<K>>) -> Self {
        Self { key, comparer }
    }
}

impl<K: 'static> Hash for ComparedKey<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.comparer.hash_key(&self.key, state);
    }
}

impl<K: 'static> PartialEq for ComparedKey<K> {
    fn eq(&self, other: &Self) -> bool {
        self.comparer.equals(&self.key, &other.key)
    }
}

impl<K: 'static> Eq for ComparedKey<K> {}
