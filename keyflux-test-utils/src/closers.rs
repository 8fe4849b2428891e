// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use keyflux_core::{FluxionError, Observer, Subject};
use keyflux_group::GroupHandle;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Duration streams controlled by the test, one per open group.
///
/// [`duration`](Self::duration) builds a duration selector that hands each new
/// group a fresh subject, stored under the group's key. `close`, `complete`
/// and `fail` signal the subject of the most recent group of a key.
pub struct Closers<K> {
    open: Arc<Mutex<HashMap<K, Subject<()>>>>,
    requests: Arc<AtomicUsize>,
}

impl<K: Clone + Hash + Eq + Send + Sync + 'static> Closers<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            open: Arc::default(),
            requests: Arc::default(),
        }
    }

    pub fn duration<E>(&self) -> impl Fn(&GroupHandle<K, E>) -> Subject<()> + Send + Sync + 'static
    where
        E: Clone + Send + Sync + 'static,
    {
        let (open, requests) = (self.open.clone(), self.requests.clone());
        move |group: &GroupHandle<K, E>| {
            requests.fetch_add(1, Ordering::SeqCst);
            let closer = Subject::new();
            open.lock().insert(group.key().clone(), closer.clone());
            closer
        }
    }

    /// Number of times the duration selector was called.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn close(&self, key: &K) {
        if let Some(closer) = self.closer(key) {
            closer.on_next(());
        }
    }

    pub fn complete(&self, key: &K) {
        if let Some(closer) = self.closer(key) {
            closer.on_completed();
        }
    }

    pub fn fail(&self, key: &K, error: FluxionError) {
        if let Some(closer) = self.closer(key) {
            closer.on_error(error);
        }
    }

    fn closer(&self, key: &K) -> Option<Subject<()>> {
        self.open.lock().get(key).cloned()
    }
}

impl<K: Clone + Hash + Eq + Send + Sync + 'static> Default for Closers<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for Closers<K> {
    fn clone(&self) -> Self {
        Self {
            open: self.open.clone(),
            requests: self.requests.clone(),
        }
    }
}
