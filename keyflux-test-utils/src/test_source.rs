// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use keyflux_core::{
    Disposable, DisposableRef, FluxionError, Observable, Observer, ObserverRef, Subject,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Counters {
    subscribed: AtomicUsize,
    disposed: AtomicUsize,
}

/// Hot source driven by the test that tracks its subscriptions.
///
/// Clones share the same subject and counters.
#[derive(Clone)]
pub struct TestSource<T> {
    subject: Subject<T>,
    counters: Arc<Counters>,
}

impl<T: Clone + Send + Sync + 'static> TestSource<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subject: Subject::new(),
            counters: Arc::default(),
        }
    }

    pub fn next(&self, value: T) {
        self.subject.on_next(value);
    }

    pub fn error(&self, error: FluxionError) {
        self.subject.on_error(error);
    }

    pub fn complete(&self) {
        self.subject.on_completed();
    }

    /// Subscriptions made so far.
    #[must_use]
    pub fn subscribe_count(&self) -> usize {
        self.counters.subscribed.load(Ordering::SeqCst)
    }

    /// Subscriptions disposed so far.
    #[must_use]
    pub fn dispose_count(&self) -> usize {
        self.counters.disposed.load(Ordering::SeqCst)
    }

    /// `true` while at least one subscription is not disposed.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscribe_count() > self.dispose_count()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for TestSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> for TestSource<T> {
    fn subscribe(&self, observer: ObserverRef<T>) -> DisposableRef {
        self.counters.subscribed.fetch_add(1, Ordering::SeqCst);
        let inner = self.subject.subscribe(observer);
        Arc::new(TrackedSubscription {
            inner,
            counters: self.counters.clone(),
            disposed: AtomicBool::new(false),
        })
    }
}

struct TrackedSubscription {
    inner: DisposableRef,
    counters: Arc<Counters>,
    disposed: AtomicBool,
}

impl Disposable for TrackedSubscription {
    fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            self.inner.dispose();
            self.counters.disposed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}
