// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Elementary observables.
//!
//! All of them are cold: each subscription runs independently and, except
//! for [`Never`], terminates synchronously inside `subscribe`.

use crate::{DisposableRef, EmptyDisposable, FluxionError, Observable, ObserverRef};
use std::marker::PhantomData;
use std::sync::Arc;

/// Never emits and never terminates.
pub struct Never<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Never<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Never<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Never<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Observable<T> for Never<T> {
    fn subscribe(&self, _observer: ObserverRef<T>) -> DisposableRef {
        EmptyDisposable::shared()
    }
}

/// Completes immediately.
pub struct Empty<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Empty<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Empty<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Observable<T> for Empty<T> {
    fn subscribe(&self, observer: ObserverRef<T>) -> DisposableRef {
        observer.on_completed();
        EmptyDisposable::shared()
    }
}

/// Fails immediately with a clone of the stored error.
pub struct Throw<T> {
    error: FluxionError,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Throw<T> {
    #[must_use]
    pub const fn new(error: FluxionError) -> Self {
        Self {
            error,
            _marker: PhantomData,
        }
    }
}

impl<T> Observable<T> for Throw<T> {
    fn subscribe(&self, observer: ObserverRef<T>) -> DisposableRef {
        observer.on_error(self.error.clone());
        EmptyDisposable::shared()
    }
}

/// Replays a fixed list of values to each subscriber, then completes.
#[derive(Clone)]
pub struct FromIter<T> {
    items: Arc<Vec<T>>,
}

impl<T> FromIter<T> {
    pub fn new<I: IntoIterator<Item = T>>(items: I) -> Self {
        Self {
            items: Arc::new(items.into_iter().collect()),
        }
    }
}

impl<T: Clone + Send + Sync> Observable<T> for FromIter<T> {
    fn subscribe(&self, observer: ObserverRef<T>) -> DisposableRef {
        for item in self.items.iter() {
            observer.on_next(item.clone());
        }
        observer.on_completed();
        // Everything was delivered before the handle exists.
        EmptyDisposable::shared()
    }
}
