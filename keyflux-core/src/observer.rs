// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::FluxionError;
use std::sync::Arc;

/// Receiver side of the push contract.
///
/// A well-behaved producer calls `on_next` zero or more times followed by at
/// most one terminal call (`on_error` xor `on_completed`), and never calls
/// the same observer from two threads at once.
pub trait Observer<T>: Send + Sync {
    /// Receive the next value.
    fn on_next(&self, value: T);

    /// Receive a terminal error.
    fn on_error(&self, error: FluxionError);

    /// Receive normal completion.
    fn on_completed(&self);
}

/// Shared, type-erased observer.
pub type ObserverRef<T> = Arc<dyn Observer<T>>;

impl<T, O: Observer<T> + ?Sized> Observer<T> for Arc<O> {
    fn on_next(&self, value: T) {
        (**self).on_next(value);
    }

    fn on_error(&self, error: FluxionError) {
        (**self).on_error(error);
    }

    fn on_completed(&self) {
        (**self).on_completed();
    }
}

type NextFn<T> = Box<dyn Fn(T) + Send + Sync>;
type ErrorFn = Box<dyn Fn(FluxionError) + Send + Sync>;
type CompletedFn = Box<dyn Fn() + Send + Sync>;

/// Observer assembled from closures.
///
/// Missing handlers are no-ops.
///
/// ```
/// use keyflux_core::{FnObserver, Observer};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = seen.clone();
/// let observer = FnObserver::new(move |v: usize| {
///     counter.fetch_add(v, Ordering::SeqCst);
/// });
///
/// observer.on_next(2);
/// observer.on_next(3);
/// observer.on_completed();
/// assert_eq!(seen.load(Ordering::SeqCst), 5);
/// ```
pub struct FnObserver<T> {
    on_next: NextFn<T>,
    on_error: ErrorFn,
    on_completed: CompletedFn,
}

impl<T> FnObserver<T> {
    pub fn new<F>(on_next: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            on_next: Box::new(on_next),
            on_error: Box::new(|_| {}),
            on_completed: Box::new(|| {}),
        }
    }

    #[must_use]
    pub fn with_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(FluxionError) + Send + Sync + 'static,
    {
        self.on_error = Box::new(on_error);
        self
    }

    #[must_use]
    pub fn with_completed<F>(mut self, on_completed: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_completed = Box::new(on_completed);
        self
    }
}

impl<T> Observer<T> for FnObserver<T> {
    fn on_next(&self, value: T) {
        (self.on_next)(value);
    }

    fn on_error(&self, error: FluxionError) {
        (self.on_error)(error);
    }

    fn on_completed(&self) {
        (self.on_completed)();
    }
}
