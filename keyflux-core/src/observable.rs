// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{DisposableRef, FluxionError, FnObserver, ObservableStream, ObserverRef};
use std::sync::Arc;

/// Producer side of the push contract.
///
/// `subscribe` registers `observer` and returns the handle that detaches it.
/// Implementations may deliver notifications synchronously from inside
/// `subscribe` (cold sources do).
pub trait Observable<T>: Send + Sync {
    fn subscribe(&self, observer: ObserverRef<T>) -> DisposableRef;
}

impl<T, O: Observable<T> + ?Sized> Observable<T> for Arc<O> {
    fn subscribe(&self, observer: ObserverRef<T>) -> DisposableRef {
        (**self).subscribe(observer)
    }
}

/// Convenience subscriptions for every [`Observable`].
pub trait ObservableExt<T: 'static>: Observable<T> {
    /// Subscribe with a value handler only; errors and completion are ignored.
    fn subscribe_fn<F>(&self, on_next: F) -> DisposableRef
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnObserver::new(on_next)))
    }

    /// Subscribe with a handler for each kind of notification.
    fn subscribe_all<N, E, C>(&self, on_next: N, on_error: E, on_completed: C) -> DisposableRef
    where
        N: Fn(T) + Send + Sync + 'static,
        E: Fn(FluxionError) + Send + Sync + 'static,
        C: Fn() + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(
            FnObserver::new(on_next)
                .with_error(on_error)
                .with_completed(on_completed),
        ))
    }

    /// Bridge into a `futures::Stream` of [`StreamItem`](crate::StreamItem)s.
    ///
    /// See [`ObservableStream`].
    fn into_stream(self) -> ObservableStream<T>
    where
        Self: Sized,
        T: Send,
    {
        ObservableStream::new(&self)
    }
}

impl<T: 'static, O: Observable<T> + ?Sized> ObservableExt<T> for O {}
