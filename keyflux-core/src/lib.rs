// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core push-stream types for keyflux.
//!
//! - [`Observer`] / [`Observable`]: the push contract. A source calls
//!   `on_next` any number of times, then at most one of `on_error` or
//!   `on_completed`.
//! - [`Disposable`] and its variants: scoped teardown of subscriptions,
//!   including [`CompositeDisposable`] (arena of members) and
//!   [`RefCountDisposable`] (shared teardown released by the last holder).
//! - [`Subject`]: hot broadcast channel that is both an observer and an observable.
//! - [`sources`]: `Never`, `Empty`, `Throw` and `FromIter`.
//! - [`ObservableExt::into_stream`]: bridge into `futures::Stream` of [`StreamItem`].

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod disposable;
pub mod into_stream;
mod logging;
pub mod notification;
pub mod observable;
pub mod observer;
pub mod sources;
pub mod stream_item;
pub mod subject;

pub use self::disposable::{
    ActionDisposable, BooleanDisposable, CompositeDisposable, Disposable, DisposableRef,
    EmptyDisposable, RefCountDisposable, RefCountGuard, SingleAssignmentDisposable, SlotId,
};
pub use self::into_stream::ObservableStream;
pub use self::notification::Notification;
pub use self::observable::{Observable, ObservableExt};
pub use self::observer::{FnObserver, Observer, ObserverRef};
pub use self::stream_item::StreamItem;
pub use self::subject::Subject;
pub use keyflux_error::{FluxionError, IntoFluxionError, Result, ResultExt};
