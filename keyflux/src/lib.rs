// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # keyflux
//!
//! Push-based reactive streams built around `group_by_until`, an operator that
//! splits a stream into keyed groups whose lifetime is bounded by a per-group
//! duration stream.
//!
//! ## Overview
//!
//! - [`Observable`] / [`Observer`]: the push contract, plus [`Subject`] and the
//!   elementary [`sources`].
//! - [`GroupByUntilExt::group_by_until`]: emits one [`GroupHandle`] per open
//!   episode of a key. A group closes on the first value or completion of its
//!   duration stream; the next value of that key opens a new group.
//! - [`ObservableExt::into_stream`]: consume any observable, groups included,
//!   as a `futures::Stream` of [`StreamItem`]s.
//!
//! ## Quick Start
//!
//! ```rust
//! use keyflux::prelude::*;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() {
//!     let clicks = Subject::<(&'static str, u32)>::new();
//!     let window = Subject::<()>::new();
//!
//!     let closer = window.clone();
//!     let mut sessions = clicks
//!         .clone()
//!         .group_by_until(|(user, _)| *user, |(_, x)| x, move |_| closer.clone())
//!         .into_stream();
//!
//!     clicks.on_next(("ada", 1));
//!     let session = sessions.next().await.and_then(StreamItem::ok).unwrap();
//!     let mut positions = session.into_stream();
//!
//!     clicks.on_next(("ada", 2));
//!     window.on_next(());
//!
//!     assert_eq!(positions.next().await, Some(StreamItem::Value(2)));
//!     assert_eq!(positions.next().await, None);
//! }
//! ```

pub use keyflux_core::{
    sources, Disposable, DisposableRef, FluxionError, Notification, Observable, ObservableExt,
    ObservableStream, Observer, ObserverRef, Result, StreamItem, Subject,
};
pub use keyflux_group::{GroupByUntil, GroupByUntilExt, GroupHandle, KeyComparer, NaturalEq};

/// Prelude module for convenient imports
pub mod prelude {
    pub use keyflux_core::sources::{Empty, FromIter, Never, Throw};
    pub use keyflux_core::{
        Disposable, FluxionError, Observable, ObservableExt, Observer, StreamItem, Subject,
    };
    pub use keyflux_group::{GroupByUntilExt, GroupHandle, KeyComparer};
}
