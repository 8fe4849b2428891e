// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bridge from the push contract into `futures::Stream`.
//!
//! ```
//! use keyflux_core::{ObservableExt, Observer, StreamItem, Subject};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let subject = Subject::<i32>::new();
//! let mut stream = subject.clone().into_stream();
//!
//! subject.on_next(1);
//! subject.on_completed();
//!
//! assert_eq!(stream.next().await, Some(StreamItem::Value(1)));
//! assert_eq!(stream.next().await, None);
//! # }
//! ```

use crate::{
    Disposable, DisposableRef, FluxionError, Notification, Observable, Observer, StreamItem,
};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

struct ChannelObserver<T> {
    tx: UnboundedSender<StreamItem<T>>,
}

impl<T> ChannelObserver<T> {
    fn forward(&self, notification: Notification<T>) {
        match StreamItem::from_notification(notification) {
            Some(item) => {
                let terminal = item.is_error();
                // A dropped receiver means nobody listens any more
                let _ = self.tx.unbounded_send(item);
                if terminal {
                    self.tx.close_channel();
                }
            }
            None => self.tx.close_channel(),
        }
    }
}

impl<T: Send> Observer<T> for ChannelObserver<T> {
    fn on_next(&self, value: T) {
        self.forward(Notification::Next(value));
    }

    fn on_error(&self, error: FluxionError) {
        self.forward(Notification::Error(error));
    }

    fn on_completed(&self) {
        self.forward(Notification::Completed);
    }
}

/// A stream fed by an observable subscription.
///
/// - **Unbounded**: values are buffered until polled.
/// - **Terminal**: completion ends the stream; an error is yielded as
///   `StreamItem::Error` and then the stream ends.
/// - **Owning**: dropping the stream disposes the subscription.
pub struct ObservableStream<T> {
    rx: UnboundedReceiver<StreamItem<T>>,
    subscription: DisposableRef,
}

impl<T: Send + 'static> ObservableStream<T> {
    pub fn new<O: Observable<T> + ?Sized>(source: &O) -> Self {
        let (tx, rx) = mpsc::unbounded();
        let subscription = source.subscribe(Arc::new(ChannelObserver { tx }));
        Self { rx, subscription }
    }
}

impl<T> Stream for ObservableStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

impl<T> Drop for ObservableStream<T> {
    fn drop(&mut self) {
        self.subscription.dispose();
    }
}
