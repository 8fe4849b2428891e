// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::StreamExt;
use futures::Stream;
use keyflux_core::{FluxionError, StreamItem};
use std::time::Duration;
use tokio::time::sleep;

pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("Unexpected element emitted, expected no output.");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}

/// Next item of `stream`, which must be a value.
///
/// # Panics
///
/// When the stream ended or yielded an error.
pub async fn expect_value<S, T>(stream: &mut S) -> T
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match stream.next().await {
        Some(StreamItem::Value(value)) => value,
        Some(StreamItem::Error(e)) => panic!("expected a value, got error: {e}"),
        None => panic!("expected a value, stream ended"),
    }
}

/// Next item of `stream`, which must be an error.
///
/// # Panics
///
/// When the stream ended or yielded a value.
pub async fn expect_error<S, T>(stream: &mut S) -> FluxionError
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match stream.next().await {
        Some(StreamItem::Error(e)) => e,
        Some(StreamItem::Value(_)) => panic!("expected an error, got a value"),
        None => panic!("expected an error, stream ended"),
    }
}

/// # Panics
///
/// When `stream` yields another item.
pub async fn expect_end<S, T>(stream: &mut S)
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    assert!(stream.next().await.is_none(), "expected the stream to end");
}
