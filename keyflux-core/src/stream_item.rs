// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{FluxionError, Notification};

/// Item yielded by an observable bridged into a `futures::Stream` with
/// [`ObservableExt::into_stream`](crate::ObservableExt::into_stream).
///
/// Completion has no item of its own: it is the end of the stream. An error is
/// yielded once, after which the stream ends.
#[derive(Debug, Clone)]
pub enum StreamItem<T> {
    Value(T),
    Error(FluxionError),
}

impl<T: PartialEq> PartialEq for StreamItem<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            _ => false, // Errors are never equal
        }
    }
}

impl<T: Eq> Eq for StreamItem<T> {}

impl<T> StreamItem<T> {
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The value, or `None` for an error.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Error(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, FluxionError> {
        match self {
            Self::Value(v) => Ok(v),
            Self::Error(e) => Err(e),
        }
    }

    /// # Panics
    ///
    /// Panics if the item is an `Error`.
    pub fn unwrap(self) -> T {
        match self {
            Self::Value(v) => v,
            Self::Error(e) => panic!("stream yielded an error: {e}"),
        }
    }

    /// Stream form of a notification; `Completed` has none.
    pub fn from_notification(notification: Notification<T>) -> Option<Self> {
        match notification {
            Notification::Next(v) => Some(Self::Value(v)),
            Notification::Error(e) => Some(Self::Error(e)),
            Notification::Completed => None,
        }
    }
}

impl<T> From<Result<T, FluxionError>> for StreamItem<T> {
    fn from(result: Result<T, FluxionError>) -> Self {
        match result {
            Ok(v) => Self::Value(v),
            Err(e) => Self::Error(e),
        }
    }
}
