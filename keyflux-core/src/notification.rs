// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{FluxionError, Observer};

/// One observer call captured as a value.
#[derive(Debug, Clone)]
pub enum Notification<T> {
    /// `on_next(value)`
    Next(T),
    /// `on_error(error)`
    Error(FluxionError),
    /// `on_completed()`
    Completed,
}

impl<T: PartialEq> PartialEq for Notification<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Next(a), Self::Next(b)) => a == b,
            (Self::Completed, Self::Completed) => true,
            _ => false, // Errors are never equal
        }
    }
}

impl<T> Notification<T> {
    pub const fn is_next(&self) -> bool {
        matches!(self, Self::Next(_))
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns `true` for `Error` and `Completed`.
    pub const fn is_terminal(&self) -> bool {
        !self.is_next()
    }

    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Next(v) => Some(v),
            _ => None,
        }
    }

    pub const fn error(&self) -> Option<&FluxionError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Replay this notification into `observer`.
    pub fn deliver<O: Observer<T> + ?Sized>(self, observer: &O) {
        match self {
            Self::Next(v) => observer.on_next(v),
            Self::Error(e) => observer.on_error(e),
            Self::Completed => observer.on_completed(),
        }
    }
}
