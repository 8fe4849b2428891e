// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the keyflux push-stream library
//!
//! Every terminal failure that travels through an observer chain is a
//! [`FluxionError`]. Because one failure is fanned out to many open groups,
//! the error type is [`Clone`]; boxed user errors are flattened to their
//! message when cloned.
//!
//! # Examples
//!
//! ```
//! use keyflux_error::{FluxionError, Result};
//!
//! fn select_key(raw: &str) -> Result<u32> {
//!     raw.parse::<u32>().map_err(FluxionError::user_error)
//! }
//!
//! assert!(select_key("12").is_ok());
//! assert!(matches!(select_key("x"), Err(FluxionError::UserError(_))));
//! ```

/// Terminal failure carried by `on_error`.
#[derive(Debug, thiserror::Error)]
pub enum FluxionError {
    /// A source or operator failed without a more specific category.
    #[error("Stream processing error: {context}")]
    StreamProcessingError { context: String },

    /// A key, element or duration selector panicked. `context` names the
    /// selector and carries the panic message.
    #[error("User callback panicked: {context}")]
    CallbackPanic { context: String },

    /// A primitive was used after it stopped accepting the operation, e.g. a
    /// single-assignment slot assigned twice.
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// Error returned by a fallible selector.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Multiple errors occurred: {count} errors")]
    MultipleErrors {
        count: usize,
        errors: Vec<FluxionError>,
    },
}

impl FluxionError {
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    pub fn callback_panic(context: impl Into<String>) -> Self {
        Self::CallbackPanic {
            context: context.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Build a [`CallbackPanic`](Self::CallbackPanic) from a `catch_unwind` payload.
    ///
    /// String payloads (the common `panic!("...")` case) keep their message.
    #[must_use]
    pub fn from_panic(label: &str, payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::callback_panic(format!("{label}: {message}"))
    }

    pub fn from_user_errors<E>(errors: Vec<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let count = errors.len();
        let errors = errors
            .into_iter()
            .map(|e| Self::UserError(Box::new(e)))
            .collect();

        Self::MultipleErrors { count, errors }
    }

    /// `true` for failures raised by selectors rather than by a source.
    #[must_use]
    pub const fn is_user_failure(&self) -> bool {
        matches!(self, Self::UserError(_) | Self::CallbackPanic { .. })
    }
}

pub type Result<T> = std::result::Result<T, FluxionError>;

/// Conversion of any `std::error::Error` into a [`FluxionError`].
///
/// Without context the error is kept as [`FluxionError::UserError`]; with
/// context it becomes a [`FluxionError::StreamProcessingError`] message.
pub trait IntoFluxionError {
    fn into_fluxion_error(self, context: &str) -> FluxionError;

    fn into_fluxion(self) -> FluxionError
    where
        Self: Sized,
    {
        self.into_fluxion_error("")
    }
}

impl<E: std::error::Error + Send + Sync + 'static> IntoFluxionError for E {
    fn into_fluxion_error(self, context: &str) -> FluxionError {
        if context.is_empty() {
            FluxionError::user_error(self)
        } else {
            FluxionError::stream_error(format!("{context}: {self}"))
        }
    }
}

/// Prefixes user errors in a `Result` with a description of the failed step.
pub trait ResultExt<T> {
    /// # Errors
    /// Returns the converted error when `self` is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Like [`context`](Self::context); `f` runs only on error.
    ///
    /// # Errors
    /// Returns the converted error when `self` is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<FluxionError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap_user_error(e.into(), context.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap_user_error(e.into(), f()))
    }
}

fn wrap_user_error(error: FluxionError, context: String) -> FluxionError {
    match error {
        FluxionError::UserError(inner) => FluxionError::StreamProcessingError {
            context: format!("{context}: {inner}"),
        },
        other => other,
    }
}

impl Clone for FluxionError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            Self::CallbackPanic { context } => Self::CallbackPanic {
                context: context.clone(),
            },
            Self::InvalidState { message } => Self::InvalidState {
                message: message.clone(),
            },
            // The boxed source is not Clone; keep its message
            Self::UserError(e) => Self::StreamProcessingError {
                context: format!("User error: {e}"),
            },
            Self::MultipleErrors { count, errors } => Self::MultipleErrors {
                count: *count,
                errors: errors.clone(),
            },
        }
    }
}
