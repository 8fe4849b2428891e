// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Selectors that fail or panic on chosen inputs.

use keyflux_core::{FluxionError, Result};

/// Error returned by the failing selectors.
#[must_use]
pub fn selector_error(message: &str) -> FluxionError {
    FluxionError::stream_error(message)
}

/// Key selector that returns `Err` for inputs matching `fails`.
pub fn failing_key_selector<V, K>(
    fails: impl Fn(&V) -> bool + Send + Sync + 'static,
    key: impl Fn(&V) -> K + Send + Sync + 'static,
    message: &'static str,
) -> impl Fn(&V) -> Result<K> + Send + Sync + 'static {
    move |value| {
        if fails(value) {
            Err(selector_error(message))
        } else {
            Ok(key(value))
        }
    }
}

/// Element selector that returns `Err` for inputs matching `fails`.
pub fn failing_element_selector<V, E>(
    fails: impl Fn(&V) -> bool + Send + Sync + 'static,
    element: impl Fn(V) -> E + Send + Sync + 'static,
    message: &'static str,
) -> impl Fn(V) -> Result<E> + Send + Sync + 'static {
    move |value| {
        if fails(&value) {
            Err(selector_error(message))
        } else {
            Ok(element(value))
        }
    }
}

/// Selector that panics with `message` for inputs matching `panics`.
pub fn panicking_selector<V, R>(
    panics: impl Fn(&V) -> bool + Send + Sync + 'static,
    selector: impl Fn(&V) -> R + Send + Sync + 'static,
    message: &'static str,
) -> impl Fn(&V) -> R + Send + Sync + 'static {
    move |value| {
        assert!(!panics(value), "{message}");
        selector(value)
    }
}
