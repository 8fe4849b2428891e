// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use keyflux_core::{FluxionError, Result};
use std::panic::{self, AssertUnwindSafe};

/// Run a user selector, turning a panic into [`FluxionError::CallbackPanic`].
pub(crate) fn invoke<R>(label: &str, selector: impl FnOnce() -> Result<R>) -> Result<R> {
    match panic::catch_unwind(AssertUnwindSafe(selector)) {
        Ok(result) => result,
        Err(payload) => Err(FluxionError::from_panic(label, payload.as_ref())),
    }
}
