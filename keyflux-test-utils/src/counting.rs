// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use keyflux_core::Disposable;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Disposable that counts how often `dispose` was called.
#[derive(Debug, Default)]
pub struct CountingDisposable {
    calls: AtomicUsize,
}

impl CountingDisposable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn dispose_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Disposable for CountingDisposable {
    fn dispose(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn is_disposed(&self) -> bool {
        self.dispose_count() > 0
    }
}
