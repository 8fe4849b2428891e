// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Reference-counted shared teardown.
//!
//! A [`RefCountDisposable`] wraps one underlying disposable. Holders obtain
//! [`RefCountGuard`]s with [`acquire`](RefCountDisposable::acquire); the owner
//! requests teardown with [`dispose`](Disposable::dispose) on the primary.
//! The underlying is released exactly once, by whichever call observes
//! "primary disposed and no guards left" first.
//!
//! ```
//! use keyflux_core::{BooleanDisposable, Disposable, RefCountDisposable};
//! use std::sync::Arc;
//!
//! let underlying = Arc::new(BooleanDisposable::new());
//! let primary = RefCountDisposable::new(underlying.clone());
//! let guard = primary.acquire();
//!
//! primary.dispose();
//! assert!(!underlying.is_disposed());
//!
//! drop(guard);
//! assert!(underlying.is_disposed());
//! ```

use super::{Disposable, DisposableRef};
use crate::logging::debug;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

const PRIMARY_DISPOSED: usize = 1 << (usize::BITS - 1);
const COUNT_MASK: usize = !PRIMARY_DISPOSED;

struct RefCountInner {
    // High bit: primary disposed. Remaining bits: outstanding guards.
    // `PRIMARY_DISPOSED` with a zero count is terminal.
    state: AtomicUsize,
    underlying: DisposableRef,
}

impl RefCountInner {
    fn release_underlying(&self) {
        debug!("ref-count reached zero after disposal request; releasing underlying");
        self.underlying.dispose();
    }

    fn release_guard(&self) {
        let previous = self.state.fetch_sub(1, Ordering::AcqRel);
        if previous == PRIMARY_DISPOSED | 1 {
            self.release_underlying();
        }
    }
}

/// Primary handle of a reference-counted shared teardown.
///
/// Clones share the same count and the same primary flag.
#[derive(Clone)]
pub struct RefCountDisposable {
    inner: Arc<RefCountInner>,
}

impl RefCountDisposable {
    pub fn new(underlying: DisposableRef) -> Self {
        Self {
            inner: Arc::new(RefCountInner {
                state: AtomicUsize::new(0),
                underlying,
            }),
        }
    }

    /// Take a reference that keeps the underlying alive until it is dropped or disposed.
    ///
    /// After the underlying was released this returns an inert guard.
    #[must_use]
    pub fn acquire(&self) -> RefCountGuard {
        let mut current = self.inner.state.load(Ordering::Acquire);
        loop {
            if current == PRIMARY_DISPOSED {
                return RefCountGuard::inert();
            }
            debug_assert!(current & COUNT_MASK < COUNT_MASK, "ref-count overflow");

            match self.inner.state.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    return RefCountGuard {
                        inner: Some(self.inner.clone()),
                        released: AtomicBool::new(false),
                    }
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Number of guards currently outstanding.
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.inner.state.load(Ordering::Acquire) & COUNT_MASK
    }

    /// Returns `true` once the underlying disposable has been released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.inner.state.load(Ordering::Acquire) == PRIMARY_DISPOSED
    }
}

impl Disposable for RefCountDisposable {
    fn dispose(&self) {
        let previous = self
            .inner
            .state
            .fetch_or(PRIMARY_DISPOSED, Ordering::AcqRel);
        if previous == 0 {
            self.inner.release_underlying();
        }
    }

    /// Reports whether disposal of the primary was requested.
    fn is_disposed(&self) -> bool {
        self.inner.state.load(Ordering::Acquire) & PRIMARY_DISPOSED != 0
    }
}

/// One outstanding reference on a [`RefCountDisposable`].
///
/// Released on [`dispose`](Disposable::dispose) or drop, whichever comes first.
pub struct RefCountGuard {
    inner: Option<Arc<RefCountInner>>,
    released: AtomicBool,
}

impl RefCountGuard {
    fn inert() -> Self {
        Self {
            inner: None,
            released: AtomicBool::new(true),
        }
    }
}

impl Disposable for RefCountGuard {
    fn dispose(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(inner) = &self.inner {
            inner.release_guard();
        }
    }

    fn is_disposed(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

impl Drop for RefCountGuard {
    fn drop(&mut self) {
        self.dispose();
    }
}
