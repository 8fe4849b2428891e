// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::{Disposable, DisposableRef};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A disposable with nothing to release.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyDisposable;

impl EmptyDisposable {
    #[must_use]
    pub fn shared() -> DisposableRef {
        Arc::new(Self)
    }
}

impl Disposable for EmptyDisposable {
    fn dispose(&self) {}

    fn is_disposed(&self) -> bool {
        false
    }
}

/// A disposable that only records that it was disposed.
#[derive(Debug, Default)]
pub struct BooleanDisposable {
    disposed: AtomicBool,
}

impl BooleanDisposable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Disposable for BooleanDisposable {
    fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

type Action = Box<dyn FnOnce() + Send>;

/// Runs a closure the first time it is disposed.
pub struct ActionDisposable {
    action: Mutex<Option<Action>>,
}

impl ActionDisposable {
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            action: Mutex::new(Some(Box::new(action))),
        }
    }

    pub fn shared<F>(action: F) -> DisposableRef
    where
        F: FnOnce() + Send + 'static,
    {
        Arc::new(Self::new(action))
    }
}

impl Disposable for ActionDisposable {
    fn dispose(&self) {
        // Take under the lock, run outside it: the action may dispose other resources
        let action = self.action.lock().take();
        if let Some(action) = action {
            action();
        }
    }

    fn is_disposed(&self) -> bool {
        self.action.lock().is_none()
    }
}

impl std::fmt::Debug for ActionDisposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDisposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
