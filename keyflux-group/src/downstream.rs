// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use keyflux_core::{FluxionError, ObserverRef};
use parking_lot::ReentrantMutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// The single observer of the operator's output, behind one delivery gate.
///
/// Every call into the observer happens while holding `gate`, so a new group
/// can never interleave with a terminal notification. The gate is re-entrant:
/// an observer that synchronously drives the source from its callback
/// re-enters on the same thread instead of deadlocking.
pub(crate) struct Downstream<T> {
    observer: ObserverRef<T>,
    gate: ReentrantMutex<()>,
    stopped: AtomicBool,
}

impl<T> Downstream<T> {
    pub(crate) fn new(observer: ObserverRef<T>) -> Self {
        Self {
            observer,
            gate: ReentrantMutex::new(()),
            stopped: AtomicBool::new(false),
        }
    }

    /// Deliver `value` unless the observer already terminated or detached.
    pub(crate) fn next(&self, value: T) {
        let _gate = self.gate.lock();
        if !self.stopped.load(Ordering::Acquire) {
            self.observer.on_next(value);
        }
    }

    pub(crate) fn error(&self, error: FluxionError) {
        let _gate = self.gate.lock();
        if !self.stopped.swap(true, Ordering::AcqRel) {
            self.observer.on_error(error);
        }
    }

    pub(crate) fn completed(&self) {
        let _gate = self.gate.lock();
        if !self.stopped.swap(true, Ordering::AcqRel) {
            self.observer.on_completed();
        }
    }

    /// Stop all further delivery without a terminal notification.
    pub(crate) fn detach(&self) {
        let _gate = self.gate.lock();
        self.stopped.store(true, Ordering::Release);
    }
}
