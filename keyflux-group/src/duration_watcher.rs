// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::dispatcher::RootDispatcher;
use keyflux_core::{FluxionError, Observer, SlotId, Subject};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;

/// Observer of one group's duration stream.
///
/// The first `on_next` or `on_completed` closes the group; `on_error` fails the
/// whole operator. Whatever arrives after the first signal is ignored.
pub(crate) struct DurationWatcher<V, K, E, X> {
    key: K,
    channel: Subject<E>,
    slot: SlotId,
    parent: Weak<RootDispatcher<V, K, E, X>>,
    fired: AtomicBool,
}

impl<V, K, E, X> DurationWatcher<V, K, E, X>
where
    V: 'static,
    K: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    X: 'static,
{
    pub(crate) fn new(
        key: K,
        channel: Subject<E>,
        slot: SlotId,
        parent: Weak<RootDispatcher<V, K, E, X>>,
    ) -> Self {
        Self {
            key,
            channel,
            slot,
            parent,
            fired: AtomicBool::new(false),
        }
    }

    fn first_signal(&self) -> Option<std::sync::Arc<RootDispatcher<V, K, E, X>>> {
        if self.fired.swap(true, Ordering::AcqRel) {
            return None;
        }
        self.parent.upgrade()
    }

    fn close(&self) {
        if let Some(parent) = self.first_signal() {
            parent.close_group(&self.key, &self.channel, self.slot);
        }
    }
}

impl<V, K, E, X> Observer<X> for DurationWatcher<V, K, E, X>
where
    V: 'static,
    K: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    X: 'static,
{
    fn on_next(&self, _value: X) {
        self.close();
    }

    fn on_error(&self, error: FluxionError) {
        if let Some(parent) = self.first_signal() {
            parent.fail(error);
            parent.release_slot(self.slot);
        }
    }

    fn on_completed(&self) {
        self.close();
    }
}
