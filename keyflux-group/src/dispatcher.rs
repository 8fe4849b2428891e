// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The observer attached to the source of a `group_by_until`.
//!
//! Each source value is routed to its group's channel, opening the group
//! first when its key has no open episode. Terminal notifications, from the
//! source or from a failing selector or duration stream, fan out to every open
//! group before reaching the downstream observer.

use crate::downstream::Downstream;
use crate::duration_watcher::DurationWatcher;
use crate::logging::{debug, trace, warn};
use crate::registry::KeyedRegistry;
use crate::selector::invoke;
use crate::GroupHandle;
use keyflux_core::{
    CompositeDisposable, Disposable, FluxionError, Observable, Observer, RefCountDisposable,
    Result, SingleAssignmentDisposable, SlotId, Subject,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

pub(crate) type KeySelector<V, K> = Arc<dyn Fn(&V) -> Result<K> + Send + Sync>;
pub(crate) type ElementSelector<V, E> = Arc<dyn Fn(V) -> Result<E> + Send + Sync>;
pub(crate) type DurationSelector<K, E, X> =
    Arc<dyn Fn(&GroupHandle<K, E>) -> Result<Arc<dyn Observable<X>>> + Send + Sync>;

pub(crate) struct Selectors<V, K, E, X> {
    pub(crate) key: KeySelector<V, K>,
    pub(crate) element: ElementSelector<V, E>,
    pub(crate) duration: DurationSelector<K, E, X>,
}

impl<V, K, E, X> Clone for Selectors<V, K, E, X> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            element: self.element.clone(),
            duration: self.duration.clone(),
        }
    }
}

pub(crate) struct RootDispatcher<V, K, E, X> {
    selectors: Selectors<V, K, E, X>,
    registry: KeyedRegistry<K, Subject<E>>,
    downstream: Arc<Downstream<GroupHandle<K, E>>>,
    // Source subscription plus one slot per open duration subscription.
    groups: Arc<CompositeDisposable>,
    lifetime: RefCountDisposable,
    terminated: AtomicBool,
    // Set by `fail` before it snapshots the open groups.
    fatal: Mutex<Option<FluxionError>>,
    me: Weak<Self>,
}

impl<V, K, E, X> RootDispatcher<V, K, E, X>
where
    V: 'static,
    K: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    X: 'static,
{
    pub(crate) fn new(
        selectors: Selectors<V, K, E, X>,
        registry: KeyedRegistry<K, Subject<E>>,
        downstream: Arc<Downstream<GroupHandle<K, E>>>,
        groups: Arc<CompositeDisposable>,
        lifetime: RefCountDisposable,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            selectors,
            registry,
            downstream,
            groups,
            lifetime,
            terminated: AtomicBool::new(false),
            fatal: Mutex::new(None),
            me: me.clone(),
        })
    }

    /// Emit the new group, then watch its duration stream.
    fn open_group(&self, key: K, channel: &Subject<E>) -> Result<()> {
        trace!("group opened, {} open", self.registry.len());
        self.downstream.next(GroupHandle::owned(
            key.clone(),
            channel.clone(),
            self.lifetime.clone(),
        ));

        let detached = GroupHandle::detached(key.clone(), channel.clone());
        let duration = invoke("duration selector", || (self.selectors.duration)(&detached))?;

        let slot_handle = Arc::new(SingleAssignmentDisposable::new());
        let slot = self.groups.add(slot_handle.clone());
        let watcher = Arc::new(DurationWatcher::new(
            key,
            channel.clone(),
            slot,
            self.me.clone(),
        ));
        // The watcher may fire and release its slot before this returns.
        slot_handle.set(duration.subscribe(watcher))
    }

    /// Closing signal of one group's duration stream.
    pub(crate) fn close_group(&self, key: &K, channel: &Subject<E>, slot: SlotId) {
        if self.registry.remove(key) {
            trace!("group closed by its duration, {} open", self.registry.len());
            channel.on_completed();
        }
        self.release_slot(slot);
    }

    pub(crate) fn release_slot(&self, slot: SlotId) {
        self.groups.remove(slot);
    }

    /// Fail every open group, then the downstream observer. Only the first call has effect.
    pub(crate) fn fail(&self, error: FluxionError) {
        if self.terminated.swap(true, Ordering::AcqRel) {
            return;
        }
        *self.fatal.lock() = Some(error.clone());

        let open = self.registry.snapshot_values();
        warn!(
            "group_by_until failed with {} open groups: {}",
            open.len(),
            error
        );
        for channel in &open {
            channel.on_error(error.clone());
        }
        self.downstream.error(error);
        self.lifetime.dispose();
    }

    /// A group registered after a concurrent `fail` took its snapshot.
    ///
    /// If the error is not stored yet, that `fail` snapshots afterwards and
    /// reaches the group itself.
    fn fail_late_group(&self, channel: &Subject<E>) {
        let fatal = self.fatal.lock().clone();
        if let Some(error) = fatal {
            trace!("group opened during failure, failing it late");
            channel.on_error(error);
        }
    }
}

impl<V, K, E, X> Observer<V> for RootDispatcher<V, K, E, X>
where
    V: 'static,
    K: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    X: 'static,
{
    fn on_next(&self, value: V) {
        if self.terminated.load(Ordering::Acquire) {
            return;
        }

        let key = match invoke("key selector", || (self.selectors.key)(&value)) {
            Ok(key) => key,
            Err(error) => return self.fail(error),
        };

        let (channel, created) = self.registry.get_or_create(key.clone(), Subject::new);
        if created {
            if let Err(error) = self.open_group(key, &channel) {
                return self.fail(error);
            }
            if self.terminated.load(Ordering::Acquire) {
                return self.fail_late_group(&channel);
            }
        }

        match invoke("element selector", || (self.selectors.element)(value)) {
            Ok(element) => channel.on_next(element),
            Err(error) => self.fail(error),
        }
    }

    fn on_error(&self, error: FluxionError) {
        self.fail(error);
    }

    fn on_completed(&self) {
        if self.terminated.swap(true, Ordering::AcqRel) {
            return;
        }

        let open = self.registry.snapshot_values();
        debug!("source completed, completing {} open groups", open.len());
        for channel in &open {
            channel.on_completed();
        }
        self.downstream.completed();
        self.lifetime.dispose();
    }
}
