// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Observers that record what they receive.
//!
//! [`RecordingObserver`] keeps every [`Notification`] in arrival order.
//! [`GroupRecorder`] observes the output of a grouping operator and
//! subscribes a `RecordingObserver` to every emitted group. Both can append
//! to a shared [`EventLog`] to check ordering across observers.

use keyflux_core::{Disposable, DisposableRef, FluxionError, Notification, Observable, Observer};
use keyflux_group::GroupHandle;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::sync::Arc;

/// Ordered log shared by several recorders.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

/// Records every notification it receives.
pub struct RecordingObserver<T> {
    label: String,
    log: Option<EventLog>,
    notifications: Mutex<Vec<Notification<T>>>,
}

impl<T: Clone> RecordingObserver<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            label: String::new(),
            log: None,
            notifications: Mutex::new(Vec::new()),
        }
    }

    /// Also append `"{label}:next"`, `"{label}:error"` or `"{label}:completed"` to `log`.
    #[must_use]
    pub fn with_log(label: impl Into<String>, log: EventLog) -> Self {
        Self {
            label: label.into(),
            log: Some(log),
            notifications: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<Notification<T>> {
        self.notifications.lock().clone()
    }

    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.notifications
            .lock()
            .iter()
            .filter_map(|n| n.value().cloned())
            .collect()
    }

    #[must_use]
    pub fn error(&self) -> Option<FluxionError> {
        self.notifications
            .lock()
            .iter()
            .find_map(|n| n.error().cloned())
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.notifications.lock().iter().any(Notification::is_completed)
    }

    #[must_use]
    pub fn terminal_count(&self) -> usize {
        self.notifications
            .lock()
            .iter()
            .filter(|n| n.is_terminal())
            .count()
    }

    fn record(&self, notification: Notification<T>, kind: &str) {
        if let Some(log) = &self.log {
            log.push(format!("{}:{kind}", self.label));
        }
        self.notifications.lock().push(notification);
    }
}

impl<T: Clone> Default for RecordingObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send> Observer<T> for RecordingObserver<T> {
    fn on_next(&self, value: T) {
        self.record(Notification::Next(value), "next");
    }

    fn on_error(&self, error: FluxionError) {
        self.record(Notification::Error(error), "error");
    }

    fn on_completed(&self) {
        self.record(Notification::Completed, "completed");
    }
}

struct RecordedGroup<K, E> {
    handle: GroupHandle<K, E>,
    observer: Arc<RecordingObserver<E>>,
    subscription: Option<DisposableRef>,
}

/// Observer of a stream of groups.
///
/// Emitted keys and the downstream terminal are recorded as
/// `Notification<K>`. With a log, group emissions are logged as
/// `"open:{key:?}"`, the downstream terminal as `"groups:error"` or
/// `"groups:completed"`, and each group's notifications under the label
/// `"{key:?}#{index}"`.
pub struct GroupRecorder<K, E> {
    subscribe_groups: bool,
    log: Option<EventLog>,
    groups: Mutex<Vec<RecordedGroup<K, E>>>,
    events: RecordingObserver<K>,
}

impl<K, E> GroupRecorder<K, E>
where
    K: Clone + Debug + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Subscribe a recorder to every emitted group.
    #[must_use]
    pub fn new() -> Self {
        Self::build(true, None)
    }

    #[must_use]
    pub fn with_log(log: EventLog) -> Self {
        Self::build(true, Some(log))
    }

    /// Keep emitted handles without subscribing to them.
    #[must_use]
    pub fn without_subscribing() -> Self {
        Self::build(false, None)
    }

    fn build(subscribe_groups: bool, log: Option<EventLog>) -> Self {
        let events = match &log {
            Some(log) => RecordingObserver::with_log("groups", log.clone()),
            None => RecordingObserver::new(),
        };
        Self {
            subscribe_groups,
            log,
            groups: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Keys of the emitted groups, one per emission.
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.events.values()
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.lock().len()
    }

    /// Handle of the `index`-th emitted group.
    ///
    /// # Panics
    ///
    /// When fewer groups were emitted.
    #[must_use]
    pub fn handle(&self, index: usize) -> GroupHandle<K, E> {
        self.groups.lock()[index].handle.clone()
    }

    /// Recorder subscribed to the `index`-th emitted group.
    ///
    /// # Panics
    ///
    /// When fewer groups were emitted.
    #[must_use]
    pub fn group(&self, index: usize) -> Arc<RecordingObserver<E>> {
        self.groups.lock()[index].observer.clone()
    }

    /// Dispose the subscription to the `index`-th group, if any.
    pub fn dispose_group(&self, index: usize) {
        let subscription = self.groups.lock()[index].subscription.take();
        if let Some(subscription) = subscription {
            subscription.dispose();
        }
    }

    pub fn dispose_all_groups(&self) {
        for index in 0..self.group_count() {
            self.dispose_group(index);
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.events.is_completed()
    }

    #[must_use]
    pub fn error(&self) -> Option<FluxionError> {
        self.events.error()
    }

    #[must_use]
    pub fn terminal_count(&self) -> usize {
        self.events.terminal_count()
    }
}

impl<K, E> Default for GroupRecorder<K, E>
where
    K: Clone + Debug + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> Observer<GroupHandle<K, E>> for GroupRecorder<K, E>
where
    K: Clone + Debug + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn on_next(&self, handle: GroupHandle<K, E>) {
        let index = self.group_count();
        let label = format!("{:?}#{index}", handle.key());
        if let Some(log) = &self.log {
            log.push(format!("open:{:?}", handle.key()));
        }

        let observer = Arc::new(match &self.log {
            Some(log) => RecordingObserver::with_log(label, log.clone()),
            None => RecordingObserver::new(),
        });
        let subscription = self
            .subscribe_groups
            .then(|| handle.subscribe(observer.clone()));

        self.events.notifications.lock().push(Notification::Next(handle.key().clone()));
        self.groups.lock().push(RecordedGroup {
            handle,
            observer,
            subscription,
        });
    }

    fn on_error(&self, error: FluxionError) {
        self.events.on_error(error);
    }

    fn on_completed(&self) {
        self.events.on_completed();
    }
}
