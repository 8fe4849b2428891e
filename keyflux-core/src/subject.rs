// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-subscriber subject.
//!
//! A [`Subject`] is both an [`Observer`] and an [`Observable`]: whatever is
//! pushed into it is broadcast to every observer subscribed at that moment.
//!
//! ## Characteristics
//!
//! - **Hot**: Late subscribers do not receive past values, only values pushed after subscribing.
//! - **Single terminal**: The first `on_error`/`on_completed` wins; later terminal
//!   calls and values are ignored, so each subscriber sees at most one terminal notification.
//! - **Late terminal replay**: Subscribing to a terminated subject immediately delivers
//!   the stored terminal notification.
//! - **Thread-safe**: Cheap to clone; all clones share the same internal state.
//!   Observers are called outside the subject's lock.
//!
//! ## Example
//!
//! ```
//! use keyflux_core::{Observer, ObservableExt, Subject};
//! use std::sync::{Arc, Mutex};
//!
//! let subject = Subject::<i32>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//!
//! let _subscription = subject.subscribe_fn(move |v| sink.lock().unwrap().push(v));
//!
//! subject.on_next(1);
//! subject.on_next(2);
//! subject.on_completed();
//! subject.on_next(3);
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
//! ```

use crate::{
    Disposable, DisposableRef, EmptyDisposable, FluxionError, Notification, Observable, Observer,
    ObserverRef,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

struct Subscriber<T> {
    id: u64,
    observer: ObserverRef<T>,
    stopped: AtomicBool,
}

impl<T> Subscriber<T> {
    fn next(&self, value: T) {
        if !self.stopped.load(Ordering::Acquire) {
            self.observer.on_next(value);
        }
    }

    fn terminate(&self, terminal: &Notification<T>) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        match terminal {
            Notification::Error(e) => self.observer.on_error(e.clone()),
            _ => self.observer.on_completed(),
        }
    }
}

struct SubjectState<T> {
    // Only `Error` or `Completed` once set.
    terminal: Option<Notification<T>>,
    next_id: u64,
    subscribers: Vec<Arc<Subscriber<T>>>,
}

/// A hot subject that broadcasts values to all current subscribers.
///
/// See the [module documentation](self) for details.
pub struct Subject<T> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Subject<T> {
    /// Creates a new subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                terminal: None,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Returns `true` once the subject received `on_error` or `on_completed`.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.state.lock().terminal.is_some()
    }

    /// Returns `true` if both handles share the same underlying subject.
    #[must_use]
    pub fn same_channel(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Number of currently subscribed observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    fn terminate(&self, terminal: Notification<T>) {
        let subscribers = {
            let mut state = self.state.lock();
            if state.terminal.is_some() {
                return;
            }
            state.terminal = Some(terminal.clone());
            std::mem::take(&mut state.subscribers)
        };

        for subscriber in subscribers {
            subscriber.terminate(&terminal);
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Subject")
            .field("subscribers", &state.subscribers.len())
            .field("terminated", &state.terminal.is_some())
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> Observer<T> for Subject<T> {
    fn on_next(&self, value: T) {
        let subscribers = {
            let state = self.state.lock();
            if state.terminal.is_some() {
                return;
            }
            state.subscribers.clone()
        };

        for subscriber in subscribers {
            subscriber.next(value.clone());
        }
    }

    fn on_error(&self, error: FluxionError) {
        self.terminate(Notification::Error(error));
    }

    fn on_completed(&self) {
        self.terminate(Notification::Completed);
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> for Subject<T> {
    fn subscribe(&self, observer: ObserverRef<T>) -> DisposableRef {
        let mut state = self.state.lock();
        if let Some(terminal) = state.terminal.clone() {
            drop(state);
            terminal.deliver(&*observer);
            return EmptyDisposable::shared();
        }

        let id = state.next_id;
        state.next_id += 1;
        let subscriber = Arc::new(Subscriber {
            id,
            observer,
            stopped: AtomicBool::new(false),
        });
        state.subscribers.push(subscriber.clone());

        Arc::new(SubjectSubscription {
            state: Arc::downgrade(&self.state),
            subscriber: Arc::downgrade(&subscriber),
            id,
            disposed: AtomicBool::new(false),
        })
    }
}

struct SubjectSubscription<T> {
    state: Weak<Mutex<SubjectState<T>>>,
    // Stopping it also silences a dispatch already holding a snapshot.
    subscriber: Weak<Subscriber<T>>,
    id: u64,
    disposed: AtomicBool,
}

impl<T: Send + Sync> Disposable for SubjectSubscription<T> {
    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(subscriber) = self.subscriber.upgrade() {
            subscriber.stopped.store(true, Ordering::Release);
        }
        if let Some(state) = self.state.upgrade() {
            state.lock().subscribers.retain(|s| s.id != self.id);
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}
