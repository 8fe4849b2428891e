// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Group-by operator whose groups close when a per-group duration stream signals.
//!
//! [`group_by_until`](GroupByUntilExt::group_by_until) splits a source into
//! groups keyed by `key_selector`. The first value of a key opens a group: a
//! [`GroupHandle`] is emitted downstream, and `duration_selector` is asked for
//! the stream whose first value or completion closes that group. Values of the
//! key arriving after the group closed open a new group.
//!
//! ## Characteristics
//!
//! - **Single emission**: each open episode of a key is emitted exactly once.
//! - **Per-group order**: a group sees its elements in source order.
//! - **Fatal failures**: a source error, a failing or panicking selector, and a
//!   failing duration stream all fail every open group and then the downstream observer.
//! - **Shared lifetime**: disposing the returned subscription detaches the
//!   downstream observer at once, but the source stays subscribed while any
//!   subscription to an emitted group is alive.
//!
//! ## Example
//!
//! ```
//! use keyflux_core::sources::Never;
//! use keyflux_core::{Observable, ObservableExt, Observer, Subject};
//! use keyflux_group::GroupByUntilExt;
//! use std::sync::{Arc, Mutex};
//!
//! let source = Subject::<(char, u32)>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let group_subscriptions = Arc::new(Mutex::new(Vec::new()));
//!
//! let (sink, keep) = (seen.clone(), group_subscriptions.clone());
//! let _subscription = source
//!     .clone()
//!     .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Never::<()>::new())
//!     .subscribe_fn(move |group| {
//!         let key = *group.key();
//!         let sink = sink.clone();
//!         let sub = group.subscribe_fn(move |v| sink.lock().unwrap().push((key, v)));
//!         keep.lock().unwrap().push(sub);
//!     });
//!
//! source.on_next(('a', 1));
//! source.on_next(('b', 2));
//! source.on_next(('a', 3));
//!
//! assert_eq!(*seen.lock().unwrap(), vec![('a', 1), ('b', 2), ('a', 3)]);
//! ```

use crate::comparer::{KeyComparer, NaturalEq};
use crate::dispatcher::{DurationSelector, RootDispatcher, Selectors};
use crate::downstream::Downstream;
use crate::registry::KeyedRegistry;
use crate::GroupHandle;
use keyflux_core::sources::Never;
use keyflux_core::{
    CompositeDisposable, Disposable, DisposableRef, Observable, ObserverRef, RefCountDisposable,
    Result,
};
use std::hash::Hash;
use std::sync::Arc;

/// Observable of [`GroupHandle`]s produced by [`GroupByUntilExt::group_by_until`].
///
/// Every subscription runs its own grouping over its own source subscription.
pub struct GroupByUntil<V, K, E, X> {
    source: Arc<dyn Observable<V>>,
    selectors: Selectors<V, K, E, X>,
    comparer: Arc<dyn KeyComparer<K>>,
}

impl<V, K, E, X> GroupByUntil<V, K, E, X>
where
    V: 'static,
    K: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    X: 'static,
{
    /// Build the operator with fallible selectors, comparing keys with their own `Eq`/`Hash`.
    ///
    /// An `Err` from any selector is fatal to the whole operator.
    pub fn new<S, KS, ES, DS, D>(
        source: S,
        key_selector: KS,
        element_selector: ES,
        duration_selector: DS,
    ) -> Self
    where
        K: Hash + Eq,
        S: Observable<V> + 'static,
        KS: Fn(&V) -> Result<K> + Send + Sync + 'static,
        ES: Fn(V) -> Result<E> + Send + Sync + 'static,
        DS: Fn(&GroupHandle<K, E>) -> Result<D> + Send + Sync + 'static,
        D: Observable<X> + 'static,
    {
        Self::new_with_comparer(
            source,
            key_selector,
            element_selector,
            duration_selector,
            NaturalEq,
        )
    }

    /// Build the operator with fallible selectors and a custom key comparer.
    pub fn new_with_comparer<S, KS, ES, DS, D, C>(
        source: S,
        key_selector: KS,
        element_selector: ES,
        duration_selector: DS,
        comparer: C,
    ) -> Self
    where
        S: Observable<V> + 'static,
        KS: Fn(&V) -> Result<K> + Send + Sync + 'static,
        ES: Fn(V) -> Result<E> + Send + Sync + 'static,
        DS: Fn(&GroupHandle<K, E>) -> Result<D> + Send + Sync + 'static,
        D: Observable<X> + 'static,
        C: KeyComparer<K>,
    {
        let duration: DurationSelector<K, E, X> = Arc::new(move |group: &GroupHandle<K, E>| {
            duration_selector(group).map(|d| Arc::new(d) as Arc<dyn Observable<X>>)
        });

        Self {
            source: Arc::new(source),
            selectors: Selectors {
                key: Arc::new(key_selector),
                element: Arc::new(element_selector),
                duration,
            },
            comparer: Arc::new(comparer),
        }
    }

    /// Replace the key comparer.
    #[must_use]
    pub fn with_comparer<C: KeyComparer<K>>(mut self, comparer: C) -> Self {
        self.comparer = Arc::new(comparer);
        self
    }
}

impl<V, K, E, X> Observable<GroupHandle<K, E>> for GroupByUntil<V, K, E, X>
where
    V: 'static,
    K: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    X: 'static,
{
    fn subscribe(&self, observer: ObserverRef<GroupHandle<K, E>>) -> DisposableRef {
        let groups = Arc::new(CompositeDisposable::new());
        let lifetime = RefCountDisposable::new(groups.clone());
        let downstream = Arc::new(Downstream::new(observer));

        let dispatcher = RootDispatcher::new(
            self.selectors.clone(),
            KeyedRegistry::new(self.comparer.clone()),
            downstream.clone(),
            groups.clone(),
            lifetime.clone(),
        );
        // A source that terminates synchronously has already disposed `groups`;
        // adding to it then releases the subscription immediately.
        groups.add(self.source.subscribe(dispatcher));

        Arc::new(GroupBySubscription {
            downstream,
            lifetime,
        })
    }
}

/// Primary handle returned by subscribing to [`GroupByUntil`].
struct GroupBySubscription<T> {
    downstream: Arc<Downstream<T>>,
    lifetime: RefCountDisposable,
}

impl<T> Disposable for GroupBySubscription<T>
where
    Downstream<T>: Send + Sync,
{
    fn dispose(&self) {
        self.downstream.detach();
        self.lifetime.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.lifetime.is_disposed()
    }
}

/// `group_by_until` and friends for every [`Observable`].
pub trait GroupByUntilExt<V: 'static>: Observable<V> + Sized + 'static {
    /// Group values by key; each group closes when its duration stream first signals.
    ///
    /// - `key_selector` picks the group of a value.
    /// - `element_selector` projects the value pushed into the group.
    /// - `duration_selector` returns, for a newly opened group, the stream whose
    ///   first value or completion closes it. An error on that stream fails the
    ///   whole operator.
    ///
    /// A panicking selector fails the operator with
    /// [`FluxionError::CallbackPanic`](keyflux_core::FluxionError::CallbackPanic).
    ///
    /// Keys compare with their own `Eq`; chain
    /// [`with_comparer`](GroupByUntil::with_comparer) for any other equality.
    fn group_by_until<K, E, X, D, KS, ES, DS>(
        self,
        key_selector: KS,
        element_selector: ES,
        duration_selector: DS,
    ) -> GroupByUntil<V, K, E, X>
    where
        K: Clone + Hash + Eq + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        X: 'static,
        D: Observable<X> + 'static,
        KS: Fn(&V) -> K + Send + Sync + 'static,
        ES: Fn(V) -> E + Send + Sync + 'static,
        DS: Fn(&GroupHandle<K, E>) -> D + Send + Sync + 'static,
    {
        GroupByUntil::new(
            self,
            move |value: &V| Ok(key_selector(value)),
            move |value: V| Ok(element_selector(value)),
            move |group: &GroupHandle<K, E>| Ok(duration_selector(group)),
        )
    }

    /// Like [`group_by_until`](Self::group_by_until) with selectors that can fail.
    fn try_group_by_until<K, E, X, D, KS, ES, DS>(
        self,
        key_selector: KS,
        element_selector: ES,
        duration_selector: DS,
    ) -> GroupByUntil<V, K, E, X>
    where
        K: Clone + Hash + Eq + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        X: 'static,
        D: Observable<X> + 'static,
        KS: Fn(&V) -> Result<K> + Send + Sync + 'static,
        ES: Fn(V) -> Result<E> + Send + Sync + 'static,
        DS: Fn(&GroupHandle<K, E>) -> Result<D> + Send + Sync + 'static,
    {
        GroupByUntil::new(self, key_selector, element_selector, duration_selector)
    }

    /// Group values by key; groups stay open until the source terminates.
    fn group_by<K, E, KS, ES>(self, key_selector: KS, element_selector: ES) -> GroupByUntil<V, K, E, ()>
    where
        K: Clone + Hash + Eq + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        KS: Fn(&V) -> K + Send + Sync + 'static,
        ES: Fn(V) -> E + Send + Sync + 'static,
    {
        self.group_by_until(key_selector, element_selector, |_| Never::<()>::new())
    }
}

impl<V: 'static, S: Observable<V> + Sized + 'static> GroupByUntilExt<V> for S {}
