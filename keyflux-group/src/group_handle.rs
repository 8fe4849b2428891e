// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use keyflux_core::{
    Disposable, DisposableRef, Observable, ObserverRef, RefCountDisposable, RefCountGuard,
    Subject,
};
use std::fmt::{self, Debug};
use std::sync::Arc;

/// One open episode of a key: a read-only view of the group's elements.
///
/// Handles emitted downstream keep the whole operator alive: every
/// subscription to such a handle holds a reference on the operator's shared
/// teardown until that subscription is disposed. The handle passed to the
/// duration selector holds no such reference.
///
/// Groups are hot. Subscribe while handling the `on_next` that delivers the
/// handle to see every element of the group. Subscriptions to an emitted
/// handle are released when disposed or dropped.
pub struct GroupHandle<K, E> {
    key: K,
    channel: Subject<E>,
    lifetime: Option<RefCountDisposable>,
}

impl<K, E: Clone + Send + Sync + 'static> GroupHandle<K, E> {
    pub(crate) fn owned(key: K, channel: Subject<E>, lifetime: RefCountDisposable) -> Self {
        Self {
            key,
            channel,
            lifetime: Some(lifetime),
        }
    }

    pub(crate) fn detached(key: K, channel: Subject<E>) -> Self {
        Self {
            key,
            channel,
            lifetime: None,
        }
    }

    /// The key shared by every element of this group.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns `true` once the group completed or failed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.channel.is_terminated()
    }

    /// Returns `true` if two handles view the same open episode.
    ///
    /// A key reopened after its group closed gets a new episode.
    #[must_use]
    pub fn same_group(&self, other: &Self) -> bool {
        self.channel.same_channel(&other.channel)
    }

    /// Number of observers currently subscribed to this group.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.channel.subscriber_count()
    }
}

impl<K: Clone, E> Clone for GroupHandle<K, E> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            channel: self.channel.clone(),
            lifetime: self.lifetime.clone(),
        }
    }
}

impl<K: Debug, E> Debug for GroupHandle<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupHandle")
            .field("key", &self.key)
            .field("owned", &self.lifetime.is_some())
            .finish()
    }
}

impl<K, E> Observable<E> for GroupHandle<K, E>
where
    K: Send + Sync,
    E: Clone + Send + Sync + 'static,
{
    fn subscribe(&self, observer: ObserverRef<E>) -> DisposableRef {
        match &self.lifetime {
            Some(lifetime) => {
                let guard = lifetime.acquire();
                let subscription = self.channel.subscribe(observer);
                Arc::new(GroupSubscription {
                    subscription,
                    guard,
                })
            }
            None => self.channel.subscribe(observer),
        }
    }
}

struct GroupSubscription {
    subscription: DisposableRef,
    guard: RefCountGuard,
}

impl Disposable for GroupSubscription {
    fn dispose(&self) {
        self.subscription.dispose();
        self.guard.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.guard.is_disposed()
    }
}

impl Drop for GroupSubscription {
    fn drop(&mut self) {
        self.dispose();
    }
}
