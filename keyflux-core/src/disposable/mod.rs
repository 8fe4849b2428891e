// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Scoped teardown of subscriptions and other resources.
//!
//! Every variant is idempotent: calling [`Disposable::dispose`] a second time
//! has no effect.

mod basic;
mod composite;
mod ref_count;
mod single_assignment;

pub use basic::{ActionDisposable, BooleanDisposable, EmptyDisposable};
pub use composite::{CompositeDisposable, SlotId};
pub use ref_count::{RefCountDisposable, RefCountGuard};
pub use single_assignment::SingleAssignmentDisposable;

use std::sync::Arc;

/// A resource that can be released.
pub trait Disposable: Send + Sync {
    /// Release the resource. Idempotent.
    fn dispose(&self);

    /// Returns `true` once `dispose` has been called.
    fn is_disposed(&self) -> bool;
}

/// Shared, type-erased disposable.
pub type DisposableRef = Arc<dyn Disposable>;

impl<D: Disposable + ?Sized> Disposable for Arc<D> {
    fn dispose(&self) {
        (**self).dispose();
    }

    fn is_disposed(&self) -> bool {
        (**self).is_disposed()
    }
}
