// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::{Disposable, DisposableRef};
use crate::logging::debug;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Handle to one member of a [`CompositeDisposable`].
///
/// Ids are never reused within one composite, so a stale id can only miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(u64);

struct CompositeState {
    disposed: bool,
    next_id: u64,
    members: HashMap<SlotId, DisposableRef>,
}

/// A growable set of disposables released together.
///
/// Members live in an arena addressed by [`SlotId`], so owners refer to their
/// slot by index instead of holding the composite and the member in a cycle.
///
/// ```
/// use keyflux_core::{BooleanDisposable, CompositeDisposable, Disposable};
/// use std::sync::Arc;
///
/// let composite = CompositeDisposable::new();
/// let member = Arc::new(BooleanDisposable::new());
/// let slot = composite.add(member.clone());
///
/// assert!(composite.remove(slot));
/// assert!(member.is_disposed());
/// assert!(!composite.remove(slot));
/// ```
pub struct CompositeDisposable {
    state: Mutex<CompositeState>,
}

impl CompositeDisposable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CompositeState {
                disposed: false,
                next_id: 0,
                members: HashMap::new(),
            }),
        }
    }

    /// Add a member and return its slot.
    ///
    /// If the composite is already disposed the member is disposed immediately;
    /// the returned slot is then empty.
    pub fn add(&self, member: DisposableRef) -> SlotId {
        let mut state = self.state.lock();
        let id = SlotId(state.next_id);
        state.next_id += 1;

        if state.disposed {
            drop(state);
            member.dispose();
        } else {
            state.members.insert(id, member);
        }
        id
    }

    /// Remove the member in `slot` and dispose it.
    ///
    /// Returns `false` if the slot was already empty.
    pub fn remove(&self, slot: SlotId) -> bool {
        let removed = self.state.lock().members.remove(&slot);
        match removed {
            Some(member) => {
                member.dispose();
                true
            }
            None => false,
        }
    }

    /// Number of members currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CompositeDisposable {
    fn default() -> Self {
        Self::new()
    }
}

impl Disposable for CompositeDisposable {
    fn dispose(&self) {
        let members: Vec<DisposableRef> = {
            let mut state = self.state.lock();
            if state.disposed {
                return;
            }
            state.disposed = true;
            state.members.drain().map(|(_, member)| member).collect()
        };

        debug!("composite disposing {} members", members.len());
        for member in members {
            member.dispose();
        }
    }

    fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }
}
