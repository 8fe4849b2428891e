// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::{Disposable, DisposableRef};
use crate::{FluxionError, Result};
use parking_lot::Mutex;

#[derive(Default)]
struct SlotState {
    disposed: bool,
    assigned: bool,
    current: Option<DisposableRef>,
}

/// A slot that receives its disposable after it was created.
///
/// Lets a subscription be registered for teardown before the call that
/// produces its handle returns. Disposing first and assigning later disposes
/// the late handle on assignment.
#[derive(Default)]
pub struct SingleAssignmentDisposable {
    state: Mutex<SlotState>,
}

impl SingleAssignmentDisposable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the disposable held by this slot.
    ///
    /// # Errors
    ///
    /// Returns [`FluxionError::InvalidState`] when the slot was already assigned.
    /// The rejected disposable is left untouched.
    pub fn set(&self, disposable: DisposableRef) -> Result<()> {
        let mut state = self.state.lock();
        if state.assigned {
            return Err(FluxionError::invalid_state(
                "single-assignment disposable already assigned",
            ));
        }
        state.assigned = true;

        if state.disposed {
            drop(state);
            disposable.dispose();
        } else {
            state.current = Some(disposable);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.state.lock().assigned
    }
}

impl Disposable for SingleAssignmentDisposable {
    fn dispose(&self) {
        let current = {
            let mut state = self.state.lock();
            state.disposed = true;
            state.current.take()
        };
        if let Some(current) = current {
            current.dispose();
        }
    }

    fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }
}
