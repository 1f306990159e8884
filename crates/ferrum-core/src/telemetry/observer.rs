// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.

//! Process-wide hook for observing completed engine calls.

use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::registry::Shape;

/// Metadata about a completed kernel call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelCallEvent {
    pub name: String,
    pub shape: Shape,
    /// Logical element count processed.
    pub len: usize,
    /// Whether the call was split across the worker pool.
    pub parallel: bool,
}

/// Observer callback invoked after every successful engine call.
pub type CallObserver = Arc<dyn Fn(&KernelCallEvent) + Send + Sync + 'static>;

static CALL_OBSERVER: OnceLock<RwLock<Option<CallObserver>>> = OnceLock::new();

thread_local! {
    static IN_OBSERVER_CALLBACK: Cell<bool> = const { Cell::new(false) };
}

/// Install (or clear) the global call observer.
///
/// Returns the previously installed observer, if any.
pub fn set_call_observer(observer: Option<CallObserver>) -> Option<CallObserver> {
    let lock = CALL_OBSERVER.get_or_init(|| RwLock::new(None));
    let mut slot = lock.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, observer)
}

/// Emit an event to the installed observer.
///
/// Calls made from inside the observer are not reported again, and a panicking
/// observer never unwinds into the engine.
pub(crate) fn emit_call(name: &str, shape: Shape, len: usize, parallel: bool) {
    let Some(lock) = CALL_OBSERVER.get() else {
        return;
    };
    let observer = lock
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    let Some(observer) = observer else {
        return;
    };

    let already_in_callback = IN_OBSERVER_CALLBACK.with(|flag| flag.replace(true));
    if already_in_callback {
        return;
    }

    let event = KernelCallEvent {
        name: name.to_string(),
        shape,
        len,
        parallel,
    };
    let _ = catch_unwind(AssertUnwindSafe(|| observer(&event)));

    IN_OBSERVER_CALLBACK.with(|flag| flag.set(false));
}
