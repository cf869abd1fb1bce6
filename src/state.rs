//! Reactive layout-state flags.
//!
//! Thread-local signals external bindings can observe through
//! `spark_signals::effect`. The store drives these; the mechanism reads
//! `is_transforming` before touching layout-sensitive state.

use spark_signals::{signal, Signal};

use crate::store::LayoutStatus;

// =============================================================================
// Reactive State
// =============================================================================

/// Coarse layout lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    Idle,
    Pending,
    Ready,
}

thread_local! {
    static LAYOUT_STATE: Signal<LayoutState> = signal(LayoutState::Idle);
    static IS_TRANSFORMING: Signal<bool> = signal(false);
}

/// Current layout lifecycle state.
pub fn layout_state() -> LayoutState {
    LAYOUT_STATE.with(|s| s.get())
}

pub fn set_layout_state(state: LayoutState) {
    LAYOUT_STATE.with(|s| s.set(state));
}

pub(crate) fn set_layout_status(status: LayoutStatus) {
    set_layout_state(match status {
        LayoutStatus::Pending => LayoutState::Pending,
        LayoutStatus::Ready => LayoutState::Ready,
    });
}

/// True while a drag gesture is actively transforming elements.
pub fn is_transforming() -> bool {
    IS_TRANSFORMING.with(|s| s.get())
}

pub fn set_transforming(value: bool) {
    IS_TRANSFORMING.with(|s| s.set(value));
}

/// Reset all reactive state (for testing and full teardown).
pub fn reset_layout_signals() {
    LAYOUT_STATE.with(|s| s.set(LayoutState::Idle));
    IS_TRANSFORMING.with(|s| s.set(false));
}
