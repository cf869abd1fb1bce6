//! # gridshift
//!
//! Drag-and-drop list/grid reordering engine.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! reactive layout-state flags external bindings observe.
//!
//! ## Architecture
//!
//! Elements are organized into sibling branches (one per container key) and
//! carry a dual ordering: the intended index within the branch and the actual
//! index among live host-tree children. The two diverge freely during a drag
//! and converge at commit:
//! ```text
//! pointer sample → MechanismController → branch/migration updates
//!               → commit → reconciler (minimal host moves) → listeners
//! ```
//!
//! The host tree (a real DOM, a TUI node tree, a test double) is reached only
//! through the [`DomAdapter`] trait.
//!
//! ## Modules
//!
//! - [`geometry`] - point, rect, four-direction primitives
//! - [`engine`] - element, container, scroll and migration records
//! - [`store`] - registry store, update queue, reconciler, visibility
//! - [`mechanism`] - thresholds, per-gesture state, the drag controller

pub mod dom;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod mechanism;
pub mod state;
pub mod store;

// Re-export commonly used items
pub use dom::{DomAdapter, Indicator};
pub use error::StoreError;

pub use geometry::{Axis, DirFlags, Direction, Point, Rect};

pub use engine::{
    is_id_eligible, DragElement, ElementSnapshot, MigrationCycle, MigrationEvent,
    ParentContainer, ScrollContainer, Sk, Tracker, VerticalMargin, APPEND_EMPTY_ELM_ID,
};

pub use store::{
    update_branch_visibility, DragEvent, DragEventHandler, LayoutStatus, Listeners,
    RegisterSpec, Store, Update, UpdateQueue, UpdateTask,
};

pub use mechanism::{
    Draggable, MechanismController, PendingMigration, ScrollSample, Threshold,
    ThresholdPercentages,
};

pub use state::{
    is_transforming, layout_state, reset_layout_signals, set_layout_state, set_transforming,
    LayoutState,
};
