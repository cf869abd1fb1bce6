//! Engine records - the data model owned by the store.
//!
//! - [`DragElement`] - one draggable unit (rect, translate, dual order)
//! - [`ParentContainer`] - grid dimensions and boundaries of one branch
//! - [`ScrollContainer`] - viewport/overflow state of one branch
//! - [`MigrationCycle`] - append-only container-transition log
//! - [`Tracker`] - prefixed id generation

mod container;
mod cycle;
mod element;
mod scroll;
mod tracker;

pub use container::{Dimensions, ParentContainer};
pub use cycle::{MigrationCycle, MigrationEvent, VerticalMargin};
pub use element::{DragElement, ElementSnapshot};
pub use scroll::ScrollContainer;
pub use tracker::{Tracker, PREFIX_CYCLE};

use std::fmt;

/// Sentinel id for a transient empty slot during cross-container insertion.
pub const APPEND_EMPTY_ELM_ID: &str = "";

/// Stable key identifying one branch of siblings (one parent, one depth).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sk(String);

impl Sk {
    /// Derive the key from the owning parent identity and nesting depth.
    pub fn from_parent(depth: u8, parent_id: &str) -> Self {
        Sk(format!("{depth}_{parent_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True when the id marks an eligible sibling: not the dragged element, not
/// the transient empty slot, and not a readonly element.
pub fn is_id_eligible(id: &str, dragged_id: &str, readonly: bool) -> bool {
    !id.is_empty() && id != dragged_id && !readonly
}
