//! Element record - one draggable unit.
//!
//! Keeps the dual ordering the whole engine revolves around:
//! `vdom_index` (intended index within the branch) and `dom_index` (actual
//! index among live host-tree siblings). The two converge only after
//! reconciliation; during an active drag they diverge freely.

use std::collections::HashSet;

use crate::dom::{DomAdapter, Indicator};
use crate::engine::Sk;
use crate::geometry::{Axis, Direction, Point, Rect};

/// Plain snapshot of an element record for external inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSnapshot {
    pub id: String,
    pub depth: u8,
    pub readonly: bool,
    pub rect: Rect,
    pub translate: Point<f64>,
    pub grid: Point<i32>,
    pub vdom_index: usize,
    pub dom_index: usize,
    pub is_visible: bool,
    pub sk: Sk,
}

/// One registered draggable unit.
#[derive(Debug, Clone)]
pub struct DragElement {
    pub id: String,
    pub depth: u8,
    /// Excluded from reordering targets.
    pub readonly: bool,
    /// Current bounding box.
    pub rect: Rect,
    /// Accumulated visual offset applied during drag.
    pub translate: Point<f64>,
    /// Grid position within the container (1-based rows/columns).
    pub grid: Point<i32>,
    /// Intended index within the branch after the drag.
    pub vdom_index: usize,
    /// Actual current index among live host-tree siblings.
    pub dom_index: usize,
    /// Derived from the scrollable viewport.
    pub is_visible: bool,
    /// Owning branch key.
    pub sk: Sk,
    applied_indicators: HashSet<Indicator>,
}

impl DragElement {
    pub fn new(id: &str, depth: u8, readonly: bool, sk: Sk, rect: Rect, index: usize) -> Self {
        Self {
            id: id.to_string(),
            depth,
            readonly,
            rect,
            translate: Point::zero(),
            grid: Point::default(),
            vdom_index: index,
            dom_index: index,
            is_visible: true,
            sk,
            applied_indicators: HashSet::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Transform
    // -------------------------------------------------------------------------

    /// Re-apply the accumulated translate to the host node. Used when a
    /// visible element is re-registered and must preserve its last change.
    pub fn transform(&self, dom: &mut dyn DomAdapter) {
        dom.transform(&self.id, self.translate.x, self.translate.y);
    }

    /// Shift this element one slot toward `toward` along `axis`, moving it
    /// visually by `space` and writing its id into the new branch slot.
    ///
    /// The vacated slot keeps its stale id until another element (or the
    /// settling dragged element) claims it.
    pub fn shift(
        &mut self,
        dom: &mut dyn DomAdapter,
        axis: Axis,
        toward: Direction,
        space: f64,
        branch: &mut [String],
    ) {
        let offset = space * toward.sign();

        match axis {
            Axis::X => {
                self.translate.x += offset;
                self.grid.x += toward.sign() as i32;
            }
            Axis::Y => {
                self.translate.y += offset;
                self.grid.y += toward.sign() as i32;
            }
        }

        let new_index = match toward {
            Direction::Backward => self.vdom_index - 1,
            Direction::Forward => self.vdom_index + 1,
        };

        self.assign_new_position(branch, new_index);

        dom.transform(&self.id, self.translate.x, self.translate.y);
        let index = self.vdom_index.to_string();
        self.set_attribute(dom, Indicator::Index, &index);
    }

    /// Write this element's id into the branch slot at `index` and adopt it
    /// as the intended order.
    pub fn assign_new_position(&mut self, branch: &mut [String], index: usize) {
        if let Some(slot) = branch.get_mut(index) {
            *slot = self.id.clone();
        }
        self.vdom_index = index;
    }

    // -------------------------------------------------------------------------
    // Reconciliation State
    // -------------------------------------------------------------------------

    /// True when the element carries a non-zero accumulated transform.
    pub fn has_transformed_from_origin(&self) -> bool {
        !self.translate.is_zero()
    }

    /// True when the intended order leads the live host order.
    pub fn need_reconciliation(&self) -> bool {
        self.vdom_index != self.dom_index
    }

    /// Clear the inline transform and all indicator attributes after commit.
    pub fn flush_indicators(&mut self, dom: &mut dyn DomAdapter) {
        dom.transform(&self.id, 0.0, 0.0);
        self.translate = Point::zero();

        dom.remove_attribute(&self.id, Indicator::Index);
        for indicator in self.applied_indicators.drain() {
            dom.remove_attribute(&self.id, indicator);
        }
    }

    // -------------------------------------------------------------------------
    // Indicator Attributes
    // -------------------------------------------------------------------------

    /// Mirror an indicator onto the host node. `Index` is always re-applied;
    /// the rest are set once until removed.
    pub fn set_attribute(&mut self, dom: &mut dyn DomAdapter, attr: Indicator, value: &str) {
        if attr == Indicator::Index {
            dom.set_attribute(&self.id, attr, value);
            return;
        }

        if self.applied_indicators.contains(&attr) {
            return;
        }

        dom.set_attribute(&self.id, attr, value);
        self.applied_indicators.insert(attr);
    }

    pub fn remove_attribute(&mut self, dom: &mut dyn DomAdapter, attr: Indicator) {
        if attr != Indicator::Index && !self.applied_indicators.remove(&attr) {
            return;
        }

        dom.remove_attribute(&self.id, attr);
    }

    // -------------------------------------------------------------------------
    // Visibility
    // -------------------------------------------------------------------------

    pub fn change_visibility(&mut self, visible: bool) {
        self.is_visible = visible;
    }

    pub fn serialize(&self) -> ElementSnapshot {
        ElementSnapshot {
            id: self.id.clone(),
            depth: self.depth,
            readonly: self.readonly,
            rect: self.rect,
            translate: self.translate,
            grid: self.grid,
            vdom_index: self.vdom_index,
            dom_index: self.dom_index,
            is_visible: self.is_visible,
            sk: self.sk.clone(),
        }
    }
}
