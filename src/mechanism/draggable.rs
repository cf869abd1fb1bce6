//! Draggable - transient per-gesture state of the lifted element.
//!
//! Created on pointer-down, discarded on pointer-up. Everything durable
//! (branch order, element records, the migration log) lives in the store;
//! the draggable only tracks where the lifted element visually is and which
//! slot it provisionally claims.

use crate::dom::{DomAdapter, Indicator};
use crate::engine::{MigrationCycle, Sk, PREFIX_CYCLE};
use crate::error::StoreError;
use crate::geometry::{Axis, DirFlags, Point, Rect};
use crate::mechanism::threshold::{Threshold, ThresholdPercentages};
use crate::state;
use crate::store::Store;

/// Scroll sampling state for the container currently hosting the dragged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollSample {
    pub enable: bool,
    pub is_scrolling: bool,
    pub current: Point<f64>,
    pub initial: Point<f64>,
}

/// The lifted element and the slot it provisionally claims.
pub struct Draggable {
    pub id: String,
    pub depth: u8,
    /// Bounding box at grab time.
    pub origin_rect: Rect,
    pub origin_index: usize,
    pub origin_sk: Sk,
    /// Translate the element carried from before this gesture.
    pub translate_placeholder: Point<f64>,
    /// Grid cell the dragged provisionally occupies.
    pub grid_placeholder: Point<i32>,
    /// Absolute top/left of the claimed slot.
    pub occupied_position: Point<f64>,
    /// Translate that settles the element into the claimed slot.
    pub occupied_translate: Point<f64>,
    /// Cycle ids touched by this gesture, in order.
    pub session: Vec<String>,
    pub threshold: Threshold,
    pub scroll: ScrollSample,
    initial_pointer: Point<f64>,
    /// Accumulated visual displacement since grab (pointer + scroll).
    delta: Point<f64>,
}

impl Draggable {
    /// Lift `id`: snapshot its state, mark it on the host node, install its
    /// thresholds and open a fresh migration cycle in the store.
    pub fn new(
        store: &mut Store,
        dom: &mut dyn DomAdapter,
        id: &str,
        percentages: ThresholdPercentages,
        pointer_x: f64,
        pointer_y: f64,
    ) -> Result<Self, StoreError> {
        let (elm, rect) = {
            let elm = store.get_element(id)?;
            let rect = dom.rect(id).unwrap_or(elm.rect);
            (elm.serialize(), rect)
        };

        let scroll_record = store.scroll_mut(&elm.sk)?;
        scroll_record.mark_initial_offset();
        let scroll = ScrollSample {
            enable: scroll_record.allow_dynamic_visibility,
            is_scrolling: false,
            current: scroll_record.scroll_offset,
            initial: scroll_record.scroll_offset,
        };

        let mut threshold = Threshold::new(percentages);
        threshold.set_main_threshold(id, &rect);
        if let Some(boundaries) = store.get_container(&elm.sk)?.boundaries {
            threshold.set_main_threshold(elm.sk.as_str(), &boundaries);
        }

        store
            .get_element_mut(id)?
            .set_attribute(dom, Indicator::Dragged, "true");

        let cycle_id = store.tracker.new_travel(PREFIX_CYCLE);
        store.migration = Some(MigrationCycle::new(
            elm.vdom_index,
            elm.sk.clone(),
            cycle_id.clone(),
            scroll.enable,
        ));

        state::set_transforming(true);

        Ok(Self {
            id: id.to_string(),
            depth: elm.depth,
            origin_rect: rect,
            origin_index: elm.vdom_index,
            origin_sk: elm.sk.clone(),
            translate_placeholder: elm.translate,
            grid_placeholder: elm.grid,
            occupied_position: Point::new(rect.left, rect.top),
            occupied_translate: elm.translate,
            session: vec![cycle_id],
            threshold,
            scroll,
            initial_pointer: Point::new(pointer_x, pointer_y),
            delta: Point::zero(),
        })
    }

    // -------------------------------------------------------------------------
    // Movement
    // -------------------------------------------------------------------------

    /// Apply raw pointer coordinates plus the current scroll offset to the
    /// host node.
    pub fn drag_at(&mut self, dom: &mut dyn DomAdapter, x: f64, y: f64) {
        self.delta.set_axes(
            (x - self.initial_pointer.x) + (self.scroll.current.x - self.scroll.initial.x),
            (y - self.initial_pointer.y) + (self.scroll.current.y - self.scroll.initial.y),
        );

        dom.transform(
            &self.id,
            self.translate_placeholder.x + self.delta.x,
            self.translate_placeholder.y + self.delta.y,
        );
    }

    /// Fold a scroll delta into the accumulated displacement, keeping the
    /// host node under the (unmoved) pointer. `absolute_rect` stays current
    /// without waiting for the next pointer sample.
    pub fn scroll_by(&mut self, dom: &mut dyn DomAdapter, dx: f64, dy: f64) {
        self.scroll.current.translate(dx, dy);
        self.delta.translate(dx, dy);

        dom.transform(
            &self.id,
            self.translate_placeholder.x + self.delta.x,
            self.translate_placeholder.y + self.delta.y,
        );
    }

    /// Where the element visually sits right now, in absolute coordinates.
    pub fn absolute_rect(&self) -> Rect {
        let mut rect = self.origin_rect;
        rect.set_position(
            self.origin_rect.left + self.delta.x,
            self.origin_rect.top + self.delta.y,
        );
        rect
    }

    // -------------------------------------------------------------------------
    // Threshold Queries
    // -------------------------------------------------------------------------

    /// Crossing flags for the dragged element's own slot threshold.
    pub fn is_out_position(&mut self) -> DirFlags {
        let probe = self.absolute_rect();
        self.threshold.is_out(&self.id, &probe)
    }

    /// Crossing flags for a container threshold.
    pub fn is_out_container(&mut self, sk: &Sk) -> DirFlags {
        let probe = self.absolute_rect();
        self.threshold.is_out(sk.as_str(), &probe)
    }

    // -------------------------------------------------------------------------
    // Slot Claims
    // -------------------------------------------------------------------------

    /// Claim a slot `space` away along `axis`, `steps` grid cells over. The
    /// threshold follows the claimed slot so the next crossing is measured
    /// from it.
    pub fn claim_slot(&mut self, axis: Axis, space: f64, steps: i32) {
        match axis {
            Axis::X => {
                self.occupied_position.x += space;
                self.occupied_translate.x += space;
                self.grid_placeholder.x += steps;
            }
            Axis::Y => {
                self.occupied_position.y += space;
                self.occupied_translate.y += space;
                self.grid_placeholder.y += steps;
            }
        }

        self.anchor_threshold();
    }

    /// Claim a slot at an explicit absolute position (container migration or
    /// append-after-last restores).
    pub fn claim_slot_at(&mut self, top: f64, left: f64) {
        self.occupied_translate.x += left - self.occupied_position.x;
        self.occupied_translate.y += top - self.occupied_position.y;
        self.occupied_position.set_axes(left, top);

        self.anchor_threshold();
    }

    fn anchor_threshold(&mut self) {
        let mut slot = self.origin_rect;
        slot.set_position(self.occupied_position.x, self.occupied_position.y);
        self.threshold.set_main_threshold(&self.id, &slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::mock::MockDom;
    use crate::store::test_fixtures::*;

    fn lift(store: &mut Store, dom: &mut MockDom, id: &str) -> Draggable {
        Draggable::new(store, dom, id, ThresholdPercentages::default(), 50.0, 10.0).unwrap()
    }

    #[test]
    fn test_lift_snapshots_state_and_opens_migration() {
        let mut store = Store::new();
        let mut dom = MockDom::new();
        let sk = seed_list(&mut store, &mut dom, "list", &["a", "b", "c"]);

        let draggable = lift(&mut store, &mut dom, "b");

        assert_eq!(draggable.origin_index, 1);
        assert_eq!(draggable.origin_sk, sk);
        assert_eq!(draggable.occupied_position, Point::new(0.0, ROW_HEIGHT));
        assert_eq!(dom.attr("b", Indicator::Dragged), Some("true"));

        let migration = store.migration.as_ref().unwrap();
        assert_eq!(migration.latest().index, Some(1));
        assert_eq!(migration.latest().sk, sk);
        assert_eq!(draggable.session, vec!["cycle_0".to_string()]);
        assert!(state::is_transforming());

        state::reset_layout_signals();
    }

    #[test]
    fn test_drag_at_composes_pointer_and_scroll() {
        let mut store = Store::new();
        let mut dom = MockDom::new();
        seed_list(&mut store, &mut dom, "list", &["a", "b"]);

        let mut draggable = lift(&mut store, &mut dom, "a");
        draggable.drag_at(&mut dom, 53.0, 14.0);
        assert_eq!(dom.transform_of("a"), Point::new(3.0, 4.0));

        // The scroll alone keeps the visual and the absolute rect current.
        draggable.scroll_by(&mut dom, 0.0, 30.0);
        assert_eq!(dom.transform_of("a"), Point::new(3.0, 34.0));
        let rect = draggable.absolute_rect();
        assert_eq!(rect.top, 34.0);
        assert_eq!(rect.left, 3.0);

        draggable.drag_at(&mut dom, 53.0, 14.0);
        assert_eq!(dom.transform_of("a"), Point::new(3.0, 34.0));

        state::reset_layout_signals();
    }

    #[test]
    fn test_claim_slot_moves_threshold_with_the_slot() {
        let mut store = Store::new();
        let mut dom = MockDom::new();
        seed_list(&mut store, &mut dom, "list", &["a", "b"]);

        let mut draggable = lift(&mut store, &mut dom, "a");
        draggable.claim_slot(Axis::Y, ROW_HEIGHT, 1);

        assert_eq!(draggable.occupied_position.y, ROW_HEIGHT);
        assert_eq!(draggable.occupied_translate.y, ROW_HEIGHT);
        assert_eq!(draggable.grid_placeholder.y, 2);

        // Still inside the threshold of the claimed slot.
        draggable.drag_at(&mut dom, 50.0, 10.0 + ROW_HEIGHT);
        assert!(draggable.is_out_position().is_all_falsy());

        state::reset_layout_signals();
    }
}
