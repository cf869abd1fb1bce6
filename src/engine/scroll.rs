//! Scroll container - viewport/overflow state of one branch.

use crate::engine::Sk;
use crate::geometry::{Point, Rect};

/// Per-branch scrollable viewport record.
#[derive(Debug, Clone)]
pub struct ScrollContainer {
    pub sk: Sk,
    /// Visible window, in the same coordinate space as element rects.
    pub viewport: Rect,
    /// Full scrollable content extent.
    pub total: Rect,
    /// Whether content overflows the viewport per axis.
    pub has_overflow: Point<bool>,
    /// Visibility is only recomputed dynamically when the branch actually
    /// overflows on at least one axis.
    pub allow_dynamic_visibility: bool,
    /// Current scroll offset.
    pub scroll_offset: Point<f64>,
    /// Offset at the moment the drag started.
    pub initial_offset: Point<f64>,
}

impl ScrollContainer {
    pub fn new(sk: Sk, viewport: Rect, total: Rect) -> Self {
        let has_overflow = Point::new(total.width > viewport.width, total.height > viewport.height);

        Self {
            sk,
            viewport,
            total,
            has_overflow,
            allow_dynamic_visibility: has_overflow.x || has_overflow.y,
            scroll_offset: Point::zero(),
            initial_offset: Point::zero(),
        }
    }

    /// A non-overflowing container: every sibling is always visible.
    pub fn without_overflow(sk: Sk, viewport: Rect) -> Self {
        Self::new(sk, viewport, viewport)
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.scroll_offset.set_axes(x, y);
    }

    /// Remember the offset the drag gesture starts from.
    pub fn mark_initial_offset(&mut self) {
        self.initial_offset = self.scroll_offset;
    }

    /// Grow the content extent to cover a newly registered element and
    /// re-derive the overflow state.
    pub fn absorb(&mut self, rect: &Rect) {
        self.total.extend(rect);
        self.has_overflow.set_axes(
            self.total.width > self.viewport.width,
            self.total.height > self.viewport.height,
        );
        self.allow_dynamic_visibility = self.has_overflow.x || self.has_overflow.y;
    }

    /// Intersection of an element rect with the current viewport window.
    pub fn is_rect_visible_viewport(&self, rect: &Rect) -> bool {
        let window = Rect::new(
            self.viewport.top + self.scroll_offset.y,
            self.viewport.left + self.scroll_offset.x,
            self.viewport.width,
            self.viewport.height,
        );

        rect.is_intersect(&window)
    }

    /// Release viewport-derived state on teardown.
    pub fn destroy(&mut self) {
        self.allow_dynamic_visibility = false;
        self.scroll_offset = Point::zero();
        self.initial_offset = Point::zero();
    }
}
