//! Parent container - grid dimensions and boundaries of one branch.

use crate::geometry::{Point, Rect};

/// Last-known width/height shared by all containers of one depth, used to
/// reuse space when an element migrates between them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Grid bookkeeping for one sibling container.
///
/// Rows and columns are 1-based; a provisional row of `0` means "above the
/// grid" and drives the top-exit path in the controller.
#[derive(Debug, Clone)]
pub struct ParentContainer {
    /// Host id of the parent node.
    pub id: String,
    /// Occupied extents: `x` is the widest row, `y` the number of rows.
    pub grid: Point<i32>,
    /// Bounding box grown around every registered element.
    pub boundaries: Option<Rect>,
    /// Top-left of the most recently registered element, kept for restoring
    /// append positions.
    pub last_elm_position: Option<Point<f64>>,
    original_length: usize,
    cursor: Point<i32>,
    prev_rect: Option<Rect>,
}

impl ParentContainer {
    pub fn new(length: usize, id: &str) -> Self {
        Self {
            id: id.to_string(),
            grid: Point::default(),
            boundaries: None,
            last_elm_position: None,
            original_length: length,
            cursor: Point::default(),
            prev_rect: None,
        }
    }

    pub fn original_length(&self) -> usize {
        self.original_length
    }

    /// Register one element's rectangle, in branch order. Returns the grid
    /// cell assigned to that element.
    ///
    /// A rect whose top clears the previous rect's bottom opens a new row.
    pub fn register(&mut self, rect: &Rect, unified: &mut Dimensions) -> Point<i32> {
        match self.boundaries {
            Some(ref mut boundaries) => boundaries.extend(rect),
            None => self.boundaries = Some(*rect),
        }

        match self.prev_rect {
            Some(prev) if rect.top < prev.bottom() => {
                // Same row, next column.
                self.cursor.x += 1;
            }
            _ => {
                self.cursor.y += 1;
                self.cursor.x = 1;
            }
        }

        self.grid.x = self.grid.x.max(self.cursor.x);
        self.grid.y = self.grid.y.max(self.cursor.y);

        self.prev_rect = Some(*rect);
        self.last_elm_position = Some(Point::new(rect.left, rect.top));

        if let Some(boundaries) = self.boundaries {
            unified.width = unified.width.max(boundaries.width);
            unified.height = unified.height.max(boundaries.height);
        }

        self.cursor
    }

    /// Reset the grid metrics before replaying every sibling's rectangle
    /// through [`Self::register`] in branch order.
    pub fn reset_indicators(&mut self, length: usize) {
        self.grid = Point::default();
        self.cursor = Point::default();
        self.boundaries = None;
        self.prev_rect = None;
        self.last_elm_position = None;
        self.original_length = length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_rect(index: usize) -> Rect {
        Rect::new(index as f64 * 20.0, 0.0, 100.0, 20.0)
    }

    #[test]
    fn test_single_column_rows() {
        let mut container = ParentContainer::new(3, "p");
        let mut unified = Dimensions::default();

        assert_eq!(container.register(&row_rect(0), &mut unified), Point::new(1, 1));
        assert_eq!(container.register(&row_rect(1), &mut unified), Point::new(1, 2));
        assert_eq!(container.register(&row_rect(2), &mut unified), Point::new(1, 3));

        assert_eq!(container.grid, Point::new(1, 3));
        assert_eq!(container.last_elm_position, Some(Point::new(0.0, 40.0)));
    }

    #[test]
    fn test_two_by_two_grid() {
        let mut container = ParentContainer::new(4, "p");
        let mut unified = Dimensions::default();

        container.register(&Rect::new(0.0, 0.0, 50.0, 20.0), &mut unified);
        container.register(&Rect::new(0.0, 50.0, 50.0, 20.0), &mut unified);
        container.register(&Rect::new(20.0, 0.0, 50.0, 20.0), &mut unified);
        container.register(&Rect::new(20.0, 50.0, 50.0, 20.0), &mut unified);

        assert_eq!(container.grid, Point::new(2, 2));
    }

    #[test]
    fn test_boundaries_and_unified_dimensions() {
        let mut container = ParentContainer::new(2, "p");
        let mut unified = Dimensions::default();

        container.register(&row_rect(0), &mut unified);
        container.register(&row_rect(1), &mut unified);

        let boundaries = container.boundaries.unwrap();
        assert_eq!(boundaries.top, 0.0);
        assert_eq!(boundaries.bottom(), 40.0);
        assert_eq!(unified.height, 40.0);
        assert_eq!(unified.width, 100.0);
    }

    #[test]
    fn test_reset_indicators() {
        let mut container = ParentContainer::new(2, "p");
        let mut unified = Dimensions::default();
        container.register(&row_rect(0), &mut unified);

        container.reset_indicators(5);

        assert_eq!(container.grid, Point::default());
        assert!(container.boundaries.is_none());
        assert!(container.last_elm_position.is_none());
        assert_eq!(container.original_length(), 5);

        // Replaying starts the grid over.
        assert_eq!(container.register(&row_rect(0), &mut unified), Point::new(1, 1));
    }
}
