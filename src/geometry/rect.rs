//! Axis-aligned bounding box.

use super::Point;

/// Current position and size of an element or container.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Move the box to a new top-left position, keeping its size.
    pub fn set_position(&mut self, left: f64, top: f64) {
        self.left = left;
        self.top = top;
    }

    /// True when the two boxes overlap on both axes.
    pub fn is_intersect(&self, other: &Rect) -> bool {
        !(self.left >= other.right()
            || self.right() <= other.left
            || self.top >= other.bottom()
            || self.bottom() <= other.top)
    }

    /// True when the point falls inside the box (edges inclusive on top/left).
    pub fn contains_point(&self, p: &Point<f64>) -> bool {
        p.x >= self.left && p.x < self.right() && p.y >= self.top && p.y < self.bottom()
    }

    /// Grow this box to cover `other`.
    pub fn extend(&mut self, other: &Rect) {
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        self.top = self.top.min(other.top);
        self.left = self.left.min(other.left);
        self.width = right - self.left;
        self.height = bottom - self.top;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 50.0);
        assert_eq!(r.bottom(), 50.0);
    }

    #[test]
    fn test_is_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 20.0, 5.0, 5.0);

        assert!(a.is_intersect(&b));
        assert!(b.is_intersect(&a));
        assert!(!a.is_intersect(&c));

        // Touching edges do not intersect.
        let d = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.is_intersect(&d));
    }

    #[test]
    fn test_contains_point() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(&Point::new(0.0, 0.0)));
        assert!(r.contains_point(&Point::new(9.9, 9.9)));
        assert!(!r.contains_point(&Point::new(10.0, 5.0)));
    }

    #[test]
    fn test_extend() {
        let mut r = Rect::new(0.0, 0.0, 10.0, 10.0);
        r.extend(&Rect::new(15.0, 5.0, 10.0, 10.0));

        assert_eq!(r.top, 0.0);
        assert_eq!(r.left, 0.0);
        assert_eq!(r.right(), 15.0);
        assert_eq!(r.bottom(), 25.0);
    }
}
