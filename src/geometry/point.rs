//! Generic x/y value pair.

/// A pair of values on the x and y axes.
///
/// Used for positions, translate offsets and grid coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Set both axes at once.
    pub fn set_axes(&mut self, x: T, y: T) {
        self.x = x;
        self.y = y;
    }
}

impl<T: Copy> Point<T> {
    /// Copy both axes from another point.
    pub fn clone_from_point(&mut self, other: &Point<T>) {
        self.x = other.x;
        self.y = other.y;
    }
}

impl Point<f64> {
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Add an offset to both axes.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_axes() {
        let mut p = Point::new(1.0, 2.0);
        p.set_axes(3.0, 4.0);
        assert_eq!(p, Point::new(3.0, 4.0));
    }

    #[test]
    fn test_clone_from_point() {
        let mut p = Point::new(0, 0);
        p.clone_from_point(&Point::new(7, 9));
        assert_eq!(p, Point::new(7, 9));
    }

    #[test]
    fn test_zero_and_translate() {
        let mut p = Point::zero();
        assert!(p.is_zero());

        p.translate(2.5, -1.5);
        assert!(!p.is_zero());
        assert_eq!(p, Point::new(2.5, -1.5));
    }
}
