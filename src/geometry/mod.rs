//! Geometry primitives shared across the engine.
//!
//! - [`Point`] - generic x/y value pair
//! - [`Rect`] - axis-aligned bounding box (top/left/width/height)
//! - [`DirFlags`] - direction truth set (top/right/bottom/left)

mod four_directions;
mod point;
mod rect;

pub use four_directions::DirFlags;
pub use point::Point;
pub use rect::Rect;

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Movement direction along an axis. `Backward` is up/left, `Forward` is
/// down/right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    /// Signed unit value for offset arithmetic.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Backward => -1.0,
            Direction::Forward => 1.0,
        }
    }
}
