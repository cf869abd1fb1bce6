//! Direction truth sets over the four clockwise directions.

use bitflags::bitflags;

use super::Axis;

bitflags! {
    /// Which directions are currently "on" (out of threshold, overflowing, ...).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct DirFlags: u8 {
        const TOP = 1 << 0;
        const RIGHT = 1 << 1;
        const BOTTOM = 1 << 2;
        const LEFT = 1 << 3;
    }
}

impl DirFlags {
    /// True when at least one direction on the given axis is set.
    pub fn is_one_truthy_by_axis(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.intersects(DirFlags::LEFT | DirFlags::RIGHT),
            Axis::Y => self.intersects(DirFlags::TOP | DirFlags::BOTTOM),
        }
    }

    pub fn is_all_falsy(&self) -> bool {
        self.is_empty()
    }

    pub fn is_one_truthy(&self) -> bool {
        !self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_flags_by_axis() {
        let flags = DirFlags::TOP;
        assert!(flags.is_one_truthy_by_axis(Axis::Y));
        assert!(!flags.is_one_truthy_by_axis(Axis::X));
        assert!(flags.is_one_truthy());

        let empty = DirFlags::empty();
        assert!(empty.is_all_falsy());
        assert!(!empty.is_one_truthy_by_axis(Axis::Y));
    }
}
