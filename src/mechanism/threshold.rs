//! Threshold detection - edge-crossing regions keyed by element or branch.
//!
//! A threshold is the reference rectangle expanded outward by a percentage of
//! its own size. "Out" means the probed box has crossed that expanded
//! boundary on a direction, reported as a [`DirFlags`] set per key.

use std::collections::HashMap;

use crate::geometry::{Axis, DirFlags, Point, Rect};

/// Tolerance as a percentage of the reference rect's own size.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdPercentages {
    pub vertical: f64,
    pub horizontal: f64,
}

impl Default for ThresholdPercentages {
    fn default() -> Self {
        Self {
            vertical: 60.0,
            horizontal: 60.0,
        }
    }
}

/// Per-key threshold rects plus the latest out-flags observed for each key.
#[derive(Debug, Default)]
pub struct Threshold {
    percentages: ThresholdPercentages,
    thresholds: HashMap<String, Rect>,
    flags: HashMap<String, DirFlags>,
}

impl Threshold {
    pub fn new(percentages: ThresholdPercentages) -> Self {
        Self {
            percentages,
            thresholds: HashMap::new(),
            flags: HashMap::new(),
        }
    }

    fn tolerance(&self, rect: &Rect) -> Point<f64> {
        Point::new(
            (self.percentages.horizontal / 100.0) * rect.width,
            (self.percentages.vertical / 100.0) * rect.height,
        )
    }

    /// Install (or replace) the threshold for `key` around a reference rect.
    pub fn set_main_threshold(&mut self, key: &str, rect: &Rect) {
        let tolerance = self.tolerance(rect);
        let expanded = Rect::new(
            rect.top - tolerance.y,
            rect.left - tolerance.x,
            rect.width + 2.0 * tolerance.x,
            rect.height + 2.0 * tolerance.y,
        );

        self.thresholds.insert(key.to_string(), expanded);
        self.flags.insert(key.to_string(), DirFlags::empty());
    }

    /// Test `probe` against the stored threshold for `key`, record and return
    /// the crossing directions. Unknown keys are never out.
    pub fn is_out(&mut self, key: &str, probe: &Rect) -> DirFlags {
        let Some(threshold) = self.thresholds.get(key) else {
            return DirFlags::empty();
        };

        let mut out = DirFlags::empty();
        if probe.top < threshold.top {
            out |= DirFlags::TOP;
        }
        if probe.bottom() > threshold.bottom() {
            out |= DirFlags::BOTTOM;
        }
        if probe.left < threshold.left {
            out |= DirFlags::LEFT;
        }
        if probe.right() > threshold.right() {
            out |= DirFlags::RIGHT;
        }

        self.flags.insert(key.to_string(), out);
        out
    }

    /// Latest flags recorded for `key`.
    pub fn flags(&self, key: &str) -> DirFlags {
        self.flags.get(key).copied().unwrap_or_default()
    }

    pub fn is_out_by_axis(&self, key: &str, axis: Axis) -> bool {
        self.flags(key).is_one_truthy_by_axis(axis)
    }

    pub fn remove(&mut self, key: &str) {
        self.thresholds.remove(key);
        self.flags.remove(key);
    }

    pub fn clear(&mut self) {
        self.thresholds.clear();
        self.flags.clear();
    }
}
