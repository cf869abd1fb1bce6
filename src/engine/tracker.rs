//! Prefixed monotonic id generation.

use std::collections::HashMap;

/// Prefix for ids identifying one migration event.
pub const PREFIX_CYCLE: &str = "cycle";

/// Generates unique, human-readable ids scoped by prefix.
#[derive(Debug, Default)]
pub struct Tracker {
    travels: HashMap<String, usize>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for the given prefix: `"cycle_0"`, `"cycle_1"`, ...
    pub fn new_travel(&mut self, prefix: &str) -> String {
        let counter = self.travels.entry(prefix.to_string()).or_insert(0);
        let id = format!("{prefix}_{counter}");
        *counter += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_travel_increments_per_prefix() {
        let mut tracker = Tracker::new();

        assert_eq!(tracker.new_travel(PREFIX_CYCLE), "cycle_0");
        assert_eq!(tracker.new_travel(PREFIX_CYCLE), "cycle_1");
        assert_eq!(tracker.new_travel("elm"), "elm_0");
        assert_eq!(tracker.new_travel(PREFIX_CYCLE), "cycle_2");
    }
}
