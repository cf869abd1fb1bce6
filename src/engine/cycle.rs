//! Migration cycle tracker.
//!
//! Append-only log of container-transition events for the active drag
//! gesture. One event per container the dragged element has occupied; the
//! latest two are the working set, older ones are retained until flushed.

use std::collections::BTreeSet;

use crate::engine::Sk;

/// Which insertion-gap measurement to preserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalMargin {
    Top,
    Bottom,
}

/// One container occupation during a drag gesture.
#[derive(Debug, Clone)]
pub struct MigrationEvent {
    /// Last known slot in that container. `None` while out of container.
    pub index: Option<usize>,
    pub sk: Sk,
    pub cycle_id: String,
    pub has_scroll: bool,
    /// Count of reindex operations issued while in this container.
    pub transformed_count: usize,
    /// Insertion-gap measurements, defined only during a transition.
    pub margin_top: Option<f64>,
    pub margin_bottom: Option<f64>,
}

impl MigrationEvent {
    fn new(index: Option<usize>, sk: Sk, cycle_id: String, has_scroll: bool) -> Self {
        Self {
            index,
            sk,
            cycle_id,
            has_scroll,
            transformed_count: 0,
            margin_top: None,
            margin_bottom: None,
        }
    }
}

/// Append-only migration log, instantiated fresh per drag gesture.
#[derive(Debug, Clone)]
pub struct MigrationCycle {
    events: Vec<MigrationEvent>,
    pub container_keys: BTreeSet<Sk>,
    /// True only between the start of a container switch and its completion.
    pub is_transitioning: bool,
}

impl MigrationCycle {
    pub fn new(index: usize, sk: Sk, cycle_id: String, has_scroll: bool) -> Self {
        let mut cycle = Self {
            events: vec![MigrationEvent::new(Some(index), sk.clone(), cycle_id, has_scroll)],
            container_keys: BTreeSet::from([sk]),
            is_transitioning: false,
        };
        cycle.complete();
        cycle
    }

    // -------------------------------------------------------------------------
    // Working Set
    // -------------------------------------------------------------------------

    /// The event for the container currently occupied.
    pub fn latest(&self) -> &MigrationEvent {
        self.events.last().expect("migration cycle is never empty while active")
    }

    pub fn latest_mut(&mut self) -> &mut MigrationEvent {
        self.events.last_mut().expect("migration cycle is never empty while active")
    }

    /// The event for the previously occupied container, if any.
    pub fn prev(&self) -> Option<&MigrationEvent> {
        self.events.len().checked_sub(2).map(|i| &self.events[i])
    }

    pub fn events(&self) -> &[MigrationEvent] {
        &self.events
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Begin a container switch.
    pub fn start(&mut self) {
        self.is_transitioning = true;
    }

    /// Finish a container switch and drop any preserved margins.
    pub fn complete(&mut self) {
        self.is_transitioning = false;
        self.clear_margin();
    }

    /// Append a new event and register its container key.
    pub fn add(&mut self, index: Option<usize>, sk: Sk, cycle_id: String, has_scroll: bool) {
        self.container_keys.insert(sk.clone());
        self.events.push(MigrationEvent::new(index, sk, cycle_id, has_scroll));
    }

    /// Record a reindex within the current container.
    pub fn set_index(&mut self, index: usize) {
        let latest = self.latest_mut();
        latest.index = Some(index);
        latest.transformed_count += 1;
    }

    /// Store a transient gap measurement on the latest event only.
    pub fn preserve_vertical_margin(&mut self, kind: VerticalMargin, value: Option<f64>) {
        let latest = self.latest_mut();
        match kind {
            VerticalMargin::Top => latest.margin_top = value,
            VerticalMargin::Bottom => latest.margin_bottom = value,
        }
    }

    pub fn clear_margin(&mut self) {
        for event in &mut self.events {
            event.margin_top = None;
            event.margin_bottom = None;
        }
    }

    // -------------------------------------------------------------------------
    // Bookkeeping
    // -------------------------------------------------------------------------

    /// Remove the given events; a container key survives only while some
    /// outstanding event still references it.
    pub fn flush(&mut self, cycle_ids: &[String]) {
        self.events.retain(|e| !cycle_ids.contains(&e.cycle_id));

        self.container_keys = self.events.iter().map(|e| e.sk.clone()).collect();
    }

    /// Return to idle, discarding all events and container keys.
    pub fn clear(&mut self) {
        self.events.clear();
        self.container_keys.clear();
        self.is_transitioning = false;
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sk(name: &str) -> Sk {
        Sk::from_parent(0, name)
    }

    fn cycle() -> MigrationCycle {
        MigrationCycle::new(2, sk("a"), "cycle_0".into(), false)
    }

    #[test]
    fn test_new_cycle_is_completed() {
        let cycle = cycle();
        assert!(!cycle.is_transitioning);
        assert_eq!(cycle.latest().index, Some(2));
        assert_eq!(cycle.latest().sk, sk("a"));
        assert!(cycle.prev().is_none());
        assert!(cycle.container_keys.contains(&sk("a")));
    }

    #[test]
    fn test_add_tracks_latest_and_prev() {
        let mut cycle = cycle();
        cycle.start();
        assert!(cycle.is_transitioning);

        cycle.add(None, sk("b"), "cycle_1".into(), true);

        assert_eq!(cycle.latest().sk, sk("b"));
        assert_eq!(cycle.latest().index, None);
        assert!(cycle.latest().has_scroll);
        assert_eq!(cycle.prev().unwrap().sk, sk("a"));
        assert_eq!(cycle.container_keys.len(), 2);
    }

    #[test]
    fn test_set_index_counts_transforms() {
        let mut cycle = cycle();
        cycle.set_index(3);
        cycle.set_index(4);

        assert_eq!(cycle.latest().index, Some(4));
        assert_eq!(cycle.latest().transformed_count, 2);
    }

    #[test]
    fn test_complete_clears_margins() {
        let mut cycle = cycle();
        cycle.start();
        cycle.preserve_vertical_margin(VerticalMargin::Top, Some(8.0));
        cycle.preserve_vertical_margin(VerticalMargin::Bottom, Some(4.0));
        assert_eq!(cycle.latest().margin_top, Some(8.0));

        cycle.complete();
        assert!(!cycle.is_transitioning);
        assert_eq!(cycle.latest().margin_top, None);
        assert_eq!(cycle.latest().margin_bottom, None);
    }

    #[test]
    fn test_flush_drops_unreferenced_keys() {
        let mut cycle = cycle();
        cycle.add(Some(0), sk("b"), "cycle_1".into(), false);
        cycle.add(Some(1), sk("a"), "cycle_2".into(), false);

        // Drop the first occupation of "a"; key "a" survives through cycle_2.
        cycle.flush(&["cycle_0".into()]);
        assert!(cycle.container_keys.contains(&sk("a")));
        assert_eq!(cycle.events().len(), 2);

        cycle.flush(&["cycle_2".into()]);
        assert!(!cycle.container_keys.contains(&sk("a")));
        assert!(cycle.container_keys.contains(&sk("b")));
    }

    #[test]
    fn test_clear_returns_to_idle() {
        let mut cycle = cycle();
        cycle.add(Some(0), sk("b"), "cycle_1".into(), false);
        cycle.clear();

        assert!(cycle.is_empty());
        assert!(cycle.container_keys.is_empty());
        assert!(!cycle.is_transitioning);
    }
}
