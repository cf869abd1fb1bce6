//! Mechanism controller - per-pointer-move decision logic.
//!
//! Driven once per pointer-move sample. In evaluation order: scroll
//! suspension, raw position update, transition re-entrancy guard, threshold
//! crossing (single-step swap, edge lock, head fill, container migration),
//! and re-entry detection. Structural mutations go through the store's own
//! entry points; the controller holds only transient per-gesture flags.

use tracing::{debug, warn};

use crate::dom::{DomAdapter, Indicator};
use crate::engine::{is_id_eligible, Sk, VerticalMargin, APPEND_EMPTY_ELM_ID, PREFIX_CYCLE};
use crate::error::StoreError;
use crate::geometry::{Axis, DirFlags, Direction, Point};
use crate::mechanism::draggable::Draggable;
use crate::mechanism::threshold::ThresholdPercentages;
use crate::state;
use crate::store::{DragEvent, Store};

/// Handle for a container migration awaiting the destination's settled
/// layout. Produced when the dragged crosses into a sibling container and
/// resolved explicitly by the driver, never inferred from timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMigration {
    pub destination: Sk,
    /// Slot reserved by the sentinel id in the destination branch.
    pub sentinel_index: usize,
}

/// Drives one drag gesture from lift to release.
pub struct MechanismController {
    pub draggable: Draggable,
    /// Sibling reindexing inside the current parent is suspended.
    is_parent_locked: bool,
    /// Dragged is visually out of its claimed slot.
    is_out_position: bool,
    /// Coalesced re-detection request; a second request while one is
    /// pending is dropped.
    pending_detection: bool,
    pending_migration: Option<PendingMigration>,
    pub enable_container_migration: bool,
}

impl MechanismController {
    /// Lift `id` and start a gesture at the given pointer coordinates.
    pub fn start_drag(
        store: &mut Store,
        dom: &mut dyn DomAdapter,
        id: &str,
        percentages: ThresholdPercentages,
        pointer_x: f64,
        pointer_y: f64,
    ) -> Result<Self, StoreError> {
        let draggable = Draggable::new(store, dom, id, percentages, pointer_x, pointer_y)?;

        Ok(Self {
            draggable,
            is_parent_locked: false,
            is_out_position: false,
            pending_detection: false,
            pending_migration: None,
            enable_container_migration: true,
        })
    }

    fn current_sk(&self, store: &Store) -> Sk {
        store
            .migration
            .as_ref()
            .map(|m| m.latest().sk.clone())
            .unwrap_or_else(|| self.draggable.origin_sk.clone())
    }

    fn current_index(&self, store: &Store) -> Option<usize> {
        store.migration.as_ref().and_then(|m| m.latest().index)
    }

    fn sibling_eligible(&self, store: &Store, id: &str) -> bool {
        let readonly = store.get_element(id).map(|e| e.readonly).unwrap_or(true);
        is_id_eligible(id, &self.draggable.id, readonly)
    }

    // -------------------------------------------------------------------------
    // Pointer Samples
    // -------------------------------------------------------------------------

    /// One pointer-move sample.
    pub fn drag_at(&mut self, store: &mut Store, dom: &mut dyn DomAdapter, x: f64, y: f64) {
        if self.draggable.scroll.is_scrolling {
            // Inertia is still running: keep the visual position current and
            // the lock in sync, queue one re-detection for when it stops.
            self.draggable.drag_at(dom, x, y);
            let sk = self.current_sk(store);
            self.is_parent_locked = self.draggable.is_out_container(&sk).is_one_truthy();
            self.schedule_detection();
            return;
        }

        self.draggable.drag_at(dom, x, y);

        if store.migration.as_ref().is_some_and(|m| m.is_transitioning) {
            return;
        }

        let out = self.draggable.is_out_position();
        if out.is_all_falsy() {
            if self.is_out_position {
                self.is_out_position = false;
                if let Ok(elm) = store.get_element_mut(&self.draggable.id) {
                    elm.remove_attribute(dom, Indicator::OutPos);
                }
                if self.is_parent_locked {
                    self.schedule_detection();
                }
            }
            return;
        }

        if !self.is_out_position {
            self.is_out_position = true;
            if let Ok(elm) = store.get_element_mut(&self.draggable.id) {
                elm.set_attribute(dom, Indicator::OutPos, "true");
            }
            store.listeners.dispatch(&DragEvent::OutThreshold {
                id: self.draggable.id.clone(),
                index: self.current_index(store),
            });
        }

        let sk = self.current_sk(store);
        if self.draggable.is_out_container(&sk).is_one_truthy() {
            self.handle_out_container(store, dom, &sk);
            return;
        }

        if self.is_parent_locked {
            // Nothing to reindex inside a locked parent; re-entry detection
            // takes over once the dragged is back in its slot threshold.
            return;
        }

        self.reindex_inside(store, dom, &sk, out);
    }

    // -------------------------------------------------------------------------
    // Scroll Suspension
    // -------------------------------------------------------------------------

    /// Scroll delta from the hosting container while the gesture is live.
    /// The dragged follows visually; reindexing stays suspended and one
    /// re-detection is queued for when the inertia settles.
    pub fn scroll_at(&mut self, store: &mut Store, dom: &mut dyn DomAdapter, dx: f64, dy: f64) {
        self.draggable.scroll.is_scrolling = true;
        self.draggable.scroll_by(dom, dx, dy);

        let sk = self.current_sk(store);
        self.is_parent_locked = self.draggable.is_out_container(&sk).is_one_truthy();
        self.schedule_detection();
    }

    /// Scroll inertia has settled: sync the branch's scroll record and let
    /// the queued re-detection run on the next frame.
    pub fn scroll_settled(&mut self, store: &mut Store) {
        self.draggable.scroll.is_scrolling = false;

        let sk = self.current_sk(store);
        if let Ok(scroll) = store.scroll_mut(&sk) {
            scroll.scroll_to(self.draggable.scroll.current.x, self.draggable.scroll.current.y);
        }
    }

    // -------------------------------------------------------------------------
    // In-Container Reindexing
    // -------------------------------------------------------------------------

    fn reindex_inside(&mut self, store: &mut Store, dom: &mut dyn DomAdapter, sk: &Sk, out: DirFlags) {
        let Ok(container) = store.get_container(sk) else {
            return;
        };
        let grid = container.grid;

        if out.is_one_truthy_by_axis(Axis::Y) {
            let toward = if out.contains(DirFlags::TOP) {
                Direction::Backward
            } else {
                Direction::Forward
            };
            let new_row = self.draggable.grid_placeholder.y + toward.sign() as i32;

            if new_row == 0 {
                self.exit_from_top(store, dom, sk);
            } else if new_row > grid.y {
                // Past the last row; hold until re-entry or container exit.
                self.is_parent_locked = true;
            } else {
                self.switch_element_position(store, dom, sk, Axis::Y, toward);
            }
            return;
        }

        // Horizontal crossing within a multi-column grid.
        let toward = if out.contains(DirFlags::LEFT) {
            Direction::Backward
        } else {
            Direction::Forward
        };
        let new_col = self.draggable.grid_placeholder.x + toward.sign() as i32;

        if new_col < 1 || new_col > grid.x {
            // Off the grid edge: close the visual gap and hold as
            // out-of-order until re-entry or release.
            self.is_parent_locked = true;
            self.fill_head_up(store, dom, sk);
            if let Some(migration) = store.migration.as_mut() {
                migration.latest_mut().index = None;
            }
        } else {
            self.switch_element_position(store, dom, sk, Axis::X, toward);
        }
    }

    /// Steady-state "drag past one sibling": swap the dragged element's
    /// provisional slot with its neighbor, O(1) per move.
    fn switch_element_position(
        &mut self,
        store: &mut Store,
        dom: &mut dyn DomAdapter,
        sk: &Sk,
        axis: Axis,
        toward: Direction,
    ) {
        let Some(from) = self.current_index(store) else {
            return;
        };
        let to = match toward {
            Direction::Backward => from.checked_sub(1),
            Direction::Forward => Some(from + 1),
        };
        let Some(to) = to else {
            self.is_parent_locked = true;
            return;
        };

        let neighbor = store
            .get_branch_by_key(sk)
            .ok()
            .and_then(|branch| branch.get(to).cloned());
        let Some(neighbor) = neighbor else {
            self.is_parent_locked = true;
            return;
        };
        if !self.sibling_eligible(store, &neighbor) {
            self.is_parent_locked = true;
            return;
        }

        let Ok(neighbor_rect) = store.get_element(&neighbor).map(|e| e.rect) else {
            return;
        };
        let (dragged_space, neighbor_space) = match axis {
            Axis::X => (self.draggable.origin_rect.width, neighbor_rect.width),
            Axis::Y => (self.draggable.origin_rect.height, neighbor_rect.height),
        };

        // The neighbor steps into the vacated slot; the dragged claims the
        // neighbor's.
        let opposite = match toward {
            Direction::Backward => Direction::Forward,
            Direction::Forward => Direction::Backward,
        };
        store.shift_element(dom, sk, &neighbor, axis, opposite, dragged_space);
        self.draggable
            .claim_slot(axis, neighbor_space * toward.sign(), toward.sign() as i32);

        if let Some(migration) = store.migration.as_mut() {
            migration.set_index(to);
        }

        let siblings = store
            .get_branch_by_key(sk)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        let event = match toward {
            Direction::Forward => DragEvent::LiftUp {
                siblings,
                from: to,
                to: from,
            },
            Direction::Backward => DragEvent::MoveDown {
                siblings,
                from: to,
                to: from,
            },
        };
        store.listeners.dispatch(&event);

        debug!(id = %self.draggable.id, from, to, "single-step reindex");
    }

    /// Row 0 exit: lock the parent and close the visual gap immediately.
    fn exit_from_top(&mut self, store: &mut Store, dom: &mut dyn DomAdapter, sk: &Sk) {
        self.is_parent_locked = true;

        if let Ok(elm) = store.get_element_mut(&self.draggable.id) {
            elm.set_attribute(dom, Indicator::OutContainer, "true");
        }

        self.fill_head_up(store, dom, sk);

        if let Some(migration) = store.migration.as_mut() {
            migration.latest_mut().index = None;
        }
        self.draggable.grid_placeholder.y = 0;

        store.listeners.dispatch(&DragEvent::OutContainer {
            id: self.draggable.id.clone(),
            index: None,
        });
    }

    /// Shift every remaining sibling one slot toward the head.
    fn fill_head_up(&mut self, store: &mut Store, dom: &mut dyn DomAdapter, sk: &Sk) {
        let Some(from) = self.current_index(store) else {
            return;
        };
        let ids: Vec<String> = match store.get_branch_by_key(sk) {
            Ok(branch) => branch.to_vec(),
            Err(_) => return,
        };

        // Measure the vertical gaps around the vacated slot; a container
        // transition restores the bottom gap at the destination.
        let dragged_rect = self.draggable.origin_rect;
        let margin_top = from
            .checked_sub(1)
            .and_then(|i| ids.get(i))
            .and_then(|id| store.get_element(id).ok())
            .map(|prev| dragged_rect.top - prev.rect.bottom());
        let margin_bottom = ids
            .get(from + 1)
            .and_then(|id| store.get_element(id).ok())
            .map(|next| next.rect.top - dragged_rect.bottom());
        if let Some(migration) = store.migration.as_mut() {
            migration.preserve_vertical_margin(VerticalMargin::Top, margin_top);
            migration.preserve_vertical_margin(VerticalMargin::Bottom, margin_bottom);
        }

        if from + 1 >= ids.len() {
            return;
        }

        let space = self.draggable.origin_rect.height;
        for id in &ids[from + 1..] {
            if !self.sibling_eligible(store, id) {
                continue;
            }
            store.shift_element(dom, sk, id, Axis::Y, Direction::Backward, space);
        }

        let siblings = store
            .get_branch_by_key(sk)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        store.listeners.dispatch(&DragEvent::LiftUp {
            siblings,
            from: from + 1,
            to: ids.len() - 1,
        });
    }

    // -------------------------------------------------------------------------
    // Container Exit / Migration
    // -------------------------------------------------------------------------

    fn handle_out_container(&mut self, store: &mut Store, dom: &mut dyn DomAdapter, sk: &Sk) {
        let index = self.current_index(store);

        if let Ok(elm) = store.get_element_mut(&self.draggable.id) {
            elm.set_attribute(dom, Indicator::OutContainer, "true");
        }
        store.listeners.dispatch(&DragEvent::OutContainer {
            id: self.draggable.id.clone(),
            index,
        });

        if index.is_some() {
            self.fill_head_up(store, dom, sk);
            if let Some(migration) = store.migration.as_mut() {
                migration.latest_mut().index = None;
            }
            self.draggable.grid_placeholder.y = 0;
        }
        self.is_parent_locked = true;

        if self.enable_container_migration {
            if let Some(destination) = self.detect_nearest_container(store, sk) {
                self.begin_migration(store, sk, destination);
            }
        }
    }

    /// Sibling container at the same depth whose boundaries contain the
    /// dragged element's center, excluding the current one.
    fn detect_nearest_container(&self, store: &Store, current: &Sk) -> Option<Sk> {
        let probe = self.draggable.absolute_rect();
        let center = Point::new(probe.left + probe.width / 2.0, probe.top + probe.height / 2.0);

        for key in store.get_branches_by_depth(self.draggable.depth) {
            if key == current {
                continue;
            }
            let Ok(container) = store.get_container(key) else {
                continue;
            };
            if container.boundaries.is_some_and(|b| b.contains_point(&center)) {
                return Some(key.clone());
            }
        }
        None
    }

    /// Open a migration: drop the stale tail slot in the origin, reserve a
    /// sentinel slot at the destination and leave the cycle transitioning
    /// until [`Self::resolve_migration`].
    fn begin_migration(&mut self, store: &mut Store, origin: &Sk, destination: Sk) {
        debug!(from = %origin, to = %destination, id = %self.draggable.id, "container migration");

        store.prune_stale_tail(origin, &self.draggable.id);

        let sentinel_index = match store.branch_mut(&destination) {
            Ok(branch) => {
                branch.push(APPEND_EMPTY_ELM_ID.to_string());
                branch.len() - 1
            }
            Err(err) => {
                warn!(%err, "migration aborted: destination branch missing");
                return;
            }
        };

        let has_scroll = store
            .get_scroll(&destination)
            .map(|s| s.allow_dynamic_visibility)
            .unwrap_or(false);
        let cycle_id = store.tracker.new_travel(PREFIX_CYCLE);

        if let Some(migration) = store.migration.as_mut() {
            migration.start();
            migration.add(None, destination.clone(), cycle_id.clone(), has_scroll);
        }
        self.draggable.session.push(cycle_id);

        // The origin boundary is no longer probed; migrating back
        // re-installs it.
        self.draggable.threshold.remove(origin.as_str());

        if let Some(boundaries) = store
            .get_container(&destination)
            .ok()
            .and_then(|c| c.boundaries)
        {
            self.draggable
                .threshold
                .set_main_threshold(destination.as_str(), &boundaries);
        }

        self.pending_migration = Some(PendingMigration {
            destination,
            sentinel_index,
        });
    }

    pub fn has_pending_migration(&self) -> bool {
        self.pending_migration.is_some()
    }

    /// Finish a pending migration once the destination's layout has settled:
    /// claim a slot after its last element and leave fine placement to the
    /// next detection.
    pub fn resolve_migration(&mut self, store: &mut Store, _dom: &mut dyn DomAdapter) {
        let Some(pending) = self.pending_migration.take() else {
            warn!("resolve_migration without a pending migration");
            return;
        };

        let Ok(container) = store.get_container(&pending.destination) else {
            if let Some(migration) = store.migration.as_mut() {
                migration.complete();
            }
            return;
        };

        let (top, left) = match container.last_elm_position {
            Some(last) => (last.y + self.draggable.origin_rect.height, last.x),
            None => container
                .boundaries
                .map(|b| (b.top, b.left))
                .unwrap_or((0.0, 0.0)),
        };
        let rows = container.grid.y;

        // The origin's preserved bottom gap sits on the previous event; the
        // latest event is the destination pushed by the transition.
        let margin = store
            .migration
            .as_ref()
            .and_then(|m| m.prev())
            .and_then(|e| e.margin_bottom)
            .unwrap_or(0.0);

        self.draggable.claim_slot_at(top + margin, left);
        self.draggable.grid_placeholder = Point::new(1, rows + 1);

        if let Some(migration) = store.migration.as_mut() {
            migration.latest_mut().index = Some(pending.sentinel_index);
            migration.complete();
        }

        self.is_parent_locked = false;
        self.is_out_position = true;
        self.schedule_detection();
    }

    // -------------------------------------------------------------------------
    // Coalesced Re-Detection
    // -------------------------------------------------------------------------

    /// Request a nearest-element re-detection. Coalesced: at most one runs
    /// per frame regardless of how many times this is called in between.
    pub fn schedule_detection(&mut self) {
        self.pending_detection = true;
    }

    /// Frame boundary: run the queued detection, if any. Deferred while a
    /// scroll is still in flight.
    pub fn run_frame(&mut self, store: &mut Store, dom: &mut dyn DomAdapter) {
        if !self.pending_detection || self.draggable.scroll.is_scrolling {
            return;
        }
        self.pending_detection = false;
        self.detect_nearest_elm(store, dom);
    }

    /// Recompute the best insertion index: first eligible sibling whose
    /// visual box intersects the dragged element's current box wins; with no
    /// match, append after the last eligible sibling, restoring the
    /// container's last measured position.
    fn detect_nearest_elm(&mut self, store: &mut Store, dom: &mut dyn DomAdapter) {
        let sk = self.current_sk(store);
        let ids: Vec<String> = match store.get_branch_by_key(&sk) {
            Ok(branch) => branch.to_vec(),
            Err(_) => return,
        };

        let probe = self.draggable.absolute_rect();

        let mut seen: Vec<&str> = Vec::with_capacity(ids.len());
        let mut target: Option<usize> = None;
        let mut any_eligible = false;

        for id in &ids {
            if seen.contains(&id.as_str()) || !self.sibling_eligible(store, id) {
                continue;
            }
            seen.push(id);
            any_eligible = true;

            let Ok(elm) = store.get_element(id) else {
                continue;
            };
            // Visual box: measured rect plus the transform it carries. Both
            // axes matter; in a grid the same row holds several columns.
            let mut band = elm.rect;
            band.set_position(
                elm.rect.left + elm.translate.x,
                elm.rect.top + elm.translate.y,
            );
            if probe.is_intersect(&band) {
                target = Some(elm.vdom_index);
                break;
            }
        }

        if !any_eligible {
            warn!(sk = %sk, "detection found no eligible sibling");
            return;
        }

        match target {
            Some(to) => self.move_to_index(store, dom, &sk, to),
            None => {
                let to = ids.len().saturating_sub(1);
                self.move_to_index(store, dom, &sk, to);
                if let Some(last) = store.get_container(&sk).ok().and_then(|c| c.last_elm_position)
                {
                    self.draggable.claim_slot_at(last.y, last.x);
                }
            }
        }
    }

    /// Re-insert the dragged element at `to`, shifting the siblings between
    /// its current slot and the target by one.
    fn move_to_index(&mut self, store: &mut Store, dom: &mut dyn DomAdapter, sk: &Sk, to: usize) {
        let from = self.current_index(store);
        let space = self.draggable.origin_rect.height;
        let ids: Vec<String> = match store.get_branch_by_key(sk) {
            Ok(branch) => branch.to_vec(),
            Err(_) => return,
        };

        let unique_eligible = |this: &Self, store: &Store| -> Vec<String> {
            let mut seen: Vec<String> = Vec::with_capacity(ids.len());
            for id in &ids {
                if !seen.contains(id) && this.sibling_eligible(store, id) {
                    seen.push(id.clone());
                }
            }
            seen
        };

        match from {
            Some(from) if from == to => return,
            Some(from) => {
                let (range, toward) = if to > from {
                    ((from + 1)..=to, Direction::Backward)
                } else {
                    (to..=(from - 1), Direction::Forward)
                };

                let mut slot_position: Option<Point<f64>> = None;
                for id in unique_eligible(self, store) {
                    let Ok(elm) = store.get_element(&id) else {
                        continue;
                    };
                    if !range.contains(&elm.vdom_index) {
                        continue;
                    }
                    if elm.vdom_index == to {
                        slot_position = Some(Point::new(
                            elm.rect.left + elm.translate.x,
                            elm.rect.top + elm.translate.y,
                        ));
                    }
                    store.shift_element(dom, sk, &id, Axis::Y, toward, space);
                }

                // Claim the exact position the target sibling vacated; fall
                // back to uniform-slot arithmetic when it is unknown.
                match slot_position {
                    Some(slot) => self.draggable.claim_slot_at(slot.y, slot.x),
                    None => {
                        let steps = to as i32 - from as i32;
                        self.draggable.claim_slot(Axis::Y, steps as f64 * space, steps);
                    }
                }
                self.draggable.grid_placeholder.y = to as i32 + 1;

                let siblings = store
                    .get_branch_by_key(sk)
                    .map(<[String]>::to_vec)
                    .unwrap_or_default();
                let event = match toward {
                    Direction::Backward => DragEvent::LiftUp {
                        siblings,
                        from: from + 1,
                        to,
                    },
                    Direction::Forward => DragEvent::MoveDown {
                        siblings,
                        from: to,
                        to: from - 1,
                    },
                };
                store.listeners.dispatch(&event);
            }
            None => {
                // Re-entering a compacted branch: everything at or past the
                // target steps down to reopen the slot.
                let mut slot_position: Option<Point<f64>> = None;
                let mut shifted = false;

                for id in unique_eligible(self, store) {
                    let Ok(elm) = store.get_element(&id) else {
                        continue;
                    };
                    if elm.vdom_index < to {
                        continue;
                    }
                    if elm.vdom_index == to {
                        slot_position =
                            Some(Point::new(elm.rect.left + elm.translate.x, elm.rect.top + elm.translate.y));
                    }
                    store.shift_element(dom, sk, &id, Axis::Y, Direction::Forward, space);
                    shifted = true;
                }

                if let Some(slot) = slot_position {
                    self.draggable.claim_slot_at(slot.y, slot.x);
                }
                self.draggable.grid_placeholder.y = to as i32 + 1;

                if shifted {
                    let siblings = store
                        .get_branch_by_key(sk)
                        .map(<[String]>::to_vec)
                        .unwrap_or_default();
                    store.listeners.dispatch(&DragEvent::MoveDown {
                        siblings,
                        from: to,
                        to: ids.len().saturating_sub(1),
                    });
                }
            }
        }

        if let Some(migration) = store.migration.as_mut() {
            migration.set_index(to);
        }
        self.is_parent_locked = false;
        if let Ok(elm) = store.get_element_mut(&self.draggable.id) {
            elm.remove_attribute(dom, Indicator::OutContainer);
        }
    }

    // -------------------------------------------------------------------------
    // Release
    // -------------------------------------------------------------------------

    /// Pointer-up: settle the dragged element into its claimed slot, or walk
    /// everything back when it has no destination. Cancels any pending
    /// detection and migration.
    pub fn end_drag(&mut self, store: &mut Store, dom: &mut dyn DomAdapter) {
        self.pending_detection = false;
        let aborted_migration = self.pending_migration.take();
        state::set_transforming(false);

        let Some((sk, index)) = store
            .migration
            .as_ref()
            .map(|m| (m.latest().sk.clone(), m.latest().index))
        else {
            return;
        };
        let id = self.draggable.id.clone();

        if let Some(migration) = store.migration.as_mut() {
            migration.complete();
        }

        match index {
            Some(to) => self.settle(store, dom, &sk, &id, to),
            None => self.undo(store, dom, &sk, &id, aborted_migration),
        }

        if let Ok(elm) = store.get_element_mut(&id) {
            elm.remove_attribute(dom, Indicator::OutPos);
            elm.remove_attribute(dom, Indicator::OutContainer);
            elm.remove_attribute(dom, Indicator::Dragged);
        }
        self.draggable.threshold.clear();
    }

    fn settle(&mut self, store: &mut Store, dom: &mut dyn DomAdapter, sk: &Sk, id: &str, to: usize) {
        let migrated = *sk != self.draggable.origin_sk;

        if migrated {
            // Hand the host node to the destination parent now so the origin
            // branch reconciles against a child list it fully owns; exact
            // placement is the reconciler's job.
            let old_dom_index = store.get_element(id).map(|e| e.dom_index).unwrap_or(0);
            let Ok(dest_parent) = store.get_container(sk).map(|c| c.id.clone()) else {
                return;
            };
            dom.append_child(&dest_parent, id);

            let origin_ids: Vec<String> = store
                .get_branch_by_key(&self.draggable.origin_sk)
                .map(<[String]>::to_vec)
                .unwrap_or_default();
            for sibling in &origin_ids {
                if let Ok(elm) = store.get_element_mut(sibling) {
                    if elm.dom_index > old_dom_index {
                        elm.dom_index -= 1;
                    }
                }
            }

            if let Ok(elm) = store.get_element_mut(id) {
                elm.sk = sk.clone();
                elm.dom_index = dom.children(&dest_parent).len().saturating_sub(1);
            }
        }

        store.assign_element_position(sk, id, to);

        if let Ok(elm) = store.get_element_mut(id) {
            elm.translate = self.draggable.occupied_translate;
            elm.grid = self.draggable.grid_placeholder;
        }
        dom.transform(
            id,
            self.draggable.occupied_translate.x,
            self.draggable.occupied_translate.y,
        );
    }

    fn undo(
        &mut self,
        store: &mut Store,
        dom: &mut dyn DomAdapter,
        sk: &Sk,
        id: &str,
        aborted_migration: Option<PendingMigration>,
    ) {
        let origin = self.draggable.origin_sk.clone();

        if *sk != origin || aborted_migration.is_some() {
            // Drop the destination's transient tail slot, walk its siblings
            // home, and give the origin its tail slot back.
            let dest = aborted_migration.map(|p| p.destination).unwrap_or_else(|| sk.clone());
            store.prune_stale_tail(&dest, id);
            store.undo_sibling_shifts(dom, &dest, id, self.draggable.origin_rect.height);
            if let Ok(branch) = store.branch_mut(&origin) {
                branch.push(id.to_string());
            }
        }

        store.undo_sibling_shifts(dom, &origin, id, self.draggable.origin_rect.height);
        store.assign_element_position(&origin, id, self.draggable.origin_index);

        if let Ok(elm) = store.get_element_mut(id) {
            elm.translate = self.draggable.translate_placeholder;
            elm.grid = self.draggable.grid_placeholder;
            elm.grid.y = self.draggable.origin_index as i32 + 1;
        }
        dom.transform(
            id,
            self.draggable.translate_placeholder.x,
            self.draggable.translate_placeholder.y,
        );
    }
}
