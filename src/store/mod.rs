//! Branch/registry store - single source of truth.
//!
//! Owns every element record, branch sequence, parent container and scroll
//! container for the lifetime of the registered elements, plus the migration
//! cycle of the active drag gesture. All structural mutations flow through
//! the FIFO update queue so only one is in flight at a time.

mod events;
mod reconciler;
mod scheduler;
mod visibility;

pub use events::{DragEvent, DragEventHandler, LayoutStatus, Listeners};
pub use scheduler::{RegisterSpec, Update, UpdateQueue, UpdateTask};
pub use visibility::update_branch_visibility;

use std::collections::HashMap;

use tracing::warn;

use crate::dom::DomAdapter;
use crate::engine::{
    Dimensions, DragElement, ElementSnapshot, MigrationCycle, ParentContainer, ScrollContainer,
    Sk, Tracker, APPEND_EMPTY_ELM_ID,
};
use crate::error::StoreError;
use crate::geometry::{Axis, Direction, Rect};
use crate::state;

/// Central registry store.
pub struct Store {
    registry: HashMap<String, DragElement>,
    branches: HashMap<Sk, Vec<String>>,
    branches_by_depth: HashMap<u8, Vec<Sk>>,
    containers: HashMap<Sk, ParentContainer>,
    scrolls: HashMap<Sk, ScrollContainer>,
    unified_dimensions: HashMap<u8, Dimensions>,
    /// Container-transition log of the active drag gesture.
    pub migration: Option<MigrationCycle>,
    pub tracker: Tracker,
    pub listeners: Listeners,
    updates: UpdateQueue,
    initialized: bool,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            registry: HashMap::new(),
            branches: HashMap::new(),
            branches_by_depth: HashMap::new(),
            containers: HashMap::new(),
            scrolls: HashMap::new(),
            unified_dimensions: HashMap::new(),
            migration: None,
            tracker: Tracker::new(),
            listeners: Listeners::new(),
            updates: UpdateQueue::new(),
            initialized: false,
        }
    }

    // -------------------------------------------------------------------------
    // Update Queue
    // -------------------------------------------------------------------------

    /// True when no structural update is in flight or queued.
    pub fn is_idle(&self) -> bool {
        !self.updates.is_updating && self.updates.is_empty()
    }

    pub fn is_layout_available(&self) -> bool {
        !state::is_transforming() && self.is_idle()
    }

    /// Drain queued updates strictly in submission order. Re-entrant calls
    /// (from completion hooks or listeners) return immediately; the
    /// outermost drain picks their submissions up.
    pub fn drain_updates(&mut self, dom: &mut dyn DomAdapter) {
        if self.updates.is_updating {
            return;
        }

        while let Some(task) = self.updates.pop() {
            self.updates.is_updating = true;

            match task.update {
                Update::Register(spec) => self.apply_register(&spec, dom),
                Update::Reconcile(sk) => reconciler::reconcile_branch(self, dom, &sk),
            }

            if let Some(hook) = task.on_complete {
                hook();
            }
            if let Some(event) = task.emit {
                self.listeners.dispatch(&event);
            }

            self.updates.is_updating = false;
        }
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Register an element. Idempotent: re-registering a visible element only
    /// re-applies its last transform. The very first registration overall
    /// schedules a pending layout-state notification.
    pub fn register(&mut self, spec: RegisterSpec, dom: &mut dyn DomAdapter) {
        let mut task = UpdateTask::new(Update::Register(spec));

        if !self.initialized {
            self.initialized = true;
            state::set_layout_status(LayoutStatus::Pending);
            task = task.with_emit(DragEvent::LayoutState {
                status: LayoutStatus::Pending,
            });
        }

        self.updates.enqueue(task);
        self.drain_updates(dom);
    }

    fn apply_register(&mut self, spec: &RegisterSpec, dom: &mut dyn DomAdapter) {
        if let Some(elm) = self.registry.get(&spec.id) {
            if elm.is_visible {
                // Preserve last changes.
                elm.transform(dom);
            }
            return;
        }

        let Some(rect) = dom.rect(&spec.id) else {
            #[cfg(debug_assertions)]
            panic!("register: no host node found for id `{}`", spec.id);
            #[allow(unreachable_code)]
            {
                warn!(id = %spec.id, "register: no host node found, skipping");
                return;
            }
        };

        let sk = Sk::from_parent(spec.depth, &spec.parent_id);

        let branch = self.branches.entry(sk.clone()).or_default();
        let index = branch.len();
        branch.push(spec.id.clone());

        let depth_keys = self.branches_by_depth.entry(spec.depth).or_default();
        if !depth_keys.contains(&sk) {
            depth_keys.push(sk.clone());
        }

        // Lazily initialize container and scroll records on the first element
        // of a new container key.
        let unified = self.unified_dimensions.entry(spec.depth).or_default();
        let container = self
            .containers
            .entry(sk.clone())
            .or_insert_with(|| ParentContainer::new(0, &spec.parent_id));

        if let Some(scroll) = self.scrolls.get_mut(&sk) {
            scroll.absorb(&rect);
        } else {
            let viewport = dom.rect(&spec.parent_id).unwrap_or(rect);
            self.scrolls
                .insert(sk.clone(), ScrollContainer::new(sk.clone(), viewport, rect));
        }

        let mut elm = DragElement::new(&spec.id, spec.depth, spec.readonly, sk.clone(), rect, index);
        elm.grid = container.register(&rect, unified);
        self.registry.insert(spec.id.clone(), elm);

        update_branch_visibility(self, &sk);
    }

    /// Remove an element. No-op for unknown ids.
    ///
    /// Known limitation: removing one of several siblings leaves the
    /// remaining siblings' recorded indices stale until they are
    /// re-registered. The warning is deliberate, not a bug to fix here.
    pub fn unregister(&mut self, id: &str) {
        let Some(elm) = self.registry.remove(id) else {
            return;
        };

        let sk = elm.sk;
        let remaining = if let Some(branch) = self.branches.get_mut(&sk) {
            branch.retain(|slot| slot != id);
            branch.len()
        } else {
            0
        };

        if remaining == 0 {
            if let Some(mut scroll) = self.scrolls.remove(&sk) {
                scroll.destroy();
            }
        } else {
            warn!(
                id,
                sk = %sk,
                remaining,
                "unregister: sibling indices are stale until the remaining elements are re-registered"
            );
        }
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    pub fn has(&self, id: &str) -> bool {
        self.registry.contains_key(id)
    }

    /// Strict element lookup.
    pub fn get_element(&self, id: &str) -> Result<&DragElement, StoreError> {
        self.registry
            .get(id)
            .ok_or_else(|| StoreError::ElementNotRegistered(id.to_string()))
    }

    pub fn get_element_mut(&mut self, id: &str) -> Result<&mut DragElement, StoreError> {
        self.registry
            .get_mut(id)
            .ok_or_else(|| StoreError::ElementNotRegistered(id.to_string()))
    }

    /// Element record together with its current host bounding box.
    pub fn get_element_with_dom(
        &self,
        id: &str,
        dom: &dyn DomAdapter,
    ) -> Result<(&DragElement, Rect), StoreError> {
        let elm = self.get_element(id)?;
        let rect = dom
            .rect(id)
            .ok_or_else(|| StoreError::ElementNotRegistered(id.to_string()))?;
        Ok((elm, rect))
    }

    /// Strict branch lookup. Fails for a key never seen; a key seen but
    /// currently empty yields an empty slice.
    pub fn get_branch_by_key(&self, sk: &Sk) -> Result<&[String], StoreError> {
        self.branches
            .get(sk)
            .map(Vec::as_slice)
            .ok_or_else(|| StoreError::BranchNotFound(sk.clone()))
    }

    pub(crate) fn branch_mut(&mut self, sk: &Sk) -> Result<&mut Vec<String>, StoreError> {
        self.branches
            .get_mut(sk)
            .ok_or_else(|| StoreError::BranchNotFound(sk.clone()))
    }

    /// Container keys registered at a given depth. Empty when none.
    pub fn get_branches_by_depth(&self, depth: u8) -> &[Sk] {
        self.branches_by_depth
            .get(&depth)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get_container(&self, sk: &Sk) -> Result<&ParentContainer, StoreError> {
        self.containers
            .get(sk)
            .ok_or_else(|| StoreError::ContainerNotFound(sk.clone()))
    }

    pub(crate) fn container_mut(&mut self, sk: &Sk) -> Result<&mut ParentContainer, StoreError> {
        self.containers
            .get_mut(sk)
            .ok_or_else(|| StoreError::ContainerNotFound(sk.clone()))
    }

    pub fn get_scroll(&self, sk: &Sk) -> Result<&ScrollContainer, StoreError> {
        self.scrolls
            .get(sk)
            .ok_or_else(|| StoreError::ScrollNotFound(sk.clone()))
    }

    pub(crate) fn scroll_mut(&mut self, sk: &Sk) -> Result<&mut ScrollContainer, StoreError> {
        self.scrolls
            .get_mut(sk)
            .ok_or_else(|| StoreError::ScrollNotFound(sk.clone()))
    }

    /// Container record for the branch owning `id`.
    pub fn get_container_by_id(&self, id: &str) -> Result<&ParentContainer, StoreError> {
        let sk = self.get_element(id)?.sk.clone();
        self.get_container(&sk)
    }

    /// Scroll record and static siblings for the branch owning `id`.
    pub fn get_scroll_with_siblings(
        &self,
        id: &str,
    ) -> Result<(&ScrollContainer, &[String]), StoreError> {
        let sk = &self.get_element(id)?.sk;
        Ok((self.get_scroll(sk)?, self.get_branch_by_key(sk)?))
    }

    /// Tolerant snapshot lookup. Panics in debug builds for unknown ids.
    pub fn get_serialized_element(&self, id: &str) -> Option<ElementSnapshot> {
        #[cfg(debug_assertions)]
        if !self.registry.contains_key(id) {
            panic!("get_serialized_element: element with id `{id}` does not exist");
        }

        self.registry.get(id).map(DragElement::serialize)
    }

    // -------------------------------------------------------------------------
    // Grid Bridge
    // -------------------------------------------------------------------------

    /// Replay one element's rectangle through its container's grid
    /// registration and adopt the resulting cell.
    pub(crate) fn set_elm_grid_bridge(&mut self, sk: &Sk, id: &str) {
        let Some(elm) = self.registry.get_mut(id) else {
            return;
        };
        let Some(container) = self.containers.get_mut(sk) else {
            return;
        };
        let unified = self.unified_dimensions.entry(elm.depth).or_default();

        elm.grid = container.register(&elm.rect, unified);
    }

    // -------------------------------------------------------------------------
    // Branch Mutations (controller entry points)
    // -------------------------------------------------------------------------

    /// Shift one sibling a single slot along `axis`, updating its branch
    /// slot, translate and indicator attribute in one step.
    pub(crate) fn shift_element(
        &mut self,
        dom: &mut dyn DomAdapter,
        sk: &Sk,
        id: &str,
        axis: Axis,
        toward: Direction,
        space: f64,
    ) -> bool {
        let Some(branch) = self.branches.get_mut(sk) else {
            return false;
        };
        let Some(elm) = self.registry.get_mut(id) else {
            return false;
        };

        elm.shift(dom, axis, toward, space, branch);
        true
    }

    /// Write `id` into the branch slot at `index` and adopt it as the
    /// element's intended order.
    pub(crate) fn assign_element_position(&mut self, sk: &Sk, id: &str, index: usize) {
        let Some(branch) = self.branches.get_mut(sk) else {
            return;
        };
        let Some(elm) = self.registry.get_mut(id) else {
            return;
        };

        elm.assign_new_position(branch, index);
    }

    /// Drop the stale trailing slot a head-fill or an unclaimed sentinel
    /// leaves behind once the dragged element leaves a container for good.
    pub(crate) fn prune_stale_tail(&mut self, sk: &Sk, dragged_id: &str) {
        let Some(branch) = self.branches.get_mut(sk) else {
            return;
        };
        let Some(last) = branch.last() else {
            return;
        };

        if last == APPEND_EMPTY_ELM_ID
            || last == dragged_id
            || branch[..branch.len() - 1].contains(last)
        {
            branch.pop();
        }
    }

    /// Walk every transformed sibling back to its live index, reversing the
    /// single-slot shifts of the aborted gesture. Assumes the gesture started
    /// from a converged branch.
    pub(crate) fn undo_sibling_shifts(
        &mut self,
        dom: &mut dyn DomAdapter,
        sk: &Sk,
        dragged_id: &str,
        row_space: f64,
    ) {
        let ids: Vec<String> = match self.branches.get(sk) {
            Some(branch) => branch.clone(),
            None => return,
        };

        let mut slots: Vec<(usize, String)> = Vec::with_capacity(ids.len());
        let mut seen: Vec<&str> = Vec::with_capacity(ids.len());

        for id in &ids {
            if id == dragged_id || seen.contains(&id.as_str()) {
                continue;
            }
            seen.push(id);

            let Some(elm) = self.registry.get_mut(id) else {
                continue;
            };

            let steps = elm.dom_index as i64 - elm.vdom_index as i64;
            if steps != 0 {
                elm.translate.y += steps as f64 * row_space;
                elm.grid.y += steps as i32;
                elm.vdom_index = elm.dom_index;
                dom.transform(id, elm.translate.x, elm.translate.y);
            }
            slots.push((elm.vdom_index, id.clone()));
        }

        if let Some(branch) = self.branches.get_mut(sk) {
            for (index, id) in slots {
                if let Some(slot) = branch.get_mut(index) {
                    *slot = id;
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------------

    /// Enqueue reconciliation for one branch and drain, emitting a mutation
    /// event carrying the final ordered id list.
    pub fn reconcile_branch(&mut self, sk: &Sk, dom: &mut dyn DomAdapter) {
        let Ok(container) = self.get_container(sk) else {
            warn!(sk = %sk, "reconcile: no container for key, skipping");
            return;
        };
        let target = container.id.clone();
        let ids = self.branches.get(sk).cloned().unwrap_or_default();

        self.updates.enqueue(
            UpdateTask::new(Update::Reconcile(sk.clone()))
                .with_emit(DragEvent::Mutation { target, ids }),
        );
        self.drain_updates(dom);
    }

    /// Apply the virtual order of every container touched during the active
    /// migration cycle to the host tree, then clear the cycle.
    ///
    /// With no migration (a pure click without movement), falls back to
    /// reconciling only the top-level containers so a no-op drag still
    /// converges the host tree to any externally mutated state.
    pub fn commit(&mut self, dom: &mut dyn DomAdapter) {
        let keys: Vec<Sk> = match &self.migration {
            Some(migration) if !migration.container_keys.is_empty() => {
                migration.container_keys.iter().cloned().collect()
            }
            _ => {
                warn!("migration is empty; committing zero-depth containers");
                self.get_branches_by_depth(0).to_vec()
            }
        };

        for sk in &keys {
            self.reconcile_branch(sk, dom);
        }

        if let Some(migration) = &mut self.migration {
            migration.clear();
        }
        self.migration = None;

        state::set_layout_status(LayoutStatus::Ready);
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Full teardown: releases all records, listeners and the migration
    /// cycle. Intended for page navigation or app unmount.
    pub fn destroy(&mut self) {
        for scroll in self.scrolls.values_mut() {
            scroll.destroy();
        }
        self.scrolls.clear();
        self.registry.clear();
        self.branches.clear();
        self.branches_by_depth.clear();
        self.containers.clear();
        self.unified_dimensions.clear();
        self.migration = None;
        self.updates.clear();
        self.listeners.clear();
        self.initialized = false;
        state::reset_layout_signals();
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;
    use crate::dom::mock::MockDom;

    pub const ROW_HEIGHT: f64 = 20.0;

    /// Register a vertical list of rows under one parent.
    pub fn seed_list(store: &mut Store, dom: &mut MockDom, parent: &str, ids: &[&str]) -> Sk {
        if dom.rect(parent).is_none() {
            dom.add_node(
                parent,
                Rect::new(0.0, 0.0, 100.0, ids.len() as f64 * ROW_HEIGHT),
            );
        }

        for (i, id) in ids.iter().enumerate() {
            dom.add_child(
                parent,
                id,
                Rect::new(i as f64 * ROW_HEIGHT, 0.0, 100.0, ROW_HEIGHT),
            );
            store.register(
                RegisterSpec {
                    id: id.to_string(),
                    parent_id: parent.to_string(),
                    depth: 0,
                    readonly: false,
                },
                dom,
            );
        }

        Sk::from_parent(0, parent)
    }
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::*;
    use super::*;
    use crate::dom::mock::MockDom;
    use crate::geometry::Point;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_register_builds_branch_and_grid() {
        let mut store = Store::new();
        let mut dom = MockDom::new();

        let sk = seed_list(&mut store, &mut dom, "list", &["a", "b", "c"]);

        assert_eq!(store.get_branch_by_key(&sk).unwrap(), ["a", "b", "c"]);

        let a = store.get_element("a").unwrap();
        assert_eq!(a.vdom_index, 0);
        assert_eq!(a.dom_index, 0);
        assert_eq!(a.grid, Point::new(1, 1));

        let c = store.get_element("c").unwrap();
        assert_eq!(c.grid, Point::new(1, 3));

        let container = store.get_container(&sk).unwrap();
        assert_eq!(container.grid, Point::new(1, 3));
        assert!(store.get_scroll(&sk).is_ok());
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut store = Store::new();
        let mut dom = MockDom::new();
        let sk = seed_list(&mut store, &mut dom, "list", &["a", "b"]);

        // Give "a" a live transform, then re-register it.
        store.get_element_mut("a").unwrap().translate.set_axes(0.0, 12.0);
        store.register(
            RegisterSpec {
                id: "a".into(),
                parent_id: "list".into(),
                depth: 0,
                readonly: false,
            },
            &mut dom,
        );

        // Branch untouched, last transform re-applied.
        assert_eq!(store.get_branch_by_key(&sk).unwrap(), ["a", "b"]);
        assert_eq!(dom.transform_of("a").y, 12.0);
    }

    #[test]
    fn test_first_registration_emits_pending_layout_state() {
        let mut store = Store::new();
        let mut dom = MockDom::new();

        let statuses: Rc<RefCell<Vec<LayoutStatus>>> = Rc::new(RefCell::new(Vec::new()));
        let seen = statuses.clone();
        store.listeners.on(move |event| {
            if let DragEvent::LayoutState { status } = event {
                seen.borrow_mut().push(*status);
            }
        });

        seed_list(&mut store, &mut dom, "list", &["a", "b"]);

        // Only the very first registration notifies.
        assert_eq!(*statuses.borrow(), vec![LayoutStatus::Pending]);
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let mut store = Store::new();
        store.unregister("ghost");
        assert!(!store.has("ghost"));
    }

    #[test]
    fn test_unregister_last_element_destroys_scroll() {
        let mut store = Store::new();
        let mut dom = MockDom::new();
        let sk = seed_list(&mut store, &mut dom, "list", &["only"]);

        store.unregister("only");

        assert!(!store.has("only"));
        assert!(store.get_scroll(&sk).is_err());
        // Key was seen: the branch lookup still succeeds, empty.
        assert!(store.get_branch_by_key(&sk).unwrap().is_empty());
    }

    #[test]
    fn test_lookup_errors_are_distinct() {
        let store = Store::new();
        let never_seen = Sk::from_parent(0, "nope");

        assert!(matches!(
            store.get_branch_by_key(&never_seen),
            Err(StoreError::BranchNotFound(_))
        ));
        assert!(matches!(
            store.get_element("ghost"),
            Err(StoreError::ElementNotRegistered(_))
        ));
    }

    #[test]
    fn test_commit_without_migration_reconciles_depth_zero() {
        let mut store = Store::new();
        let mut dom = MockDom::new();
        seed_list(&mut store, &mut dom, "list", &["a", "b"]);

        let mutations: Rc<RefCell<Vec<DragEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let seen = mutations.clone();
        store.listeners.on(move |event| {
            if matches!(event, DragEvent::Mutation { .. }) {
                seen.borrow_mut().push(event.clone());
            }
        });

        store.commit(&mut dom);

        assert_eq!(mutations.borrow().len(), 1);
        assert_eq!(
            mutations.borrow()[0],
            DragEvent::Mutation {
                target: "list".into(),
                ids: vec!["a".into(), "b".into()],
            }
        );
        // Nothing moved: orders already converged.
        assert_eq!(dom.moves, 0);
    }

    #[test]
    fn test_destroy_releases_everything() {
        let mut store = Store::new();
        let mut dom = MockDom::new();
        let sk = seed_list(&mut store, &mut dom, "list", &["a"]);

        store.destroy();

        assert!(!store.has("a"));
        assert!(store.get_branch_by_key(&sk).is_err());
        assert!(store.get_container(&sk).is_err());
        assert!(store.is_idle());
    }
}
