//! Update queue - serializes structural mutations.
//!
//! Registration and reconciliation are never applied mid-flight: callers
//! enqueue a unit of work plus an optional completion hook plus an optional
//! event to emit on completion, and the store drains strictly in submission
//! order with at most one update in flight.

use std::collections::VecDeque;

use crate::engine::Sk;
use crate::store::DragEvent;

/// Input for a deferred element registration.
#[derive(Debug, Clone)]
pub struct RegisterSpec {
    pub id: String,
    pub parent_id: String,
    pub depth: u8,
    pub readonly: bool,
}

/// One structural mutation.
pub enum Update {
    Register(RegisterSpec),
    Reconcile(Sk),
}

/// A queued unit of work.
pub struct UpdateTask {
    pub update: Update,
    pub on_complete: Option<Box<dyn FnOnce()>>,
    pub emit: Option<DragEvent>,
}

impl UpdateTask {
    pub fn new(update: Update) -> Self {
        Self {
            update,
            on_complete: None,
            emit: None,
        }
    }

    pub fn with_emit(mut self, event: DragEvent) -> Self {
        self.emit = Some(event);
        self
    }

    pub fn with_hook(mut self, hook: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }
}

/// FIFO queue of structural updates.
#[derive(Default)]
pub struct UpdateQueue {
    queue: VecDeque<UpdateTask>,
    /// True while one update is being applied.
    pub is_updating: bool,
}

impl UpdateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, task: UpdateTask) {
        self.queue.push_back(task);
    }

    pub fn pop(&mut self) -> Option<UpdateTask> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.is_updating = false;
    }
}
