//! Event listeners - fire-and-forget notifications for external bindings.
//!
//! The commit payload (`Mutation { target, ids }`) is the closest thing to a
//! public protocol surface: it carries the exact final ordered id list for
//! the affected container.

use std::rc::Rc;

/// Layout lifecycle reported to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStatus {
    Pending,
    Ready,
}

/// Events dispatched by the engine during a drag interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    /// Siblings shifted toward the head after the dragged left from the top.
    LiftUp {
        siblings: Vec<String>,
        from: usize,
        to: usize,
    },
    /// Siblings shifted down to make room for an insertion.
    MoveDown {
        siblings: Vec<String>,
        from: usize,
        to: usize,
    },
    /// Dragged element crossed its insertion threshold.
    OutThreshold { id: String, index: Option<usize> },
    /// Dragged element left its container bounds entirely.
    OutContainer { id: String, index: Option<usize> },
    /// Reconciliation committed: final ordered ids of one container.
    Mutation { target: String, ids: Vec<String> },
    /// Layout state notification scheduled on first registration.
    LayoutState { status: LayoutStatus },
}

/// Handler for drag events.
pub type DragEventHandler = Rc<dyn Fn(&DragEvent)>;

/// Listener registry. Dispatch is fire-and-forget, in registration order.
#[derive(Default)]
pub struct Listeners {
    handlers: Vec<(usize, DragEventHandler)>,
    next_id: usize,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Returns an id usable with [`Self::off`].
    pub fn on<F>(&mut self, handler: F) -> usize
    where
        F: Fn(&DragEvent) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.handlers.push((id, Rc::new(handler)));
        id
    }

    /// Remove a previously registered listener.
    pub fn off(&mut self, id: usize) {
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
    }

    pub fn dispatch(&self, event: &DragEvent) {
        for (_, handler) in &self.handlers {
            handler(event);
        }
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_dispatch_and_off() {
        let mut listeners = Listeners::new();
        let seen: Rc<RefCell<Vec<DragEvent>>> = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        let id = listeners.on(move |event| {
            seen_clone.borrow_mut().push(event.clone());
        });

        let event = DragEvent::OutThreshold {
            id: "a".into(),
            index: Some(1),
        };
        listeners.dispatch(&event);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0], event);

        listeners.off(id);
        listeners.dispatch(&event);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_dispatch_order_follows_registration() {
        let mut listeners = Listeners::new();
        let order: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));

        let first = order.clone();
        listeners.on(move |_| first.borrow_mut().push(1));
        let second = order.clone();
        listeners.on(move |_| second.borrow_mut().push(2));

        listeners.dispatch(&DragEvent::LayoutState {
            status: LayoutStatus::Pending,
        });
        assert_eq!(*order.borrow(), vec![1, 2]);
    }
}
