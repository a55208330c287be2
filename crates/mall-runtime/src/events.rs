//! Event listener registry
//!
//! Listeners are keyed by (target, kind) and kept in registration order.
//! Handlers are shared so dispatch can release the registry before calling
//! into page code, which is free to register more listeners.

use std::cell::RefCell;
use std::rc::Rc;

use mall_dom::NodeId;
use mall_page::{EventKind, EventTarget};

/// Shared, re-borrowable handler
pub type SharedHandler<F> = Rc<RefCell<F>>;

struct Listener<F> {
    target: EventTarget<NodeId>,
    kind: EventKind,
    handler: SharedHandler<F>,
}

/// Registered listeners
pub struct ListenerRegistry<F> {
    listeners: Vec<Listener<F>>,
}

impl<F> ListenerRegistry<F> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn add(&mut self, target: EventTarget<NodeId>, kind: EventKind, handler: F) {
        self.listeners.push(Listener {
            target,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
    }

    /// Handlers for one hop of a dispatch, in registration order
    pub fn matching(&self, target: &EventTarget<NodeId>, kind: EventKind) -> Vec<SharedHandler<F>> {
        self.listeners
            .iter()
            .filter(|l| l.kind == kind && &l.target == target)
            .map(|l| Rc::clone(&l.handler))
            .collect()
    }

    pub fn count(&self, target: &EventTarget<NodeId>, kind: EventKind) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.kind == kind && &l.target == target)
            .count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<F> Default for ListenerRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_keeps_registration_order() {
        let mut registry: ListenerRegistry<&'static str> = ListenerRegistry::new();
        registry.add(EventTarget::Window, EventKind::Scroll, "navbar");
        registry.add(EventTarget::Document, EventKind::Click, "outside");
        registry.add(EventTarget::Window, EventKind::Scroll, "back-to-top");

        let names: Vec<_> = registry
            .matching(&EventTarget::Window, EventKind::Scroll)
            .iter()
            .map(|h| *h.borrow())
            .collect();
        assert_eq!(names, vec!["navbar", "back-to-top"]);
        assert_eq!(registry.count(&EventTarget::Document, EventKind::KeyDown), 0);
        assert_eq!(registry.len(), 3);
    }
}
