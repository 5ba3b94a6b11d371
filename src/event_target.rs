//! `EventTarget` surface (`addEventListener`/`removeEventListener`/
//! `dispatchEvent`), implemented directly on `Node` since every node in
//! this tree is an event target.

use std::rc::Rc;

use crate::dispatch;
use crate::event::Event;
use crate::listener::EventListener;
use crate::node::{Node, NodeRef};

impl Node {
    pub fn add_event_listener(
        self: &Rc<Self>,
        event_type: impl Into<String>,
        listener: Rc<dyn EventListener>,
        capture: bool,
    ) {
        self.listeners.borrow_mut().add(event_type, listener, capture);
    }

    pub fn remove_event_listener(
        self: &Rc<Self>,
        event_type: &str,
        listener: &Rc<dyn EventListener>,
        capture: bool,
    ) {
        self.listeners.borrow_mut().remove(event_type, listener, capture);
    }

    /// Dispatches a caller-authored `Event` at this node through the same
    /// three-phase engine the tree uses for its own mutation events.
    pub fn dispatch_event(self: &NodeRef, event: &Event) {
        dispatch::dispatch(self, &self.ancestors_path(), event);
    }
}
