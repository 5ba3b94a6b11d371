//! Per-node listener registry (component F).

use std::rc::Rc;

use crate::event::Event;

/// A registered observer of events dispatched through a node.
///
/// Rust has no cross-boundary exceptions; a listener that needs to signal
/// failure should do so through its own side channel rather than unwinding
/// out of `handle_event`, since unwinding through the dispatch engine would
/// leave shared tree state mid-borrow.
pub trait EventListener {
    fn handle_event(&self, event: &Event);
}

/// Adapts any `Fn(&Event)` closure into an `EventListener`.
impl<F: Fn(&Event)> EventListener for F {
    fn handle_event(&self, event: &Event) {
        self(event)
    }
}

#[derive(Clone)]
pub(crate) struct ListenerEntry {
    pub event_type: String,
    pub listener: Rc<dyn EventListener>,
    pub capture: bool,
}

impl ListenerEntry {
    fn matches(&self, event_type: &str, listener: &Rc<dyn EventListener>, capture: bool) -> bool {
        self.event_type == event_type && self.capture == capture && Rc::ptr_eq(&self.listener, listener)
    }
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: Vec<ListenerEntry>,
}

impl ListenerRegistry {
    pub fn add(&mut self, event_type: impl Into<String>, listener: Rc<dyn EventListener>, capture: bool) {
        let event_type = event_type.into();
        if self
            .entries
            .iter()
            .any(|entry| entry.matches(&event_type, &listener, capture))
        {
            return;
        }
        self.entries.push(ListenerEntry {
            event_type,
            listener,
            capture,
        });
    }

    pub fn remove(&mut self, event_type: &str, listener: &Rc<dyn EventListener>, capture: bool) {
        self.entries.retain(|entry| !entry.matches(event_type, listener, capture));
    }

    /// Snapshot of the listeners matching `event_type`/`capture`, taken at
    /// the moment this is called. Subsequent mutation of the registry
    /// (additions or removals made from inside a handler) does not affect
    /// the returned `Vec`.
    pub fn snapshot(&self, event_type: &str, capture: bool) -> Vec<Rc<dyn EventListener>> {
        self.entries
            .iter()
            .filter(|entry| entry.event_type == event_type && entry.capture == capture)
            .map(|entry| entry.listener.clone())
            .collect()
    }
}
