//! `Event` and `MutationEvent` value objects.
//!
//! https://www.w3.org/TR/DOM-Level-2-Events/events.html

use std::cell::Cell;

use crate::node::NodeRef;

/// Event type constants, used verbatim on the wire of the tree API.
pub mod event_type {
    pub const DOM_SUBTREE_MODIFIED: &str = "DOMSubtreeModified";
    pub const DOM_NODE_INSERTED: &str = "DOMNodeInserted";
    pub const DOM_NODE_REMOVED: &str = "DOMNodeRemoved";
    pub const DOM_NODE_INSERTED_INTO_DOCUMENT: &str = "DOMNodeInsertedIntoDocument";
    pub const DOM_NODE_REMOVED_FROM_DOCUMENT: &str = "DOMNodeRemovedFromDocument";
    pub const DOM_ATTR_MODIFIED: &str = "DOMAttrModified";
    pub const DOM_CHARACTER_DATA_MODIFIED: &str = "DOMCharacterDataModified";
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum EventPhase {
    Capturing,
    AtTarget,
    Bubbling,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum AttrChange {
    Modification,
    Addition,
    Removal,
}

/// Payload carried by events the tree synthesizes itself, as opposed to
/// plain application-authored events dispatched via `dispatchEvent`.
#[derive(Debug, Clone)]
pub struct MutationDetail {
    pub related_node: Option<NodeRef>,
    pub attr_name: Option<String>,
    pub attr_change: Option<AttrChange>,
    pub prev_value: Option<String>,
    pub new_value: Option<String>,
}

impl MutationDetail {
    pub fn empty() -> Self {
        MutationDetail {
            related_node: None,
            attr_name: None,
            attr_change: None,
            prev_value: None,
            new_value: None,
        }
    }
}

pub struct Event {
    event_type: String,
    bubbles: bool,
    cancelable: bool,
    target: Cell<Option<NodeRef>>,
    current_target: Cell<Option<NodeRef>>,
    phase: Cell<Option<EventPhase>>,
    stop_propagation: Cell<bool>,
    prevent_default: Cell<bool>,
    mutation: Option<MutationDetail>,
}

impl Event {
    pub fn new(event_type: impl Into<String>, bubbles: bool, cancelable: bool) -> Self {
        Event {
            event_type: event_type.into(),
            bubbles,
            cancelable,
            target: Cell::new(None),
            current_target: Cell::new(None),
            phase: Cell::new(None),
            stop_propagation: Cell::new(false),
            prevent_default: Cell::new(false),
            mutation: None,
        }
    }

    pub fn new_mutation(
        event_type: impl Into<String>,
        bubbles: bool,
        cancelable: bool,
        mutation: MutationDetail,
    ) -> Self {
        let mut event = Event::new(event_type, bubbles, cancelable);
        event.mutation = Some(mutation);
        event
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn target(&self) -> Option<NodeRef> {
        let target = self.target.take();
        self.target.set(target.clone());
        target
    }

    pub(crate) fn set_target(&self, node: NodeRef) {
        self.target.set(Some(node));
    }

    pub fn current_target(&self) -> Option<NodeRef> {
        let current = self.current_target.take();
        self.current_target.set(current.clone());
        current
    }

    pub(crate) fn set_current_target(&self, node: NodeRef) {
        self.current_target.set(Some(node));
    }

    pub fn event_phase(&self) -> Option<EventPhase> {
        self.phase.get()
    }

    pub(crate) fn set_phase(&self, phase: EventPhase) {
        self.phase.set(Some(phase));
    }

    pub fn stop_propagation(&self) {
        self.stop_propagation.set(true);
    }

    pub(crate) fn propagation_stopped(&self) -> bool {
        self.stop_propagation.get()
    }

    pub fn prevent_default(&self) {
        if self.cancelable {
            self.prevent_default.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.prevent_default.get()
    }

    pub fn related_node(&self) -> Option<NodeRef> {
        self.mutation.as_ref()?.related_node.clone()
    }

    pub fn attr_name(&self) -> Option<&str> {
        self.mutation.as_ref()?.attr_name.as_deref()
    }

    pub fn attr_change(&self) -> Option<AttrChange> {
        self.mutation.as_ref()?.attr_change
    }

    pub fn prev_value(&self) -> Option<&str> {
        self.mutation.as_ref()?.prev_value.as_deref()
    }

    pub fn new_value(&self) -> Option<&str> {
        self.mutation.as_ref()?.new_value.as_deref()
    }
}
