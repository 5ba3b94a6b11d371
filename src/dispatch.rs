//! The dispatch engine (component H): three-phase propagation and
//! synthesis of the mutation-event sequence for each structural or data
//! change.

use log::trace;

use crate::event::{event_type, AttrChange, Event, EventPhase, MutationDetail};
use crate::node::NodeRef;

fn is_suspended(node: &NodeRef) -> bool {
    match node.document_or_self() {
        Some(document) => match &document.data {
            crate::node::NodeData::Document(doc) => doc.events_suspended.get(),
            _ => false,
        },
        None => false,
    }
}

/// Dispatches `event` at `target`, walking `path` (the target's ancestors,
/// top-down, captured by the caller) for the capture and bubble phases.
pub(crate) fn dispatch(target: &NodeRef, path: &[NodeRef], event: &Event) {
    if is_suspended(target) {
        trace!("dispatch: events suspended, dropping {}", event.event_type());
        return;
    }

    event.set_target(target.clone());

    event.set_phase(EventPhase::Capturing);
    for ancestor in path {
        event.set_current_target(ancestor.clone());
        invoke(ancestor, event, true);
        if event.propagation_stopped() {
            return;
        }
    }

    event.set_phase(EventPhase::AtTarget);
    event.set_current_target(target.clone());
    invoke(target, event, true);
    if event.propagation_stopped() {
        return;
    }
    invoke(target, event, false);
    if event.propagation_stopped() {
        return;
    }

    if event.bubbles() {
        event.set_phase(EventPhase::Bubbling);
        for ancestor in path.iter().rev() {
            event.set_current_target(ancestor.clone());
            invoke(ancestor, event, false);
            if event.propagation_stopped() {
                return;
            }
        }
    }
}

fn invoke(node: &NodeRef, event: &Event, capture: bool) {
    let snapshot = node.listeners.borrow().snapshot(event.event_type(), capture);
    for listener in snapshot {
        listener.handle_event(event);
    }
}

/// Dispatches the `DOMNodeInserted` / `DOMNodeInsertedIntoDocument` /
/// `DOMSubtreeModified` sequence for a node freshly inserted into
/// `new_parent`. Must be called after the structural insertion has
/// completed, so that `inserted`'s ancestor chain already reflects its new
/// position.
pub(crate) fn fire_insert_sequence(inserted: &NodeRef, new_parent: &NodeRef) {
    let inserted_event = Event::new_mutation(
        event_type::DOM_NODE_INSERTED,
        true,
        false,
        MutationDetail {
            related_node: Some(new_parent.clone()),
            ..MutationDetail::empty()
        },
    );
    dispatch(inserted, &inserted.ancestors_path(), &inserted_event);

    if inserted.is_in_document() {
        for node in preorder(inserted) {
            let into_document_event = Event::new_mutation(
                event_type::DOM_NODE_INSERTED_INTO_DOCUMENT,
                false,
                false,
                MutationDetail::empty(),
            );
            dispatch(&node, &node.ancestors_path(), &into_document_event);
        }
    }

    let subtree_event = Event::new_mutation(
        event_type::DOM_SUBTREE_MODIFIED,
        true,
        false,
        MutationDetail::empty(),
    );
    dispatch(new_parent, &new_parent.ancestors_path(), &subtree_event);
}

/// Dispatches the `DOMNodeRemoved` / `DOMNodeRemovedFromDocument` /
/// `DOMSubtreeModified` sequence for a node about to be detached from
/// `old_parent`. Must be called *before* the structural removal, since it
/// needs the pre-removal ancestor chain; the caller performs the actual
/// unlink between the first and second steps (see `mutation::remove_child`).
pub(crate) struct PendingRemoveSequence {
    removed_path: Vec<NodeRef>,
    was_in_document: bool,
    subtree_with_paths: Vec<(NodeRef, Vec<NodeRef>)>,
}

pub(crate) fn prepare_remove_sequence(removed: &NodeRef) -> PendingRemoveSequence {
    let removed_path = removed.ancestors_path();
    let was_in_document = removed.is_in_document();
    let subtree_with_paths = if was_in_document {
        preorder_with_paths(removed, &removed_path)
    } else {
        Vec::new()
    };
    PendingRemoveSequence {
        removed_path,
        was_in_document,
        subtree_with_paths,
    }
}

/// Fires the event sequence prepared by `prepare_remove_sequence`. Call
/// after the structural unlink has completed.
pub(crate) fn fire_remove_sequence(removed: &NodeRef, old_parent: &NodeRef, pending: PendingRemoveSequence) {
    let removed_event = Event::new_mutation(
        event_type::DOM_NODE_REMOVED,
        true,
        false,
        MutationDetail {
            related_node: Some(old_parent.clone()),
            ..MutationDetail::empty()
        },
    );
    dispatch(removed, &pending.removed_path, &removed_event);

    if pending.was_in_document {
        for (node, path) in pending.subtree_with_paths {
            let from_document_event = Event::new_mutation(
                event_type::DOM_NODE_REMOVED_FROM_DOCUMENT,
                false,
                false,
                MutationDetail::empty(),
            );
            dispatch(&node, &path, &from_document_event);
        }
    }

    let subtree_event = Event::new_mutation(
        event_type::DOM_SUBTREE_MODIFIED,
        true,
        false,
        MutationDetail::empty(),
    );
    dispatch(old_parent, &old_parent.ancestors_path(), &subtree_event);
}

pub(crate) fn fire_character_data_modified(node: &NodeRef, prev_value: &str, new_value: &str) {
    let event = Event::new_mutation(
        event_type::DOM_CHARACTER_DATA_MODIFIED,
        true,
        false,
        MutationDetail {
            prev_value: Some(prev_value.to_string()),
            new_value: Some(new_value.to_string()),
            ..MutationDetail::empty()
        },
    );
    dispatch(node, &node.ancestors_path(), &event);
}

pub(crate) fn fire_attr_modified(
    element: &NodeRef,
    attr: &NodeRef,
    attr_name: &str,
    change: AttrChange,
    prev_value: &str,
    new_value: &str,
) {
    let event = Event::new_mutation(
        event_type::DOM_ATTR_MODIFIED,
        true,
        false,
        MutationDetail {
            related_node: Some(attr.clone()),
            attr_name: Some(attr_name.to_string()),
            attr_change: Some(change),
            prev_value: Some(prev_value.to_string()),
            new_value: Some(new_value.to_string()),
        },
    );
    dispatch(element, &element.ancestors_path(), &event);
}

/// `root` and its descendants, in document (pre-)order.
fn preorder(root: &NodeRef) -> Vec<NodeRef> {
    let mut out = vec![root.clone()];
    for child in root.children_snapshot() {
        out.extend(preorder(&child));
    }
    out
}

fn preorder_with_paths(root: &NodeRef, base_path: &[NodeRef]) -> Vec<(NodeRef, Vec<NodeRef>)> {
    let mut out = vec![(root.clone(), base_path.to_vec())];
    let mut child_path = base_path.to_vec();
    child_path.push(root.clone());
    for child in root.children_snapshot() {
        out.extend(preorder_with_paths(&child, &child_path));
    }
    out
}
