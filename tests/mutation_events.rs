//! End-to-end reproduction of the classic mutation-event scenarios: the
//! capture/at-target/bubble sequence a tree of `DOMNodeInserted`,
//! `DOMNodeRemoved`, `DOMCharacterDataModified`, and `DOMAttrModified`
//! listeners sees for a single structural or data change.

use std::cell::RefCell;
use std::rc::Rc;

use domtree::{element, event_type, mutation};
use domtree::{Document, Event, EventListener, EventPhase, NodeRef};

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    label: &'static str,
    log: Log,
}

impl EventListener for Recorder {
    fn handle_event(&self, event: &Event) {
        let phase = match event.event_phase() {
            Some(EventPhase::Capturing) => "CAPTURING",
            Some(EventPhase::AtTarget) => "AT_TARGET",
            Some(EventPhase::Bubbling) => "BUBBLING",
            None => "NONE",
        };
        self.log
            .borrow_mut()
            .push(format!("{}:{}:{}", self.label, event.event_type(), phase));
    }
}

fn listen(node: &NodeRef, label: &'static str, log: &Log, event_type: &str, capture: bool) {
    node.add_event_listener(event_type, Rc::new(Recorder { label, log: log.clone() }), capture);
}

#[test]
fn three_phase_dispatch_visits_ancestors_then_target_then_ancestors_again() {
    let doc = Document::new();
    let root = doc.create_element("root").unwrap();
    mutation::append_child(doc.node(), &root).unwrap();
    let child = doc.create_element("child").unwrap();

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    listen(doc.node(), "doc-capture", &log, event_type::DOM_NODE_INSERTED, true);
    listen(doc.node(), "doc-bubble", &log, event_type::DOM_NODE_INSERTED, false);
    listen(&root, "root-capture", &log, event_type::DOM_NODE_INSERTED, true);
    listen(&root, "root-bubble", &log, event_type::DOM_NODE_INSERTED, false);
    listen(&child, "child-capture", &log, event_type::DOM_NODE_INSERTED, true);
    listen(&child, "child-bubble", &log, event_type::DOM_NODE_INSERTED, false);

    mutation::append_child(&root, &child).unwrap();

    // Capturing walks the ancestors top-down (doc, then root); AT_TARGET
    // fires both the target's capturing and non-capturing listeners;
    // bubbling then walks the same ancestors bottom-up.
    assert_eq!(
        *log.borrow(),
        vec![
            "doc-capture:DOMNodeInserted:CAPTURING".to_string(),
            "root-capture:DOMNodeInserted:CAPTURING".to_string(),
            "child-capture:DOMNodeInserted:AT_TARGET".to_string(),
            "child-bubble:DOMNodeInserted:AT_TARGET".to_string(),
            "root-bubble:DOMNodeInserted:BUBBLING".to_string(),
            "doc-bubble:DOMNodeInserted:BUBBLING".to_string(),
        ]
    );
}

#[test]
fn inserting_a_node_into_an_attached_parent_fires_the_full_event_sequence_in_order() {
    let doc = Document::new();
    let root = doc.create_element("root").unwrap();
    mutation::append_child(doc.node(), &root).unwrap();
    let child = doc.create_element("child").unwrap();

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    for (label, ty) in [
        ("inserted", event_type::DOM_NODE_INSERTED),
        ("into-doc", event_type::DOM_NODE_INSERTED_INTO_DOCUMENT),
        ("subtree", event_type::DOM_SUBTREE_MODIFIED),
    ] {
        listen(&child, label, &log, ty, false);
        listen(&root, label, &log, ty, false);
    }

    mutation::append_child(&root, &child).unwrap();

    // DOMNodeInserted targets the inserted node and bubbles; since the
    // parent is already attached to the document, DOMNodeInsertedIntoDocument
    // follows immediately; DOMSubtreeModified always fires last, targeting
    // the immediate parent of the change.
    let raw_kinds: Vec<String> = log
        .borrow()
        .iter()
        .map(|s| s.split(':').next().unwrap().to_string())
        .collect();
    let mut kinds: Vec<String> = Vec::new();
    for kind in raw_kinds {
        if kinds.last() != Some(&kind) {
            kinds.push(kind);
        }
    }
    assert_eq!(kinds, vec!["inserted", "into-doc", "subtree"]);
}

#[test]
fn inserting_a_subtree_fires_into_document_for_every_descendant_in_preorder() {
    let doc = Document::new();
    let root = doc.create_element("root").unwrap();
    mutation::append_child(doc.node(), &root).unwrap();

    let parent = doc.create_element("parent").unwrap();
    let child = doc.create_text_node("hi");
    mutation::append_child(&parent, &child).unwrap();

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    listen(&parent, "parent", &log, event_type::DOM_NODE_INSERTED_INTO_DOCUMENT, false);
    listen(&child, "child", &log, event_type::DOM_NODE_INSERTED_INTO_DOCUMENT, false);

    mutation::append_child(&root, &parent).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "parent:DOMNodeInsertedIntoDocument:AT_TARGET".to_string(),
            "child:DOMNodeInsertedIntoDocument:AT_TARGET".to_string(),
        ]
    );
}

#[test]
fn removing_a_node_still_fires_on_the_detached_node_using_its_old_ancestry() {
    let doc = Document::new();
    let root = doc.create_element("root").unwrap();
    mutation::append_child(doc.node(), &root).unwrap();
    let text = doc.create_text_node("hello");
    mutation::append_child(&root, &text).unwrap();

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    listen(doc.node(), "doc", &log, event_type::DOM_NODE_REMOVED, false);
    listen(&text, "text", &log, event_type::DOM_NODE_REMOVED, false);
    listen(&text, "text", &log, event_type::DOM_NODE_REMOVED_FROM_DOCUMENT, false);
    listen(&root, "root", &log, event_type::DOM_SUBTREE_MODIFIED, false);

    mutation::remove_child(&root, &text).unwrap();

    // The removed node's own listener still fires (AT_TARGET), and the
    // event still bubbles to the *old* parent chain even though the node
    // is already unlinked by the time listeners run.
    assert_eq!(
        *log.borrow(),
        vec![
            "text:DOMNodeRemoved:AT_TARGET".to_string(),
            "doc:DOMNodeRemoved:BUBBLING".to_string(),
            "text:DOMNodeRemovedFromDocument:AT_TARGET".to_string(),
            "root:DOMSubtreeModified:AT_TARGET".to_string(),
        ]
    );
    assert!(text.parent_node().is_none());
    assert!(root.first_child().is_none());
}

#[test]
fn removing_a_whole_subtree_fires_removed_from_document_for_every_descendant() {
    let doc = Document::new();
    let root = doc.create_element("root").unwrap();
    mutation::append_child(doc.node(), &root).unwrap();
    let branch = doc.create_element("branch").unwrap();
    let leaf = doc.create_text_node("leaf");
    mutation::append_child(&branch, &leaf).unwrap();
    mutation::append_child(&root, &branch).unwrap();

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    listen(&branch, "branch", &log, event_type::DOM_NODE_REMOVED_FROM_DOCUMENT, false);
    listen(&leaf, "leaf", &log, event_type::DOM_NODE_REMOVED_FROM_DOCUMENT, false);

    mutation::remove_child(&root, &branch).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "branch:DOMNodeRemovedFromDocument:AT_TARGET".to_string(),
            "leaf:DOMNodeRemovedFromDocument:AT_TARGET".to_string(),
        ]
    );
    assert!(leaf.parent_node().is_some());
    assert!(branch.parent_node().is_none());
}

#[test]
fn character_data_modification_fires_on_the_text_node_itself() {
    let doc = Document::new();
    let text = doc.create_text_node("foo");

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    listen(&text, "text", &log, event_type::DOM_CHARACTER_DATA_MODIFIED, false);

    domtree::character_data::append_data(&text, "bar").unwrap();

    assert_eq!(*log.borrow(), vec!["text:DOMCharacterDataModified:AT_TARGET".to_string()]);
    assert_eq!(text.node_value().as_deref(), Some("foobar"));
}

#[test]
fn attribute_mutation_fires_dom_attr_modified_with_the_right_change_kind() {
    let doc = Document::new();
    let root = doc.create_element("root").unwrap();

    let changes: Log = Rc::new(RefCell::new(Vec::new()));
    let changes_for_handler = changes.clone();
    let recorder: Rc<dyn EventListener> = Rc::new(move |event: &Event| {
        changes_for_handler
            .borrow_mut()
            .push(format!("{:?}:{}->{}", event.attr_change().unwrap(), event.prev_value().unwrap(), event.new_value().unwrap()));
    });
    root.add_event_listener(event_type::DOM_ATTR_MODIFIED, recorder, false);

    element::set_attribute(&root, "class", "a").unwrap();
    element::set_attribute(&root, "class", "b").unwrap();
    element::set_attribute(&root, "class", "b").unwrap(); // no-op, same value
    element::remove_attribute(&root, "class").unwrap();

    assert_eq!(
        *changes.borrow(),
        vec![
            "Addition:->a".to_string(),
            "Modification:a->b".to_string(),
            "Removal:b->".to_string(),
        ]
    );
}

#[test]
fn stop_propagation_only_takes_effect_after_the_current_nodes_full_snapshot() {
    let doc = Document::new();
    let root = doc.create_element("root").unwrap();
    mutation::append_child(doc.node(), &root).unwrap();

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let log_for_stopper = log.clone();
    let stopper: Rc<dyn EventListener> = Rc::new(move |event: &Event| {
        log_for_stopper.borrow_mut().push("root:stopper".to_string());
        event.stop_propagation();
    });
    root.add_event_listener(event_type::DOM_NODE_INSERTED, stopper, false);
    listen(&root, "root:second", &log, event_type::DOM_NODE_INSERTED, false);
    listen(doc.node(), "doc", &log, event_type::DOM_NODE_INSERTED, false);

    let child = doc.create_element("child").unwrap();
    mutation::append_child(&root, &child).unwrap();

    // `root` is an ancestor of the inserted `child`, so both of its bubble
    // listeners run during the bubble phase even though the first one
    // called stopPropagation: a node's whole snapshot always runs to
    // completion. Only the subsequent bubble to `doc` is suppressed.
    assert_eq!(
        *log.borrow(),
        vec![
            "root:stopper".to_string(),
            "root:second:DOMNodeInserted:BUBBLING".to_string(),
        ]
    );
}

#[test]
fn prevent_default_is_ignored_on_a_non_cancelable_event_but_honored_on_a_cancelable_one() {
    let non_cancelable = Event::new("ping", true, false);
    non_cancelable.prevent_default();
    assert!(!non_cancelable.default_prevented());

    let cancelable = Event::new("ping", true, true);
    cancelable.prevent_default();
    assert!(cancelable.default_prevented());
}

#[test]
fn suspended_document_drops_every_event_without_affecting_the_mutation_itself() {
    let doc = Document::new();
    let root = doc.create_element("root").unwrap();
    mutation::append_child(doc.node(), &root).unwrap();

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    listen(&root, "root", &log, event_type::DOM_NODE_INSERTED, false);

    doc.suspend_events();
    let child = doc.create_element("child").unwrap();
    mutation::append_child(&root, &child).unwrap();
    doc.resume_events();

    assert!(log.borrow().is_empty());
    assert!(Rc::ptr_eq(&root.first_child().unwrap(), &child));

    let second_child = doc.create_element("other").unwrap();
    mutation::append_child(&root, &second_child).unwrap();
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn a_listener_added_during_dispatch_does_not_fire_for_the_current_event() {
    let doc = Document::new();
    let root = doc.create_element("root").unwrap();
    mutation::append_child(doc.node(), &root).unwrap();

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let root_for_handler = root.clone();
    let log_for_handler = log.clone();
    let adder: Rc<dyn EventListener> = Rc::new(move |_event: &Event| {
        log_for_handler.borrow_mut().push("adder-ran".to_string());
        listen(
            &root_for_handler,
            "late",
            &log_for_handler,
            event_type::DOM_NODE_INSERTED,
            false,
        );
    });
    root.add_event_listener(event_type::DOM_NODE_INSERTED, adder, false);

    let child = doc.create_element("child").unwrap();
    mutation::append_child(&root, &child).unwrap();

    // The listener registered mid-dispatch must not have fired for this
    // same DOMNodeInserted event.
    assert_eq!(*log.borrow(), vec!["adder-ran".to_string()]);

    let second_child = doc.create_element("second").unwrap();
    mutation::append_child(&root, &second_child).unwrap();
    // `root` is an ancestor of `second_child`, not the target, so the event
    // reaches it during the bubble phase; the listener registered on the
    // previous dispatch is now present and fires alongside `adder`.
    assert_eq!(
        *log.borrow(),
        vec![
            "adder-ran".to_string(),
            "adder-ran".to_string(),
            "late:DOMNodeInserted:BUBBLING".to_string(),
        ]
    );
}
