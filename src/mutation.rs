//! Tree operations (component C): `insertBefore`, `appendChild`,
//! `replaceChild`, `removeChild`, `cloneNode`, with the invariants from
//! the DOM Level 2 Core mutation algorithms.

use std::rc::Rc;

use log::trace;

use crate::attr::AttrData;
use crate::dispatch;
use crate::error::{DomException, ErrorName};
use crate::node::{CharacterData, Node, NodeData, NodeRef};

pub fn append_child(parent: &NodeRef, new_child: &NodeRef) -> Result<NodeRef, DomException> {
    insert_before(parent, new_child, None)
}

pub fn insert_before(
    parent: &NodeRef,
    new_child: &NodeRef,
    ref_child: Option<&NodeRef>,
) -> Result<NodeRef, DomException> {
    ensure_pre_insertion_validity(parent, new_child, ref_child)?;

    if new_child.is_document_fragment() {
        for child in new_child.children_snapshot() {
            unlink(new_child, &child);
            insert_single(parent, &child, ref_child)?;
        }
        return Ok(new_child.clone());
    }

    insert_single(parent, new_child, ref_child)
}

fn insert_single(
    parent: &NodeRef,
    new_child: &NodeRef,
    ref_child: Option<&NodeRef>,
) -> Result<NodeRef, DomException> {
    if let Some(old_parent) = new_child.parent_node() {
        remove_child(&old_parent, new_child)?;
    }

    trace!(
        "insert {} under {} before {:?}",
        new_child.node_name(),
        parent.node_name(),
        ref_child.map(|n| n.node_name())
    );
    link_before(parent, new_child, ref_child);
    dispatch::fire_insert_sequence(new_child, parent);
    Ok(new_child.clone())
}

pub fn remove_child(parent: &NodeRef, old_child: &NodeRef) -> Result<NodeRef, DomException> {
    match old_child.parent_node() {
        Some(p) if Rc::ptr_eq(&p, parent) => {}
        _ => return Err(ErrorName::NotFoundError.into()),
    }

    trace!("remove {} from {}", old_child.node_name(), parent.node_name());
    let pending = dispatch::prepare_remove_sequence(old_child);
    unlink(parent, old_child);
    dispatch::fire_remove_sequence(old_child, parent, pending);
    Ok(old_child.clone())
}

pub fn replace_child(
    parent: &NodeRef,
    new_child: &NodeRef,
    old_child: &NodeRef,
) -> Result<NodeRef, DomException> {
    match old_child.parent_node() {
        Some(p) if Rc::ptr_eq(&p, parent) => {}
        _ => return Err(ErrorName::NotFoundError.into()),
    }
    ensure_pre_insertion_validity(parent, new_child, Some(old_child))?;

    let ref_child = old_child.next_sibling();
    remove_child(parent, old_child)?;
    insert_single(parent, new_child, ref_child.as_ref())?;
    Ok(old_child.clone())
}

pub fn clone_node(node: &NodeRef, deep: bool) -> NodeRef {
    let clone = shallow_clone(node);
    if deep {
        for child in node.children_snapshot() {
            let child_clone = clone_node(&child, true);
            link_before(&clone, &child_clone, None);
        }
    }
    clone
}

fn shallow_clone(node: &NodeRef) -> NodeRef {
    let data = match &node.data {
        NodeData::Document(_) => NodeData::Document(Default::default()),
        NodeData::DocumentFragment => NodeData::DocumentFragment,
        NodeData::DocumentType(dt) => NodeData::DocumentType(crate::node::DocumentTypeData {
            name: dt.name.clone(),
            public_id: dt.public_id.clone(),
            system_id: dt.system_id.clone(),
        }),
        NodeData::Element(element) => {
            let mut attributes = crate::attr::AttributeMap::default();
            for attr in element.attributes.borrow().iter() {
                attributes.push(clone_attr(attr));
            }
            NodeData::Element(crate::node::ElementData {
                name: element.name.clone(),
                attributes: std::cell::RefCell::new(attributes),
            })
        }
        NodeData::Attr(_) => unreachable!("attribute nodes are cloned via clone_attr"),
        NodeData::Text(cd) => NodeData::Text(CharacterData::new(cd.data.borrow().clone())),
        NodeData::CdataSection(cd) => {
            NodeData::CdataSection(CharacterData::new(cd.data.borrow().clone()))
        }
        NodeData::Comment(cd) => NodeData::Comment(CharacterData::new(cd.data.borrow().clone())),
        NodeData::ProcessingInstruction(pi) => {
            NodeData::ProcessingInstruction(crate::node::ProcessingInstructionData {
                target: pi.target.clone(),
                data: std::cell::RefCell::new(pi.data.borrow().clone()),
            })
        }
        NodeData::EntityReference { name } => NodeData::EntityReference { name: name.clone() },
        NodeData::Entity { name } => NodeData::Entity { name: name.clone() },
        NodeData::Notation { name } => NodeData::Notation { name: name.clone() },
    };
    let clone = Node::new(data);
    *clone.owner_document.borrow_mut() = node.owner_document.borrow().clone();
    clone
}

fn clone_attr(attr: &NodeRef) -> NodeRef {
    let name = match &attr.data {
        NodeData::Attr(data) => data.name.clone(),
        _ => unreachable!("attribute map entries are always Attr nodes"),
    };
    let value = attr.node_value().unwrap_or_default();
    let clone = Node::new(NodeData::Attr(AttrData::new(name, value)));
    *clone.owner_document.borrow_mut() = attr.owner_document.borrow().clone();
    clone
}

fn ensure_pre_insertion_validity(
    parent: &NodeRef,
    new_child: &NodeRef,
    ref_child: Option<&NodeRef>,
) -> Result<(), DomException> {
    if Rc::ptr_eq(parent, new_child) || new_child.is_inclusive_ancestor_of(parent) {
        return Err(ErrorName::HierarchyRequestError.into());
    }

    if let Some(ref_child) = ref_child {
        match ref_child.parent_node() {
            Some(p) if Rc::ptr_eq(&p, parent) => {}
            _ => return Err(ErrorName::NotFoundError.into()),
        }
    }

    if !can_parent_accept_child(parent, new_child) {
        return Err(ErrorName::HierarchyRequestError.into());
    }

    let same_owner = match (parent.document_or_self(), new_child.owner_document()) {
        (Some(a), Some(b)) => Rc::ptr_eq(&a, &b),
        _ => false,
    };
    if !same_owner {
        return Err(ErrorName::WrongDocumentError.into());
    }

    if parent.is_document() {
        // `ref_child` is excluded here too: `replace_child` calls this
        // validity check before removing the node being replaced, so a
        // document's existing element/doctype child must not count against
        // itself when it is also the thing about to be displaced.
        let existing_children: Vec<NodeRef> = parent
            .children_snapshot()
            .into_iter()
            .filter(|c| !Rc::ptr_eq(c, new_child) && ref_child.map_or(true, |r| !Rc::ptr_eq(c, r)))
            .collect();
        if new_child.is_element() && existing_children.iter().any(|c| c.is_element()) {
            return Err(ErrorName::HierarchyRequestError.into());
        }
        if new_child.is_document_type() && existing_children.iter().any(|c| c.is_document_type()) {
            return Err(ErrorName::HierarchyRequestError.into());
        }
    }

    Ok(())
}

fn can_parent_accept_child(parent: &NodeRef, child: &NodeRef) -> bool {
    use crate::node::NodeType::*;
    let child_ok = matches!(
        child.node_type(),
        Element
            | Text
            | CdataSection
            | Comment
            | ProcessingInstruction
            | EntityReference
            | DocumentFragment
            | DocumentType
    );
    if !child_ok {
        return false;
    }
    match parent.node_type() {
        Document => matches!(
            child.node_type(),
            Element | Comment | ProcessingInstruction | DocumentType | DocumentFragment
        ),
        Element | DocumentFragment | EntityReference => !matches!(child.node_type(), DocumentType),
        _ => false,
    }
}

/// Splices `new_child` into `parent`'s sibling chain immediately before
/// `ref_child` (or at the end, if `ref_child` is `None`). Purely
/// structural: fires no events, used both by the public mutation API
/// (which fires events around the call) and by `clone_node` (which must
/// not fire events while assembling a detached clone).
pub(crate) fn link_before(parent: &NodeRef, new_child: &NodeRef, ref_child: Option<&NodeRef>) {
    match ref_child {
        Some(ref_child) => {
            let prev = ref_child.previous_sibling();
            *new_child.previous_sibling.borrow_mut() = prev.as_ref().map(Rc::downgrade);
            *new_child.next_sibling.borrow_mut() = Some(ref_child.clone());
            match &prev {
                Some(p) => *p.next_sibling.borrow_mut() = Some(new_child.clone()),
                None => *parent.first_child.borrow_mut() = Some(new_child.clone()),
            }
            *ref_child.previous_sibling.borrow_mut() = Some(Rc::downgrade(new_child));
        }
        None => {
            let last = parent.last_child();
            *new_child.previous_sibling.borrow_mut() = last.as_ref().map(Rc::downgrade);
            *new_child.next_sibling.borrow_mut() = None;
            match &last {
                Some(l) => *l.next_sibling.borrow_mut() = Some(new_child.clone()),
                None => *parent.first_child.borrow_mut() = Some(new_child.clone()),
            }
            *parent.last_child.borrow_mut() = Some(Rc::downgrade(new_child));
        }
    }
    *new_child.parent.borrow_mut() = Some(Rc::downgrade(parent));
}

/// Removes `child` from `parent`'s sibling chain, repairing neighboring
/// links, and clears `child`'s back-links. Purely structural.
pub(crate) fn unlink(parent: &NodeRef, child: &NodeRef) {
    let prev = child.previous_sibling();
    let next = child.next_sibling();
    match (&prev, &next) {
        (Some(p), Some(n)) => {
            *p.next_sibling.borrow_mut() = Some(n.clone());
            *n.previous_sibling.borrow_mut() = Some(Rc::downgrade(p));
        }
        (Some(p), None) => {
            *p.next_sibling.borrow_mut() = None;
            *parent.last_child.borrow_mut() = Some(Rc::downgrade(p));
        }
        (None, Some(n)) => {
            *n.previous_sibling.borrow_mut() = None;
            *parent.first_child.borrow_mut() = Some(n.clone());
        }
        (None, None) => {
            *parent.first_child.borrow_mut() = None;
            *parent.last_child.borrow_mut() = None;
        }
    }
    *child.parent.borrow_mut() = None;
    *child.previous_sibling.borrow_mut() = None;
    *child.next_sibling.borrow_mut() = None;
}
