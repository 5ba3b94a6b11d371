//! Element attribute operations (component E), with `DOMAttrModified`
//! synthesis. Operates on any `Node` whose payload is `NodeData::Element`.

use std::rc::Rc;

use log::debug;

use crate::attr::AttrData;
use crate::dispatch;
use crate::document::split_qualified_name;
use crate::error::{DomException, ErrorName};
use crate::event::AttrChange;
use crate::node::{Node, NodeData, NodeRef};
use crate::qname::{check_name, Namespace, QualifiedName};

fn attributes_of(element: &NodeRef) -> Result<&std::cell::RefCell<crate::attr::AttributeMap>, DomException> {
    match &element.data {
        NodeData::Element(data) => Ok(&data.attributes),
        _ => Err(ErrorName::HierarchyRequestError.into()),
    }
}

pub fn get_attribute(element: &NodeRef, name: &str) -> Option<String> {
    let attributes = match &element.data {
        NodeData::Element(data) => &data.attributes,
        _ => return None,
    };
    attributes.borrow().get(name).map(|attr| attr.node_value().unwrap_or_default())
}

pub fn get_attribute_node(element: &NodeRef, name: &str) -> Option<NodeRef> {
    let attributes = match &element.data {
        NodeData::Element(data) => &data.attributes,
        _ => return None,
    };
    attributes.borrow().get(name)
}

pub fn has_attribute(element: &NodeRef, name: &str) -> bool {
    get_attribute_node(element, name).is_some()
}

pub fn set_attribute(element: &NodeRef, name: &str, value: &str) -> Result<(), DomException> {
    check_name(name)?;
    let attributes = attributes_of(element)?;
    let existing = attributes.borrow().get(name);

    match existing {
        Some(attr) => {
            let prev = attr.node_value().unwrap_or_default();
            if prev == value {
                return Ok(());
            }
            match &attr.data {
                NodeData::Attr(data) => *data.value.borrow_mut() = value.to_string(),
                _ => unreachable!(),
            }
            debug!("setAttribute {name}={value} on {} (modified)", element.node_name());
            dispatch::fire_attr_modified(element, &attr, name, AttrChange::Modification, &prev, value);
        }
        None => {
            let attr = Node::new(NodeData::Attr(AttrData::new(QualifiedName::new(name), value)));
            *attr.owner_document.borrow_mut() = element.owner_document.borrow().clone();
            set_attr_owner(&attr, element);
            attributes.borrow_mut().push(attr.clone());
            debug!("setAttribute {name}={value} on {} (added)", element.node_name());
            dispatch::fire_attr_modified(element, &attr, name, AttrChange::Addition, "", value);
            update_id_map(element, name, Some(value));
        }
    }
    Ok(())
}

pub fn remove_attribute(element: &NodeRef, name: &str) -> Result<(), DomException> {
    let attributes = attributes_of(element)?;
    let removed = attributes.borrow_mut().remove(name);
    if let Some(attr) = removed {
        let prev = attr.node_value().unwrap_or_default();
        clear_attr_owner(&attr);
        debug!("removeAttribute {name} on {}", element.node_name());
        dispatch::fire_attr_modified(element, &attr, name, AttrChange::Removal, &prev, "");
        update_id_map(element, name, None);
    }
    Ok(())
}

/// `getAttributeNS`: looks an attribute up by `(namespace, local name)`
/// rather than by qualified-name string, so a same-local-name attribute in a
/// different namespace is not conflated with it.
pub fn get_attribute_ns(element: &NodeRef, namespace: Option<&Namespace>, local_name: &str) -> Option<String> {
    get_attribute_node_ns(element, namespace, local_name).and_then(|attr| attr.node_value())
}

pub fn get_attribute_node_ns(element: &NodeRef, namespace: Option<&Namespace>, local_name: &str) -> Option<NodeRef> {
    let attributes = match &element.data {
        NodeData::Element(data) => &data.attributes,
        _ => return None,
    };
    attributes.borrow().get_ns(namespace, local_name)
}

pub fn has_attribute_ns(element: &NodeRef, namespace: Option<&Namespace>, local_name: &str) -> bool {
    get_attribute_node_ns(element, namespace, local_name).is_some()
}

/// `setAttributeNS`: `qualified_name` may carry a prefix (`"xlink:href"`);
/// the prefix is stored for display only, identity is `(namespace, local)`.
pub fn set_attribute_ns(
    element: &NodeRef,
    namespace: Option<Namespace>,
    qualified_name: &str,
    value: &str,
) -> Result<(), DomException> {
    check_name(qualified_name)?;
    let (prefix, local) = split_qualified_name(qualified_name);
    let attributes = attributes_of(element)?;
    let existing = attributes.borrow().get_ns(namespace.as_ref(), &local);

    match existing {
        Some(attr) => {
            let prev = attr.node_value().unwrap_or_default();
            if prev == value {
                return Ok(());
            }
            match &attr.data {
                NodeData::Attr(data) => *data.value.borrow_mut() = value.to_string(),
                _ => unreachable!(),
            }
            debug!("setAttributeNS {qualified_name}={value} on {} (modified)", element.node_name());
            dispatch::fire_attr_modified(element, &attr, &local, AttrChange::Modification, &prev, value);
        }
        None => {
            let name = QualifiedName::with_namespace(prefix, namespace, local.clone());
            let attr = Node::new(NodeData::Attr(AttrData::new(name, value)));
            *attr.owner_document.borrow_mut() = element.owner_document.borrow().clone();
            set_attr_owner(&attr, element);
            attributes.borrow_mut().push(attr.clone());
            debug!("setAttributeNS {qualified_name}={value} on {} (added)", element.node_name());
            dispatch::fire_attr_modified(element, &attr, &local, AttrChange::Addition, "", value);
            update_id_map(element, &local, Some(value));
        }
    }
    Ok(())
}

pub fn remove_attribute_ns(
    element: &NodeRef,
    namespace: Option<&Namespace>,
    local_name: &str,
) -> Result<(), DomException> {
    let attributes = attributes_of(element)?;
    let removed = attributes.borrow_mut().remove_ns(namespace, local_name);
    if let Some(attr) = removed {
        let prev = attr.node_value().unwrap_or_default();
        clear_attr_owner(&attr);
        debug!("removeAttributeNS {local_name} on {}", element.node_name());
        dispatch::fire_attr_modified(element, &attr, local_name, AttrChange::Removal, &prev, "");
        update_id_map(element, local_name, None);
    }
    Ok(())
}

/// `setAttributeNodeNS`: like `setAttributeNode`, but the replaced-attribute
/// search is keyed by `(namespace, local name)` instead of qualified name.
pub fn set_attribute_node_ns(element: &NodeRef, attr: &NodeRef) -> Result<Option<NodeRef>, DomException> {
    if !attr.is_attr() {
        return Err(ErrorName::HierarchyRequestError.into());
    }
    if let Some(owner) = attr_owner(attr) {
        if !Rc::ptr_eq(&owner, element) {
            return Err(ErrorName::InUseAttributeError.into());
        }
    }
    let (namespace, local) = match &attr.data {
        NodeData::Attr(data) => (data.name.namespace, data.name.local.clone()),
        _ => unreachable!(),
    };
    let value = attr.node_value().unwrap_or_default();
    let attributes = attributes_of(element)?;
    let replaced = attributes.borrow_mut().remove_ns(namespace.as_ref(), &local);
    if let Some(old) = &replaced {
        clear_attr_owner(old);
    }
    set_attr_owner(attr, element);
    attributes.borrow_mut().push(attr.clone());

    let prev = replaced
        .as_ref()
        .and_then(|old| old.node_value())
        .unwrap_or_default();
    let change = if replaced.is_some() {
        AttrChange::Modification
    } else {
        AttrChange::Addition
    };
    dispatch::fire_attr_modified(element, attr, &local, change, &prev, &value);
    if change == AttrChange::Addition {
        update_id_map(element, &local, Some(&value));
    }
    Ok(replaced)
}

pub fn set_attribute_node(element: &NodeRef, attr: &NodeRef) -> Result<Option<NodeRef>, DomException> {
    if !attr.is_attr() {
        return Err(ErrorName::HierarchyRequestError.into());
    }
    if let Some(owner) = attr_owner(attr) {
        if !Rc::ptr_eq(&owner, element) {
            return Err(ErrorName::InUseAttributeError.into());
        }
    }
    let name = attr.node_name();
    let value = attr.node_value().unwrap_or_default();
    let attributes = attributes_of(element)?;
    let replaced = attributes.borrow_mut().remove(&name);
    if let Some(old) = &replaced {
        clear_attr_owner(old);
    }
    set_attr_owner(attr, element);
    attributes.borrow_mut().push(attr.clone());

    let prev = replaced
        .as_ref()
        .and_then(|old| old.node_value())
        .unwrap_or_default();
    let change = if replaced.is_some() {
        AttrChange::Modification
    } else {
        AttrChange::Addition
    };
    dispatch::fire_attr_modified(element, attr, &name, change, &prev, &value);
    if change == AttrChange::Addition {
        update_id_map(element, &name, Some(&value));
    }
    Ok(replaced)
}

pub fn remove_attribute_node(element: &NodeRef, attr: &NodeRef) -> Result<(), DomException> {
    let attributes = attributes_of(element)?;
    let removed = attributes.borrow_mut().remove_node(attr);
    if !removed {
        return Err(ErrorName::NotFoundError.into());
    }
    let name = attr.node_name();
    let prev = attr.node_value().unwrap_or_default();
    clear_attr_owner(attr);
    dispatch::fire_attr_modified(element, attr, &name, AttrChange::Removal, &prev, "");
    update_id_map(element, &name, None);
    Ok(())
}

fn set_attr_owner(attr: &NodeRef, element: &NodeRef) {
    match &attr.data {
        NodeData::Attr(data) => *data.owner_element.borrow_mut() = Some(Rc::downgrade(element)),
        _ => unreachable!(),
    }
}

fn clear_attr_owner(attr: &NodeRef) {
    match &attr.data {
        NodeData::Attr(data) => *data.owner_element.borrow_mut() = None,
        _ => unreachable!(),
    }
}

fn attr_owner(attr: &NodeRef) -> Option<NodeRef> {
    match &attr.data {
        NodeData::Attr(data) => data.owner_element.borrow().as_ref().and_then(|weak| weak.upgrade()),
        _ => None,
    }
}

/// Maintains the owning document's `getElementById` table. `id` is treated
/// as the sole declared-ID attribute, matching the common DTD-less
/// simplification used by the rest of the retrieved pack (e.g. html5ever's
/// `rcdom`, which has no DTD either).
fn update_id_map(element: &NodeRef, attr_name: &str, value: Option<&str>) {
    if attr_name != "id" {
        return;
    }
    let Some(document) = element.owner_document() else {
        return;
    };
    let NodeData::Document(doc) = &document.data else {
        return;
    };
    let mut id_map = doc.id_map.borrow_mut();
    id_map.retain(|_, weak| weak.upgrade().is_some());
    match value {
        Some(id) if !id.is_empty() => {
            id_map.insert(id.to_string(), Rc::downgrade(element));
        }
        _ => {
            id_map.retain(|_, weak| weak.upgrade().map_or(true, |node| !Rc::ptr_eq(&node, element)));
        }
    }
}
