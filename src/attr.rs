//! Attribute node payload and the ordered per-element attribute map
//! (component E). Event synthesis for `setAttribute`/`removeAttribute`
//! lives in `element.rs`, which owns the dispatch-engine dependency; this
//! module only holds the data structures.

use std::cell::{Cell, RefCell};

use crate::node::WeakNodeRef;
use crate::qname::{Namespace, QualifiedName};

pub struct AttrData {
    pub name: QualifiedName,
    pub(crate) value: RefCell<String>,
    pub(crate) specified: Cell<bool>,
    pub(crate) owner_element: RefCell<Option<WeakNodeRef>>,
}

impl AttrData {
    pub fn new(name: QualifiedName, value: impl Into<String>) -> Self {
        AttrData {
            name,
            value: RefCell::new(value.into()),
            specified: Cell::new(true),
            owner_element: RefCell::new(None),
        }
    }
}

/// Insertion-ordered map of an element's attribute nodes, keyed by
/// qualified name.
#[derive(Default)]
pub struct AttributeMap {
    entries: Vec<crate::node::NodeRef>,
}

impl AttributeMap {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &crate::node::NodeRef> {
        self.entries.iter()
    }

    /// Looks up an attribute by its plain (possibly-prefixed) qualified-name
    /// string, ignoring namespace — the identity `setAttribute`/
    /// `getAttribute`/`removeAttribute` use.
    pub fn get(&self, name: &str) -> Option<crate::node::NodeRef> {
        self.entries
            .iter()
            .find(|attr| Self::attr_qualified(attr) == name)
            .cloned()
    }

    /// Looks up an attribute by `(namespace, local name)` — the identity
    /// `setAttributeNS`/`getAttributeNS`/`removeAttributeNS` use, per
    /// DOM Level 2's "namespace + local name determine identity" rule.
    pub fn get_ns(&self, namespace: Option<&Namespace>, local_name: &str) -> Option<crate::node::NodeRef> {
        self.entries
            .iter()
            .find(|attr| Self::attr_ns_key(attr) == (namespace, local_name))
            .cloned()
    }

    pub(crate) fn push(&mut self, attr: crate::node::NodeRef) {
        self.entries.push(attr);
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<crate::node::NodeRef> {
        let position = self
            .entries
            .iter()
            .position(|attr| Self::attr_qualified(attr) == name)?;
        Some(self.entries.remove(position))
    }

    pub(crate) fn remove_ns(
        &mut self,
        namespace: Option<&Namespace>,
        local_name: &str,
    ) -> Option<crate::node::NodeRef> {
        let position = self
            .entries
            .iter()
            .position(|attr| Self::attr_ns_key(attr) == (namespace, local_name))?;
        Some(self.entries.remove(position))
    }

    pub(crate) fn remove_node(&mut self, attr: &crate::node::NodeRef) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| !std::rc::Rc::ptr_eq(entry, attr));
        self.entries.len() != before
    }

    fn attr_qualified(node: &crate::node::NodeRef) -> String {
        match &node.data {
            crate::node::NodeData::Attr(attr) => attr.name.qualified(),
            _ => unreachable!("attribute map entries are always Attr nodes"),
        }
    }

    fn attr_ns_key(node: &crate::node::NodeRef) -> (Option<&Namespace>, &str) {
        match &node.data {
            crate::node::NodeData::Attr(attr) => (attr.name.namespace.as_ref(), attr.name.local.as_str()),
            _ => unreachable!("attribute map entries are always Attr nodes"),
        }
    }
}
