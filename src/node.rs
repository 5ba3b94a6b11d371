//! The node store (component B): typed node records, their navigation
//! links, and the live `NodeList` view over a node's children.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::attr::{AttrData, AttributeMap};
use crate::listener::ListenerRegistry;
use crate::qname::QualifiedName;

pub type NodeRef = Rc<Node>;
pub type WeakNodeRef = Weak<Node>;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
#[repr(u16)]
pub enum NodeType {
    Element = 1,
    Attribute = 2,
    Text = 3,
    CdataSection = 4,
    EntityReference = 5,
    Entity = 6,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
    Notation = 12,
}

/// A mutable string payload shared by text, CDATA, and comment nodes.
pub struct CharacterData {
    pub(crate) data: RefCell<String>,
}

impl CharacterData {
    pub fn new(initial: impl Into<String>) -> Self {
        CharacterData {
            data: RefCell::new(initial.into()),
        }
    }
}

pub struct ElementData {
    pub name: QualifiedName,
    pub(crate) attributes: RefCell<AttributeMap>,
}

pub struct ProcessingInstructionData {
    pub target: String,
    pub(crate) data: RefCell<String>,
}

pub struct DocumentTypeData {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
}

pub struct DocumentData {
    pub(crate) events_suspended: Cell<bool>,
    pub(crate) id_map: RefCell<HashMap<String, WeakNodeRef>>,
}

impl Default for DocumentData {
    fn default() -> Self {
        DocumentData {
            events_suspended: Cell::new(false),
            id_map: RefCell::new(HashMap::new()),
        }
    }
}

pub enum NodeData {
    Document(DocumentData),
    DocumentFragment,
    DocumentType(DocumentTypeData),
    Element(ElementData),
    Attr(AttrData),
    Text(CharacterData),
    CdataSection(CharacterData),
    Comment(CharacterData),
    ProcessingInstruction(ProcessingInstructionData),
    EntityReference { name: String },
    Entity { name: String },
    Notation { name: String },
}

/// A single node of the tree. Shared via `Rc`; the forward links
/// (`first_child`, `next_sibling`) hold strong references and express
/// ownership, the backward links (`parent`, `previous_sibling`,
/// `last_child`, `owner_document`) hold `Weak` references and are cleared
/// on detach.
pub struct Node {
    pub(crate) parent: RefCell<Option<WeakNodeRef>>,
    pub(crate) previous_sibling: RefCell<Option<WeakNodeRef>>,
    pub(crate) next_sibling: RefCell<Option<NodeRef>>,
    pub(crate) first_child: RefCell<Option<NodeRef>>,
    pub(crate) last_child: RefCell<Option<WeakNodeRef>>,
    pub(crate) owner_document: RefCell<Option<WeakNodeRef>>,
    pub(crate) listeners: RefCell<ListenerRegistry>,
    pub data: NodeData,
}

impl Node {
    pub fn new(data: NodeData) -> NodeRef {
        Rc::new(Node {
            parent: RefCell::new(None),
            previous_sibling: RefCell::new(None),
            next_sibling: RefCell::new(None),
            first_child: RefCell::new(None),
            last_child: RefCell::new(None),
            owner_document: RefCell::new(None),
            listeners: RefCell::new(ListenerRegistry::default()),
            data,
        })
    }

    pub fn node_type(&self) -> NodeType {
        match &self.data {
            NodeData::Document(_) => NodeType::Document,
            NodeData::DocumentFragment => NodeType::DocumentFragment,
            NodeData::DocumentType(_) => NodeType::DocumentType,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Attr(_) => NodeType::Attribute,
            NodeData::Text(_) => NodeType::Text,
            NodeData::CdataSection(_) => NodeType::CdataSection,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::ProcessingInstruction(_) => NodeType::ProcessingInstruction,
            NodeData::EntityReference { .. } => NodeType::EntityReference,
            NodeData::Entity { .. } => NodeType::Entity,
            NodeData::Notation { .. } => NodeType::Notation,
        }
    }

    pub fn node_name(&self) -> String {
        match &self.data {
            NodeData::Document(_) => "#document".to_string(),
            NodeData::DocumentFragment => "#document-fragment".to_string(),
            NodeData::DocumentType(dt) => dt.name.clone(),
            NodeData::Element(element) => element.name.qualified(),
            NodeData::Attr(attr) => attr.name.qualified(),
            NodeData::Text(_) => "#text".to_string(),
            NodeData::CdataSection(_) => "#cdata-section".to_string(),
            NodeData::Comment(_) => "#comment".to_string(),
            NodeData::ProcessingInstruction(pi) => pi.target.clone(),
            NodeData::EntityReference { name } => name.clone(),
            NodeData::Entity { name } => name.clone(),
            NodeData::Notation { name } => name.clone(),
        }
    }

    pub fn node_value(&self) -> Option<String> {
        match &self.data {
            NodeData::Text(cd) | NodeData::CdataSection(cd) | NodeData::Comment(cd) => {
                Some(cd.data.borrow().clone())
            }
            NodeData::ProcessingInstruction(pi) => Some(pi.data.borrow().clone()),
            NodeData::Attr(attr) => Some(attr.value.borrow().clone()),
            _ => None,
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    pub fn is_document_fragment(&self) -> bool {
        matches!(self.data, NodeData::DocumentFragment)
    }

    pub fn is_document_type(&self) -> bool {
        matches!(self.data, NodeData::DocumentType(_))
    }

    pub fn is_attr(&self) -> bool {
        matches!(self.data, NodeData::Attr(_))
    }

    pub fn is_character_data(&self) -> bool {
        matches!(
            self.data,
            NodeData::Text(_) | NodeData::CdataSection(_) | NodeData::Comment(_)
        )
    }

    pub fn parent_node(self: &Rc<Self>) -> Option<NodeRef> {
        self.parent.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub fn first_child(self: &Rc<Self>) -> Option<NodeRef> {
        self.first_child.borrow().clone()
    }

    pub fn last_child(self: &Rc<Self>) -> Option<NodeRef> {
        self.last_child.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub fn previous_sibling(self: &Rc<Self>) -> Option<NodeRef> {
        self.previous_sibling.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub fn next_sibling(self: &Rc<Self>) -> Option<NodeRef> {
        self.next_sibling.borrow().clone()
    }

    pub fn owner_document(self: &Rc<Self>) -> Option<NodeRef> {
        self.owner_document.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub fn has_child_nodes(self: &Rc<Self>) -> bool {
        self.first_child.borrow().is_some()
    }

    pub fn has_attributes(&self) -> bool {
        match &self.data {
            NodeData::Element(element) => !element.attributes.borrow().is_empty(),
            _ => false,
        }
    }

    pub fn child_nodes(self: &Rc<Self>) -> NodeList {
        NodeList {
            parent: self.clone(),
        }
    }

    /// Ancestors from the topmost down to (but excluding) `self`, i.e. the
    /// propagation path used by the dispatch engine.
    pub(crate) fn ancestors_path(self: &Rc<Self>) -> Vec<NodeRef> {
        let mut chain = Vec::new();
        let mut current = self.parent_node();
        while let Some(node) = current {
            current = node.parent_node();
            chain.push(node);
        }
        chain.reverse();
        chain
    }

    /// `true` if `self` is `other` or a (shadow-including, here: plain)
    /// ancestor of `other`.
    pub(crate) fn is_inclusive_ancestor_of(self: &Rc<Self>, other: &NodeRef) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if Rc::ptr_eq(self, &node) {
                return true;
            }
            current = node.parent_node();
        }
        false
    }

    /// Whether `self` is currently reachable from a document node, i.e. the
    /// document is among its inclusive ancestors.
    pub(crate) fn is_in_document(self: &Rc<Self>) -> bool {
        let mut current: Option<NodeRef> = Some(self.clone());
        while let Some(node) = current {
            if node.is_document() {
                return true;
            }
            current = node.parent_node();
        }
        false
    }

    /// Children at the moment of the call, snapshotted into a `Vec` so
    /// callers may walk them while mutating sibling links elsewhere.
    pub(crate) fn children_snapshot(self: &Rc<Self>) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut current = self.first_child();
        while let Some(node) = current {
            current = node.next_sibling();
            out.push(node);
        }
        out
    }

    pub(crate) fn document_or_self(self: &Rc<Self>) -> Option<NodeRef> {
        if self.is_document() {
            return Some(self.clone());
        }
        self.owner_document()
    }
}

/// A live, ordered view over a node's children. Walks sibling links on
/// every access rather than caching a snapshot.
pub struct NodeList {
    parent: NodeRef,
}

impl NodeList {
    pub fn length(&self) -> usize {
        self.parent.children_snapshot().len()
    }

    pub fn item(&self, index: usize) -> Option<NodeRef> {
        self.parent.children_snapshot().into_iter().nth(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeRef> {
        self.parent.children_snapshot().into_iter()
    }
}
