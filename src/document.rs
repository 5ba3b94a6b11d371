//! The document façade (component I): node factories, the ID registry,
//! and the event-suspension flag.

use std::ops::Deref;
use std::rc::Rc;

use log::trace;

use crate::attr::AttrData;
use crate::error::DomException;
use crate::node::{
    CharacterData, DocumentData, DocumentTypeData, ElementData, Node, NodeData, NodeRef,
    ProcessingInstructionData,
};
use crate::qname::{check_name, Namespace, QualifiedName};

/// A thin, owned handle to a document node. `Deref`s to `Node` so the
/// ordinary tree navigation API (`firstChild`, `appendChild`, ...) works
/// directly on a `Document` value.
#[derive(Clone)]
pub struct Document {
    node: NodeRef,
}

impl Deref for Document {
    type Target = NodeRef;

    fn deref(&self) -> &NodeRef {
        &self.node
    }
}

impl Document {
    pub fn new() -> Self {
        let node = Node::new(NodeData::Document(DocumentData::default()));
        *node.owner_document.borrow_mut() = Some(Rc::downgrade(&node));
        Document { node }
    }

    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    fn own(&self, node: &NodeRef) {
        *node.owner_document.borrow_mut() = Some(Rc::downgrade(&self.node));
    }

    pub fn create_element(&self, tag_name: &str) -> Result<NodeRef, DomException> {
        check_name(tag_name)?;
        let node = Node::new(NodeData::Element(ElementData {
            name: QualifiedName::new(tag_name),
            attributes: Default::default(),
        }));
        self.own(&node);
        Ok(node)
    }

    pub fn create_element_ns(
        &self,
        namespace: Option<Namespace>,
        qualified_name: &str,
    ) -> Result<NodeRef, DomException> {
        check_name(qualified_name)?;
        let (prefix, local) = split_qualified_name(qualified_name);
        let node = Node::new(NodeData::Element(ElementData {
            name: QualifiedName::with_namespace(prefix, namespace, local),
            attributes: Default::default(),
        }));
        self.own(&node);
        Ok(node)
    }

    pub fn create_text_node(&self, data: &str) -> NodeRef {
        let node = Node::new(NodeData::Text(CharacterData::new(data)));
        self.own(&node);
        node
    }

    pub fn create_cdata_section(&self, data: &str) -> NodeRef {
        let node = Node::new(NodeData::CdataSection(CharacterData::new(data)));
        self.own(&node);
        node
    }

    pub fn create_comment(&self, data: &str) -> NodeRef {
        let node = Node::new(NodeData::Comment(CharacterData::new(data)));
        self.own(&node);
        node
    }

    pub fn create_processing_instruction(&self, target: &str, data: &str) -> Result<NodeRef, DomException> {
        check_name(target)?;
        let node = Node::new(NodeData::ProcessingInstruction(ProcessingInstructionData {
            target: target.to_string(),
            data: std::cell::RefCell::new(data.to_string()),
        }));
        self.own(&node);
        Ok(node)
    }

    pub fn create_attribute(&self, name: &str) -> Result<NodeRef, DomException> {
        check_name(name)?;
        let node = Node::new(NodeData::Attr(AttrData::new(QualifiedName::new(name), "")));
        self.own(&node);
        Ok(node)
    }

    pub fn create_document_fragment(&self) -> NodeRef {
        let node = Node::new(NodeData::DocumentFragment);
        self.own(&node);
        node
    }

    pub fn create_entity_reference(&self, name: &str) -> Result<NodeRef, DomException> {
        check_name(name)?;
        let node = Node::new(NodeData::EntityReference { name: name.to_string() });
        self.own(&node);
        Ok(node)
    }

    pub fn create_document_type(
        &self,
        name: &str,
        public_id: &str,
        system_id: &str,
    ) -> Result<NodeRef, DomException> {
        check_name(name)?;
        let node = Node::new(NodeData::DocumentType(DocumentTypeData {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }));
        self.own(&node);
        Ok(node)
    }

    /// The document's single element child, if any.
    pub fn document_element(&self) -> Option<NodeRef> {
        self.node.children_snapshot().into_iter().find(|n| n.is_element())
    }

    /// The document's single doctype child, if any.
    pub fn doctype(&self) -> Option<NodeRef> {
        self.node
            .children_snapshot()
            .into_iter()
            .find(|n| n.is_document_type())
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeRef> {
        match &self.node.data {
            NodeData::Document(data) => data.id_map.borrow().get(id).and_then(|weak| weak.upgrade()),
            _ => None,
        }
    }

    pub fn suspend_events(&self) {
        trace!("suspendEvents");
        if let NodeData::Document(data) = &self.node.data {
            data.events_suspended.set(true);
        }
    }

    pub fn resume_events(&self) {
        trace!("resumeEvents");
        if let NodeData::Document(data) = &self.node.data {
            data.events_suspended.set(false);
        }
    }

    pub fn events_suspended(&self) -> bool {
        match &self.node.data {
            NodeData::Document(data) => data.events_suspended.get(),
            _ => false,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

pub(crate) fn split_qualified_name(qualified_name: &str) -> (Option<String>, String) {
    match qualified_name.split_once(':') {
        Some((prefix, local)) => (Some(prefix.to_string()), local.to_string()),
        None => (None, qualified_name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation;

    #[test]
    fn fresh_document_has_no_document_element() {
        let doc = Document::new();
        assert!(doc.document_element().is_none());
    }

    #[test]
    fn appending_an_element_makes_it_the_document_element() {
        let doc = Document::new();
        let root = doc.create_element("root").unwrap();
        mutation::append_child(doc.node(), &root).unwrap();
        assert!(Rc::ptr_eq(&doc.document_element().unwrap(), &root));
    }

    #[test]
    fn get_element_by_id_tracks_id_attribute() {
        let doc = Document::new();
        let root = doc.create_element("root").unwrap();
        mutation::append_child(doc.node(), &root).unwrap();
        crate::element::set_attribute(&root, "id", "main").unwrap();
        assert!(Rc::ptr_eq(&doc.get_element_by_id("main").unwrap(), &root));
        crate::element::remove_attribute(&root, "id").unwrap();
        assert!(doc.get_element_by_id("main").is_none());
    }

    #[test]
    fn suspended_document_starts_unsuspended() {
        let doc = Document::new();
        assert!(!doc.events_suspended());
        doc.suspend_events();
        assert!(doc.events_suspended());
        doc.resume_events();
        assert!(!doc.events_suspended());
    }
}
