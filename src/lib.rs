//! A mutable DOM tree core with a W3C DOM Level 2 mutation-event dispatch
//! subsystem: a typed, navigable node tree plus the three-phase
//! capture/at-target/bubble event engine that synthesizes `DOMNodeInserted`,
//! `DOMNodeRemoved`, `DOMSubtreeModified`, `DOMAttrModified`, and
//! `DOMCharacterDataModified` events for every structural or data mutation.

pub mod attr;
pub mod character_data;
pub mod dispatch;
pub mod document;
pub mod element;
pub mod error;
pub mod event;
mod event_target;
pub mod listener;
pub mod mutation;
pub mod node;
pub mod qname;

pub use document::Document;
pub use error::{DomException, ErrorName};
pub use event::{event_type, AttrChange, Event, EventPhase};
pub use listener::EventListener;
pub use node::{Node, NodeData, NodeList, NodeRef, NodeType};
pub use qname::{Namespace, QualifiedName};
