//! DOM Level 2 exception codes.
//!
//! https://www.w3.org/TR/DOM-Level-2-Core/core.html#ID-17189187

use std::fmt;

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy)]
pub struct DomException {
    pub name: ErrorName,
    pub message: &'static str,
    pub code: u16,
}

impl DomException {
    fn new(name: ErrorName, message: &'static str, code: u16) -> Self {
        Self {
            name,
            message,
            code,
        }
    }
}

impl From<ErrorName> for DomException {
    fn from(value: ErrorName) -> Self {
        match value {
            ErrorName::HierarchyRequestError => DomException::new(
                value,
                "The operation would yield an incorrect node tree.",
                DomException::HIERARCHY_REQUEST_ERR,
            ),
            ErrorName::WrongDocumentError => DomException::new(
                value,
                "The object is in the wrong document.",
                DomException::WRONG_DOCUMENT_ERR,
            ),
            ErrorName::InvalidCharacterError => DomException::new(
                value,
                "The string contains invalid characters.",
                DomException::INVALID_CHARACTER_ERR,
            ),
            ErrorName::NoModificationAllowedError => DomException::new(
                value,
                "The object can not be modified.",
                DomException::NO_MODIFICATION_ALLOWED_ERR,
            ),
            ErrorName::NotFoundError => DomException::new(
                value,
                "The object can not be found here.",
                DomException::NOT_FOUND_ERR,
            ),
            ErrorName::IndexSizeError => DomException::new(
                value,
                "Index or size is negative, or greater than the allowed value.",
                DomException::INDEX_SIZE_ERR,
            ),
            ErrorName::InUseAttributeError => DomException::new(
                value,
                "The attribute is in use by another element.",
                DomException::INUSE_ATTRIBUTE_ERR,
            ),
        }
    }
}

impl DomException {
    pub const INDEX_SIZE_ERR: u16 = 1;
    pub const HIERARCHY_REQUEST_ERR: u16 = 3;
    pub const WRONG_DOCUMENT_ERR: u16 = 4;
    pub const INVALID_CHARACTER_ERR: u16 = 5;
    pub const NO_MODIFICATION_ALLOWED_ERR: u16 = 7;
    pub const NOT_FOUND_ERR: u16 = 8;
    pub const INUSE_ATTRIBUTE_ERR: u16 = 10;
}

/// https://webidl.spec.whatwg.org/#dfn-error-names-table
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub enum ErrorName {
    HierarchyRequestError,
    WrongDocumentError,
    InvalidCharacterError,
    NoModificationAllowedError,
    NotFoundError,
    IndexSizeError,
    InUseAttributeError,
}

impl fmt::Display for DomException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.name, self.message)
    }
}

impl std::error::Error for DomException {}
