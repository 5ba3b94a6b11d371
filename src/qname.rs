//! Qualified (namespace-aware) names.
//!
//! https://www.w3.org/TR/DOM-Level-2-Core/core.html#ID-1788104572

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::error::{DomException, ErrorName};

/// A namespace-aware name. `prefix` is informational only — it does not
/// participate in equality, hashing, or ordering, since two qualified names
/// referring to the same `(namespace, local)` pair are the same name
/// regardless of which prefix was used to spell them.
#[derive(Debug, Clone)]
pub struct QualifiedName {
    pub prefix: Option<String>,
    pub namespace: Option<Namespace>,
    pub local: String,
}

impl PartialEq for QualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.local == other.local
    }
}

impl Eq for QualifiedName {}

impl Hash for QualifiedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.local.hash(state);
    }
}

impl PartialOrd for QualifiedName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QualifiedName {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.namespace, &self.local).cmp(&(&other.namespace, &other.local))
    }
}

impl QualifiedName {
    pub fn new(local: impl Into<String>) -> Self {
        QualifiedName {
            prefix: None,
            namespace: None,
            local: local.into(),
        }
    }

    pub fn with_namespace(
        prefix: Option<String>,
        namespace: Option<Namespace>,
        local: impl Into<String>,
    ) -> Self {
        QualifiedName {
            prefix,
            namespace,
            local: local.into(),
        }
    }

    /// The name as it would appear on the wire: `prefix:local` or just `local`.
    pub fn qualified(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.local),
            None => self.local.clone(),
        }
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub enum Namespace {
    Html,
    MathMl,
    Svg,
    XLink,
    Xml,
    XmlNs,
}

impl ToString for Namespace {
    fn to_string(&self) -> String {
        match self {
            Namespace::Html => "http://www.w3.org/1999/xhtml".to_string(),
            Namespace::MathMl => "http://www.w3.org/1998/Math/MathML".to_string(),
            Namespace::Svg => "http://www.w3.org/2000/svg".to_string(),
            Namespace::XLink => "http://www.w3.org/1999/xlink".to_string(),
            Namespace::Xml => "http://www.w3.org/XML/1998/namespace".to_string(),
            Namespace::XmlNs => "http://www.w3.org/2000/xmlns/".to_string(),
        }
    }
}

/// Checks a candidate name against the XML `Name` production (simplified:
/// ASCII letters/digits plus `.`, `-`, `_`, `:`, first character not a digit
/// or `.`/`-`).
pub fn check_name(name: &str) -> Result<(), DomException> {
    let mut chars = name.chars();
    let is_name_start = |c: char| c.is_ascii_alphabetic() || c == '_' || c == ':';
    let is_name_char = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':');

    match chars.next() {
        Some(first) if is_name_start(first) => {}
        _ => return Err(ErrorName::InvalidCharacterError.into()),
    }
    if chars.any(|c| !is_name_char(c)) {
        return Err(ErrorName::InvalidCharacterError.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        assert!(check_name("root").is_ok());
        assert!(check_name("a1").is_ok());
        assert!(check_name("xml:lang").is_ok());
    }

    #[test]
    fn rejects_names_starting_with_a_digit() {
        assert!(check_name("1root").is_err());
    }

    #[test]
    fn rejects_empty_names() {
        assert!(check_name("").is_err());
    }

    #[test]
    fn rejects_embedded_whitespace() {
        assert!(check_name("a b").is_err());
    }

    #[test]
    fn qualified_name_formats_with_prefix() {
        let qn = QualifiedName::with_namespace(Some("xml".into()), Some(Namespace::Xml), "lang");
        assert_eq!(qn.qualified(), "xml:lang");
    }

    #[test]
    fn equality_and_hash_ignore_prefix() {
        use std::collections::HashMap;

        let a = QualifiedName::with_namespace(Some("a".into()), Some(Namespace::Xml), "lang");
        let b = QualifiedName::with_namespace(Some("b".into()), Some(Namespace::Xml), "lang");
        assert_eq!(a, b);

        let mut map = HashMap::new();
        map.insert(a, "value");
        assert_eq!(map.get(&b), Some(&"value"));
    }

    #[test]
    fn equality_still_distinguishes_different_namespaces() {
        let a = QualifiedName::with_namespace(None, Some(Namespace::Svg), "href");
        let b = QualifiedName::with_namespace(None, Some(Namespace::XLink), "href");
        assert_ne!(a, b);
    }
}
