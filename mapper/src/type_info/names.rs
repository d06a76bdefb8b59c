//! Qualified type names and namespace names
//!
//! Both are normalized to Rust path syntax (`a::b::C`), which is what
//! `std::any::type_name` and `module_path!` produce.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Canonical path separator
pub const PATH_SEPARATOR: &str = "::";

/// A fully-qualified type name used as the key of every registry mapping
///
/// e.g. "`my_app::model::Order`"
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct QualifiedName(String);

impl QualifiedName {
    /// Get the underlying string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the last path segment
    pub fn parent(&self) -> Option<&str> {
        self.base_path()
            .rsplit_once(PATH_SEPARATOR)
            .map(|(parent, _)| parent)
    }

    /// Whether this type is declared under `namespace`
    ///
    /// Matches on whole path segments: `app::model::Customer` is under `app::model` and
    /// `app`, but not under `app::mod`. A name wrapped in generics
    /// (`core::option::Option<app::model::Customer>`) belongs to the outer type's namespace.
    pub fn is_under(&self, namespace: &NamespaceName) -> bool {
        let base = self.base_path();
        base.strip_prefix(namespace.as_str())
            .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
    }

    /// Whether the direct parent of this type is exactly `namespace`
    pub fn is_directly_under(&self, namespace: &NamespaceName) -> bool {
        self.parent() == Some(namespace.as_str())
    }

    /// Path without generic arguments
    fn base_path(&self) -> &str {
        self.0.split_once('<').map_or(self.0.as_str(), |(base, _)| base)
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for QualifiedName {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scan root, normalized to `::` separators
///
/// Accepts `my_app.model`, `my_app/model` or `my_app::model`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NamespaceName(String);

impl NamespaceName {
    /// Parse and normalize a namespace, rejecting empty input
    pub fn new(raw: &str) -> Result<Self> {
        let segments: Vec<&str> = raw
            .split(['.', '/', ':'])
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();

        if segments.is_empty() {
            return Err(error_stack::Report::new(Error::InvalidNamespace(raw.to_string())));
        }

        Ok(Self(segments.join(PATH_SEPARATOR)))
    }

    /// Get the underlying string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, reason = "tests")]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_normalizes_separators() {
        let dotted = NamespaceName::new("my_app.model").expect("valid namespace");
        let slashed = NamespaceName::new("/my_app/model/").expect("valid namespace");
        let pathed = NamespaceName::new("my_app::model").expect("valid namespace");

        assert_eq!(dotted.as_str(), "my_app::model");
        assert_eq!(dotted, slashed);
        assert_eq!(dotted, pathed);
    }

    #[test]
    fn test_namespace_rejects_empty() {
        let err = NamespaceName::new(" ./ ").expect_err("separators only");
        assert_eq!(
            err.current_context(),
            &Error::InvalidNamespace(" ./ ".to_string())
        );
    }

    #[test]
    fn test_is_under_matches_whole_segments() {
        let name = QualifiedName::from("app::model::Customer");

        let model = NamespaceName::new("app.model").expect("valid namespace");
        let root = NamespaceName::new("app").expect("valid namespace");
        let partial = NamespaceName::new("app.mod").expect("valid namespace");
        let other = NamespaceName::new("alloc").expect("valid namespace");

        assert!(name.is_under(&model));
        assert!(name.is_under(&root));
        assert!(!name.is_under(&partial));
        assert!(!name.is_under(&other));
    }

    #[test]
    fn test_generic_wrappers_are_not_local() {
        let name = QualifiedName::from("core::option::Option<app::model::Customer>");
        let model = NamespaceName::new("app::model").expect("valid namespace");

        assert!(!name.is_under(&model));
        assert_eq!(name.parent(), Some("core::option"));
    }

    #[test]
    fn test_parent_and_direct_namespace() {
        let name = QualifiedName::from("app::model::Customer");
        let model = NamespaceName::new("app::model").expect("valid namespace");
        let root = NamespaceName::new("app").expect("valid namespace");

        assert_eq!(name.parent(), Some("app::model"));
        assert!(name.is_directly_under(&model));
        assert!(!name.is_directly_under(&root));
    }
}
