//! Read-only type metadata handed to the engine by a namespace resolver
//!
//! A [`TypeInfo`] lists a type's fields (in declaration order), its zero-argument operations
//! and its tags. The engine only ever sees it through a shared [`TypeHandle`].

mod names;

use std::ops::Deref;
use std::sync::Arc;

use serde::Serialize;

pub use names::{NamespaceName, PATH_SEPARATOR, QualifiedName};

/// Markers attached to types and fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// The type participates in the sheet exchange schema
    SheetEntity,
    /// The field identifies its record; the label names the flattened column suffix
    Id(String),
    /// Host-defined marker the engine ignores
    Other(String),
}

/// A declared field: name, type and tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    /// Field name as declared
    pub name:      String,
    /// Qualified name of the field's type
    pub type_name: QualifiedName,
    /// Tags placed on the field
    pub tags:      Vec<Tag>,
}

impl FieldInfo {
    /// Create an untagged field
    pub fn new(name: impl Into<String>, type_name: impl Into<QualifiedName>) -> Self {
        Self {
            name:      name.into(),
            type_name: type_name.into(),
            tags:      Vec::new(),
        }
    }

    /// Add a tag to the field
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Add an identifier tag with the given label
    #[must_use]
    pub fn with_id(self, label: impl Into<String>) -> Self {
        self.with_tag(Tag::Id(label.into()))
    }

    /// The raw label of the first identifier tag, if the field carries one
    pub fn identifier_label(&self) -> Option<&str> {
        self.tags.iter().find_map(|tag| match tag {
            Tag::Id(label) => Some(label.as_str()),
            _ => None,
        })
    }
}

/// Metadata describing one discoverable type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeInfo {
    /// Fully-qualified type name
    pub qualified_name: QualifiedName,
    /// Declared fields in declaration order
    pub fields:         Vec<FieldInfo>,
    /// Declared zero-argument operations in declaration order
    pub operations:     Vec<String>,
    /// Tags placed on the type
    pub tags:           Vec<Tag>,
}

impl TypeInfo {
    /// Create an empty description for `qualified_name`
    pub fn new(qualified_name: impl Into<QualifiedName>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            fields:         Vec::new(),
            operations:     Vec::new(),
            tags:           Vec::new(),
        }
    }

    /// Add a tag to the type
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Append a field
    #[must_use]
    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a zero-argument operation
    #[must_use]
    pub fn with_operation(mut self, name: impl Into<String>) -> Self {
        self.operations.push(name.into());
        self
    }

    /// Whether the type carries `tag`
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Look up a declared field by name
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Shared, read-only handle to a [`TypeInfo`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHandle(Arc<TypeInfo>);

impl TypeHandle {
    /// Wrap type metadata in a handle
    pub fn new(info: TypeInfo) -> Self {
        Self(Arc::new(info))
    }
}

impl Deref for TypeHandle {
    type Target = TypeInfo;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<TypeInfo> for TypeHandle {
    fn from(info: TypeInfo) -> Self {
        Self::new(info)
    }
}

impl Serialize for TypeHandle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Types that can describe themselves to the catalog
///
/// Usually implemented with `#[derive(SheetType)]`.
pub trait SheetType {
    /// Build this type's metadata
    fn type_info() -> TypeInfo;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_label_takes_first_id_tag() {
        let field = FieldInfo::new("code", "alloc::string::String")
            .with_tag(Tag::Other("indexed".to_string()))
            .with_id("code")
            .with_id("alt");

        assert_eq!(field.identifier_label(), Some("code"));
        assert_eq!(FieldInfo::new("name", "alloc::string::String").identifier_label(), None);
    }

    #[test]
    fn test_builder_preserves_declaration_order() {
        let info = TypeInfo::new("app::model::Order")
            .with_tag(Tag::SheetEntity)
            .with_field(FieldInfo::new("id", "alloc::string::String"))
            .with_field(FieldInfo::new("customer", "app::model::Customer"))
            .with_operation("get_id")
            .with_operation("get_customer");

        let names: Vec<&str> = info.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "customer"]);
        assert_eq!(info.operations, ["get_id", "get_customer"]);
        assert!(info.has_tag(&Tag::SheetEntity));
        assert!(info.field("customer").is_some());
        assert!(info.field("missing").is_none());
    }
}
