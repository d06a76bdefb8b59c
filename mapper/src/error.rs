//! Error types shared by the catalog, the schema engine and configuration

use thiserror::Error;

/// Result type for the `sheet_mapper` library
pub type Result<T> = std::result::Result<T, error_stack::Report<Error>>;

/// Errors raised while discovering and flattening sheet entities
///
/// Scans never abort on these: namespace and entity failures are collected into a
/// [`ScanReport`](crate::ScanReport) so the rest of the batch still gets registered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A scanned namespace contains no registered types at all
    #[error("Namespace \"{0}\" could not be found in the type catalog")]
    NamespaceNotFound(String),

    /// A namespace string was empty or consisted only of separators
    #[error("Invalid namespace: {0:?}")]
    InvalidNamespace(String),

    /// A nested local field type is missing from the catalog
    #[error("Cannot resolve type {type_name} of field {entity}.{field}")]
    UnresolvableFieldType {
        /// Entity being flattened
        entity:    String,
        /// Outer field whose type is local to the namespace
        field:     String,
        /// Qualified name that failed to resolve
        type_name: String,
    },

    /// An identifier tag carries no usable label
    #[error("Identifier tag on {entity}.{field} has no label")]
    MalformedTag {
        /// Nested type declaring the field
        entity: String,
        /// Sub-field carrying the empty identifier tag
        field:  String,
    },

    /// Flattening produced the same column twice
    #[error("Duplicate column {column} in entity {entity}")]
    DuplicateColumn {
        /// Entity being flattened
        entity: String,
        /// Column produced more than once
        column: String,
    },

    /// A field produced an empty column name
    #[error("Entity {entity} declares a field with an empty name")]
    EmptyColumn {
        /// Entity being flattened
        entity: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A background scan worker stopped before reporting
    #[error("Scan worker failed: {0}")]
    ScanWorker(String),
}

impl Error {
    /// Whether this error concerns a whole namespace rather than a single entity
    pub const fn is_namespace_failure(&self) -> bool {
        matches!(
            self,
            Self::NamespaceNotFound(_) | Self::InvalidNamespace(_) | Self::ScanWorker(_)
        )
    }

    /// Create a configuration error with a "Failed to X" message
    pub fn config_failed(action: &str, details: impl std::fmt::Display) -> Self {
        Self::Configuration(format!("Failed to {action}: {details}"))
    }
}
