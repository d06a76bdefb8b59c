//! # Sheet Mapper
//!
//! Discovers, at startup, the record types an application has marked as sheet entities and
//! derives for each one an ordered list of spreadsheet column names.
//!
//! Types describe themselves through [`SheetType`], usually via `#[derive(SheetType)]`, which
//! also registers them in the process-wide [`TypeCatalog`] before `main` runs. A
//! [`SheetManager`] then scans one or more namespaces (module paths) and records, per entity,
//! its flattened columns, its zero-argument operations and its type handle.
//!
//! ```ignore
//! use sheet_mapper::{SheetManager, SheetType};
//!
//! #[derive(SheetType)]
//! pub struct Customer {
//!     name: String,
//!     #[sheet(id = "code")]
//!     code: String,
//! }
//!
//! #[derive(SheetType)]
//! #[sheet(entity)]
//! pub struct Order {
//!     id:       String,
//!     customer: Customer,
//! }
//!
//! let manager = SheetManager::default();
//! let report = manager.scan_mapped_packages(&["my_app.model"]);
//! assert!(report.is_clean());
//! // columns: ["id", "customer_code"]
//! ```
//!
//! The engine never reads or writes tabular files; it only produces metadata for a downstream
//! exporter.

pub mod catalog;
pub mod config;
pub mod error;
mod manager;
pub mod schema;
pub mod support;
pub mod type_info;

pub use catalog::{NamespaceResolver, TypeCatalog};
pub use config::MapperConfig;
pub use error::{Error, Result};
pub use manager::SheetManager;
pub use schema::{EntityDescriptor, RegistryState, ScanReport, SchemaRegistry};
pub use sheet_mapper_macros::SheetType;
pub use type_info::{FieldInfo, NamespaceName, QualifiedName, SheetType, Tag, TypeHandle, TypeInfo};

#[doc(hidden)]
pub mod __reexports {
    pub use ctor;
}
