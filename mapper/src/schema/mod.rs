//! Entity classification, column flattening, operation listing and the registry that stores
//! their results

mod classifier;
mod flattener;
mod operations;
mod registry;
mod report;

pub use classifier::is_sheet_entity;
pub use flattener::ColumnFlattener;
pub use operations::list_operations;
pub(crate) use registry::process_namespace;
pub use registry::{EntityDescriptor, RegistryState, SchemaRegistry};
pub use report::ScanReport;
