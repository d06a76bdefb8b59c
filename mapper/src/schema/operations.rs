use crate::type_info::TypeInfo;

/// Names of every declared zero-argument operation, in declaration order
///
/// No naming convention is applied; helper operations are listed alongside accessors.
pub fn list_operations(info: &TypeInfo) -> Vec<String> {
    info.operations.clone()
}
