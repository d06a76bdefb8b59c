use crate::type_info::{Tag, TypeInfo};

/// Whether the type is tagged as a sheet entity
pub fn is_sheet_entity(info: &TypeInfo) -> bool {
    info.has_tag(&Tag::SheetEntity)
}
