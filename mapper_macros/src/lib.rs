//! Procedural macros for sheet_mapper

mod sheet_type;

use proc_macro::TokenStream;

/// Derives `sheet_mapper::SheetType` and registers the type in the global catalog at startup.
///
/// # Example
///
/// ```ignore
/// #[derive(SheetType)]
/// #[sheet(entity, operations(total))]
/// pub struct Order {
///     id:       String,
///     customer: Customer,
///     #[sheet(skip)]
///     cache:    Vec<u8>,
/// }
///
/// #[derive(SheetType)]
/// pub struct Customer {
///     name: String,
///     #[sheet(id = "code")]
///     code: String,
/// }
/// ```
///
/// This will generate:
/// - `get_<field>(&self) -> &FieldType` accessors for every non-skipped field (unless
///   `#[sheet(no_accessors)]` is given)
/// - a `SheetType` implementation listing fields, tags and operations in declaration order
/// - a startup constructor registering the type with `sheet_mapper::catalog::global()`
///
/// Enums, tuple structs and unit structs are described without fields, so a field of such a type
/// contributes no columns when flattened.
///
/// Container attributes: `entity`, `no_accessors`, `operations(name, ...)`.
/// Field attributes: `id`, `id = "label"`, `skip`.
#[proc_macro_derive(SheetType, attributes(sheet))]
pub fn derive_sheet_type(input: TokenStream) -> TokenStream {
    sheet_type::derive_sheet_type_impl(input)
}
