//! SheetType derive macro implementation

use heck::ToSnakeCase;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Token, Type, parse_macro_input};

/// Options from `#[sheet(...)]` on the struct
#[derive(Default)]
struct ContainerOptions {
    entity:       bool,
    no_accessors: bool,
    operations:   Vec<String>,
}

/// A field that takes part in the metadata
struct FieldSpec {
    ident:    Ident,
    name:     String,
    ty:       Type,
    id_label: Option<String>,
}

/// Implementation of the SheetType derive macro
pub fn derive_sheet_type_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let options = parse_container_attrs(&input.attrs)?;

    // Enums, tuple and unit structs describe themselves without fields.
    let mut fields = Vec::new();
    match &input.data {
        Data::Struct(data_struct) => {
            if let Fields::Named(named) = &data_struct.fields {
                for field in &named.named {
                    if let Some(spec) = parse_field(field)? {
                        fields.push(spec);
                    }
                }
            }
        }
        Data::Enum(_) => {}
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "SheetType cannot be derived for unions",
            ));
        }
    }

    let type_ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let entity_tag = options
        .entity
        .then(|| quote! { .with_tag(::sheet_mapper::Tag::SheetEntity) });

    let field_infos = fields.iter().map(|field| {
        let name = &field.name;
        let ty = &field.ty;
        let id_tag = field
            .id_label
            .as_ref()
            .map(|label| quote! { .with_id(#label) });
        quote! {
            .with_field(
                ::sheet_mapper::FieldInfo::new(#name, ::std::any::type_name::<#ty>())
                    #id_tag
            )
        }
    });

    let accessor_names: Vec<String> = if options.no_accessors {
        Vec::new()
    } else {
        fields.iter().map(|field| accessor_name(&field.name)).collect()
    };
    let operation_names = accessor_names.iter().chain(options.operations.iter());

    let accessors = if accessor_names.is_empty() {
        quote! {}
    } else {
        let methods = fields.iter().zip(&accessor_names).map(|(field, getter)| {
            let getter = format_ident!("{}", getter);
            let ident = &field.ident;
            let ty = &field.ty;
            let doc = format!("Returns the `{}` field.", field.name);
            quote! {
                #[doc = #doc]
                #[must_use]
                pub const fn #getter(&self) -> &#ty {
                    &self.#ident
                }
            }
        });
        quote! {
            impl #impl_generics #type_ident #ty_generics #where_clause {
                #(#methods)*
            }
        }
    };

    // Generic types have no single concrete registration; hosts register instantiations.
    let registration = if input.generics.params.is_empty() {
        quote! {
            const _: () = {
                #[cfg(not(target_arch = "wasm32"))]
                #[::sheet_mapper::__reexports::ctor::ctor(unsafe, anonymous, crate_path = ::sheet_mapper::__reexports::ctor)]
                fn __ctor() {
                    ::sheet_mapper::catalog::__register_global::<#type_ident>();
                }
            };
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl #impl_generics ::sheet_mapper::SheetType for #type_ident #ty_generics #where_clause {
            fn type_info() -> ::sheet_mapper::TypeInfo {
                ::sheet_mapper::TypeInfo::new(::std::any::type_name::<Self>())
                    #entity_tag
                    #(#field_infos)*
                    #(.with_operation(#operation_names))*
            }
        }

        #accessors

        #registration
    })
}

/// `get_<field>` in snake case
fn accessor_name(field_name: &str) -> String {
    format!("get_{}", field_name.to_snake_case())
}

/// Parse `#[sheet(entity, no_accessors, operations(a, b))]`
fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerOptions> {
    let mut options = ContainerOptions::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("sheet")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("entity") {
                options.entity = true;
                Ok(())
            } else if meta.path.is_ident("no_accessors") {
                options.no_accessors = true;
                Ok(())
            } else if meta.path.is_ident("operations") {
                meta.parse_nested_meta(|operation| {
                    let name = operation
                        .path
                        .get_ident()
                        .ok_or_else(|| operation.error("expected an operation name"))?;
                    options.operations.push(name.unraw().to_string());
                    Ok(())
                })
            } else {
                Err(meta.error("unsupported sheet attribute"))
            }
        })?;
    }

    Ok(options)
}

/// Parse `#[sheet(id)]`, `#[sheet(id = "label")]` and `#[sheet(skip)]` on a field
///
/// Returns `None` for skipped fields.
fn parse_field(field: &syn::Field) -> syn::Result<Option<FieldSpec>> {
    let Some(ident) = field.ident.clone() else {
        return Err(syn::Error::new_spanned(field, "expected a named field"));
    };
    let name = ident.unraw().to_string();

    let mut skip = false;
    let mut id_label = None;

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("sheet")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else if meta.path.is_ident("id") {
                let label = if meta.input.peek(Token![=]) {
                    let value: LitStr = meta.value()?.parse()?;
                    value.value()
                } else {
                    name.clone()
                };
                id_label = Some(label);
                Ok(())
            } else {
                Err(meta.error("unsupported sheet field attribute"))
            }
        })?;
    }

    if skip {
        return Ok(None);
    }

    Ok(Some(FieldSpec {
        ident,
        name,
        ty: field.ty.clone(),
        id_label,
    }))
}
