//! Column flattening
//!
//! Turns an entity's fields into spreadsheet column names. Fields of a type that lives under
//! the scanned namespace are treated as nested records: they contribute one column per
//! identifier-tagged sub-field, named `<field><separator><label>`. All other fields map to a
//! column named after the field.
//!
//! Flattening descends exactly one level. The nested type's own local fields are not
//! expanded further, which also bounds self-referencing entities.

use std::collections::HashSet;

use error_stack::Report;
use tracing::{trace, warn};

use crate::catalog::NamespaceResolver;
use crate::error::{Error, Result};
use crate::type_info::{FieldInfo, NamespaceName, TypeInfo};

/// Derives the ordered column list of an entity
pub struct ColumnFlattener<'a> {
    resolver:  &'a dyn NamespaceResolver,
    separator: &'a str,
}

impl<'a> ColumnFlattener<'a> {
    /// Create a flattener resolving nested field types through `resolver`
    pub const fn new(resolver: &'a dyn NamespaceResolver, separator: &'a str) -> Self {
        Self {
            resolver,
            separator,
        }
    }

    /// Flatten `entity` as discovered under `namespace`
    ///
    /// Identifier tags without a usable label are skipped and reported through `warnings`.
    /// Fails when a nested local type cannot be resolved or when the resulting columns are
    /// empty or not unique.
    pub fn flatten_columns(
        &self,
        entity: &TypeInfo,
        namespace: &NamespaceName,
        warnings: &mut Vec<Report<Error>>,
    ) -> Result<Vec<String>> {
        let mut columns = Vec::with_capacity(entity.fields.len());

        for field in &entity.fields {
            if field.type_name.is_under(namespace) {
                self.push_nested_columns(entity, field, &mut columns, warnings)?;
            } else {
                trace!("{}.{} maps to a direct column", entity.qualified_name, field.name);
                columns.push(field.name.clone());
            }
        }

        ensure_valid_columns(entity, &columns)?;
        Ok(columns)
    }

    /// Emit `<field>_<label>` for every identifier-tagged field of the nested type
    fn push_nested_columns(
        &self,
        entity: &TypeInfo,
        field: &FieldInfo,
        columns: &mut Vec<String>,
        warnings: &mut Vec<Report<Error>>,
    ) -> Result<()> {
        let nested = self.resolver.resolve_type(&field.type_name).ok_or_else(|| {
            Report::new(Error::UnresolvableFieldType {
                entity:    entity.qualified_name.to_string(),
                field:     field.name.clone(),
                type_name: field.type_name.to_string(),
            })
        })?;

        let before = columns.len();
        for sub_field in &nested.fields {
            let Some(label) = sub_field.identifier_label() else {
                continue;
            };

            let label = label.trim();
            if label.is_empty() {
                warn!(
                    "Skipping identifier tag without label on {}.{}",
                    nested.qualified_name, sub_field.name
                );
                warnings.push(
                    Report::new(Error::MalformedTag {
                        entity: nested.qualified_name.to_string(),
                        field:  sub_field.name.clone(),
                    })
                    .attach(format!(
                        "Referenced from: {}.{}",
                        entity.qualified_name, field.name
                    )),
                );
                continue;
            }

            columns.push(format!("{}{}{label}", field.name, self.separator));
        }

        trace!(
            "{}.{} flattened into {} columns through {}",
            entity.qualified_name,
            field.name,
            columns.len() - before,
            nested.qualified_name
        );
        Ok(())
    }
}

/// Every column must be non-empty and unique within the entity
fn ensure_valid_columns(entity: &TypeInfo, columns: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if column.is_empty() {
            return Err(Report::new(Error::EmptyColumn {
                entity: entity.qualified_name.to_string(),
            }));
        }
        if !seen.insert(column.as_str()) {
            return Err(Report::new(Error::DuplicateColumn {
                entity: entity.qualified_name.to_string(),
                column: column.clone(),
            }));
        }
    }
    Ok(())
}
