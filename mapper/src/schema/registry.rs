//! Schema registry
//!
//! Holds one [`EntityDescriptor`] per scanned entity. The column, operation and type-handle
//! mappings are all views over the same descriptor map, so an entity's three facets are
//! written together or not at all.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use strum::{AsRefStr, Display};
use tracing::{debug, info, warn};

use super::classifier::is_sheet_entity;
use super::flattener::ColumnFlattener;
use super::operations::list_operations;
use super::report::ScanReport;
use crate::catalog::{NamespaceResolver, ResolveScope};
use crate::config::MapperConfig;
use crate::type_info::{NamespaceName, QualifiedName, TypeHandle};

/// Everything the registry knows about one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDescriptor {
    /// Fully-qualified entity name
    pub qualified_name:  QualifiedName,
    /// Flattened column names in field declaration order
    pub columns:         Vec<String>,
    /// Zero-argument operations in declaration order
    pub operation_names: Vec<String>,
    /// Namespace the entity was discovered under
    pub namespace:       NamespaceName,
    /// Handle to the entity's metadata
    #[serde(skip)]
    pub type_handle:     TypeHandle,
}

/// Registry lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum RegistryState {
    /// Nothing registered yet
    Empty,
    /// At least one entity registered
    Populated,
}

/// Descriptors built for one namespace, not yet committed
#[derive(Debug, Default)]
pub(crate) struct NamespaceScan {
    pub(crate) descriptors: Vec<EntityDescriptor>,
    pub(crate) report:      ScanReport,
}

/// Resolve, classify, flatten and list operations for every entity under `namespace`
///
/// Pure with respect to the registry; the caller commits the result.
pub(crate) fn process_namespace(
    resolver: &dyn NamespaceResolver,
    namespace: &NamespaceName,
    config: &MapperConfig,
) -> NamespaceScan {
    let scope = ResolveScope::from_include_nested(config.include_nested_namespaces);
    let handles = match resolver.resolve(namespace, scope) {
        Ok(handles) => handles,
        Err(failure) => {
            warn!("Skipping namespace {namespace}: {}", failure.current_context());
            return NamespaceScan {
                descriptors: Vec::new(),
                report:      ScanReport::namespace_failed(failure),
            };
        }
    };

    let flattener = ColumnFlattener::new(resolver, &config.column_separator);
    let mut scan = NamespaceScan::default();

    for handle in handles.into_iter().filter(|handle| is_sheet_entity(handle)) {
        match flattener.flatten_columns(&handle, namespace, &mut scan.report.warnings) {
            Ok(columns) => {
                debug!(
                    "Mapped {} to {} columns",
                    handle.qualified_name,
                    columns.len()
                );
                scan.descriptors.push(EntityDescriptor {
                    qualified_name: handle.qualified_name.clone(),
                    columns,
                    operation_names: list_operations(&handle),
                    namespace: namespace.clone(),
                    type_handle: handle,
                });
            }
            Err(failure) => {
                warn!(
                    "Skipping entity {}: {}",
                    handle.qualified_name,
                    failure.current_context()
                );
                scan.report
                    .failures
                    .push(failure.attach(format!("Namespace: {namespace}")));
            }
        }
    }

    scan
}

/// Process-lifetime store of scanned entities
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    entities: RwLock<HashMap<QualifiedName, EntityDescriptor>>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `namespaces` one after another and register every entity found
    ///
    /// A namespace that cannot be resolved is reported and skipped; an entity that cannot be
    /// flattened is reported and left out. Rescanning replaces earlier entries for the same
    /// entities and leaves all other entries untouched.
    pub fn scan(
        &self,
        resolver: &dyn NamespaceResolver,
        namespaces: &[NamespaceName],
        config: &MapperConfig,
    ) -> ScanReport {
        info!("Scanning sheet entities in {} namespaces", namespaces.len());

        let mut report = ScanReport::default();
        for namespace in namespaces {
            let scan = process_namespace(resolver, namespace, config);
            report.merge(self.commit(scan));
        }

        info!(
            "Sheet entity scan complete: {} registered, {} failed",
            report.registered.len(),
            report.failures.len()
        );
        report
    }

    /// Write a namespace's descriptors under a single lock
    pub(crate) fn commit(&self, scan: NamespaceScan) -> ScanReport {
        let NamespaceScan {
            descriptors,
            mut report,
        } = scan;

        if descriptors.is_empty() {
            return report;
        }

        let mut entities = self
            .entities
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for descriptor in descriptors {
            report.registered.push(descriptor.qualified_name.clone());
            entities.insert(descriptor.qualified_name.clone(), descriptor);
        }

        report
    }

    /// Column names of an entity; empty when it is not registered
    pub fn get_columns(&self, name: &QualifiedName) -> Vec<String> {
        self.descriptor(name)
            .map(|descriptor| descriptor.columns)
            .unwrap_or_default()
    }

    /// Operation names of an entity; empty when it is not registered
    pub fn get_operations(&self, name: &QualifiedName) -> Vec<String> {
        self.descriptor(name)
            .map(|descriptor| descriptor.operation_names)
            .unwrap_or_default()
    }

    /// Every registered entity's type handle
    pub fn get_entities(&self) -> HashMap<QualifiedName, TypeHandle> {
        self.read_map(|descriptor| descriptor.type_handle.clone())
    }

    /// Every registered entity's columns
    pub fn all_columns(&self) -> HashMap<QualifiedName, Vec<String>> {
        self.read_map(|descriptor| descriptor.columns.clone())
    }

    /// Every registered entity's operation names
    pub fn all_operations(&self) -> HashMap<QualifiedName, Vec<String>> {
        self.read_map(|descriptor| descriptor.operation_names.clone())
    }

    /// Full descriptor of one entity
    pub fn descriptor(&self, name: &QualifiedName) -> Option<EntityDescriptor> {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no entity has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current lifecycle state
    pub fn state(&self) -> RegistryState {
        if self.is_empty() {
            RegistryState::Empty
        } else {
            RegistryState::Populated
        }
    }

    fn read_map<T>(&self, facet: impl Fn(&EntityDescriptor) -> T) -> HashMap<QualifiedName, T> {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, descriptor)| (name.clone(), facet(descriptor)))
            .collect()
    }
}
