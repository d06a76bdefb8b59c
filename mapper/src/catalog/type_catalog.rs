//! Registration-based type catalog

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use error_stack::Report;

use super::{NamespaceResolver, ResolveScope};
use crate::error::{Error, Result};
use crate::type_info::{NamespaceName, QualifiedName, SheetType, TypeHandle, TypeInfo};

/// Thread-safe catalog of registered type metadata
///
/// Keyed by qualified name, so resolution order is alphabetical and stable across runs.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    types: RwLock<BTreeMap<QualifiedName, TypeHandle>>,
}

impl TypeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type through its [`SheetType`] implementation
    pub fn register<T: SheetType>(&self) -> TypeHandle {
        self.register_info(T::type_info())
    }

    /// Register raw type metadata, replacing any earlier entry with the same name
    pub fn register_info(&self, info: TypeInfo) -> TypeHandle {
        let handle = TypeHandle::new(info);
        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.qualified_name.clone(), handle.clone());
        handle
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NamespaceResolver for TypeCatalog {
    fn resolve(&self, namespace: &NamespaceName, scope: ResolveScope) -> Result<Vec<TypeHandle>> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);

        let under: Vec<&TypeHandle> = types
            .iter()
            .filter(|(name, _)| name.is_under(namespace))
            .map(|(_, handle)| handle)
            .collect();

        if under.is_empty() {
            return Err(Report::new(Error::NamespaceNotFound(namespace.to_string())));
        }

        Ok(under
            .into_iter()
            .filter(|handle| match scope {
                ResolveScope::Nested => true,
                ResolveScope::Direct => handle.qualified_name.is_directly_under(namespace),
            })
            .cloned()
            .collect())
    }

    fn resolve_type(&self, name: &QualifiedName) -> Option<TypeHandle> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}
