//! Namespace resolution
//!
//! The engine never enumerates types itself. It asks a [`NamespaceResolver`] for the type
//! handles under a namespace and, while flattening, for the handle of a field's type.
//! [`TypeCatalog`] is the registration-based resolver shipped with the crate; the
//! process-wide instance behind [`global`] is filled by `#[derive(SheetType)]` at startup.

mod type_catalog;

use std::sync::LazyLock;

pub use type_catalog::TypeCatalog;

use crate::error::Result;
use crate::type_info::{NamespaceName, QualifiedName, SheetType, TypeHandle};

/// Which registered types count as being "in" a namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveScope {
    /// Types anywhere under the namespace, including nested namespaces
    #[default]
    Nested,
    /// Only types whose parent namespace is exactly the requested one
    Direct,
}

impl ResolveScope {
    /// Scope matching the `include_nested_namespaces` configuration flag
    pub const fn from_include_nested(include_nested: bool) -> Self {
        if include_nested { Self::Nested } else { Self::Direct }
    }
}

/// Source of type handles for the scanner
///
/// Implementations must return fields and operations in a stable declaration order; column
/// and operation ordering is derived from it.
pub trait NamespaceResolver: Send + Sync {
    /// Every type handle under `namespace`
    ///
    /// Fails with [`Error::NamespaceNotFound`](crate::Error::NamespaceNotFound) when nothing
    /// at all is registered under it. An empty result is reserved for namespaces whose scope
    /// filter excluded every type.
    fn resolve(&self, namespace: &NamespaceName, scope: ResolveScope) -> Result<Vec<TypeHandle>>;

    /// Handle for a single qualified type name
    fn resolve_type(&self, name: &QualifiedName) -> Option<TypeHandle>;
}

/// Process-wide catalog filled by `#[derive(SheetType)]`
static GLOBAL_CATALOG: LazyLock<TypeCatalog> = LazyLock::new(TypeCatalog::new);

/// Get the process-wide catalog
pub fn global() -> &'static TypeCatalog {
    &GLOBAL_CATALOG
}

/// Resolver delegating to the process-wide catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalCatalog;

impl NamespaceResolver for GlobalCatalog {
    fn resolve(&self, namespace: &NamespaceName, scope: ResolveScope) -> Result<Vec<TypeHandle>> {
        global().resolve(namespace, scope)
    }

    fn resolve_type(&self, name: &QualifiedName) -> Option<TypeHandle> {
        global().resolve_type(name)
    }
}

/// Registration hook used by the derive's startup constructor
#[doc(hidden)]
pub fn __register_global<T: SheetType>() {
    global().register::<T>();
}
