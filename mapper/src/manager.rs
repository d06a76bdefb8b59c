//! Host-facing entry point
//!
//! `SheetManager` bundles a resolver, a configuration and a [`SchemaRegistry`]. It is cheap to
//! clone; clones share the same registry.

use std::collections::HashMap;
use std::sync::Arc;

use error_stack::Report;
use futures::future::join_all;
use tracing::{info, warn};

use crate::catalog::{GlobalCatalog, NamespaceResolver};
use crate::config::MapperConfig;
use crate::error::Error;
use crate::schema::{ScanReport, SchemaRegistry, process_namespace};
use crate::type_info::{NamespaceName, QualifiedName, TypeHandle};

/// Scans namespaces for sheet entities and serves the resulting mappings
#[derive(Clone)]
pub struct SheetManager {
    resolver: Arc<dyn NamespaceResolver>,
    config:   Arc<MapperConfig>,
    registry: Arc<SchemaRegistry>,
}

impl Default for SheetManager {
    /// Manager over the process-wide catalog with default configuration
    fn default() -> Self {
        Self::new(GlobalCatalog, MapperConfig::default())
    }
}

impl std::fmt::Debug for SheetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetManager")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl SheetManager {
    /// Create a manager over `resolver`
    pub fn new(resolver: impl NamespaceResolver + 'static, config: MapperConfig) -> Self {
        Self {
            resolver: Arc::new(resolver),
            config:   Arc::new(config),
            registry: Arc::new(SchemaRegistry::new()),
        }
    }

    /// Create a manager over the process-wide catalog
    pub fn with_config(config: MapperConfig) -> Self {
        Self::new(GlobalCatalog, config)
    }

    /// Active configuration
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Underlying registry
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Scan the given namespaces on the calling thread
    ///
    /// Namespaces may be written with `.`, `/` or `::` separators. Failures are collected in
    /// the returned report rather than returned as an error, so one bad namespace never stops
    /// the rest of the batch.
    pub fn scan_mapped_packages(&self, namespaces: &[&str]) -> ScanReport {
        let (parsed, mut report) = parse_namespaces(namespaces);
        report.merge(
            self.registry
                .scan(self.resolver.as_ref(), &parsed, &self.config),
        );
        report
    }

    /// Scan the given namespaces concurrently, one blocking worker per namespace
    ///
    /// Results are committed in input order once every worker has finished, so overlapping
    /// namespaces end up exactly as with [`Self::scan_mapped_packages`].
    pub async fn scan_mapped_packages_async(&self, namespaces: &[&str]) -> ScanReport {
        let (parsed, mut report) = parse_namespaces(namespaces);
        info!(
            "Scanning sheet entities in {} namespaces concurrently",
            parsed.len()
        );

        let workers = parsed.into_iter().map(|namespace| {
            let resolver = Arc::clone(&self.resolver);
            let config = Arc::clone(&self.config);
            tokio::task::spawn_blocking(move || {
                process_namespace(resolver.as_ref(), &namespace, &config)
            })
        });

        for outcome in join_all(workers).await {
            match outcome {
                Ok(scan) => report.merge(self.registry.commit(scan)),
                Err(join_error) => {
                    warn!("Scan worker failed: {join_error}");
                    report
                        .failures
                        .push(Report::new(Error::ScanWorker(join_error.to_string())));
                }
            }
        }

        info!(
            "Sheet entity scan complete: {} registered, {} failed",
            report.registered.len(),
            report.failures.len()
        );
        report
    }

    /// Column names per entity, keyed by qualified name
    pub fn mapped_column_names(&self) -> HashMap<String, Vec<String>> {
        stringify_keys(self.registry.all_columns())
    }

    /// Operation names per entity, keyed by qualified name
    pub fn method_names(&self) -> HashMap<String, Vec<String>> {
        stringify_keys(self.registry.all_operations())
    }

    /// Type handle per entity, keyed by qualified name
    pub fn scanned_sheet_entities(&self) -> HashMap<String, TypeHandle> {
        stringify_keys(self.registry.get_entities())
    }

    /// Column names of one entity; empty when it has not been scanned
    pub fn columns_of(&self, qualified_name: &str) -> Vec<String> {
        self.registry.get_columns(&QualifiedName::from(qualified_name))
    }

    /// Operation names of one entity; empty when it has not been scanned
    pub fn operations_of(&self, qualified_name: &str) -> Vec<String> {
        self.registry
            .get_operations(&QualifiedName::from(qualified_name))
    }
}

/// Parse raw namespaces, reporting the invalid ones
fn parse_namespaces(raw: &[&str]) -> (Vec<NamespaceName>, ScanReport) {
    let mut report = ScanReport::default();
    let parsed = raw
        .iter()
        .filter_map(|namespace| match NamespaceName::new(namespace) {
            Ok(parsed) => Some(parsed),
            Err(failure) => {
                warn!("Skipping namespace {namespace:?}: {}", failure.current_context());
                report.failures.push(failure);
                None
            }
        })
        .collect();
    (parsed, report)
}

fn stringify_keys<T>(map: HashMap<QualifiedName, T>) -> HashMap<String, T> {
    map.into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, reason = "tests")]
mod tests {
    use super::*;
    use crate::catalog::TypeCatalog;
    use crate::type_info::{FieldInfo, Tag, TypeInfo};

    const STRING: &str = "alloc::string::String";

    fn catalog() -> TypeCatalog {
        let catalog = TypeCatalog::new();
        catalog.register_info(
            TypeInfo::new("crm::Account")
                .with_tag(Tag::SheetEntity)
                .with_field(FieldInfo::new("number", STRING).with_id("number"))
                .with_field(FieldInfo::new("owner", "crm::Contact"))
                .with_operation("get_number"),
        );
        catalog.register_info(
            TypeInfo::new("crm::Contact")
                .with_field(FieldInfo::new("email", STRING).with_id("email")),
        );
        catalog.register_info(
            TypeInfo::new("ops::Ticket")
                .with_tag(Tag::SheetEntity)
                .with_field(FieldInfo::new("title", STRING)),
        );
        catalog
    }

    #[test]
    fn test_never_scanned_manager_returns_empty_mappings() {
        let manager = SheetManager::new(TypeCatalog::new(), MapperConfig::default());

        assert!(manager.mapped_column_names().is_empty());
        assert!(manager.method_names().is_empty());
        assert!(manager.scanned_sheet_entities().is_empty());
        assert!(manager.columns_of("crm::Account").is_empty());
    }

    #[test]
    fn test_scan_mapped_packages() {
        let manager = SheetManager::new(catalog(), MapperConfig::default());

        let report = manager.scan_mapped_packages(&["crm", "ops"]);

        assert!(report.is_clean());
        assert_eq!(
            manager.mapped_column_names().get("crm::Account"),
            Some(&vec!["number".to_string(), "owner_email".to_string()])
        );
        assert_eq!(manager.operations_of("crm::Account"), ["get_number"]);
        assert_eq!(manager.columns_of("ops::Ticket"), ["title"]);
        assert_eq!(manager.scanned_sheet_entities().len(), 2);
    }

    #[test]
    fn test_invalid_namespace_is_reported() {
        let manager = SheetManager::new(catalog(), MapperConfig::default());

        let report = manager.scan_mapped_packages(&["..", "ops"]);

        assert_eq!(report.namespace_failures().count(), 1);
        assert!(matches!(
            report.failures[0].current_context(),
            Error::InvalidNamespace(_)
        ));
        assert_eq!(manager.columns_of("ops::Ticket"), ["title"]);
    }

    #[test]
    fn test_clones_share_the_registry() {
        let manager = SheetManager::new(catalog(), MapperConfig::default());
        let clone = manager.clone();

        clone.scan_mapped_packages(&["ops"]);

        assert_eq!(manager.columns_of("ops::Ticket"), ["title"]);
    }

    #[tokio::test]
    async fn test_async_scan_matches_sync_scan() {
        let sync_manager = SheetManager::new(catalog(), MapperConfig::default());
        let async_manager = SheetManager::new(catalog(), MapperConfig::default());

        let sync_report = sync_manager.scan_mapped_packages(&["crm", "ops", "missing"]);
        let async_report = async_manager
            .scan_mapped_packages_async(&["crm", "ops", "missing"])
            .await;

        assert_eq!(
            sync_manager.mapped_column_names(),
            async_manager.mapped_column_names()
        );
        assert_eq!(sync_manager.method_names(), async_manager.method_names());
        assert_eq!(async_report.registered.len(), sync_report.registered.len());
        assert_eq!(async_report.namespace_failures().count(), 1);
    }

    #[tokio::test]
    async fn test_async_scan_of_overlapping_namespaces_follows_input_order() {
        fn overlapping_catalog() -> TypeCatalog {
            let catalog = TypeCatalog::new();
            catalog.register_info(
                TypeInfo::new("shop::model::Order")
                    .with_tag(Tag::SheetEntity)
                    .with_field(FieldInfo::new("acct", "shop::other::Acct")),
            );
            catalog.register_info(
                TypeInfo::new("shop::other::Acct")
                    .with_field(FieldInfo::new("no", STRING).with_id("no")),
            );
            catalog
        }

        for (namespaces, expected) in [
            (["shop", "shop.model"], "acct"),
            (["shop.model", "shop"], "acct_no"),
        ] {
            let sync_manager = SheetManager::new(overlapping_catalog(), MapperConfig::default());
            sync_manager.scan_mapped_packages(&namespaces);
            assert_eq!(sync_manager.columns_of("shop::model::Order"), [expected]);

            for _ in 0..8 {
                let async_manager =
                    SheetManager::new(overlapping_catalog(), MapperConfig::default());
                async_manager.scan_mapped_packages_async(&namespaces).await;
                assert_eq!(async_manager.columns_of("shop::model::Order"), [expected]);
            }
        }
    }
}
