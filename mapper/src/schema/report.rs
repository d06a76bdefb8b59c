//! Outcome of a scan
//!
//! Scans degrade instead of aborting: whatever could be registered is registered, and every
//! namespace or entity that failed is listed here.

use error_stack::Report;

use crate::error::Error;
use crate::type_info::QualifiedName;

/// Entities registered plus the failures and warnings collected along the way
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Entities written into the registry, in commit order
    pub registered: Vec<QualifiedName>,
    /// Namespaces or entities that could not be registered
    pub failures:   Vec<Report<Error>>,
    /// Non-fatal problems, e.g. identifier tags without a label
    pub warnings:   Vec<Report<Error>>,
}

impl ScanReport {
    /// Report for a namespace that failed before any entity was processed
    pub fn namespace_failed(failure: Report<Error>) -> Self {
        Self {
            failures: vec![failure],
            ..Self::default()
        }
    }

    /// No failures and no warnings
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.warnings.is_empty()
    }

    /// Failures that prevented a whole namespace from being scanned
    pub fn namespace_failures(&self) -> impl Iterator<Item = &Report<Error>> {
        self.failures
            .iter()
            .filter(|failure| failure.current_context().is_namespace_failure())
    }

    /// Failures that prevented a single entity from being registered
    pub fn entity_failures(&self) -> impl Iterator<Item = &Report<Error>> {
        self.failures
            .iter()
            .filter(|failure| !failure.current_context().is_namespace_failure())
    }

    /// Top-level messages of every failure
    pub fn failure_messages(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|failure| failure.current_context().to_string())
            .collect()
    }

    /// Top-level messages of every warning
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings
            .iter()
            .map(|warning| warning.current_context().to_string())
            .collect()
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: Self) {
        self.registered.extend(other.registered);
        self.failures.extend(other.failures);
        self.warnings.extend(other.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_partitions() {
        let mut report = ScanReport::namespace_failed(Report::new(Error::NamespaceNotFound(
            "missing".to_string(),
        )));
        report.merge(ScanReport {
            registered: vec![QualifiedName::from("app::Order")],
            failures:   vec![Report::new(Error::DuplicateColumn {
                entity: "app::Invoice".to_string(),
                column: "id".to_string(),
            })],
            warnings:   Vec::new(),
        });

        assert!(!report.is_clean());
        assert_eq!(report.registered.len(), 1);
        assert_eq!(report.namespace_failures().count(), 1);
        assert_eq!(report.entity_failures().count(), 1);
        assert_eq!(
            report.failure_messages(),
            [
                "Namespace \"missing\" could not be found in the type catalog",
                "Duplicate column id in entity app::Invoice",
            ]
        );
    }

    #[test]
    fn test_default_is_clean() {
        assert!(ScanReport::default().is_clean());
    }
}
