//! Scanner configuration
//!
//! Loaded from JSON; every key is optional.
//!
//! ```json
//! {
//!   "column_separator": "_",
//!   "include_nested_namespaces": true,
//!   "log_level": "info",
//!   "log_file": "/tmp/sheet_mapper.log"
//! }
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::support::tracing::TracingLevel;

/// Environment variable overriding `log_level`
pub const LOG_LEVEL_ENV: &str = "SHEET_MAPPER_LOG";

/// Default separator between an outer field name and an identifier label
pub const DEFAULT_COLUMN_SEPARATOR: &str = "_";

/// Settings shared by scans and logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Joins an outer field name and an identifier label, e.g. `customer_code`
    pub column_separator:          String,
    /// Whether types in nested namespaces are discovered when scanning a parent namespace
    pub include_nested_namespaces: bool,
    /// One of `error`, `warn`, `info`, `debug`, `trace`
    pub log_level:                 String,
    /// Write logs to this file instead of stderr
    pub log_file:                  Option<PathBuf>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            column_separator:          DEFAULT_COLUMN_SEPARATOR.to_string(),
            include_nested_namespaces: true,
            log_level:                 TracingLevel::Warn.as_str().to_string(),
            log_file:                  None,
        }
    }
}

impl MapperConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .change_context(Error::config_failed("parse configuration", "invalid JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .change_context(Error::config_failed("read configuration", path.display()))?;
        Self::from_json_str(&contents).attach(format!("Path: {}", path.display()))
    }

    /// Apply `SHEET_MAPPER_LOG` when it is set, then validate the result
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_log_level_override(std::env::var(LOG_LEVEL_ENV).ok())
            .attach(format!("Environment: {LOG_LEVEL_ENV}"))
    }

    /// Replace `log_level` when `level` is given, then validate the result
    pub fn with_log_level_override(mut self, level: Option<String>) -> Result<Self> {
        if let Some(level) = level {
            self.log_level = level;
        }
        self.validate()?;
        Ok(self)
    }

    /// Parsed log level
    pub fn tracing_level(&self) -> Result<TracingLevel> {
        TracingLevel::from_str(&self.log_level).map_err(|_| {
            Report::new(Error::Configuration(format!(
                "Invalid log level {:?}. Valid levels are: error, warn, info, debug, trace",
                self.log_level
            )))
        })
    }

    /// Reject settings the scanner cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.column_separator.is_empty() {
            return Err(Report::new(Error::Configuration(
                "column_separator must not be empty".to_string(),
            )));
        }
        self.tracing_level().map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, reason = "tests")]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_for_empty_document() {
        let config = MapperConfig::from_json_str("{}").expect("empty object is valid");
        assert_eq!(config, MapperConfig::default());
        assert_eq!(config.column_separator, "_");
        assert!(config.include_nested_namespaces);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = MapperConfig::from_json_str(r#"{"column_separator": "."}"#)
            .expect("valid configuration");
        assert_eq!(config.column_separator, ".");
        assert!(config.include_nested_namespaces);
    }

    #[test]
    fn test_rejects_empty_separator() {
        let err = MapperConfig::from_json_str(r#"{"column_separator": ""}"#)
            .expect_err("empty separator");
        assert!(matches!(err.current_context(), Error::Configuration(_)));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let err = MapperConfig::from_json_str(r#"{"log_level": "loud"}"#)
            .expect_err("unknown level");
        assert!(matches!(err.current_context(), Error::Configuration(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = MapperConfig::from_json_str("{ not json").expect_err("malformed");
        assert!(matches!(err.current_context(), Error::Configuration(_)));
    }

    #[test]
    fn test_log_level_override_is_validated() {
        let config = MapperConfig::default()
            .with_log_level_override(Some("DEBUG".to_string()))
            .expect("valid level");
        assert_eq!(config.tracing_level().expect("valid level"), TracingLevel::Debug);

        let unchanged = MapperConfig::default()
            .with_log_level_override(None)
            .expect("defaults are valid");
        assert_eq!(unchanged, MapperConfig::default());

        let err = MapperConfig::default()
            .with_log_level_override(Some("loud".to_string()))
            .expect_err("unknown level");
        assert!(matches!(err.current_context(), Error::Configuration(_)));
    }

    // The only test in this crate that touches `SHEET_MAPPER_LOG`.
    #[test]
    fn test_env_override_rejects_unknown_level() {
        // SAFETY: no other test reads or writes this variable
        unsafe { std::env::set_var(LOG_LEVEL_ENV, "loud") };
        let result = MapperConfig::default().with_env_overrides();
        // SAFETY: as above
        unsafe { std::env::remove_var(LOG_LEVEL_ENV) };

        let err = result.expect_err("unknown level from environment");
        assert!(matches!(err.current_context(), Error::Configuration(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"include_nested_namespaces": false, "log_level": "debug"}}"#
        )
        .expect("write config");

        let config = MapperConfig::load(file.path()).expect("valid file");
        assert!(!config.include_nested_namespaces);
        assert_eq!(
            config.tracing_level().expect("valid level"),
            TracingLevel::Debug
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = MapperConfig::load(&dir.path().join("missing.json")).expect_err("no file");
        assert!(matches!(err.current_context(), Error::Configuration(_)));
    }
}
