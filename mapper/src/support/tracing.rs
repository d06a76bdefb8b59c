//! Logging setup for hosts and the demo binary
//!
//! The library only emits `tracing` events. Hosts that have no subscriber of their own can
//! call [`init_tracing`] once at startup.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use strum::{EnumString, IntoStaticStr};
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::MapperConfig;

/// File name used when `log_file` names a directory
const LOG_FILE_NAME: &str = "sheet_mapper.log";

/// Verbosity accepted in `log_level` and `SHEET_MAPPER_LOG`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Namespace and entity failures
    Warn,
    /// Scan start and completion
    Info,
    /// Per-entity detail
    Debug,
    /// Per-field detail
    Trace,
}

impl TracingLevel {
    /// Lowercase level name
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl From<TracingLevel> for LevelFilter {
    fn from(level: TracingLevel) -> Self {
        match level {
            TracingLevel::Error => Self::ERROR,
            TracingLevel::Warn => Self::WARN,
            TracingLevel::Info => Self::INFO,
            TracingLevel::Debug => Self::DEBUG,
            TracingLevel::Trace => Self::TRACE,
        }
    }
}

/// Install a global subscriber honoring `config.log_level` and `config.log_file`
///
/// Returns the appender guard when a file writer was installed; keep it alive for as long as
/// logs should be flushed. An unparsable level falls back to `warn`. When a global subscriber
/// already exists it is left in place and `None` is returned.
pub fn init_tracing(config: &MapperConfig) -> Option<WorkerGuard> {
    let level = config.tracing_level().unwrap_or(TracingLevel::Warn);
    let filter = EnvFilter::default().add_directive(LevelFilter::from(level).into());

    let Some(path) = &config.log_file else {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true);

        if let Err(e) = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()
        {
            debug!("Keeping the existing tracing subscriber: {e}");
        }
        return None;
    };

    let (directory, file_name) = log_file_location(path);
    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    match tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(e) => {
            debug!(
                "Not logging to {}, keeping the existing tracing subscriber: {e}",
                path.display()
            );
            None
        }
    }
}

/// Split a configured log path into the appender's directory and file name
fn log_file_location(path: &Path) -> (PathBuf, OsString) {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            (parent.to_path_buf(), name.to_os_string())
        }
        (_, Some(name)) => (PathBuf::from("."), name.to_os_string()),
        _ => (path.to_path_buf(), LOG_FILE_NAME.into()),
    }
}
