//! # Sheet Mapper Demo
//!
//! Declares a small inventory model, scans it and prints the derived column layout, operation
//! names and entity metadata as JSON.
//!
//! ```text
//! sheet_mapper_demo [--config FILE] [NAMESPACE]...
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use sheet_mapper::support::tracing::init_tracing;
use sheet_mapper::{MapperConfig, SheetManager};

mod inventory;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "sheet_mapper_demo", about = "Print the sheet column layout of scanned entities")]
struct Cli {
    /// JSON configuration file
    #[arg(long, env = "SHEET_MAPPER_CONFIG")]
    config: Option<PathBuf>,

    /// Namespaces to scan (`a.b`, `a/b` or `a::b`); defaults to the demo inventory model
    namespaces: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = cli
        .config
        .as_deref()
        .map_or_else(|| Ok(MapperConfig::default()), MapperConfig::load)
        .and_then(MapperConfig::with_env_overrides);
    let config = match loaded {
        Ok(config) => config,
        Err(report) => {
            eprintln!("{report:?}");
            return ExitCode::from(2);
        }
    };

    let _guard = init_tracing(&config);

    let namespaces = if cli.namespaces.is_empty() {
        vec![inventory::NAMESPACE.to_string()]
    } else {
        cli.namespaces
    };
    let namespaces: Vec<&str> = namespaces.iter().map(String::as_str).collect();

    let manager = SheetManager::with_config(config);
    let report = manager.scan_mapped_packages(&namespaces);

    let output = json!({
        "mapped_column_names": manager.mapped_column_names(),
        "method_names": manager.method_names(),
        "scanned_sheet_entities": manager.scanned_sheet_entities(),
        "failures": report.failure_messages(),
        "warnings": report.warning_messages(),
    });

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            tracing::error!("Failed to serialize scan output: {e}");
            return ExitCode::from(2);
        }
    }

    if report.failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
