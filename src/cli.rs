//! Plumbing shared by the workflow binaries: common flags, logging setup,
//! config and dataset loading, and report printing.

use crate::config::JsonConfig;
use crate::frame;
use anyhow::{Context, Result, anyhow};
use clap::Args;
use polars::prelude::DataFrame;
use serde::Serialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::info;

/// Flags every workflow binary accepts.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// JSON file overriding the default settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Print the final report as JSON instead of text
    ///
    /// Disables logging and the exploration output.
    #[arg(long)]
    pub json: bool,
}

/// Initialize the tracing subscriber; `RUST_LOG` takes precedence over `level`.
///
/// Nothing is installed when `json_output` is set, so stdout carries only the report.
pub fn init_logging(level: &str, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults when no path is given.
pub fn load_config<C: JsonConfig>(path: Option<&Path>) -> Result<C> {
    match path {
        Some(path) => C::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(C::default()),
    }
}

pub fn load_input(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(anyhow!("Input file not found: {}", path.display()));
    }

    info!("Loading dataset from: {}", path.display());
    let df = frame::read_csv(path).with_context(|| format!("Failed to read {}", path.display()))?;
    info!("Dataset loaded: {:?}", df.shape());
    Ok(df)
}

pub fn print_report<R: Serialize + Display>(report: &R, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
