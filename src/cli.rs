//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Values left unset fall back to the config file.

use crate::config::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

/// Demographer - demographic statistics for census-style CSV data
///
/// Reads a header-less, 15-column census file (the UCI "adult" layout),
/// drops rows with missing race, sex, education, salary or hours, and
/// prints ten summary statistics.
///
/// Examples:
///   demographer --data adult.data.csv
///   demographer --data adult.data.csv --output report.md
///   demographer --data adult.data.csv --no-print --output stats.json --format json
///   demographer --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the census CSV file
    ///
    /// Defaults to the config value, or adult.data.csv.
    #[arg(short, long, value_name = "FILE", env = "DEMOGRAPHER_DATA")]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .demographer.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write a report file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report file format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Do not print the statistics to stdout
    #[arg(long)]
    pub no_print: bool,

    /// Skip the first row of the file as a header
    #[arg(long)]
    pub has_headers: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .demographer.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref data) = self.data {
            if data.is_dir() {
                return Err(format!("Data path is a directory: {}", data.display()));
            }
        }

        if self.format.is_some() && self.output.is_none() {
            return Err("--format requires --output".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
