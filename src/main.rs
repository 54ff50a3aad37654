//! Demographer - demographic statistics for census-style datasets
//!
//! A CLI tool that loads a header-less census CSV, drops rows with
//! missing critical fields and computes ten summary statistics.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (bad arguments, config, unreadable data, empty subgroup)

mod analysis;
mod cli;
mod config;
mod dataset;
mod error;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, ReportFormat, CONFIG_FILE};
use dataset::LoadOptions;
use models::{Report, ReportMetadata};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config decides the default log level, so it is loaded before logging starts
    let (mut config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("Demographer v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match config_source {
        Some(path) => info!("Loaded config from {}", path),
        None => debug!("No config file found, using defaults"),
    }

    if let Err(e) = run(&config) {
        error!("Analysis failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .demographer.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    Ok(())
}

/// Initialize logging. Logs go to stderr so stdout carries only the statistics.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.general.verbose);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from the explicit path, the default location, or defaults.
///
/// Also returns the path the config came from, for logging once logging is up.
fn load_config(args: &Args) -> Result<(Config, Option<String>)> {
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, Some(config_path.display().to_string())));
    }

    match Config::load_default()? {
        Some(config) => Ok((config, Some(CONFIG_FILE.to_string()))),
        None => Ok((Config::default(), None)),
    }
}

/// Load, analyze and optionally write the report file.
fn run(config: &Config) -> Result<()> {
    let start_time = Instant::now();
    let data_path = &config.dataset.path;

    let options = LoadOptions::from(&config.dataset);
    let dataset = dataset::load_file(data_path, &options)?;

    let working_set_rows = dataset.working_set().len();
    info!(
        "Analyzing {} rows ({} dropped for missing values)",
        working_set_rows,
        dataset.len() - working_set_rows
    );

    let statistics = analysis::calculate_demographic_data(&dataset, config.report.print)
        .with_context(|| format!("Failed to analyze {}", data_path.display()))?;

    if let Some(ref output) = config.report.output {
        let report = Report {
            metadata: ReportMetadata {
                source: data_path.display().to_string(),
                generated_at: Utc::now(),
                rows_read: dataset.len(),
                working_set_rows,
                duration_seconds: start_time.elapsed().as_secs_f64(),
            },
            statistics,
        };

        let content = match config.report.format {
            ReportFormat::Json => report::generate_json_report(&report)?,
            ReportFormat::Markdown => report::generate_markdown_report(&report),
        };
        report::write_report(&content, output)?;

        info!("Report saved to {}", output.display());
    }

    debug!("Done in {:.3}s", start_time.elapsed().as_secs_f64());
    Ok(())
}
