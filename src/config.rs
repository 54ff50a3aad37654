//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.demographer.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".demographer.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Input file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the census file.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Field delimiter (a single ASCII character).
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Treat the first row as a header and skip it.
    #[serde(default)]
    pub has_headers: bool,

    /// Strip whitespace around fields.
    #[serde(default = "default_true")]
    pub trim_whitespace: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            delimiter: default_delimiter(),
            has_headers: false,
            trim_whitespace: true,
        }
    }
}

impl DatasetConfig {
    /// The delimiter as a byte. Call `Config::validate` first.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.bytes().next().unwrap_or(b',')
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("adult.data.csv")
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_true() -> bool {
    true
}

/// Report file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Print the statistics to stdout.
    #[serde(default = "default_true")]
    pub print: bool,

    /// Format of the report file.
    #[serde(default)]
    pub format: ReportFormat,

    /// Report file path; no file is written when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            print: true,
            format: ReportFormat::default(),
            output: None,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        let delimiter = &self.dataset.delimiter;
        if delimiter.len() != 1 || !delimiter.is_ascii() {
            bail!(
                "delimiter must be a single ASCII character, got {:?}",
                delimiter
            );
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when explicitly given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.dataset.path = data.clone();
        }
        if args.has_headers {
            self.dataset.has_headers = true;
        }

        if let Some(ref output) = args.output {
            self.report.output = Some(output.clone());
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if args.no_print {
            self.report.print = false;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dataset.path, PathBuf::from("adult.data.csv"));
        assert_eq!(config.dataset.delimiter_byte(), b',');
        assert!(!config.dataset.has_headers);
        assert!(config.dataset.trim_whitespace);
        assert!(config.report.print);
        assert_eq!(config.report.output, None);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true

[dataset]
path = "data/census.csv"
delimiter = ";"
has_headers = true

[report]
print = false
format = "json"
output = "stats.json"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.dataset.path, PathBuf::from("data/census.csv"));
        assert_eq!(config.dataset.delimiter_byte(), b';');
        assert!(config.dataset.has_headers);
        assert!(config.dataset.trim_whitespace);
        assert!(!config.report.print);
        assert_eq!(config.report.format, ReportFormat::Json);
        assert_eq!(config.report.output, Some(PathBuf::from("stats.json")));
    }

    #[test]
    fn test_invalid_delimiter() {
        let mut config = Config::default();
        config.dataset.delimiter = "||".to_string();
        assert!(config.validate().is_err());

        config.dataset.delimiter = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[dataset]\ndelimiter = \"ab\"\n").unwrap();
        assert!(Config::load(&path).is_err());

        std::fs::write(&path, "[dataset]\ndelimiter = \"\\t\"\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().dataset.delimiter_byte(), b'\t');
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.dataset.path = PathBuf::from("from_config.csv");

        let args = Args::parse_from(["demographer", "--no-print", "--format", "json"]);
        config.merge_with_args(&args);

        // Unset CLI values keep the config value
        assert_eq!(config.dataset.path, PathBuf::from("from_config.csv"));
        assert!(!config.report.print);
        assert_eq!(config.report.format, ReportFormat::Json);

        let args = Args::parse_from(["demographer", "--data", "other.csv", "-o", "out.md"]);
        config.merge_with_args(&args);
        assert_eq!(config.dataset.path, PathBuf::from("other.csv"));
        assert_eq!(config.report.output, Some(PathBuf::from("out.md")));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[dataset]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.dataset.path, PathBuf::from("adult.data.csv"));
    }
}
