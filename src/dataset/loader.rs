//! Census file loading.
//!
//! Reads the header-less, comma-separated census file, imposes the
//! positional schema and coerces the numeric columns.

use crate::error::DataLoadError;
use crate::models::{Record, COLUMNS};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use super::Dataset;

/// Options controlling how the file is parsed.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Skip the first row as a header.
    pub has_headers: bool,
    /// Strip whitespace around every field.
    pub trim_whitespace: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
            trim_whitespace: true,
        }
    }
}

impl From<&crate::config::DatasetConfig> for LoadOptions {
    fn from(config: &crate::config::DatasetConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte(),
            has_headers: config.has_headers,
            trim_whitespace: config.trim_whitespace,
        }
    }
}

/// Load a dataset from a file on disk.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Dataset, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = load_from_reader(file, options).map_err(|e| match e {
        DataLoadError::Csv { source, .. } => DataLoadError::Csv {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    info!("Loaded {} rows from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Load a dataset from any reader. Errors carry an empty path.
pub fn load_from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Dataset, DataLoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter)
        .flexible(true)
        .trim(if options.trim_whitespace {
            Trim::All
        } else {
            Trim::None
        })
        .from_reader(reader);

    let mut records = Vec::new();
    let mut row = StringRecord::new();

    loop {
        let more = csv_reader
            .read_record(&mut row)
            .map_err(|source| DataLoadError::Csv {
                path: Default::default(),
                source,
            })?;
        if !more {
            break;
        }

        let line = row.position().map(|p| p.line()).unwrap_or_default();

        if is_blank(&row) {
            continue;
        }

        records.push(parse_row(&row, line)?);
    }

    Ok(Dataset::from_records(records))
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(|field| field.trim().is_empty())
}

/// Build a record from one positional row.
fn parse_row(row: &StringRecord, line: u64) -> Result<Record, DataLoadError> {
    if row.len() != COLUMNS.len() {
        return Err(DataLoadError::ColumnCount {
            line,
            expected: COLUMNS.len(),
            found: row.len(),
        });
    }

    let numeric = |idx: usize| coerce_numeric(&row[idx], COLUMNS[idx], line);
    let category = |idx: usize| coerce_category(&row[idx]);

    Ok(Record {
        age: numeric(0),
        workclass: category(1),
        fnlwgt: numeric(2),
        education: category(3),
        education_num: numeric(4),
        marital_status: category(5),
        occupation: category(6),
        relationship: category(7),
        race: category(8),
        sex: category(9),
        capital_gain: numeric(10),
        capital_loss: numeric(11),
        hours_per_week: numeric(12),
        native_country: category(13),
        salary: category(14),
    })
}

fn coerce_category(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Parse a numeric cell; anything that is not a finite number becomes missing.
fn coerce_numeric(raw: &str, column: &str, line: u64) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            debug!("line {}: '{}' is not numeric in column {}", line, trimmed, column);
            None
        }
    }
}
