//! Error types surfaced to the caller.
//!
//! Numeric coercion failures are not errors: the loader records the value as
//! missing and the working-set filter decides whether the row survives.

use std::path::PathBuf;
use thiserror::Error;

/// The dataset could not be read or does not have the expected shape.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// The file could not be opened.
    #[error("failed to open dataset {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed (I/O error mid-read, invalid UTF-8, ...).
    #[error("failed to read dataset {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row does not have one value per schema column.
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// An aggregate query has nothing to aggregate over.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputationError {
    /// Every row was dropped by the critical-field filter (or the file was empty).
    #[error("working set is empty after dropping rows with missing values")]
    EmptyWorkingSet,

    /// The subgroup a percentage, mean or mode is taken over has no rows.
    #[error("cannot compute {statistic}: no rows in subgroup '{subgroup}'")]
    EmptySubgroup {
        statistic: &'static str,
        subgroup: &'static str,
    },
}
