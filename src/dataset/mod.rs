//! Census dataset: loading and the working-set filter.
//!
//! ```text
//!  adult.data.csv ──▶ loader ──▶ Dataset ──▶ working_set() ──▶ aggregator
//! ```

pub mod loader;

pub use loader::{load_file, LoadOptions};

use crate::models::Record;

/// All rows parsed from the census file, in file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Rows with race, sex, education, salary and hours-per-week all present.
    ///
    /// Every statistic is computed over this view and nothing else.
    pub fn working_set(&self) -> Vec<&Record> {
        self.records()
            .iter()
            .filter(|r| r.has_critical_fields())
            .collect()
    }
}
