//! Data models for the demographic analyzer.
//!
//! This module contains the census record as loaded from disk, the computed
//! statistics and the report wrapper written by the report generators.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Salary bracket that counts as "rich".
pub const RICH_SALARY: &str = ">50K";

/// Education levels that count as higher education.
pub const HIGHER_EDUCATION: [&str; 3] = ["Bachelors", "Masters", "Doctorate"];

/// Column names in file order. The file carries no header, so this is the schema.
pub const COLUMNS: [&str; 15] = [
    "age",
    "workclass",
    "fnlwgt",
    "education",
    "education-num",
    "marital-status",
    "occupation",
    "relationship",
    "race",
    "sex",
    "capital-gain",
    "capital-loss",
    "hours-per-week",
    "native-country",
    "salary",
];

/// One individual from the census file.
///
/// Every field is optional: an empty cell, or a numeric cell that does not
/// parse, is stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    pub age: Option<f64>,
    pub workclass: Option<String>,
    pub fnlwgt: Option<f64>,
    pub education: Option<String>,
    pub education_num: Option<f64>,
    pub marital_status: Option<String>,
    pub occupation: Option<String>,
    pub relationship: Option<String>,
    pub race: Option<String>,
    pub sex: Option<String>,
    pub capital_gain: Option<f64>,
    pub capital_loss: Option<f64>,
    pub hours_per_week: Option<f64>,
    pub native_country: Option<String>,
    pub salary: Option<String>,
}

impl Record {
    /// True when race, sex, education, salary and hours-per-week are all present.
    pub fn has_critical_fields(&self) -> bool {
        self.race.is_some()
            && self.sex.is_some()
            && self.education.is_some()
            && self.salary.is_some()
            && self.hours_per_week.is_some()
    }

    /// True when the salary bracket is above 50K.
    pub fn is_rich(&self) -> bool {
        self.salary.as_deref() == Some(RICH_SALARY)
    }

    pub fn is_male(&self) -> bool {
        self.sex.as_deref() == Some("Male")
    }

    /// True when education is Bachelors, Masters or Doctorate.
    pub fn has_higher_education(&self) -> bool {
        self.education
            .as_deref()
            .is_some_and(|e| HIGHER_EDUCATION.contains(&e))
    }
}

/// Count of working-set rows for one race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceCount {
    pub race: String,
    pub count: usize,
}

/// The ten demographic statistics.
///
/// Serializes to a map with exactly the ten statistic names as keys;
/// `race_count` becomes a nested map kept in descending-count order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicStats {
    /// Rows per race, highest count first (ties by race name).
    #[serde(serialize_with = "serialize_race_count")]
    pub race_count: Vec<RaceCount>,
    pub average_age_men: f64,
    pub percentage_bachelors: f64,
    pub higher_education_rich: f64,
    pub lower_education_rich: f64,
    pub min_work_hours: f64,
    pub rich_percentage: f64,
    pub highest_earning_country: String,
    pub highest_earning_country_percentage: f64,
    #[serde(rename = "top_IN_occupation")]
    pub top_in_occupation: String,
}

fn serialize_race_count<S>(counts: &[RaceCount], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(counts.len()))?;
    for entry in counts {
        map.serialize_entry(&entry.race, &entry.count)?;
    }
    map.end()
}

/// Formats hour values the way they appear in the file: `20`, not `20.0`.
pub struct Hours(pub f64);

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Metadata about one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path of the dataset that was analyzed.
    pub source: String,
    /// Date and time of the analysis.
    pub generated_at: DateTime<Utc>,
    /// Rows parsed from the file.
    pub rows_read: usize,
    /// Rows left after dropping those with missing critical fields.
    pub working_set_rows: usize,
    /// Duration of load plus analysis in seconds.
    pub duration_seconds: f64,
}

impl ReportMetadata {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read.saturating_sub(self.working_set_rows)
    }
}

/// The complete analysis report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub statistics: DemographicStats,
}
