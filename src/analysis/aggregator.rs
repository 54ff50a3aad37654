//! Demographic aggregation.
//!
//! Each statistic is a single mapping-and-reduction pass over the working
//! set. Country and occupation groups use `BTreeMap`, so their ties break by
//! ascending key order, independent of hashing. Race counts keep first
//! appearance order for ties.

use crate::dataset::Dataset;
use crate::error::ComputationError;
use crate::models::{DemographicStats, RaceCount, Record};
use crate::report;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Country whose top rich occupation is reported.
const TOP_OCCUPATION_COUNTRY: &str = "India";

/// Compute the ten statistics over the dataset's working set.
///
/// When `print_data` is set the results are also written to stdout; the
/// returned value is the same either way.
pub fn calculate_demographic_data(
    dataset: &Dataset,
    print_data: bool,
) -> Result<DemographicStats, ComputationError> {
    let working = dataset.working_set();
    debug!(
        "Working set: {} of {} rows ({} dropped)",
        working.len(),
        dataset.len(),
        dataset.len() - working.len()
    );

    let stats = compute_statistics(&working)?;

    if print_data {
        if let Err(e) = report::print_summary(&stats) {
            warn!("Failed to print summary: {}", e);
        }
    }

    Ok(stats)
}

/// Compute all statistics over rows that already passed the working-set filter.
pub fn compute_statistics(rows: &[&Record]) -> Result<DemographicStats, ComputationError> {
    if rows.is_empty() {
        return Err(ComputationError::EmptyWorkingSet);
    }

    let min_work_hours = min_work_hours(rows)?;
    let (highest_earning_country, highest_earning_country_percentage) =
        highest_earning_country(rows)?;

    Ok(DemographicStats {
        race_count: race_count(rows),
        average_age_men: average_age_men(rows)?,
        percentage_bachelors: percentage_bachelors(rows)?,
        higher_education_rich: education_rich_percentage(rows, true)?,
        lower_education_rich: education_rich_percentage(rows, false)?,
        min_work_hours,
        rich_percentage: rich_percentage_at_hours(rows, min_work_hours)?,
        highest_earning_country,
        highest_earning_country_percentage,
        top_in_occupation: top_rich_occupation(rows, TOP_OCCUPATION_COUNTRY)?,
    })
}

/// Round to one decimal place from the exact binary value, ties to even.
///
/// Float formatting is correctly rounded, so `36.25` becomes `36.2` and
/// `0.15` (stored as `0.1499...`) becomes `0.1`.
pub fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// `part / whole * 100`, rounded; an empty `whole` is an error.
fn percentage(
    part: usize,
    whole: usize,
    statistic: &'static str,
    subgroup: &'static str,
) -> Result<f64, ComputationError> {
    if whole == 0 {
        return Err(ComputationError::EmptySubgroup {
            statistic,
            subgroup,
        });
    }
    Ok(round1(part as f64 / whole as f64 * 100.0))
}

/// Count rows per key, skipping rows where the key is missing.
fn count_by<'a, F>(rows: &[&'a Record], key: F) -> BTreeMap<&'a str, usize>
where
    F: Fn(&'a Record) -> Option<&'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for &row in rows {
        if let Some(k) = key(row) {
            *counts.entry(k).or_default() += 1;
        }
    }

    counts
}

/// Most frequent key; among equal counts the smallest key wins.
fn mode<'a>(counts: &BTreeMap<&'a str, usize>) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;

    for (&key, &count) in counts {
        // Strictly greater keeps the earliest (smallest) key on ties
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((key, count));
        }
    }

    best.map(|(key, _)| key)
}

/// Rows per race, highest count first; equal counts keep first-appearance order.
pub fn race_count(rows: &[&Record]) -> Vec<RaceCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<RaceCount> = Vec::new();

    for race in rows.iter().filter_map(|r| r.race.as_deref()) {
        match index.get(race) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(race, counts.len());
                counts.push(RaceCount {
                    race: race.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-appearance order for ties
    counts.sort_by_key(|c| std::cmp::Reverse(c.count));
    counts
}

/// Mean age of men with a known age, rounded to one decimal.
pub fn average_age_men(rows: &[&Record]) -> Result<f64, ComputationError> {
    let (sum, n) = rows
        .iter()
        .filter(|r| r.is_male())
        .filter_map(|r| r.age)
        .fold((0.0, 0usize), |(sum, n), age| (sum + age, n + 1));

    if n == 0 {
        return Err(ComputationError::EmptySubgroup {
            statistic: "average_age_men",
            subgroup: "Male with known age",
        });
    }

    Ok(round1(sum / n as f64))
}

/// Share of rows with a Bachelors degree.
pub fn percentage_bachelors(rows: &[&Record]) -> Result<f64, ComputationError> {
    let bachelors = rows
        .iter()
        .filter(|r| r.education.as_deref() == Some("Bachelors"))
        .count();

    percentage(bachelors, rows.len(), "percentage_bachelors", "all rows")
}

/// Share of rich rows among those with (or without) higher education.
pub fn education_rich_percentage(
    rows: &[&Record],
    higher: bool,
) -> Result<f64, ComputationError> {
    let (rich, total) = rows
        .iter()
        .filter(|r| r.has_higher_education() == higher)
        .fold((0, 0), |(rich, total), r| {
            (rich + usize::from(r.is_rich()), total + 1)
        });

    if higher {
        percentage(rich, total, "higher_education_rich", "higher education")
    } else {
        percentage(rich, total, "lower_education_rich", "lower education")
    }
}

/// Fewest weekly hours worked by anyone in the working set.
pub fn min_work_hours(rows: &[&Record]) -> Result<f64, ComputationError> {
    rows.iter()
        .filter_map(|r| r.hours_per_week)
        .reduce(f64::min)
        .ok_or(ComputationError::EmptyWorkingSet)
}

/// Share of rich rows among those working exactly `hours` per week.
pub fn rich_percentage_at_hours(rows: &[&Record], hours: f64) -> Result<f64, ComputationError> {
    let (rich, total) = rows
        .iter()
        .filter(|r| r.hours_per_week == Some(hours))
        .fold((0, 0), |(rich, total), r| {
            (rich + usize::from(r.is_rich()), total + 1)
        });

    percentage(rich, total, "rich_percentage", "minimum work hours")
}

/// Country with the highest share of rich rows, and that share rounded.
///
/// Countries are visited in ascending name order and only a strictly higher
/// rate replaces the current best, so the first country to reach the maximum
/// wins. Rows without a native country are not grouped.
pub fn highest_earning_country(rows: &[&Record]) -> Result<(String, f64), ComputationError> {
    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for row in rows {
        if let Some(country) = row.native_country.as_deref() {
            let (rich, total) = groups.entry(country).or_default();
            *rich += usize::from(row.is_rich());
            *total += 1;
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for (country, (rich, total)) in groups {
        let rate = rich as f64 / total as f64 * 100.0;
        if best.map_or(true, |(_, r)| rate > r) {
            best = Some((country, rate));
        }
    }

    best.map(|(country, rate)| (country.to_string(), round1(rate)))
        .ok_or(ComputationError::EmptySubgroup {
            statistic: "highest_earning_country",
            subgroup: "rows with a native country",
        })
}

/// Most common occupation among rich rows from `country`.
pub fn top_rich_occupation(rows: &[&Record], country: &str) -> Result<String, ComputationError> {
    let candidates: Vec<&Record> = rows
        .iter()
        .copied()
        .filter(|r| r.native_country.as_deref() == Some(country) && r.is_rich())
        .collect();

    let counts = count_by(&candidates, |r| r.occupation.as_deref());

    mode(&counts)
        .map(String::from)
        .ok_or(ComputationError::EmptySubgroup {
            statistic: "top_IN_occupation",
            subgroup: "India, >50K",
        })
}
