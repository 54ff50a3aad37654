//! Report generation.
//!
//! This module renders the demographic statistics as the console summary,
//! a Markdown document or a JSON document.

use crate::models::{DemographicStats, Hours, Report, ReportMetadata};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

/// Write the console summary to stdout.
pub fn print_summary(stats: &DemographicStats) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_summary(&mut handle, stats)?;
    handle.flush()
}

/// Write the console summary, one statistic per line, in a fixed order.
pub fn write_summary<W: Write>(out: &mut W, stats: &DemographicStats) -> io::Result<()> {
    let width = stats
        .race_count
        .iter()
        .map(|c| c.race.len())
        .max()
        .unwrap_or(0);

    writeln!(out, "Number of each race:")?;
    for entry in &stats.race_count {
        writeln!(out, "  {:<width$}  {}", entry.race, entry.count, width = width)?;
    }
    writeln!(out, "Average age of men: {:.1}", stats.average_age_men)?;
    writeln!(
        out,
        "Percentage with Bachelors degrees: {:.1}%",
        stats.percentage_bachelors
    )?;
    writeln!(
        out,
        "Percentage with higher education that earn >50K: {:.1}%",
        stats.higher_education_rich
    )?;
    writeln!(
        out,
        "Percentage without higher education that earn >50K: {:.1}%",
        stats.lower_education_rich
    )?;
    writeln!(out, "Min work time: {} hours/week", Hours(stats.min_work_hours))?;
    writeln!(
        out,
        "Percentage of rich among those who work fewest hours: {:.1}%",
        stats.rich_percentage
    )?;
    writeln!(
        out,
        "Country with highest percentage of rich: {}",
        stats.highest_earning_country
    )?;
    writeln!(
        out,
        "Highest percentage of rich people in country: {:.1}%",
        stats.highest_earning_country_percentage
    )?;
    writeln!(out, "Top occupations in India: {}", stats.top_in_occupation)?;

    Ok(())
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Demographic Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_race_section(&report.statistics));
    output.push_str(&generate_statistics_section(&report.statistics));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Rows Read:** {}\n", metadata.rows_read));
    section.push_str(&format!(
        "- **Rows Analyzed:** {}\n",
        metadata.working_set_rows
    ));
    if metadata.rows_dropped() > 0 {
        section.push_str(&format!(
            "- **Rows Dropped (missing values):** {}\n",
            metadata.rows_dropped()
        ));
    }
    section.push_str(&format!(
        "- **Duration:** {:.3}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the race breakdown table.
fn generate_race_section(stats: &DemographicStats) -> String {
    let mut section = String::new();

    section.push_str("## Race\n\n");
    section.push_str("| Race | Count |\n");
    section.push_str("|:---|---:|\n");
    for entry in &stats.race_count {
        section.push_str(&format!("| {} | {} |\n", entry.race, entry.count));
    }
    section.push('\n');

    section
}

/// Generate the table of scalar statistics.
fn generate_statistics_section(stats: &DemographicStats) -> String {
    let mut section = String::new();

    section.push_str("## Statistics\n\n");
    section.push_str("| Statistic | Value |\n");
    section.push_str("|:---|---:|\n");

    let rows = [
        ("Average age of men", format!("{:.1}", stats.average_age_men)),
        (
            "Bachelors degrees",
            format!("{:.1}%", stats.percentage_bachelors),
        ),
        (
            "Higher education earning >50K",
            format!("{:.1}%", stats.higher_education_rich),
        ),
        (
            "Without higher education earning >50K",
            format!("{:.1}%", stats.lower_education_rich),
        ),
        (
            "Minimum work time",
            format!("{} hours/week", Hours(stats.min_work_hours)),
        ),
        (
            "Earning >50K at minimum hours",
            format!("{:.1}%", stats.rich_percentage),
        ),
        (
            "Country with highest share earning >50K",
            stats.highest_earning_country.clone(),
        ),
        (
            "Share earning >50K in that country",
            format!("{:.1}%", stats.highest_earning_country_percentage),
        ),
        (
            "Top occupation in India (>50K)",
            stats.top_in_occupation.clone(),
        ),
    ];

    for (label, value) in rows {
        section.push_str(&format!("| {} | {} |\n", label, value));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by demographer*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RaceCount;
    use chrono::Utc;

    fn create_test_stats() -> DemographicStats {
        DemographicStats {
            race_count: vec![
                RaceCount {
                    race: "White".to_string(),
                    count: 27816,
                },
                RaceCount {
                    race: "Black".to_string(),
                    count: 3124,
                },
            ],
            average_age_men: 39.4,
            percentage_bachelors: 16.4,
            higher_education_rich: 46.5,
            lower_education_rich: 17.4,
            min_work_hours: 1.0,
            rich_percentage: 10.0,
            highest_earning_country: "Iran".to_string(),
            highest_earning_country_percentage: 41.9,
            top_in_occupation: "Prof-specialty".to_string(),
        }
    }

    fn create_test_report() -> Report {
        Report {
            metadata: ReportMetadata {
                source: "adult.data.csv".to_string(),
                generated_at: Utc::now(),
                rows_read: 32561,
                working_set_rows: 32560,
                duration_seconds: 0.25,
            },
            statistics: create_test_stats(),
        }
    }

    #[test]
    fn test_write_summary() {
        let mut buf = Vec::new();
        write_summary(&mut buf, &create_test_stats()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Number of each race:");
        assert_eq!(lines[1], "  White  27816");
        assert_eq!(lines[2], "  Black  3124");
        assert_eq!(lines[3], "Average age of men: 39.4");
        assert_eq!(lines[4], "Percentage with Bachelors degrees: 16.4%");
        assert_eq!(lines[7], "Min work time: 1 hours/week");
        assert_eq!(lines[8], "Percentage of rich among those who work fewest hours: 10.0%");
        assert_eq!(lines[9], "Country with highest percentage of rich: Iran");
        assert_eq!(lines[11], "Top occupations in India: Prof-specialty");
        assert_eq!(lines.len(), 12);
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report());

        assert!(markdown.contains("# Demographic Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("| White | 27816 |"));
        assert!(markdown.contains("Rows Dropped (missing values):** 1"));
        assert!(markdown.contains("| Minimum work time | 1 hours/week |"));
        assert!(markdown.contains("Prof-specialty"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["rows_read"], 32561);
        assert_eq!(value["statistics"].as_object().unwrap().len(), 10);
        assert_eq!(value["statistics"]["top_IN_occupation"], "Prof-specialty");
        assert_eq!(value["statistics"]["race_count"]["Black"], 3124);
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");

        write_report("# hello\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hello\n");
    }
}
