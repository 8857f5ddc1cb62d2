//! Pipeline orchestration: load, filter, adjust, aggregate.
//!
//! These functions tie the pure stages together and handle the flat-file
//! boundary, returning structured data plus a formatted run summary.

use crate::aggregate::{aggregate_categories, AggregatedTable};
use crate::clean::{adjust_inflation, filter_cases, find_appeal_cases, trial_years, FilterCounts};
use crate::load::{
    load_case_metadata, load_keyword_counts, KeywordTable, CASE_NUM_COLUMN, GENERAL_DAMAGE_COLUMN,
};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Header of the trial-year column added in inflation mode.
pub const TRIAL_YEAR_COLUMN: &str = "trial year";

/// Header of the adjusted-award column added in inflation mode.
pub const TRUE_AWARD_COLUMN: &str = "true gd award";

/// Configuration for a preparation run.
pub struct PrepareConfig {
    /// Case-metadata CSV (`Case name`, `Trial year`).
    pub metadata: PathBuf,
    /// Keyword-count CSV (`CaseNum`, keyword columns, `general damage`).
    pub keyword_counts: PathBuf,
    /// Project awards to 2018 dollars and add the `true gd award` column.
    pub inflation: bool,
}

/// Result of a preparation run.
pub struct PreparedData {
    /// Filtered keyword table, with year and adjusted-award columns in
    /// inflation mode.
    pub cleaned: KeywordTable,
    /// Per-case category sums.
    pub aggregated: AggregatedTable,
    /// Rows and columns dropped per filter stage.
    pub filter_counts: FilterCounts,
    /// Case count before any filtering.
    pub input_rows: usize,
}

/// Run the full preparation pipeline.
pub fn prepare_dataset(config: &PrepareConfig) -> Result<PreparedData> {
    let metadata = load_case_metadata(&config.metadata).with_context(|| {
        format!("Failed to load case metadata from {}", config.metadata.display())
    })?;
    let table = load_keyword_counts(&config.keyword_counts).with_context(|| {
        format!(
            "Failed to load keyword counts from {}",
            config.keyword_counts.display()
        )
    })?;
    let input_rows = table.rows.len();

    let appeals = find_appeal_cases(&metadata).context("Appeal detection failed")?;
    let (cleaned, mut filter_counts) = filter_cases(&table, &appeals);

    let cleaned = if config.inflation {
        let years = trial_years(&metadata).context("Trial-year extraction failed")?;
        adjust_inflation(cleaned, &years, &mut filter_counts)
            .context("Inflation adjustment failed")?
    } else {
        cleaned
    };

    let aggregated = aggregate_categories(&cleaned);

    Ok(PreparedData {
        cleaned,
        aggregated,
        filter_counts,
        input_rows,
    })
}

/// Write the cleaned table as CSV, mirroring the input layout plus the
/// `trial year` and `true gd award` columns when the inflation stage ran.
pub fn write_cleaned_csv(table: &KeywordTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("Failed to create cleaned CSV")?;
    let with_years = table.rows.iter().any(|r| r.trial_year.is_some());

    let mut header: Vec<String> = Vec::with_capacity(table.keywords.len() + 4);
    header.push(CASE_NUM_COLUMN.to_string());
    header.extend(table.keywords.iter().cloned());
    header.push(GENERAL_DAMAGE_COLUMN.to_string());
    if with_years {
        header.push(TRIAL_YEAR_COLUMN.to_string());
        header.push(TRUE_AWARD_COLUMN.to_string());
    }
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(row.case_num.to_string());
        record.extend(row.counts.iter().map(|c| c.to_string()));
        record.push(row.general_damage.to_string());
        if with_years {
            record.push(row.trial_year.map(|y| y.to_string()).unwrap_or_default());
            record.push(row.true_award.map(|a| a.to_string()).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the aggregated table as CSV: `CaseNum`, one column per category,
/// `general damage`, plus the year and adjusted-award columns when present.
pub fn write_aggregated_csv(table: &AggregatedTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("Failed to create aggregated CSV")?;
    let with_years = table.rows.iter().any(|r| r.trial_year.is_some());

    let mut header: Vec<String> = Vec::with_capacity(table.categories.len() + 4);
    header.push(CASE_NUM_COLUMN.to_string());
    header.extend(table.categories.iter().cloned());
    header.push(GENERAL_DAMAGE_COLUMN.to_string());
    if with_years {
        header.push(TRIAL_YEAR_COLUMN.to_string());
        header.push(TRUE_AWARD_COLUMN.to_string());
    }
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(row.case_num.to_string());
        record.extend(row.sums.iter().map(|s| s.to_string()));
        record.push(row.general_damage.to_string());
        if with_years {
            record.push(row.trial_year.map(|y| y.to_string()).unwrap_or_default());
            record.push(row.true_award.map(|a| a.to_string()).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Format a run summary, returning the formatted text.
pub fn format_summary(config: &PrepareConfig, data: &PreparedData) -> Result<String> {
    let counts = &data.filter_counts;
    let mut out = String::new();

    writeln!(out, "{:=^72}", " Dataset Preparation Summary ")?;
    writeln!(out)?;
    writeln!(
        out,
        "Metadata:       {} ({})",
        config.metadata.display(),
        file_date(&config.metadata)
    )?;
    writeln!(
        out,
        "Keyword counts: {} ({})",
        config.keyword_counts.display(),
        file_date(&config.keyword_counts)
    )?;
    writeln!(
        out,
        "Inflation:      {}",
        if config.inflation {
            "enabled (awards projected to 2018 dollars)"
        } else {
            "disabled"
        }
    )?;

    writeln!(out, "\n{:<32} {:>8}", "Stage", "Rows")?;
    writeln!(out, "{:-<41}", "")?;
    writeln!(out, "{:<32} {:>8}", "Input cases", data.input_rows)?;
    let stages = [
        ("Zero keyword counts", counts.zero_keyword_rows),
        ("Zero award", counts.zero_award_rows),
        ("Appeal cases", counts.appeal_rows),
        ("Extreme awards", counts.extreme_rows),
        ("No trial year", counts.missing_year_rows),
    ];
    for (label, dropped) in stages {
        if dropped > 0 {
            writeln!(out, "{:<32} {:>8}", label, format!("-{}", dropped))?;
        }
    }
    writeln!(out, "{:-<41}", "")?;
    writeln!(out, "{:<32} {:>8}", "Cleaned cases", data.cleaned.rows.len())?;

    writeln!(out)?;
    writeln!(out, "Keyword columns kept:   {}", data.cleaned.keywords.len())?;
    writeln!(out, "Keyword columns pruned: {}", counts.zero_columns)?;
    writeln!(out, "Categories:             {}", data.aggregated.categories.len())?;
    writeln!(out, "\n{:=^72}", "")?;

    Ok(out)
}

/// File modified time as a formatted string, for the summary header.
fn file_date(path: &Path) -> String {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(|t| {
            let dt: chrono::DateTime<chrono::Local> = t.into();
            dt.format("%Y-%m-%d %H:%M").to_string()
        })
        .unwrap_or_else(|| "(unknown)".to_string())
}
