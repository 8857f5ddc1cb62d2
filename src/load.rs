//! Loading for the two flat source files.
//!
//! Input file A is the case-metadata export (`Case name`, `Trial year`);
//! its row position is the case number. Input file B is the keyword-count
//! table keyed by `CaseNum`, with one column per injury keyword and a
//! `general damage` award column.

use crate::error::{PrepError, PrepResult};
use csv::ReaderBuilder;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Header of the case-number column in the keyword-count table.
pub const CASE_NUM_COLUMN: &str = "CaseNum";

/// Header of the award column in the keyword-count table.
pub const GENERAL_DAMAGE_COLUMN: &str = "general damage";

/// One row of the case-metadata export.
///
/// The export carries no explicit case number; the row position is the
/// case number, matching `CaseNum` in the keyword-count table.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseMetadata {
    /// Full styled case name, e.g. "Smith v. Jones, 2010 BCSC 1234".
    #[serde(rename = "Case name")]
    pub case_name: String,
    /// Free-text date field; the leading integer is the trial year.
    #[serde(rename = "Trial year")]
    pub trial_year: String,
}

/// One case of the keyword-count table.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    pub case_num: u64,
    /// Keyword occurrence counts, parallel to [`KeywordTable::keywords`].
    pub counts: Vec<u32>,
    /// General-damage award in nominal dollars.
    pub general_damage: f64,
    /// Trial year, populated by the inflation stage.
    pub trial_year: Option<i32>,
    /// Award projected to 2018 dollars, populated by the inflation stage.
    pub true_award: Option<f64>,
}

/// In-memory keyword-count table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTable {
    /// Keyword column names, in file order.
    pub keywords: Vec<String>,
    pub rows: Vec<CaseRecord>,
}

/// Load the case-metadata table.
pub fn load_case_metadata(path: &Path) -> PrepResult<Vec<CaseMetadata>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    for required in ["Case name", "Trial year"] {
        if !headers.iter().any(|h| h == required) {
            return Err(PrepError::MissingColumn {
                name: required.to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: CaseMetadata = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Load the keyword-count table.
///
/// Layout: `CaseNum`, keyword columns, `general damage`. The award column
/// is located by name rather than by trailing position, so the keyword
/// span is the same whether or not derived columns were appended later.
pub fn load_keyword_counts(path: &Path) -> PrepResult<KeywordTable> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let case_idx = headers
        .iter()
        .position(|h| h == CASE_NUM_COLUMN)
        .ok_or_else(|| PrepError::MissingColumn {
            name: CASE_NUM_COLUMN.to_string(),
        })?;
    let damage_idx = headers
        .iter()
        .position(|h| h == GENERAL_DAMAGE_COLUMN)
        .ok_or_else(|| PrepError::MissingColumn {
            name: GENERAL_DAMAGE_COLUMN.to_string(),
        })?;

    let keyword_idx: Vec<usize> = (0..headers.len())
        .filter(|&i| i != case_idx && i != damage_idx)
        .collect();
    let keywords: Vec<String> = keyword_idx.iter().map(|&i| headers[i].to_string()).collect();

    let mut rows = Vec::new();
    for (row_num, result) in reader.records().enumerate() {
        let record = result?;
        let line = row_num + 1;

        let case_num: u64 = parse_field(&record, case_idx, CASE_NUM_COLUMN, line)?;
        let general_damage: f64 = parse_field(&record, damage_idx, GENERAL_DAMAGE_COLUMN, line)?;
        let mut counts = Vec::with_capacity(keyword_idx.len());
        for (&i, name) in keyword_idx.iter().zip(&keywords) {
            counts.push(parse_field(&record, i, name, line)?);
        }

        rows.push(CaseRecord {
            case_num,
            counts,
            general_damage,
            trial_year: None,
            true_award: None,
        });
    }

    log::debug!("Loaded {} cases, {} keyword columns", rows.len(), keywords.len());
    Ok(KeywordTable { keywords, rows })
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    row: usize,
) -> PrepResult<T> {
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse().map_err(|_| PrepError::InvalidNumber {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

lazy_static! {
    static ref YEAR_RE: Regex = Regex::new(r"\d+").unwrap();
}

/// Extract the leading integer year from a free-text trial-year field.
pub fn extract_trial_year(case: u64, raw: &str) -> PrepResult<i32> {
    let found = YEAR_RE.find(raw).ok_or_else(|| PrepError::InvalidYear {
        case,
        value: raw.to_string(),
    })?;
    found.as_str().parse().map_err(|_| PrepError::InvalidYear {
        case,
        value: raw.to_string(),
    })
}
