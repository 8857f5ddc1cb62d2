//! Row/column filtering and inflation adjustment.
//!
//! Each stage is a pure function over the in-memory tables so the pipeline
//! can be exercised stage by stage. Filter order matters: the zero-column
//! pruning only considers rows that survive the zero-row filter, and the
//! outlier cut sees only non-appeal rows.

use crate::config::{
    cumulative_multiplier, APPEAL_TOKENS, AWARD_CEILING, TRIAL_YEAR_EXCLUDED_CASES,
};
use crate::error::{PrepError, PrepResult};
use crate::load::{extract_trial_year, CaseMetadata, CaseRecord, KeywordTable};
use std::collections::{HashMap, HashSet};

/// Rows and columns dropped by each filter stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    /// Rows whose keyword counts were all zero.
    pub zero_keyword_rows: usize,
    /// Keyword columns that were zero across all surviving rows.
    pub zero_columns: usize,
    /// Rows with a zero award.
    pub zero_award_rows: usize,
    /// Appellate decisions.
    pub appeal_rows: usize,
    /// Rows with an award at or above [`AWARD_CEILING`].
    pub extreme_rows: usize,
    /// Rows dropped in inflation mode because no trial year is available.
    pub missing_year_rows: usize,
}

impl FilterCounts {
    /// Total rows removed across all stages.
    pub fn total_rows_dropped(&self) -> usize {
        self.zero_keyword_rows
            + self.zero_award_rows
            + self.appeal_rows
            + self.extreme_rows
            + self.missing_year_rows
    }
}

/// Find appeal cases by court-abbreviation substring in the case name.
///
/// Matching is case-insensitive. An empty case name is an error: without
/// the name there is no way to tell an appeal from a trial decision.
pub fn find_appeal_cases(metadata: &[CaseMetadata]) -> PrepResult<HashSet<u64>> {
    let mut appeals = HashSet::new();
    for (i, row) in metadata.iter().enumerate() {
        let case = i as u64;
        if row.case_name.trim().is_empty() {
            return Err(PrepError::MissingCaseName { case });
        }
        let name = row.case_name.to_lowercase();
        if APPEAL_TOKENS.iter().any(|t| name.contains(&t.to_lowercase())) {
            appeals.insert(case);
        }
    }
    log::debug!("{} of {} cases are appeals", appeals.len(), metadata.len());
    Ok(appeals)
}

/// Extract trial years keyed by case number.
///
/// The cases in [`TRIAL_YEAR_EXCLUDED_CASES`] are skipped; their source
/// labeling is inconsistent and no year can be recovered for them.
pub fn trial_years(metadata: &[CaseMetadata]) -> PrepResult<HashMap<u64, i32>> {
    let mut years = HashMap::new();
    for (i, row) in metadata.iter().enumerate() {
        let case = i as u64;
        if TRIAL_YEAR_EXCLUDED_CASES.contains(&case) {
            continue;
        }
        years.insert(case, extract_trial_year(case, &row.trial_year)?);
    }
    Ok(years)
}

/// Apply the five row/column filters, in order:
///
/// 1. drop rows whose keyword counts are all zero;
/// 2. drop keyword columns that are zero across all remaining rows;
/// 3. drop rows with a zero award;
/// 4. drop appeal rows;
/// 5. drop rows with an award at or above the ceiling.
pub fn filter_cases(table: &KeywordTable, appeals: &HashSet<u64>) -> (KeywordTable, FilterCounts) {
    let mut counts = FilterCounts::default();

    let mut rows: Vec<CaseRecord> = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        if row.counts.iter().any(|&c| c != 0) {
            rows.push(row.clone());
        } else {
            counts.zero_keyword_rows += 1;
        }
    }

    let keep_col: Vec<bool> = (0..table.keywords.len())
        .map(|j| rows.iter().any(|r| r.counts[j] != 0))
        .collect();
    counts.zero_columns = keep_col.iter().filter(|keep| !**keep).count();
    let keywords: Vec<String> = table
        .keywords
        .iter()
        .zip(&keep_col)
        .filter(|(_, keep)| **keep)
        .map(|(name, _)| name.clone())
        .collect();
    if counts.zero_columns > 0 {
        for row in &mut rows {
            row.counts = row
                .counts
                .iter()
                .zip(&keep_col)
                .filter(|(_, keep)| **keep)
                .map(|(c, _)| *c)
                .collect();
        }
    }

    let before = rows.len();
    rows.retain(|r| r.general_damage != 0.0);
    counts.zero_award_rows = before - rows.len();

    let before = rows.len();
    rows.retain(|r| !appeals.contains(&r.case_num));
    counts.appeal_rows = before - rows.len();

    let before = rows.len();
    rows.retain(|r| r.general_damage < AWARD_CEILING);
    counts.extreme_rows = before - rows.len();

    log::info!(
        "Filtered {} -> {} cases ({} zero-keyword, {} zero-award, {} appeal, {} extreme); pruned {} dead keyword columns",
        table.rows.len(),
        rows.len(),
        counts.zero_keyword_rows,
        counts.zero_award_rows,
        counts.appeal_rows,
        counts.extreme_rows,
        counts.zero_columns
    );

    (KeywordTable { keywords, rows }, counts)
}

/// Project each surviving award to 2018 dollars.
///
/// An award from 2018 passes through unchanged; earlier awards are chained
/// through the yearly multipliers from their trial year forward. Cases with
/// no extractable trial year are dropped with a warning rather than being
/// realigned positionally. A year outside the inflation table is an error.
pub fn adjust_inflation(
    table: KeywordTable,
    years: &HashMap<u64, i32>,
    counts: &mut FilterCounts,
) -> PrepResult<KeywordTable> {
    let mut rows = Vec::with_capacity(table.rows.len());
    for mut row in table.rows {
        let Some(&year) = years.get(&row.case_num) else {
            log::warn!(
                "Case {}: no trial year available, dropped from inflation-adjusted output",
                row.case_num
            );
            counts.missing_year_rows += 1;
            continue;
        };
        let multiplier = cumulative_multiplier(year).ok_or(PrepError::YearOutOfRange {
            case: row.case_num,
            year,
        })?;
        row.trial_year = Some(year);
        row.true_award = Some(row.general_damage * multiplier);
        rows.push(row);
    }

    Ok(KeywordTable {
        keywords: table.keywords,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CPI_04_TO_18;

    fn meta(name: &str, year: &str) -> CaseMetadata {
        CaseMetadata {
            case_name: name.to_string(),
            trial_year: year.to_string(),
        }
    }

    fn record(case_num: u64, counts: Vec<u32>, general_damage: f64) -> CaseRecord {
        CaseRecord {
            case_num,
            counts,
            general_damage,
            trial_year: None,
            true_award: None,
        }
    }

    fn table(keywords: &[&str], rows: Vec<CaseRecord>) -> KeywordTable {
        KeywordTable {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn test_find_appeal_cases_is_case_insensitive() {
        let metadata = vec![
            meta("Smith v. Jones, 2010 BCSC 12", "2010"),
            meta("Doe v. Roe, 2012 bcca 45", "2012"),
            meta("R. v. Brown, 2014 ABCA 9", "2014"),
        ];
        let appeals = find_appeal_cases(&metadata).unwrap();
        assert_eq!(appeals, HashSet::from([1, 2]));
    }

    #[test]
    fn test_find_appeal_cases_empty_name() {
        let metadata = vec![meta("Smith v. Jones", "2010"), meta("  ", "2011")];
        let err = find_appeal_cases(&metadata).unwrap_err();
        assert!(matches!(err, PrepError::MissingCaseName { case: 1 }));
    }

    #[test]
    fn test_trial_years_skips_excluded_cases() {
        let mut metadata: Vec<CaseMetadata> = (0..420)
            .map(|i| meta(&format!("Case {}", i), "2012 BCSC 1"))
            .collect();
        // Inconsistent labels in the raw export; a year would be wrong anyway.
        metadata[416].trial_year = "see paragraph".to_string();
        metadata[417].trial_year = "see paragraph".to_string();

        let years = trial_years(&metadata).unwrap();
        assert_eq!(years.len(), 418);
        assert!(!years.contains_key(&416));
        assert!(!years.contains_key(&417));
        assert_eq!(years[&0], 2012);
    }

    #[test]
    fn test_trial_years_malformed_field_errors() {
        let metadata = vec![meta("A v. B", "2010"), meta("C v. D", "unknown")];
        let err = trial_years(&metadata).unwrap_err();
        assert!(matches!(err, PrepError::InvalidYear { case: 1, .. }));
    }

    #[test]
    fn test_filter_drops_zero_keyword_rows_first() {
        // Case 1 is both all-zero and an appeal; it must count only against
        // the zero-row stage.
        let t = table(
            &["brain", "neck"],
            vec![
                record(0, vec![1, 0], 50_000.0),
                record(1, vec![0, 0], 20_000.0),
            ],
        );
        let appeals = HashSet::from([1]);
        let (filtered, counts) = filter_cases(&t, &appeals);
        assert_eq!(filtered.rows.len(), 1);
        assert_eq!(counts.zero_keyword_rows, 1);
        assert_eq!(counts.appeal_rows, 0);
    }

    #[test]
    fn test_filter_prunes_all_zero_columns() {
        let t = table(
            &["brain", "neck"],
            vec![
                record(0, vec![1, 0], 50_000.0),
                record(1, vec![2, 0], 20_000.0),
            ],
        );
        let (filtered, counts) = filter_cases(&t, &HashSet::new());
        assert_eq!(filtered.keywords, vec!["brain"]);
        assert_eq!(counts.zero_columns, 1);
        assert_eq!(filtered.rows[0].counts, vec![1]);
    }

    #[test]
    fn test_column_pruning_runs_before_award_filter() {
        // "neck" is nonzero only in a zero-award row. Pruning sees that row
        // (stage 2 runs before stage 3), so the column survives even though
        // it ends up all-zero in the final output.
        let t = table(
            &["brain", "neck"],
            vec![
                record(0, vec![1, 0], 50_000.0),
                record(1, vec![0, 3], 0.0),
            ],
        );
        let (filtered, _) = filter_cases(&t, &HashSet::new());
        assert_eq!(filtered.keywords, vec!["brain", "neck"]);
        assert_eq!(filtered.rows.len(), 1);
        assert_eq!(filtered.rows[0].counts, vec![1, 0]);
    }

    #[test]
    fn test_filter_removes_zero_and_extreme_awards() {
        let t = table(
            &["brain"],
            vec![
                record(0, vec![1], 50_000.0),
                record(1, vec![2], 0.0),
                record(2, vec![1], 400_000.0),
                record(3, vec![1], 399_999.0),
            ],
        );
        let (filtered, counts) = filter_cases(&t, &HashSet::new());
        let survivors: Vec<u64> = filtered.rows.iter().map(|r| r.case_num).collect();
        assert_eq!(survivors, vec![0, 3]);
        assert_eq!(counts.zero_award_rows, 1);
        assert_eq!(counts.extreme_rows, 1);
    }

    #[test]
    fn test_filter_removes_appeals() {
        let t = table(
            &["brain"],
            vec![record(0, vec![1], 50_000.0), record(1, vec![1], 60_000.0)],
        );
        let (filtered, counts) = filter_cases(&t, &HashSet::from([0]));
        assert_eq!(filtered.rows.len(), 1);
        assert_eq!(filtered.rows[0].case_num, 1);
        assert_eq!(counts.appeal_rows, 1);
    }

    #[test]
    fn test_adjust_inflation_identity_at_2018() {
        let t = table(&["brain"], vec![record(0, vec![1], 75_000.0)]);
        let years = HashMap::from([(0, 2018)]);
        let mut counts = FilterCounts::default();
        let adjusted = adjust_inflation(t, &years, &mut counts).unwrap();
        assert_eq!(adjusted.rows[0].true_award, Some(75_000.0));
        assert_eq!(adjusted.rows[0].trial_year, Some(2018));
    }

    #[test]
    fn test_adjust_inflation_exact_product() {
        let t = table(&["brain"], vec![record(0, vec![1], 50_000.0)]);
        let years = HashMap::from([(0, 2010)]);
        let mut counts = FilterCounts::default();
        let adjusted = adjust_inflation(t, &years, &mut counts).unwrap();
        let expected = 50_000.0 * CPI_04_TO_18[6..].iter().product::<f64>();
        assert_eq!(adjusted.rows[0].true_award, Some(expected));
    }

    #[test]
    fn test_adjust_inflation_drops_missing_years() {
        let t = table(
            &["brain"],
            vec![record(0, vec![1], 50_000.0), record(416, vec![1], 60_000.0)],
        );
        let years = HashMap::from([(0, 2015)]);
        let mut counts = FilterCounts::default();
        let adjusted = adjust_inflation(t, &years, &mut counts).unwrap();
        assert_eq!(adjusted.rows.len(), 1);
        assert_eq!(adjusted.rows[0].case_num, 0);
        assert_eq!(counts.missing_year_rows, 1);
    }

    #[test]
    fn test_adjust_inflation_rejects_out_of_range_year() {
        let t = table(&["brain"], vec![record(0, vec![1], 50_000.0)]);
        let years = HashMap::from([(0, 1999)]);
        let mut counts = FilterCounts::default();
        let err = adjust_inflation(t, &years, &mut counts).unwrap_err();
        assert!(matches!(err, PrepError::YearOutOfRange { case: 0, year: 1999 }));
    }
}
