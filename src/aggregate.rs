//! Keyword-to-category aggregation.

use crate::config::CATEGORY_GROUPS;
use crate::load::KeywordTable;

/// One case of the aggregated table.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRecord {
    pub case_num: u64,
    /// Per-category sums, parallel to [`AggregatedTable::categories`].
    pub sums: Vec<u32>,
    pub general_damage: f64,
    pub trial_year: Option<i32>,
    pub true_award: Option<f64>,
}

/// Per-case category sums with pass-through award and year columns.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedTable {
    /// Category names, in configuration order.
    pub categories: Vec<String>,
    pub rows: Vec<AggregatedRecord>,
}

/// Collapse keyword counts into per-category sums.
///
/// For each case and each configured category, the sum runs over the
/// category's constituent keyword columns; keywords pruned from the table
/// contribute 0. Award and year columns pass through unchanged. The
/// function is pure: the same input always yields the same output.
pub fn aggregate_categories(table: &KeywordTable) -> AggregatedTable {
    // Resolve each category's surviving constituent columns once.
    let group_columns: Vec<Vec<usize>> = CATEGORY_GROUPS
        .iter()
        .map(|(_, keywords)| {
            keywords
                .iter()
                .filter_map(|k| table.keywords.iter().position(|col| col == k))
                .collect()
        })
        .collect();

    let categories: Vec<String> = CATEGORY_GROUPS
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();

    let rows = table
        .rows
        .iter()
        .map(|row| AggregatedRecord {
            case_num: row.case_num,
            sums: group_columns
                .iter()
                .map(|cols| cols.iter().map(|&j| row.counts[j]).sum())
                .collect(),
            general_damage: row.general_damage,
            trial_year: row.trial_year,
            true_award: row.true_award,
        })
        .collect();

    AggregatedTable { categories, rows }
}

impl AggregatedTable {
    /// Sum for a named category, if present.
    pub fn sum_for(&self, case_num: u64, category: &str) -> Option<u32> {
        let col = self.categories.iter().position(|c| c == category)?;
        self.rows
            .iter()
            .find(|r| r.case_num == case_num)
            .map(|r| r.sums[col])
    }
}
