//! Injury-Award Preparation Toolkit
//!
//! Prepares a legal-case dataset (general-damage awards plus per-case
//! injury-keyword counts) for downstream statistical analysis:
//! - removes appellate decisions, zero-signal rows, and outlier awards
//! - projects awards to 2018 dollars through chained CPI multipliers
//! - collapses fine-grained injury keywords into body-region categories
//!
//! This library provides:
//! - `load`: readers for the two flat source files
//! - `clean`: appeal detection, row/column filters, inflation adjustment
//! - `aggregate`: keyword-to-category aggregation
//! - `prepare`: pipeline orchestration, CSV output, and the run summary
//! - `config`: the fixed appeal tokens, CPI table, and category map

pub mod aggregate;
pub mod clean;
pub mod config;
pub mod error;
pub mod load;
pub mod prepare;

// Re-export commonly used types
pub use aggregate::{aggregate_categories, AggregatedRecord, AggregatedTable};
pub use clean::{adjust_inflation, filter_cases, find_appeal_cases, trial_years, FilterCounts};
pub use error::{PrepError, PrepResult};
pub use load::{CaseMetadata, CaseRecord, KeywordTable};
pub use prepare::{
    format_summary, prepare_dataset, write_aggregated_csv, write_cleaned_csv, PrepareConfig,
    PreparedData,
};
