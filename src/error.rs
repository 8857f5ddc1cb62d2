//! Typed errors for the preparation pipeline.
//!
//! Malformed inputs fail at the point of lookup with a variant naming the
//! offending case or column, instead of a generic parse failure.

use thiserror::Error;

/// Errors raised while loading or transforming the case tables.
#[derive(Debug, Error)]
pub enum PrepError {
    /// Failed to read an input file.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV content.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required header is absent from an input file.
    #[error("Required column '{name}' not found")]
    MissingColumn { name: String },

    /// Empty case-name field; appeal detection cannot run without it.
    #[error("Case {case} has an empty case-name field")]
    MissingCaseName { case: u64 },

    /// The trial-year field contains no digit substring.
    #[error("Case {case}: no year found in trial-year field '{value}'")]
    InvalidYear { case: u64, value: String },

    /// The trial year falls outside the inflation table.
    #[error("Case {case}: trial year {year} is outside the inflation table range")]
    YearOutOfRange { case: u64, year: i32 },

    /// A numeric field failed to parse.
    #[error("Row {row}, column '{column}': expected a number, found '{value}'")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

/// Result type for preparation operations.
pub type PrepResult<T> = Result<T, PrepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = PrepError::MissingColumn {
            name: "general damage".into(),
        };
        assert!(err.to_string().contains("general damage"));

        let err = PrepError::InvalidYear {
            case: 12,
            value: "n/a".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("n/a"));

        let err = PrepError::YearOutOfRange { case: 3, year: 1999 };
        assert!(err.to_string().contains("1999"));
    }
}
