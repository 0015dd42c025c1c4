use thiserror::Error;

/// Errors that can occur while preparing data for or running Welch's ANOVA
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    // Structural errors
    #[error("Insufficient groups: found {found} distinct group(s), need at least 2")]
    InsufficientGroups { found: usize },

    #[error("Invalid column: '{name}' not found (available: {})", .available.join(", "))]
    InvalidColumn { name: String, available: Vec<String> },

    #[error("Column '{column}' has {found} rows, expected {expected}")]
    DimensionMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    // Data errors
    #[error("Non-numeric dependent variable: column '{column}', row {row}: '{value}'")]
    NonNumericData {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;
