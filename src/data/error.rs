//! Data layer error types
//!
//! Defines all errors that can occur while loading and validating the table.

use thiserror::Error;

/// Errors that can occur while building the table
#[derive(Error, Debug)]
pub enum DataError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader rejected the input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is not present in the header row
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A cell could not be read as a metric value
    #[error("Line {line}: invalid value {value:?} in column {column}")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },

    /// A metric value is negative or not finite
    #[error("Country {country}: {metric} must be a non-negative number, got {value}")]
    OutOfRange {
        country: String,
        metric: String,
        value: f64,
    },

    /// A record has an empty country key
    #[error("Line {0}: country is empty")]
    EmptyCountry(usize),

    /// Two records share the same country key
    #[error("Duplicate country: {0}")]
    DuplicateCountry(String),

    /// The table has no rows
    #[error("Table is empty")]
    EmptyTable,
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;
