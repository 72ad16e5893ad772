//! View derivation error types

use thiserror::Error;

use crate::data::InvalidMetric;

/// Errors that can occur while deriving views
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// No selected country is present in the table, so the summary
    /// aggregates (sum, mean, argmax) are undefined
    #[error("Empty selection: select at least one country present in the table")]
    EmptySelection,

    /// Metric key outside Confirmed, Deaths, Recovered
    #[error(transparent)]
    InvalidMetric(#[from] InvalidMetric),
}

/// Result type alias for view derivations
pub type ViewResult<T> = Result<T, ViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ViewError::from(InvalidMetric("Active".to_string()));
        assert_eq!(
            err.to_string(),
            "Invalid metric: Active. Use Confirmed, Deaths, or Recovered"
        );
        assert!(ViewError::EmptySelection.to_string().starts_with("Empty selection"));
    }
}
