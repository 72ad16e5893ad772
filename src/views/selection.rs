//! Selection State
//!
//! The pair of chosen countries and chosen metric that every view is derived
//! from. Requests arrive with untyped metric keys and optional fields; they
//! are resolved against the dashboard defaults into a typed [`Selection`]
//! before any derivation runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::error::ViewResult;
use crate::data::Metric;

/// Current dashboard selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Selected country keys; may be empty and may name countries absent from the table
    pub countries: BTreeSet<String>,
    /// Selected metric
    pub metric: Metric,
}

impl Selection {
    /// Create a selection from any collection of country keys
    pub fn new<I, S>(countries: I, metric: Metric) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
            metric,
        }
    }

    /// Replace the countries, keeping the metric
    pub fn with_countries<I, S>(&self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(countries, self.metric)
    }

    /// Replace the metric, keeping the countries
    pub fn with_metric(&self, metric: Metric) -> Self {
        Self {
            countries: self.countries.clone(),
            metric,
        }
    }
}

/// Selection as sent by a client
///
/// Absent fields fall back to the dashboard defaults. An explicitly empty
/// country list stays empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SelectionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

impl SelectionRequest {
    /// Resolve into a typed selection, failing on an unknown metric key
    pub fn resolve(&self, defaults: &Selection) -> ViewResult<Selection> {
        let metric = match &self.metric {
            Some(key) => key.parse::<Metric>()?,
            None => defaults.metric,
        };

        let countries = match &self.countries {
            Some(countries) => countries.iter().cloned().collect(),
            None => defaults.countries.clone(),
        };

        Ok(Selection { countries, metric })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::ViewError;

    fn defaults() -> Selection {
        Selection::new(["US", "India", "Brazil"], Metric::Confirmed)
    }

    #[test]
    fn test_resolve_uses_defaults() {
        let selection = SelectionRequest::default().resolve(&defaults()).unwrap();
        assert_eq!(selection, defaults());
    }

    #[test]
    fn test_resolve_explicit_empty_countries() {
        let request = SelectionRequest {
            countries: Some(Vec::new()),
            metric: Some("deaths".to_string()),
        };
        let selection = request.resolve(&defaults()).unwrap();

        assert!(selection.countries.is_empty());
        assert_eq!(selection.metric, Metric::Deaths);
    }

    #[test]
    fn test_resolve_invalid_metric() {
        let request = SelectionRequest {
            countries: None,
            metric: Some("Active".to_string()),
        };
        assert!(matches!(
            request.resolve(&defaults()),
            Err(ViewError::InvalidMetric(_))
        ));
    }

    #[test]
    fn test_duplicate_countries_collapse() {
        let selection = Selection::new(["US", "US", "India"], Metric::Deaths);
        assert_eq!(selection.countries.len(), 2);
    }

    #[test]
    fn test_with_metric_and_countries() {
        let selection = defaults().with_metric(Metric::Recovered);
        assert_eq!(selection.metric, Metric::Recovered);
        assert_eq!(selection.countries.len(), 3);

        let selection = selection.with_countries(["Chile"]);
        assert_eq!(selection.metric, Metric::Recovered);
        assert_eq!(selection.countries, BTreeSet::from(["Chile".to_string()]));
    }

    #[test]
    fn test_request_deserialize() {
        let request: SelectionRequest =
            serde_json::from_str(r#"{"countries": ["US", "Korea, South"]}"#).unwrap();
        assert_eq!(request.countries.as_ref().map(Vec::len), Some(2));
        assert!(request.metric.is_none());
    }
}
