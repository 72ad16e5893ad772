//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ErrorBody;
use crate::data::Metric;
use crate::views::{
    BarSeries, ChoroplethSeries, DashboardViews, ScatterSeries, Selection, Summary,
};

// ============================================
// CATALOG DTOs
// ============================================

/// Country options for the selector, in table order
#[derive(Debug, Serialize, Deserialize)]
pub struct CountriesResponse {
    pub countries: Vec<String>,
    pub count: usize,
}

/// One metric option
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricInfo {
    /// Key accepted by the API (e.g. "Confirmed")
    pub key: String,
    /// Selector label (e.g. "Confirmed Cases")
    pub label: String,
    /// Name used in summary sentences (e.g. "confirmed")
    pub display_name: String,
}

impl From<Metric> for MetricInfo {
    fn from(metric: Metric) -> Self {
        Self {
            key: metric.key().to_string(),
            label: metric.label().to_string(),
            display_name: metric.display_name().to_string(),
        }
    }
}

/// Metric options for the selector
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub metrics: Vec<MetricInfo>,
    pub default: String,
}

// ============================================
// VIEW DTOs
// ============================================

/// Query string for the choropleth endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ChoroplethQuery {
    /// Metric key; defaults to the dashboard default metric
    #[serde(default)]
    pub metric: Option<String>,
}

/// All four views for one selection
///
/// When the summary cannot be computed, `summary` is omitted and
/// `summary_error` says why; the three chart series are still present.
#[derive(Debug, Clone, Serialize)]
pub struct ViewsResponse {
    pub selection: Selection,
    pub bar: BarSeries,
    pub scatter: ScatterSeries,
    pub choropleth: ChoroplethSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_error: Option<ErrorBody>,
}

impl ViewsResponse {
    /// Package derived views together with the selection they came from
    pub fn new(selection: Selection, views: DashboardViews) -> Self {
        let (summary, summary_error) = match views.summary {
            Ok(summary) => (Some(summary), None),
            Err(e) => (None, Some(ErrorBody::from_view_error(&e))),
        };

        Self {
            selection,
            bar: views.bar,
            scatter: views.scatter,
            choropleth: views.choropleth,
            summary,
            summary_error,
        }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "unhealthy"
    pub status: String,
    /// Number of countries in the loaded table
    pub rows: usize,
    /// When the table was loaded
    pub loaded_at: DateTime<Utc>,
    /// Open dashboard sessions
    pub ws_connections: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Server version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Record, Table};
    use crate::views::DashboardContext;

    fn context() -> DashboardContext {
        let table = Table::new(vec![
            Record::new("US", 100.0, 10.0, 50.0),
            Record::new("India", 200.0, 20.0, 80.0),
        ])
        .unwrap();
        DashboardContext::new(table, Selection::new(["US"], Metric::Confirmed))
    }

    #[test]
    fn test_views_response_with_summary() {
        let ctx = context();
        let selection = Selection::new(["US", "India"], Metric::Deaths);
        let response = ViewsResponse::new(selection.clone(), ctx.derive_all(&selection));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["selection"]["metric"], "Deaths");
        assert_eq!(json["bar"]["points"].as_array().unwrap().len(), 2);
        assert_eq!(json["summary"]["top_country"], "India");
        assert!(json.get("summary_error").is_none());
    }

    #[test]
    fn test_views_response_empty_selection() {
        let ctx = context();
        let selection = Selection::new(Vec::<String>::new(), Metric::Deaths);
        let response = ViewsResponse::new(selection.clone(), ctx.derive_all(&selection));

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("summary").is_none());
        assert_eq!(json["summary_error"]["code"], "EMPTY_SELECTION");
        assert_eq!(json["choropleth"]["points"].as_array().unwrap().len(), 2);
        assert!(json["bar"]["points"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_metric_info() {
        let info = MetricInfo::from(Metric::Confirmed);
        assert_eq!(info.key, "Confirmed");
        assert_eq!(info.label, "Confirmed Cases");
        assert_eq!(info.display_name, "confirmed");
    }
}
