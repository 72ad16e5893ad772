//! Catalog Routes
//!
//! Options for the dashboard selectors.
//!
//! - GET /api/v1/countries - Country options in table order
//! - GET /api/v1/metrics - Metric options
//! - GET /api/v1/selection/default - Initial selection

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{CountriesResponse, MetricInfo, MetricsResponse};
use crate::api::state::AppState;
use crate::data::Metric;
use crate::views::Selection;

/// GET /api/v1/countries
pub async fn list_countries(State(state): State<Arc<AppState>>) -> Json<CountriesResponse> {
    let countries: Vec<String> = state
        .dashboard
        .table()
        .countries()
        .map(str::to_string)
        .collect();

    Json(CountriesResponse {
        count: countries.len(),
        countries,
    })
}

/// GET /api/v1/metrics
pub async fn list_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        metrics: Metric::all().iter().copied().map(MetricInfo::from).collect(),
        default: state.dashboard.defaults().metric.key().to_string(),
    })
}

/// GET /api/v1/selection/default
pub async fn default_selection(State(state): State<Arc<AppState>>) -> Json<Selection> {
    Json(state.dashboard.defaults().clone())
}
