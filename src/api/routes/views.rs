//! View Routes
//!
//! Derived dashboard views for a selection.
//!
//! - POST /api/v1/views - All four views
//! - POST /api/v1/views/bar - Bar chart series
//! - POST /api/v1/views/scatter - Scatter plot series
//! - POST /api/v1/views/summary - Summary aggregates and sentence
//! - GET /api/v1/views/choropleth - Choropleth series (selection-independent)
//!
//! POST bodies are a [`SelectionRequest`]: absent fields fall back to the
//! dashboard defaults. Bodies or query strings that do not decode are
//! answered with 400 `VALIDATION_ERROR`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ChoroplethQuery, ViewsResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::data::Metric;
use crate::views::{
    derive_bar_series, derive_choropleth_series, derive_scatter_series, derive_summary, BarSeries,
    ChoroplethSeries, ScatterSeries, Selection, SelectionRequest, Summary, ViewError,
};

/// POST /api/v1/views
pub async fn all_views(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SelectionRequest>, JsonRejection>,
) -> ApiResult<Json<ViewsResponse>> {
    let selection = resolve(&state, body)?;
    let views = state.dashboard.derive_all(&selection);

    tracing::debug!(
        countries = selection.countries.len(),
        metric = %selection.metric,
        bars = views.bar.points.len(),
        "Derived dashboard views"
    );

    Ok(Json(ViewsResponse::new(selection, views)))
}

/// POST /api/v1/views/bar
pub async fn bar_view(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SelectionRequest>, JsonRejection>,
) -> ApiResult<Json<BarSeries>> {
    let selection = resolve(&state, body)?;
    Ok(Json(derive_bar_series(
        state.dashboard.table(),
        &selection.countries,
        selection.metric,
    )))
}

/// POST /api/v1/views/scatter
pub async fn scatter_view(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SelectionRequest>, JsonRejection>,
) -> ApiResult<Json<ScatterSeries>> {
    let selection = resolve(&state, body)?;
    Ok(Json(derive_scatter_series(
        state.dashboard.table(),
        &selection.countries,
    )))
}

/// POST /api/v1/views/summary
///
/// Responds 422 when no selected country is in the table.
pub async fn summary_view(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SelectionRequest>, JsonRejection>,
) -> ApiResult<Json<Summary>> {
    let selection = resolve(&state, body)?;
    let summary = derive_summary(
        state.dashboard.table(),
        &selection.countries,
        selection.metric,
    )?;
    Ok(Json(summary))
}

/// GET /api/v1/views/choropleth?metric=Deaths
pub async fn choropleth_view(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ChoroplethQuery>, QueryRejection>,
) -> ApiResult<Json<ChoroplethSeries>> {
    let Query(query) = query?;
    let metric = match query.metric {
        Some(key) => key.parse::<Metric>().map_err(ViewError::from)?,
        None => state.dashboard.defaults().metric,
    };
    Ok(Json(derive_choropleth_series(state.dashboard.table(), metric)))
}

fn resolve(
    state: &AppState,
    body: Result<Json<SelectionRequest>, JsonRejection>,
) -> ApiResult<Selection> {
    let Json(req) = body?;
    Ok(req.resolve(state.dashboard.defaults())?)
}
