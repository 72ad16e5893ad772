//! Dashboard Context
//!
//! The shared, read-only table plus the dashboard defaults, built once at
//! startup and passed explicitly to everything that derives views.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::engine::{
    derive_bar_series, derive_choropleth_series, derive_scatter_series, derive_summary, BarSeries,
    ChoroplethSeries, ScatterSeries, Summary,
};
use super::error::ViewResult;
use super::selection::Selection;
use crate::data::Table;

/// All four views for one selection snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViews {
    pub bar: BarSeries,
    pub scatter: ScatterSeries,
    pub choropleth: ChoroplethSeries,
    /// `Err(EmptySelection)` when no selected country is in the table
    pub summary: ViewResult<Summary>,
}

/// Shared dashboard state
#[derive(Debug, Clone)]
pub struct DashboardContext {
    table: Arc<Table>,
    defaults: Selection,
    loaded_at: DateTime<Utc>,
}

impl DashboardContext {
    /// Create a context around a loaded table
    pub fn new(table: Table, defaults: Selection) -> Self {
        Self {
            table: Arc::new(table),
            defaults,
            loaded_at: Utc::now(),
        }
    }

    /// The shared table
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The selection a fresh dashboard starts with
    pub fn defaults(&self) -> &Selection {
        &self.defaults
    }

    /// When the table was loaded
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Derive every view for one selection
    ///
    /// All four views read the same table and the same selection value.
    pub fn derive_all(&self, selection: &Selection) -> DashboardViews {
        let table = self.table.as_ref();

        DashboardViews {
            bar: derive_bar_series(table, &selection.countries, selection.metric),
            scatter: derive_scatter_series(table, &selection.countries),
            choropleth: derive_choropleth_series(table, selection.metric),
            summary: derive_summary(table, &selection.countries, selection.metric),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Metric, Record};
    use crate::views::ViewError;

    fn context() -> DashboardContext {
        let table = Table::new(vec![
            Record::new("US", 100.0, 10.0, 50.0),
            Record::new("India", 200.0, 20.0, 80.0),
            Record::new("Brazil", 50.0, 5.0, 10.0),
        ])
        .unwrap();
        DashboardContext::new(table, Selection::new(["US", "India", "Brazil"], Metric::Confirmed))
    }

    #[test]
    fn test_derive_all_default_selection() {
        let ctx = context();
        let views = ctx.derive_all(ctx.defaults());

        assert_eq!(views.bar.points.len(), 3);
        assert_eq!(views.scatter.points.len(), 3);
        assert_eq!(views.choropleth.points.len(), 3);

        let summary = views.summary.unwrap();
        assert_eq!(summary.total, 350.0);
        assert_eq!(summary.top_country, "India");
    }

    #[test]
    fn test_derive_all_empty_selection() {
        let ctx = context();
        let selection = Selection::new(Vec::<String>::new(), Metric::Deaths);
        let views = ctx.derive_all(&selection);

        assert!(views.bar.points.is_empty());
        assert!(views.scatter.points.is_empty());
        assert_eq!(views.choropleth.points.len(), 3);
        assert_eq!(views.summary, Err(ViewError::EmptySelection));
    }

    #[test]
    fn test_choropleth_independent_of_selection() {
        let ctx = context();
        let a = ctx.derive_all(&Selection::new(["US"], Metric::Recovered));
        let b = ctx.derive_all(&Selection::new(["Brazil", "Atlantis"], Metric::Recovered));

        assert_eq!(a.choropleth, b.choropleth);
    }

    #[test]
    fn test_error_does_not_affect_next_derivation() {
        let ctx = context();
        let empty = ctx.derive_all(&Selection::new(Vec::<String>::new(), Metric::Deaths));
        assert!(empty.summary.is_err());

        let views = ctx.derive_all(&Selection::new(["US", "Brazil"], Metric::Deaths));
        assert_eq!(views.summary.unwrap().total, 15.0);
        assert_eq!(ctx.table().len(), 3);
    }
}
