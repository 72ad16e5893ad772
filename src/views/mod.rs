//! Epiboard View Derivation
//!
//! Turns the shared table and the current selection into the four linked
//! dashboard views:
//!
//! - **engine**: pure derivations (bar, scatter, choropleth, summary)
//! - **context**: the shared table and defaults, deriving all views at once
//! - **selection**: typed selection and client selection requests
//! - **format**: number formatting for summary sentences
//! - **error**: Error types
//!
//! # Flow
//!
//! ```text
//! SelectionRequest → resolve(defaults) → Selection
//!                                          │
//!            Arc<Table> ──────────────→ derive_all → DashboardViews
//!                                          ├─ bar        (selected countries)
//!                                          ├─ scatter    (selected countries)
//!                                          ├─ choropleth (whole table)
//!                                          └─ summary    (or EmptySelection)
//! ```
//!
//! # Example
//!
//! ```rust
//! use epiboard::data::{Metric, Record, Table};
//! use epiboard::views::{DashboardContext, Selection};
//!
//! let table = Table::new(vec![
//!     Record::new("US", 100.0, 10.0, 50.0),
//!     Record::new("India", 200.0, 20.0, 80.0),
//! ])?;
//! let ctx = DashboardContext::new(table, Selection::new(["US", "India"], Metric::Confirmed));
//!
//! let views = ctx.derive_all(ctx.defaults());
//! assert_eq!(views.summary?.top_country, "India");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod format;
pub mod selection;

pub use context::{DashboardContext, DashboardViews};
pub use engine::{
    derive_bar_series, derive_choropleth_series, derive_scatter_series, derive_summary,
    filter_by_countries, BarPoint, BarSeries, ChoroplethPoint, ChoroplethSeries, ScatterPoint,
    ScatterSeries, Summary,
};
pub use error::{ViewError, ViewResult};
pub use format::format_grouped;
pub use selection::{Selection, SelectionRequest};
