//! Epiboard Data Layer
//!
//! - **types**: `Record`, `Metric` and the immutable `Table`
//! - **loader**: CSV loading with header-based column resolution
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use epiboard::data::{Metric, TableLoader};
//! use std::path::Path;
//!
//! let table = TableLoader::new().load(Path::new("data/country_wise_latest.csv"))?;
//! let total: f64 = table.records().iter().map(|r| r.value(Metric::Deaths)).sum();
//! println!("{} countries, {} deaths", table.len(), total);
//! # Ok::<(), epiboard::data::DataError>(())
//! ```

pub mod error;
pub mod loader;
pub mod types;

pub use error::{DataError, DataResult};
pub use loader::TableLoader;
pub use types::{InvalidMetric, Metric, Record, Table};
