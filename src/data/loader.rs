//! CSV Table Loader
//!
//! Reads the country statistics CSV, resolves the required columns by header
//! name and builds a validated [`Table`]. Columns other than the country and
//! the three metrics are ignored.

use std::io::Read;
use std::path::Path;

use super::error::{DataError, DataResult};
use super::types::{Record, Table};
use crate::config::DataConfig;

/// CSV loader with configurable column names
#[derive(Debug, Clone)]
pub struct TableLoader {
    country_column: String,
    confirmed_column: String,
    deaths_column: String,
    recovered_column: String,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolved header positions
struct ColumnIndex {
    country: usize,
    confirmed: usize,
    deaths: usize,
    recovered: usize,
}

impl TableLoader {
    /// Create a loader for the standard `country_wise_latest.csv` layout
    pub fn new() -> Self {
        Self {
            country_column: "Country/Region".to_string(),
            confirmed_column: "Confirmed".to_string(),
            deaths_column: "Deaths".to_string(),
            recovered_column: "Recovered".to_string(),
        }
    }

    /// Create a loader using the column names from configuration
    pub fn from_config(config: &DataConfig) -> Self {
        Self {
            country_column: config.country_column.clone(),
            confirmed_column: config.confirmed_column.clone(),
            deaths_column: config.deaths_column.clone(),
            recovered_column: config.recovered_column.clone(),
        }
    }

    /// Set the country column name
    pub fn with_country_column(mut self, column: &str) -> Self {
        self.country_column = column.to_string();
        self
    }

    /// Set the confirmed column name
    pub fn with_confirmed_column(mut self, column: &str) -> Self {
        self.confirmed_column = column.to_string();
        self
    }

    /// Set the deaths column name
    pub fn with_deaths_column(mut self, column: &str) -> Self {
        self.deaths_column = column.to_string();
        self
    }

    /// Set the recovered column name
    pub fn with_recovered_column(mut self, column: &str) -> Self {
        self.recovered_column = column.to_string();
        self
    }

    /// Load the table from a CSV file
    pub fn load(&self, path: &Path) -> DataResult<Table> {
        let file = std::fs::File::open(path)?;
        let table = self.read_from(file)?;

        tracing::info!(path = ?path, rows = table.len(), "Loaded table");
        Ok(table)
    }

    /// Load the table from a CSV string (useful for testing)
    pub fn load_str(&self, csv_data: &str) -> DataResult<Table> {
        self.read_from(csv_data.as_bytes())
    }

    fn read_from<R: Read>(&self, input: R) -> DataResult<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let columns = self.resolve_columns(reader.headers()?)?;
        let mut records = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let row = result?;
            // Quoted fields may span lines, so ask the reader where the row starts
            let line = row
                .position()
                .map_or(index + 2, |pos| pos.line() as usize);

            let country = row.get(columns.country).unwrap_or_default();
            if country.is_empty() {
                return Err(DataError::EmptyCountry(line));
            }

            records.push(Record::new(
                country,
                parse_value(&row, columns.confirmed, &self.confirmed_column, line)?,
                parse_value(&row, columns.deaths, &self.deaths_column, line)?,
                parse_value(&row, columns.recovered, &self.recovered_column, line)?,
            ));
        }

        Table::new(records)
    }

    fn resolve_columns(&self, headers: &csv::StringRecord) -> DataResult<ColumnIndex> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };

        Ok(ColumnIndex {
            country: find(&self.country_column)?,
            confirmed: find(&self.confirmed_column)?,
            deaths: find(&self.deaths_column)?,
            recovered: find(&self.recovered_column)?,
        })
    }
}

fn parse_value(row: &csv::StringRecord, index: usize, column: &str, line: usize) -> DataResult<f64> {
    let raw = row.get(index).unwrap_or_default();
    raw.parse::<f64>().map_err(|_| DataError::InvalidValue {
        line,
        column: column.to_string(),
        value: raw.to_string(),
    })
}
