//! Core data types for the dashboard table
//!
//! - `Record`: one country's statistics row
//! - `Metric`: which numeric column a view reads
//! - `Table`: the immutable, validated sequence of records

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

use super::error::{DataError, DataResult};

/// One country's pandemic statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Country name, used both as identity and display label
    pub country: String,
    /// Confirmed cases
    pub confirmed: f64,
    /// Deaths
    pub deaths: f64,
    /// Recovered cases
    pub recovered: f64,
}

impl Record {
    /// Create a new record
    pub fn new(country: impl Into<String>, confirmed: f64, deaths: f64, recovered: f64) -> Self {
        Self {
            country: country.into(),
            confirmed,
            deaths,
            recovered,
        }
    }

    /// Read the value of the given metric
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Confirmed => self.confirmed,
            Metric::Deaths => self.deaths,
            Metric::Recovered => self.recovered,
        }
    }
}

/// Metric a view is computed over
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Metric {
    Confirmed,
    Deaths,
    Recovered,
}

impl Metric {
    /// Get all metrics in display order
    pub fn all() -> &'static [Metric] {
        &[Metric::Confirmed, Metric::Deaths, Metric::Recovered]
    }

    /// Key as it appears in the source table header and the API
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Confirmed => "Confirmed",
            Metric::Deaths => "Deaths",
            Metric::Recovered => "Recovered",
        }
    }

    /// Label shown next to the metric selector
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Confirmed => "Confirmed Cases",
            Metric::Deaths => "Deaths",
            Metric::Recovered => "Recovered",
        }
    }

    /// Lower-cased name used inside summary sentences
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::Confirmed => "confirmed",
            Metric::Deaths => "deaths",
            Metric::Recovered => "recovered",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A metric key outside the supported set
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid metric: {0}. Use Confirmed, Deaths, or Recovered")]
pub struct InvalidMetric(pub String);

impl FromStr for Metric {
    type Err = InvalidMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(Metric::Confirmed),
            "deaths" => Ok(Metric::Deaths),
            "recovered" => Ok(Metric::Recovered),
            _ => Err(InvalidMetric(s.to_string())),
        }
    }
}

impl TryFrom<String> for Metric {
    type Error = InvalidMetric;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Metric> for String {
    fn from(metric: Metric) -> Self {
        metric.key().to_string()
    }
}

/// The full dataset, immutable once built
///
/// Invariants: at least one record, unique country keys, every metric value
/// finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Build a table, validating its invariants
    pub fn new(records: Vec<Record>) -> DataResult<Self> {
        if records.is_empty() {
            return Err(DataError::EmptyTable);
        }

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.country.as_str()) {
                return Err(DataError::DuplicateCountry(record.country.clone()));
            }

            for &metric in Metric::all() {
                let value = record.value(metric);
                if !value.is_finite() || value < 0.0 {
                    return Err(DataError::OutOfRange {
                        country: record.country.clone(),
                        metric: metric.key().to_string(),
                        value,
                    });
                }
            }
        }

        Ok(Self { records })
    }

    /// All records in table order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a validated table
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Country keys in table order
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.country.as_str())
    }

    /// Look up a record by country
    pub fn get(&self, country: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.country == country)
    }
}
