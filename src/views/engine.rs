//! View Derivation Engine
//!
//! Pure functions from the shared table and the current selection to the
//! four dashboard views. Nothing here keeps state between calls; every
//! selection change recomputes each view from scratch.

use serde::Serialize;
use std::collections::BTreeSet;

use super::error::{ViewError, ViewResult};
use super::format::format_grouped;
use crate::data::{Metric, Record, Table};

/// One bar: a country and its value for the selected metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub country: String,
    pub value: f64,
}

/// Bar chart series, one bar per selected country in table order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub title: String,
    pub metric: Metric,
    pub points: Vec<BarPoint>,
}

/// One scatter point: position (confirmed, deaths), size (recovered),
/// colour and hover label (country)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub confirmed: f64,
    pub deaths: f64,
    pub recovered: f64,
    pub country: String,
}

/// Scatter plot series
///
/// Both axes are meant for logarithmic display. Zero values are passed
/// through unchanged; clamping them is the renderer's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub title: String,
    pub log_x: bool,
    pub log_y: bool,
    pub points: Vec<ScatterPoint>,
}

/// One region of the choropleth map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethPoint {
    pub country: String,
    pub value: f64,
}

/// Choropleth series covering every country in the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethSeries {
    pub title: String,
    pub metric: Metric,
    /// How renderers should match `country` to map regions
    pub location_mode: String,
    /// Map projection
    pub projection: String,
    pub points: Vec<ChoroplethPoint>,
}

/// Summary aggregates over the selected countries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub metric: Metric,
    pub country_count: usize,
    pub total: f64,
    /// Unrounded mean
    pub average: f64,
    pub top_country: String,
    /// Rendered sentence
    pub text: String,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Records whose country is selected, in table order
///
/// Country keys absent from the table contribute nothing.
pub fn filter_by_countries<'t>(table: &'t Table, countries: &BTreeSet<String>) -> Vec<&'t Record> {
    if countries.is_empty() {
        return Vec::new();
    }

    table
        .records()
        .iter()
        .filter(|r| countries.contains(&r.country))
        .collect()
}

/// Bar chart of the selected metric per selected country
pub fn derive_bar_series(table: &Table, countries: &BTreeSet<String>, metric: Metric) -> BarSeries {
    let points = filter_by_countries(table, countries)
        .into_iter()
        .map(|r| BarPoint {
            country: r.country.clone(),
            value: r.value(metric),
        })
        .collect();

    BarSeries {
        title: format!("{} by Country", metric.key()),
        metric,
        points,
    }
}

/// Confirmed vs deaths scatter of the selected countries
pub fn derive_scatter_series(table: &Table, countries: &BTreeSet<String>) -> ScatterSeries {
    let points = filter_by_countries(table, countries)
        .into_iter()
        .map(|r| ScatterPoint {
            confirmed: r.confirmed,
            deaths: r.deaths,
            recovered: r.recovered,
            country: r.country.clone(),
        })
        .collect();

    ScatterSeries {
        title: "Confirmed Cases vs Deaths (log scale)".to_string(),
        log_x: true,
        log_y: true,
        points,
    }
}

/// World map of the selected metric; ignores the country selection
pub fn derive_choropleth_series(table: &Table, metric: Metric) -> ChoroplethSeries {
    let points = table
        .records()
        .iter()
        .map(|r| ChoroplethPoint {
            country: r.country.clone(),
            value: r.value(metric),
        })
        .collect();

    ChoroplethSeries {
        title: format!("Global {} Distribution", metric.key()),
        metric,
        location_mode: "country names".to_string(),
        projection: "natural earth".to_string(),
        points,
    }
}

/// Total, average and top country of the selected metric
///
/// Fails with [`ViewError::EmptySelection`] when no selected country is in
/// the table. Ties for the maximum go to the first record in table order.
pub fn derive_summary(
    table: &Table,
    countries: &BTreeSet<String>,
    metric: Metric,
) -> ViewResult<Summary> {
    let subset = filter_by_countries(table, countries);

    let mut iter = subset.iter().copied();
    let first = iter.next().ok_or(ViewError::EmptySelection)?;

    let mut total = first.value(metric);
    let mut top = first;
    for record in iter {
        let value = record.value(metric);
        total += value;
        if value > top.value(metric) {
            top = record;
        }
    }

    let average = total / subset.len() as f64;
    let name = metric.display_name();
    let text = format!(
        "For the selected countries, the total {name} is {}. \
         The average {name} per country is {}. \
         {} has the highest number of {name} among the selected countries.",
        format_grouped(total),
        format_grouped(average),
        top.country,
    );

    Ok(Summary {
        metric,
        country_count: subset.len(),
        total,
        average,
        top_country: top.country.clone(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(vec![
            Record::new("US", 100.0, 10.0, 50.0),
            Record::new("India", 200.0, 20.0, 80.0),
            Record::new("Brazil", 50.0, 5.0, 10.0),
        ])
        .unwrap()
    }

    fn countries(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_filter_preserves_table_order() {
        let table = table();
        let subset = filter_by_countries(&table, &countries(&["Brazil", "US"]));
        let names: Vec<&str> = subset.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["US", "Brazil"]);
    }

    #[test]
    fn test_filter_ignores_unknown_countries() {
        let table = table();
        let selected = countries(&["India", "Atlantis"]);
        let subset = filter_by_countries(&table, &selected);

        assert_eq!(subset.len(), 1);
        assert!(subset.iter().all(|r| selected.contains(&r.country)));
    }

    #[test]
    fn test_filter_empty_selection() {
        assert!(filter_by_countries(&table(), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_bar_series_selected_countries() {
        let series = derive_bar_series(&table(), &countries(&["US", "India"]), Metric::Confirmed);

        assert_eq!(series.title, "Confirmed by Country");
        assert_eq!(
            series.points,
            vec![
                BarPoint { country: "US".to_string(), value: 100.0 },
                BarPoint { country: "India".to_string(), value: 200.0 },
            ]
        );
    }

    #[test]
    fn test_bar_series_empty_selection() {
        let series = derive_bar_series(&table(), &BTreeSet::new(), Metric::Deaths);
        assert!(series.points.is_empty());
        assert_eq!(series.metric, Metric::Deaths);
    }

    #[test]
    fn test_scatter_series() {
        let series = derive_scatter_series(&table(), &countries(&["India", "Brazil"]));

        assert!(series.log_x && series.log_y);
        assert_eq!(series.points.len(), 2);
        assert_eq!(
            series.points[0],
            ScatterPoint {
                confirmed: 200.0,
                deaths: 20.0,
                recovered: 80.0,
                country: "India".to_string(),
            }
        );
        assert_eq!(series.points[1].country, "Brazil");
    }

    #[test]
    fn test_scatter_keeps_zero_values() {
        let table = Table::new(vec![Record::new("Holy See", 12.0, 0.0, 0.0)]).unwrap();
        let series = derive_scatter_series(&table, &countries(&["Holy See"]));

        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].deaths, 0.0);
        assert_eq!(series.points[0].recovered, 0.0);
    }

    #[test]
    fn test_scatter_empty_selection() {
        assert!(derive_scatter_series(&table(), &BTreeSet::new()).points.is_empty());
    }

    #[test]
    fn test_choropleth_covers_full_table() {
        let table = table();
        let series = derive_choropleth_series(&table, Metric::Recovered);

        assert_eq!(series.points.len(), table.len());
        assert_eq!(series.title, "Global Recovered Distribution");
        assert_eq!(series.location_mode, "country names");
        assert_eq!(series.projection, "natural earth");

        let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![50.0, 80.0, 10.0]);
    }

    #[test]
    fn test_summary_scenario() {
        let summary =
            derive_summary(&table(), &countries(&["US", "India"]), Metric::Confirmed).unwrap();

        assert_eq!(summary.total, 300.0);
        assert_eq!(summary.average, 150.0);
        assert_eq!(summary.top_country, "India");
        assert_eq!(summary.country_count, 2);
        assert_eq!(
            summary.text,
            "For the selected countries, the total confirmed is 300. \
             The average confirmed per country is 150. \
             India has the highest number of confirmed among the selected countries."
        );
    }

    #[test]
    fn test_summary_empty_selection() {
        let result = derive_summary(&table(), &BTreeSet::new(), Metric::Deaths);
        assert_eq!(result, Err(ViewError::EmptySelection));
    }

    #[test]
    fn test_summary_only_unknown_countries() {
        let result = derive_summary(&table(), &countries(&["Atlantis"]), Metric::Deaths);
        assert_eq!(result, Err(ViewError::EmptySelection));
    }

    #[test]
    fn test_summary_tie_break_first_in_table_order() {
        let table = Table::new(vec![
            Record::new("US", 100.0, 10.0, 50.0),
            Record::new("India", 20.0, 20.0, 80.0),
            Record::new("Brazil", 100.0, 5.0, 10.0),
        ])
        .unwrap();
        let selected = countries(&["Brazil", "US"]);

        for _ in 0..3 {
            let summary = derive_summary(&table, &selected, Metric::Confirmed).unwrap();
            assert_eq!(summary.top_country, "US");
        }
    }

    #[test]
    fn test_summary_unrounded_average_and_grouping() {
        let table = Table::new(vec![
            Record::new("A", 1_000_000.0, 1.0, 0.0),
            Record::new("B", 2_000_001.0, 2.0, 0.0),
        ])
        .unwrap();
        let summary = derive_summary(&table, &countries(&["A", "B"]), Metric::Confirmed).unwrap();

        assert_eq!(summary.average, 1_500_000.5);
        assert!(summary.text.contains("the total confirmed is 3,000,001."));
        assert!(summary.text.contains("per country is 1,500,000."));
        assert_eq!(summary.to_string(), summary.text);
    }

    #[test]
    fn test_derivations_are_idempotent() {
        let table = table();
        let selected = countries(&["US", "Brazil"]);

        assert_eq!(
            derive_bar_series(&table, &selected, Metric::Deaths),
            derive_bar_series(&table, &selected, Metric::Deaths)
        );
        assert_eq!(
            derive_scatter_series(&table, &selected),
            derive_scatter_series(&table, &selected)
        );
        assert_eq!(
            derive_summary(&table, &selected, Metric::Deaths),
            derive_summary(&table, &selected, Metric::Deaths)
        );
    }
}
