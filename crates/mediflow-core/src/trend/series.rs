//! Grouping of report metrics into per-name series.

use crate::report::Report;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One measurement of a metric, tagged with where and when it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: String,
    pub parsed_date: NaiveDate,
    pub value: f64,
    pub unit: String,
    pub filename: String,
}

/// All observations of one metric name across a set of reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub name: String,
    /// Insertion order (report iteration order), not date order.
    observations: Vec<Observation>,
}

impl MetricSeries {
    fn new(name: String) -> Self {
        Self {
            name,
            observations: Vec::new(),
        }
    }

    /// Observations in insertion order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// True when the series has at least two points, i.e. an actual trend.
    pub fn has_trend(&self) -> bool {
        self.observations.len() >= 2
    }

    /// Returns a copy ordered ascending by date.
    ///
    /// The sort is stable, so same-day observations keep their insertion order
    /// and sorting an already sorted series is a no-op.
    pub fn sorted(&self) -> Vec<Observation> {
        let mut sorted = self.observations.clone();
        sorted.sort_by_key(|obs| obs.parsed_date);
        sorted
    }
}

/// Metric name to series, iterated in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesMap {
    series: Vec<MetricSeries>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl SeriesMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&MetricSeries> {
        self.position(name).map(|i| &self.series[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Metric names in first-insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricSeries> {
        self.series.iter()
    }

    /// Date-sorted observations for `name`, ready for charting.
    pub fn sorted_observations(&self, name: &str) -> Option<Vec<Observation>> {
        self.get(name).map(MetricSeries::sorted)
    }

    /// Picks the series to show first.
    ///
    /// Prefers the first name whose series has a real trend (two or more
    /// points); otherwise falls back to the first name encountered.
    pub fn default_metric(&self) -> Option<&str> {
        self.series
            .iter()
            .find(|s| s.has_trend())
            .or_else(|| self.series.first())
            .map(|s| s.name.as_str())
    }

    fn push(&mut self, name: &str, observation: Observation) {
        let position = match self.position(name) {
            Some(position) => position,
            None => {
                self.series.push(MetricSeries::new(name.to_string()));
                let position = self.series.len() - 1;
                self.index.insert(name.to_string(), position);
                position
            }
        };
        self.series[position].observations.push(observation);
    }

    // The index is skipped by serde, so a deserialized map falls back to a scan.
    fn position(&self, name: &str) -> Option<usize> {
        if self.index.len() == self.series.len() {
            self.index.get(name).copied()
        } else {
            self.series.iter().position(|s| s.name == name)
        }
    }
}

/// Groups report metrics by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricSeriesBuilder;

impl MetricSeriesBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds one series per metric name.
    ///
    /// Observations are appended in report order and then metric order. An
    /// empty input yields an empty map, which callers treat as "no trend data".
    pub fn build(&self, reports: &[Report]) -> SeriesMap {
        let mut map = SeriesMap::new();

        for report in reports {
            for metric in &report.metrics {
                map.push(
                    &metric.name,
                    Observation {
                        date: report.date.clone(),
                        parsed_date: report.parsed_date,
                        value: metric.value,
                        unit: metric.unit.clone(),
                        filename: report.filename.clone(),
                    },
                );
            }
        }

        tracing::debug!(
            "[MetricSeriesBuilder] Built {} series from {} reports",
            map.len(),
            reports.len()
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Metric;

    fn report(filename: &str, date: &str, metrics: &[(&str, f64)]) -> Report {
        Report {
            filename: filename.to_string(),
            date: date.to_string(),
            parsed_date: crate::report::parse_report_date(date).unwrap(),
            metrics: metrics
                .iter()
                .map(|(name, value)| Metric {
                    name: name.to_string(),
                    value: *value,
                    unit: "u".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_map() {
        let map = MetricSeriesBuilder::new().build(&[]);
        assert!(map.is_empty());
        assert_eq!(map.default_metric(), None);
    }

    #[test]
    fn test_series_count_matches_reports_carrying_the_metric() {
        let reports = vec![
            report("a.pdf", "2024-01-01", &[("Hemoglobin", 13.0), ("Glucose", 90.0)]),
            report("b.pdf", "2024-02-01", &[("Hemoglobin", 12.0)]),
            report("c.pdf", "2024-03-01", &[("Glucose", 95.0), ("Hemoglobin", 11.5)]),
        ];

        let map = MetricSeriesBuilder::new().build(&reports);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Hemoglobin").unwrap().len(), 3);
        assert_eq!(map.get("Glucose").unwrap().len(), 2);

        let glucose_files: Vec<&str> = map
            .get("Glucose")
            .unwrap()
            .observations()
            .iter()
            .map(|o| o.filename.as_str())
            .collect();
        assert_eq!(glucose_files, vec!["a.pdf", "c.pdf"]);
    }

    #[test]
    fn test_insertion_order_is_report_order_not_date_order() {
        let reports = vec![
            report("march.pdf", "2024-03-01", &[("Hemoglobin", 11.0)]),
            report("jan.pdf", "2024-01-01", &[("Hemoglobin", 13.0)]),
        ];

        let map = MetricSeriesBuilder::new().build(&reports);
        let series = map.get("Hemoglobin").unwrap();

        assert_eq!(series.observations()[0].filename, "march.pdf");
        let sorted = series.sorted();
        assert_eq!(sorted[0].filename, "jan.pdf");
        assert_eq!(sorted[1].filename, "march.pdf");
    }

    #[test]
    fn test_sorting_is_idempotent() {
        let reports = vec![
            report("b.pdf", "2024-02-01", &[("LDL", 120.0)]),
            report("c.pdf", "2024-03-01", &[("LDL", 110.0)]),
            report("a.pdf", "2024-01-01", &[("LDL", 130.0)]),
            report("a2.pdf", "2024-01-01", &[("LDL", 131.0)]),
        ];

        let map = MetricSeriesBuilder::new().build(&reports);
        let once = map.get("LDL").unwrap().sorted();
        let mut twice = once.clone();
        twice.sort_by_key(|o| o.parsed_date);

        assert_eq!(once, twice);
        // Stable: same-day observations keep insertion order.
        assert_eq!(once[0].filename, "a.pdf");
        assert_eq!(once[1].filename, "a2.pdf");
    }

    #[test]
    fn test_default_metric_prefers_multi_point_series() {
        let reports = vec![
            report("a.pdf", "2024-01-01", &[("Ferritin", 40.0), ("Hemoglobin", 13.0)]),
            report("b.pdf", "2024-02-01", &[("Hemoglobin", 12.0)]),
        ];

        let map = MetricSeriesBuilder::new().build(&reports);

        assert_eq!(map.names().collect::<Vec<_>>(), vec!["Ferritin", "Hemoglobin"]);
        assert_eq!(map.default_metric(), Some("Hemoglobin"));
    }

    #[test]
    fn test_default_metric_falls_back_to_first_single_point() {
        let reports = vec![report("a.pdf", "2024-01-01", &[("Ferritin", 40.0), ("TSH", 2.1)])];

        let map = MetricSeriesBuilder::new().build(&reports);

        assert_eq!(map.default_metric(), Some("Ferritin"));
        assert!(!map.get("Ferritin").unwrap().has_trend());
    }

    #[test]
    fn test_duplicate_names_in_one_report_are_separate_observations() {
        let reports = vec![report("a.pdf", "2024-01-01", &[("Glucose", 90.0), ("Glucose", 140.0)])];

        let map = MetricSeriesBuilder::new().build(&reports);

        assert_eq!(map.get("Glucose").unwrap().len(), 2);
    }

    #[test]
    fn test_deserialized_map_still_resolves_names() {
        let reports = vec![report("a.pdf", "2024-01-01", &[("Glucose", 90.0), ("TSH", 2.0)])];
        let map = MetricSeriesBuilder::new().build(&reports);

        let json = serde_json::to_string(&map).unwrap();
        let restored: SeriesMap = serde_json::from_str(&json).unwrap();

        assert!(restored.contains("TSH"));
        assert_eq!(restored.get("Glucose").unwrap().len(), 1);
    }
}
