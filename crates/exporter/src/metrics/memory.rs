use std::collections::BTreeMap;

use dashmap::DashMap;
use serde::Serialize;

use super::names::{MetricKind, MetricName};
use super::sink::MetricsSink;

/// Upper bounds of every histogram, the Prometheus client defaults.
pub const DEFAULT_BUCKETS: [f64; 11] = [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SeriesKey {
    name: MetricName,
    labels: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeriesValue {
    Counter { value: u64 },
    Gauge { value: f64 },
    /// `buckets[i]` counts observations `<=` [`DEFAULT_BUCKETS`]`[i]` (cumulative).
    Histogram {
        count: u64,
        sum: f64,
        buckets: [u64; DEFAULT_BUCKETS.len()],
    },
}

impl SeriesValue {
    fn empty(kind: MetricKind) -> Self {
        match kind {
            MetricKind::Counter => SeriesValue::Counter { value: 0 },
            MetricKind::Gauge => SeriesValue::Gauge { value: 0.0 },
            MetricKind::Histogram => SeriesValue::Histogram {
                count: 0,
                sum: 0.0,
                buckets: [0; DEFAULT_BUCKETS.len()],
            },
        }
    }

    fn record(&mut self, observed: f64) {
        match self {
            SeriesValue::Counter { value } => *value += 1,
            SeriesValue::Gauge { value } => *value = observed,
            SeriesValue::Histogram { count, sum, buckets } => {
                *count += 1;
                *sum += observed;
                for (bucket, bound) in buckets.iter_mut().zip(DEFAULT_BUCKETS) {
                    if observed <= bound {
                        *bucket += 1;
                    }
                }
            }
        }
    }
}

/// One labelled series as reported by [`InMemorySink::snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSnapshot {
    pub name: String,
    pub labels: BTreeMap<&'static str, String>,
    #[serde(flatten)]
    pub value: SeriesValue,
}

/// Process-local metric store keyed by (name, label values).
///
/// Histograms use the fixed [`DEFAULT_BUCKETS`].
#[derive(Debug, Default)]
pub struct InMemorySink {
    series: DashMap<SeriesKey, SeriesValue>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: MetricName, labels: &[&str]) -> u64 {
        match self.get(name, labels) {
            Some(SeriesValue::Counter { value }) => value,
            _ => 0,
        }
    }

    pub fn gauge(&self, name: MetricName, labels: &[&str]) -> Option<f64> {
        match self.get(name, labels) {
            Some(SeriesValue::Gauge { value }) => Some(value),
            _ => None,
        }
    }

    /// `(count, sum)` of a histogram series.
    pub fn histogram(&self, name: MetricName, labels: &[&str]) -> Option<(u64, f64)> {
        match self.get(name, labels) {
            Some(SeriesValue::Histogram { count, sum, .. }) => Some((count, sum)),
            _ => None,
        }
    }

    /// Counter value or histogram count summed over every label set of `name`.
    pub fn total(&self, name: MetricName) -> u64 {
        self.series
            .iter()
            .filter(|entry| entry.key().name == name)
            .map(|entry| match *entry.value() {
                SeriesValue::Counter { value } => value,
                SeriesValue::Histogram { count, .. } => count,
                SeriesValue::Gauge { .. } => 0,
            })
            .sum()
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// All series, ordered by metric then label values.
    pub fn snapshot(&self) -> Vec<SeriesSnapshot> {
        self.sorted_series()
            .into_iter()
            .map(|(name, labels, value)| SeriesSnapshot {
                name: name.full_name(),
                labels: name.label_names().iter().copied().zip(labels).collect(),
                value,
            })
            .collect()
    }

    /// `(name, label values, value)` ordered by metric then label values.
    pub(crate) fn sorted_series(&self) -> Vec<(MetricName, Vec<String>, SeriesValue)> {
        let mut entries: Vec<(MetricName, Vec<String>, SeriesValue)> = self
            .series
            .iter()
            .map(|entry| (entry.key().name, entry.key().labels.clone(), *entry.value()))
            .collect();
        entries.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
        entries
    }

    fn get(&self, name: MetricName, labels: &[&str]) -> Option<SeriesValue> {
        let key = SeriesKey {
            name,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        };
        self.series.get(&key).map(|v| *v)
    }
}

impl MetricsSink for InMemorySink {
    fn observe(&self, name: MetricName, labels: &[&str], value: f64) {
        let expected = name.label_names().len();
        if labels.len() != expected {
            tracing::warn!(
                metric = %name,
                expected,
                got = labels.len(),
                "Label cardinality mismatch, observation dropped"
            );
            return;
        }

        let key = SeriesKey {
            name,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        };

        self.series
            .entry(key)
            .or_insert_with(|| SeriesValue::empty(name.kind()))
            .record(value);
    }
}
