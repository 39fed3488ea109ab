use super::names::MetricName;

/// Destination for every metric observation.
///
/// `labels` are values in the order of [`MetricName::label_names`].
/// Counters ignore `value`; gauges set it; histograms observe it.
pub trait MetricsSink: Send + Sync {
    fn observe(&self, name: MetricName, labels: &[&str], value: f64);

    fn increment(&self, name: MetricName, labels: &[&str]) {
        self.observe(name, labels, 0.0);
    }
}
