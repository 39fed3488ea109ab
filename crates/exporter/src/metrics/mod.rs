/// Exporter metrics
///
/// Every observation the pipeline makes goes through the [`MetricsSink`]
/// trait with a [`MetricName`] and label values. The sink is built once at
/// boot and handed down as `Arc<dyn MetricsSink>`.
///
/// - `names.rs`: the closed set of metric names, kinds and label names
/// - `sink.rs`: the `MetricsSink` seam
/// - `memory.rs`: `InMemorySink`, a dashmap-backed store with snapshots
/// - `render.rs`: Prometheus text exposition of an `InMemorySink`

pub mod names;
pub mod sink;
pub mod memory;
pub mod render;

pub use names::{MetricKind, MetricName, NAMESPACE};
pub use sink::MetricsSink;
pub use memory::{InMemorySink, SeriesSnapshot, SeriesValue, DEFAULT_BUCKETS};
pub use render::{render_text, TEXT_CONTENT_TYPE};
