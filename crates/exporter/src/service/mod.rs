// Background jobs
pub mod background;

pub use background::{metrics_summary, MetricsSummary};
