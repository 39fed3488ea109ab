use std::time::Duration;

use serde::Serialize;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::classify::{CacheStats, ClassificationCache};
use crate::metrics::{InMemorySink, MetricName};
use crate::state::SharedState;

/// Point-in-time totals across every origin host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSummary {
    pub logs_total: u64,
    pub logs_dropped: u64,
    pub logs_fail_parsed: u64,
    pub logs_filtered: u64,
    pub requests: u64,
    pub series: usize,
    pub cache: CacheStats,
}

impl MetricsSummary {
    pub fn collect(sink: &InMemorySink, cache: &ClassificationCache) -> Self {
        Self {
            logs_total: sink.total(MetricName::LogsTotal),
            logs_dropped: sink.total(MetricName::LogsDroppedTotal),
            logs_fail_parsed: sink.total(MetricName::LogsFailParsedTotal),
            logs_filtered: sink.total(MetricName::LogsFilteredTotal),
            requests: sink.total(MetricName::NginxRequestsTotal),
            series: sink.series_count(),
            cache: cache.stats(),
        }
    }

    /// Lines dropped since `previous`.
    pub fn dropped_since(&self, previous: &MetricsSummary) -> u64 {
        self.logs_dropped.saturating_sub(previous.logs_dropped)
    }
}

/// Background task that periodically logs a metrics summary
///
/// Runs until `cancel` fires. Each tick reports the totals and the number of
/// lines received and dropped during the last interval; a full JSON snapshot
/// of every series is logged at debug level.
pub async fn metrics_summary(state: SharedState, interval_secs: u64, cancel: CancellationToken) {
    info!("Starting metrics summary task (interval: {}s)", interval_secs);

    let mut interval = time::interval(Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut previous = MetricsSummary::default();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let summary = MetricsSummary::collect(&state.sink, &state.cache);
        let received = summary.logs_total.saturating_sub(previous.logs_total);
        let dropped = summary.dropped_since(&previous);

        info!(
            logs_total = summary.logs_total,
            received,
            dropped,
            fail_parsed = summary.logs_fail_parsed,
            filtered = summary.logs_filtered,
            cached_user_agents = summary.cache.entries,
            cache_hits = summary.cache.hits,
            cache_misses = summary.cache.misses,
            series = summary.series,
            "Metrics summary"
        );

        if dropped > 0 {
            warn!(
                "{} of {} lines dropped in the last {}s - consider raising global.export_workers",
                dropped, received, interval_secs
            );
        }

        match serde_json::to_string(&state.sink.snapshot()) {
            Ok(json) => debug!(snapshot = %json, "Metrics snapshot"),
            Err(e) => warn!("Failed to serialize metrics snapshot: {}", e),
        }

        previous = summary;
    }

    info!("Metrics summary task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::UaLabels;
    use crate::metrics::MetricsSink;

    #[test]
    fn test_collect_sums_across_origins() {
        let sink = InMemorySink::new();
        let cache = ClassificationCache::new(4).unwrap();

        sink.increment(MetricName::LogsTotal, &["web1"]);
        sink.increment(MetricName::LogsTotal, &["web2"]);
        sink.increment(MetricName::LogsDroppedTotal, &["web2"]);
        sink.increment(MetricName::NginxRequestsTotal, &["web1"]);
        cache.set("curl".to_string(), UaLabels::new("curl", "Other", "Other"));

        let summary = MetricsSummary::collect(&sink, &cache);

        assert_eq!(summary.logs_total, 2);
        assert_eq!(summary.logs_dropped, 1);
        assert_eq!(summary.requests, 1);
        assert_eq!(summary.series, 4);
        assert_eq!(summary.cache.entries, 1);
    }

    #[test]
    fn test_dropped_since() {
        let before = MetricsSummary {
            logs_dropped: 3,
            ..Default::default()
        };
        let after = MetricsSummary {
            logs_dropped: 10,
            ..Default::default()
        };

        assert_eq!(after.dropped_since(&before), 7);
        assert_eq!(before.dropped_since(&after), 0);
    }
}
