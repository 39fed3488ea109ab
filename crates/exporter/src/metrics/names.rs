use serde::Serialize;

/// Namespace prepended to every metric name when rendered.
pub const NAMESPACE: &str = "accesslog";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    /// Name used on `# TYPE` lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

/// Every metric the exporter emits.
///
/// The kind decides what a sink does with an observed value: counters
/// ignore it and increment, gauges store it, histograms record it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    HostResponseTimeSeconds,
    UserAgentResponseTimeSeconds,
    UriResponseTimeSeconds,
    UserAgentRequestsTotal,
    OsDeviceTypeRequestsTotal,
    NginxRequestsTotal,
    LogsTotal,
    LogsDroppedTotal,
    LogsFailParsedTotal,
    LogsFilteredTotal,
    UserAgentCachedTotal,
    UserAgentCurrentCachedTotal,
    BuildInfo,
}

impl MetricName {
    pub const ALL: [MetricName; 13] = [
        MetricName::HostResponseTimeSeconds,
        MetricName::UserAgentResponseTimeSeconds,
        MetricName::UriResponseTimeSeconds,
        MetricName::UserAgentRequestsTotal,
        MetricName::OsDeviceTypeRequestsTotal,
        MetricName::NginxRequestsTotal,
        MetricName::LogsTotal,
        MetricName::LogsDroppedTotal,
        MetricName::LogsFailParsedTotal,
        MetricName::LogsFilteredTotal,
        MetricName::UserAgentCachedTotal,
        MetricName::UserAgentCurrentCachedTotal,
        MetricName::BuildInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::HostResponseTimeSeconds => "host_response_time_seconds",
            MetricName::UserAgentResponseTimeSeconds => "user_agent_response_time_seconds",
            MetricName::UriResponseTimeSeconds => "uri_response_time_seconds",
            MetricName::UserAgentRequestsTotal => "user_agent_requests_total",
            MetricName::OsDeviceTypeRequestsTotal => "os_device_type_requests_total",
            MetricName::NginxRequestsTotal => "nginx_requests_total",
            MetricName::LogsTotal => "logs_total",
            MetricName::LogsDroppedTotal => "logs_dropped_total",
            MetricName::LogsFailParsedTotal => "logs_fail_parsed_total",
            MetricName::LogsFilteredTotal => "logs_filtered_total",
            MetricName::UserAgentCachedTotal => "user_agent_cached_total",
            MetricName::UserAgentCurrentCachedTotal => "user_agent_current_cached_total",
            MetricName::BuildInfo => "build_info",
        }
    }

    /// Rendered name, e.g. `accesslog_logs_total`.
    pub fn full_name(&self) -> String {
        format!("{}_{}", NAMESPACE, self.as_str())
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            MetricName::HostResponseTimeSeconds
            | MetricName::UserAgentResponseTimeSeconds
            | MetricName::UriResponseTimeSeconds => MetricKind::Histogram,
            MetricName::UserAgentCurrentCachedTotal | MetricName::BuildInfo => MetricKind::Gauge,
            _ => MetricKind::Counter,
        }
    }

    /// Label names in the order label values are passed.
    pub fn label_names(&self) -> &'static [&'static str] {
        match self {
            MetricName::HostResponseTimeSeconds => &["host", "code"],
            MetricName::UserAgentResponseTimeSeconds | MetricName::UserAgentRequestsTotal => {
                &["host", "user_agent", "code"]
            }
            MetricName::UriResponseTimeSeconds => &["host", "uri", "code"],
            MetricName::OsDeviceTypeRequestsTotal => &["host", "os", "device_type"],
            MetricName::BuildInfo => &["version", "revision", "branch"],
            MetricName::NginxRequestsTotal
            | MetricName::LogsTotal
            | MetricName::LogsDroppedTotal
            | MetricName::LogsFailParsedTotal
            | MetricName::LogsFilteredTotal
            | MetricName::UserAgentCachedTotal
            | MetricName::UserAgentCurrentCachedTotal => &["nginx_host"],
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            MetricName::HostResponseTimeSeconds => "Response time by host in seconds",
            MetricName::UserAgentResponseTimeSeconds => "Response time by user agent in seconds",
            MetricName::UriResponseTimeSeconds => "Response time by uri in seconds",
            MetricName::UserAgentRequestsTotal => "Requests total by user agent",
            MetricName::OsDeviceTypeRequestsTotal => "Requests total by os and device type",
            MetricName::NginxRequestsTotal => "Total requests by nginx host",
            MetricName::LogsTotal => "Total log lines",
            MetricName::LogsDroppedTotal => "Logs that were dropped",
            MetricName::LogsFailParsedTotal => "Total fail parsed logs",
            MetricName::LogsFilteredTotal => "Total filtered logs by subnet",
            MetricName::UserAgentCachedTotal => "Total cached user agents",
            MetricName::UserAgentCurrentCachedTotal => "Total current cached user agents",
            MetricName::BuildInfo => "Constant 1 labeled by version, revision and branch of the build",
        }
    }
}

impl std::fmt::Display for MetricName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = MetricName::ALL.iter().map(|m| m.as_str()).collect();
        assert_eq!(names.len(), MetricName::ALL.len());
    }

    #[test]
    fn test_full_name_has_namespace() {
        assert_eq!(MetricName::LogsTotal.full_name(), "accesslog_logs_total");
        assert_eq!(MetricName::BuildInfo.full_name(), "accesslog_build_info");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(MetricName::UriResponseTimeSeconds.kind(), MetricKind::Histogram);
        assert_eq!(MetricName::UserAgentCurrentCachedTotal.kind(), MetricKind::Gauge);
        assert_eq!(MetricName::LogsDroppedTotal.kind(), MetricKind::Counter);
    }

    #[test]
    fn test_label_names() {
        assert_eq!(MetricName::OsDeviceTypeRequestsTotal.label_names(), &["host", "os", "device_type"]);
        assert_eq!(MetricName::NginxRequestsTotal.label_names(), &["nginx_host"]);
    }
}
