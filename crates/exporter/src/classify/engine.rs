use std::sync::Arc;

use tracing::warn;

use crate::metrics::{MetricName, MetricsSink};
use crate::parser::{
    FieldMap, HOST_VAR, HTTP_USER_AGENT_VAR, REMOTE_ADDR_VAR, REQUEST_TIME_VAR, REQUEST_VAR, STATUS_VAR,
};

use super::cache::ClassificationCache;
use super::device::detect_device_type;
use super::fallback::{title_case, UserAgentClassifier};
use super::model::{ClassificationResult, UaDetection, UaLabels, UNKNOWN_LABEL};
use super::request::{host_label, response_duration, status_label, uri_label};
use super::rules::Rules;
use super::subnet::InternalSubnets;
use super::user_agent;

/// Turns a tokenized line into metric labels.
///
/// Cheap to clone; every worker holds its own handle onto the shared rules,
/// cache and classifier.
#[derive(Clone)]
pub struct ClassificationEngine {
    rules: Arc<Rules>,
    subnets: Arc<InternalSubnets>,
    cache: Arc<ClassificationCache>,
    classifier: Arc<dyn UserAgentClassifier>,
    sink: Arc<dyn MetricsSink>,
}

impl ClassificationEngine {
    pub fn new(
        rules: Arc<Rules>,
        subnets: Arc<InternalSubnets>,
        cache: Arc<ClassificationCache>,
        classifier: Arc<dyn UserAgentClassifier>,
        sink: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            rules,
            subnets,
            cache,
            classifier,
            sink,
        }
    }

    pub fn cache(&self) -> &Arc<ClassificationCache> {
        &self.cache
    }

    /// Classify one line from `origin` (the reporting server).
    ///
    /// Never fails: unparsable fields are logged and fall back to
    /// `unknown`/absent values.
    pub fn classify(&self, fields: &FieldMap, origin: &str) -> ClassificationResult {
        let field = |name: &str| fields.get(name).map(String::as_str);
        let user_agent = field(HTTP_USER_AGENT_VAR);

        let (detection, subnet_err) =
            user_agent::detect(user_agent, field(REMOTE_ADDR_VAR), &self.rules.user_agents, &self.subnets);
        if let Some(e) = subnet_err {
            warn!(origin = %origin, error = %e, "Could not check internal subnets");
        }

        let labels = match detection {
            UaDetection::Found(labels) => labels,
            UaDetection::Internal => {
                self.sink.increment(MetricName::LogsFilteredTotal, &[origin]);
                UaLabels::internal()
            }
            UaDetection::NeedsFallback => self.fallback_labels(user_agent, origin),
        };

        let device_type = detect_device_type(user_agent, &labels);

        let status = status_label(field(STATUS_VAR)).unwrap_or_else(|e| {
            warn!(origin = %origin, error = %e, "Could not parse http code");
            UNKNOWN_LABEL.to_string()
        });

        let host = host_label(field(HOST_VAR), &self.rules.hosts);
        let uri = uri_label(field(REQUEST_VAR), &self.rules.request_uris);

        let duration = response_duration(field(REQUEST_TIME_VAR)).unwrap_or_else(|e| {
            warn!(origin = %origin, error = %e, "Could not detect response duration");
            None
        });

        ClassificationResult {
            labels,
            device_type,
            status,
            host,
            uri,
            duration,
        }
    }

    /// Cached fallback classification. Failures are not cached.
    fn fallback_labels(&self, user_agent: Option<&str>, origin: &str) -> UaLabels {
        let Some(user_agent) = user_agent else {
            return UaLabels::unknown();
        };

        if let Some(labels) = self.cache.get(user_agent) {
            return labels;
        }

        match self.classifier.classify(user_agent) {
            Ok(mut labels) => {
                labels.os = title_case(&labels.os);
                self.cache.set(user_agent.to_string(), labels.clone());

                self.sink.increment(MetricName::UserAgentCachedTotal, &[origin]);
                self.sink.observe(
                    MetricName::UserAgentCurrentCachedTotal,
                    &[origin],
                    self.cache.len() as f64,
                );

                labels
            }
            Err(e) => {
                warn!(origin = %origin, user_agent = %user_agent, error = %e, "User agent classification failed");
                UaLabels::unknown()
            }
        }
    }
}
