use std::sync::Arc;

use tracing::{debug, warn};

use crate::classify::{ClassificationEngine, ClassificationResult};
use crate::conf::ExporterConfig;
use crate::input::LogLine;
use crate::metrics::{MetricName, MetricsSink};
use crate::parser::{FieldMap, LineTokenizer};

/// Processes one line at a time: tokenize, classify, emit metrics.
///
/// Workers share everything behind `Arc`s; the pool only limits how many
/// run at once.
#[derive(Clone)]
pub struct ExportWorker {
    id: usize,
    tokenizer: Arc<dyn LineTokenizer>,
    engine: ClassificationEngine,
    config: Arc<ExporterConfig>,
    sink: Arc<dyn MetricsSink>,
}

impl ExportWorker {
    pub fn new(
        id: usize,
        tokenizer: Arc<dyn LineTokenizer>,
        engine: ClassificationEngine,
        config: Arc<ExporterConfig>,
        sink: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            id,
            tokenizer,
            engine,
            config,
            sink,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn process(&self, line: &LogLine) -> ClassificationResult {
        let origin = line.origin_host.as_str();
        let format = self.config.format_for(origin);

        // an unparsable line is still counted, with every label unknown
        let fields = match self.tokenizer.tokenize(format, &line.content) {
            Ok(fields) => fields,
            Err(e) => {
                warn!(
                    worker = self.id,
                    origin = %origin,
                    format = %format,
                    content = %line.content,
                    error = %e,
                    "Could not parse log line"
                );
                self.sink.increment(MetricName::LogsFailParsedTotal, &[origin]);
                FieldMap::new()
            }
        };

        let result = self.engine.classify(&fields, origin);
        self.export(&result, origin);

        debug!(worker = self.id, origin = %origin, host = %result.host, code = %result.status, "Line exported");
        result
    }

    fn export(&self, result: &ClassificationResult, origin: &str) {
        let host = result.host.as_str();
        let code = result.status.as_str();
        let user_agent = result.labels.user_agent.as_str();

        if let Some(duration) = result.duration {
            self.sink.observe(MetricName::HostResponseTimeSeconds, &[host, code], duration);
            self.sink.observe(MetricName::UserAgentResponseTimeSeconds, &[host, user_agent, code], duration);
            self.sink.observe(MetricName::UriResponseTimeSeconds, &[host, result.uri.as_str(), code], duration);
        }

        self.sink.increment(MetricName::UserAgentRequestsTotal, &[host, user_agent, code]);
        self.sink.increment(
            MetricName::OsDeviceTypeRequestsTotal,
            &[host, result.labels.os.as_str(), result.device_type.as_str()],
        );
        self.sink.increment(MetricName::NginxRequestsTotal, &[origin]);
    }
}
