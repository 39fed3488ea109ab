//! Exporter state: ExporterState struct, shared state type alias.

use std::sync::Arc;

use crate::classify::{ClassificationCache, ClassificationEngine, InternalSubnets, UserAgentClassifier};
use crate::conf::{ConfigError, ExporterConfig};
use crate::metrics::{InMemorySink, MetricsSink};
use crate::parser::{tokenizer_for, LineTokenizer};
use crate::pipeline::{EmptyPool, ExportWorker, WorkerPool};

/// Everything built once from configuration and shared by every worker.
pub struct ExporterState {
    pub config: Arc<ExporterConfig>,
    pub sink: Arc<InMemorySink>,
    pub cache: Arc<ClassificationCache>,
    pub engine: ClassificationEngine,
    pub tokenizer: Arc<dyn LineTokenizer>,
}

impl ExporterState {
    pub fn new(config: ExporterConfig, classifier: Arc<dyn UserAgentClassifier>) -> Result<Self, ConfigError> {
        let rules = config.global.compile()?;
        let subnets = InternalSubnets::parse(&config.global.internal_subnets);
        let cache = ClassificationCache::new(config.global.user_agent_cache_size)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let sink = Arc::new(InMemorySink::new());
        let cache = Arc::new(cache);

        let engine = ClassificationEngine::new(
            Arc::new(rules),
            Arc::new(subnets),
            Arc::clone(&cache),
            classifier,
            Arc::clone(&sink) as Arc<dyn MetricsSink>,
        );

        Ok(Self {
            tokenizer: tokenizer_for(config.global.delimiter),
            config: Arc::new(config),
            sink,
            cache,
            engine,
        })
    }

    pub fn metrics_sink(&self) -> Arc<dyn MetricsSink> {
        Arc::clone(&self.sink) as Arc<dyn MetricsSink>
    }

    /// One worker per configured `export_workers`.
    pub fn build_pool(&self) -> Result<WorkerPool<ExportWorker>, EmptyPool> {
        WorkerPool::from_fn(self.config.global.export_workers, |id| {
            ExportWorker::new(
                id,
                Arc::clone(&self.tokenizer),
                self.engine.clone(),
                Arc::clone(&self.config),
                self.metrics_sink(),
            )
        })
    }
}

pub type SharedState = Arc<ExporterState>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::fake::FakeClassifier;
    use crate::conf::RequestUriRuleConfig;

    fn classifier() -> Arc<dyn UserAgentClassifier> {
        Arc::new(FakeClassifier::new("x", "y", "z"))
    }

    #[test]
    fn test_build_pool_uses_configured_workers() {
        let mut config = ExporterConfig::default();
        config.global.export_workers = 3;

        let state = ExporterState::new(config, classifier()).unwrap();
        let pool = Arc::new(state.build_pool().unwrap());

        assert_eq!(pool.size(), 3);
        let lease = pool.try_acquire().unwrap();
        assert!(lease.id() < 3);
    }

    #[test]
    fn test_zero_cache_rejected() {
        let mut config = ExporterConfig::default();
        config.global.user_agent_cache_size = 0;
        assert!(matches!(ExporterState::new(config, classifier()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_rule_rejected() {
        let mut config = ExporterConfig::default();
        config.global.request_uris.push(RequestUriRuleConfig {
            match_re: "(".to_string(),
            ..Default::default()
        });
        assert!(matches!(ExporterState::new(config, classifier()), Err(ConfigError::Pattern { .. })));
    }
}
