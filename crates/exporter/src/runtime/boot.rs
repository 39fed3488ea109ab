//! Boot: logging init, config load, classifier load, state creation.

use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::classify::{UaParserClassifier, UserAgentClassifier};
use crate::conf::ExporterConfig;
use crate::metrics::{MetricName, MetricsSink};
use crate::state::{ExporterState, SharedState};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exporter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load and validate config, load the user-agent database, build shared state.
///
/// Returns `(SharedState, ExporterConfig)` on success.
pub async fn boot() -> Result<(SharedState, ExporterConfig), Box<dyn std::error::Error>> {
    info!("Starting access log exporter v{}", VERSION);

    // Load configuration (file or env)
    let config = ExporterConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    config.validate().map_err(|e| {
        error!("Configuration validation failed: {}", e);
        e
    })?;

    info!(
        "Loaded configuration: syslog_address={}, delimiter={}, workers={}, ua_cache_size={}",
        config.global.syslog_address,
        config.global.delimiter.as_str(),
        config.global.export_workers,
        config.global.user_agent_cache_size
    );
    info!(
        "Rules: {} user agent, {} request uri, {} host; {} internal subnets; {} sources",
        config.global.user_agents.len(),
        config.global.request_uris.len(),
        config.global.hosts.len(),
        config.global.internal_subnets.len(),
        config.sources.len()
    );

    info!("Loading user agent regexes from: {}", config.global.ua_regex_path);
    let classifier = UaParserClassifier::from_yaml(&config.global.ua_regex_path).map_err(|e| {
        error!("Failed to initialize user agent parser: {}", e);
        e
    })?;
    let classifier: Arc<dyn UserAgentClassifier> = Arc::new(classifier);

    let state = Arc::new(ExporterState::new(config.clone(), classifier)?);
    info!("Initialized shared exporter state");

    state.sink.observe(
        MetricName::BuildInfo,
        &[
            VERSION,
            option_env!("EXPORTER_GIT_REVISION").unwrap_or("unknown"),
            option_env!("EXPORTER_GIT_BRANCH").unwrap_or("unknown"),
        ],
        1.0,
    );

    Ok((state, config))
}
