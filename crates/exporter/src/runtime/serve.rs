//! Serve: start the syslog listener, metrics endpoint, dispatcher and summary
//! job, run until shutdown.

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, error, warn};

use crate::conf::ExporterConfig;
use crate::input::{LineSource, UdpSyslogSource};
use crate::pipeline::Dispatcher;
use crate::runtime::stop::shutdown_signal;
use crate::service::{metrics_summary, MetricsSummary};
use crate::state::SharedState;
use crate::web::serve_http;

/// Wire up source → queue → dispatcher, expose `/metrics`, and serve until
/// Ctrl+C/SIGTERM or until either listener stops.
pub async fn serve(state: SharedState, config: ExporterConfig) -> Result<(), Box<dyn std::error::Error>> {
    let source = UdpSyslogSource::bind(&config.global.syslog_address).await.map_err(|e| {
        error!("Could not start syslog listener: {}", e);
        e
    })?;
    let source: Arc<dyn LineSource> = Arc::new(source);

    let listener = TcpListener::bind(&config.global.web_address).await.map_err(|e| {
        error!("Could not bind metrics endpoint on {}: {}", config.global.web_address, e);
        e
    })?;

    let pool = Arc::new(state.build_pool()?);
    let (tx, rx) = mpsc::channel(config.global.queue_capacity);
    let cancel = CancellationToken::new();

    let dispatcher = Dispatcher::new(Arc::clone(&pool), state.metrics_sink());
    let dispatch_task = tokio::spawn(dispatcher.run(rx, cancel.clone()));

    let mut source_task = {
        let source = Arc::clone(&source);
        let cancel = cancel.clone();
        tokio::spawn(async move { source.run(tx, cancel).await })
    };

    let mut http_task = tokio::spawn(serve_http(listener, Arc::clone(&state), cancel.clone()));

    let summary_task = tokio::spawn(metrics_summary(
        Arc::clone(&state),
        config.global.summary_interval_secs,
        cancel.clone(),
    ));

    info!("");
    info!("========================================");
    info!("Access log exporter is ready!");
    info!("Syslog listen address: udp://{}", config.global.syslog_address);
    info!("Metrics endpoint: http://{}/metrics", config.global.web_address);
    info!("Export workers: {}", pool.size());
    info!("Press Ctrl+C to shutdown gracefully");
    info!("========================================");
    info!("");

    let mut result: Result<(), Box<dyn std::error::Error>> = Ok(());

    tokio::select! {
        _ = shutdown_signal() => {}
        finished = &mut source_task => {
            match finished {
                Ok(Ok(())) => warn!("Syslog listener exited unexpectedly"),
                Ok(Err(e)) => {
                    error!("Syslog listener failed: {}", e);
                    result = Err(e.into());
                }
                Err(e) => {
                    error!("Syslog listener task panicked: {}", e);
                    result = Err(e.into());
                }
            }
        }
        finished = &mut http_task => {
            match finished {
                Ok(Ok(())) => warn!("Metrics endpoint exited unexpectedly"),
                Ok(Err(e)) => {
                    error!("Metrics endpoint failed: {}", e);
                    result = Err(e.into());
                }
                Err(e) => {
                    error!("Metrics endpoint task panicked: {}", e);
                    result = Err(e.into());
                }
            }
        }
    }

    cancel.cancel();

    if !source_task.is_finished() {
        if let Err(e) = source_task.await {
            warn!("Syslog listener task ended abnormally: {}", e);
        }
    }
    if !http_task.is_finished() {
        if let Err(e) = http_task.await {
            warn!("Metrics endpoint task ended abnormally: {}", e);
        }
    }
    if let Err(e) = dispatch_task.await {
        error!("Dispatcher task panicked: {}", e);
    }
    if let Err(e) = summary_task.await {
        warn!("Summary task ended abnormally: {}", e);
    }

    let summary = MetricsSummary::collect(&state.sink, &state.cache);
    info!(
        logs_total = summary.logs_total,
        dropped = summary.logs_dropped,
        fail_parsed = summary.logs_fail_parsed,
        "Shutdown complete"
    );

    result
}
