use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use crate::input::LogLine;
use crate::metrics::{MetricName, MetricsSink};

use super::pool::WorkerPool;
use super::worker::ExportWorker;

/// Hands inbound lines to idle workers, dropping lines when none is free.
pub struct Dispatcher {
    pool: Arc<WorkerPool<ExportWorker>>,
    sink: Arc<dyn MetricsSink>,
    tracker: TaskTracker,
}

impl Dispatcher {
    pub fn new(pool: Arc<WorkerPool<ExportWorker>>, sink: Arc<dyn MetricsSink>) -> Self {
        Self {
            pool,
            sink,
            tracker: TaskTracker::new(),
        }
    }

    /// Dispatch until `cancel` fires or every sender is gone.
    ///
    /// Lines still queued at cancellation are left unread; lines already
    /// leased to a worker finish before this returns.
    pub async fn run(self, mut lines: mpsc::Receiver<LogLine>, cancel: CancellationToken) {
        info!(workers = self.pool.size(), "Dispatcher started");

        loop {
            let line = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                line = lines.recv() => match line {
                    Some(line) => line,
                    None => break,
                },
            };

            let origin = [line.origin_host.as_str()];
            self.sink.increment(MetricName::LogsTotal, &origin);

            match self.pool.try_acquire() {
                Some(worker) => {
                    self.tracker.spawn_blocking(move || {
                        worker.process(&line);
                    });
                }
                None => {
                    self.sink.increment(MetricName::LogsDroppedTotal, &origin);
                    debug!(origin = %line.origin_host, "No idle worker, line dropped");
                }
            }
        }

        self.tracker.close();
        info!(in_flight = self.tracker.len(), "Dispatcher stopping, waiting for workers");
        self.tracker.wait().await;
        info!("Dispatcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::fake::FakeClassifier;
    use crate::metrics::InMemorySink;
    use crate::pipeline::worker::tests::worker_with;
    use std::time::Duration;

    const LINE: &str = "1.2.3.4|site.ru|GET / HTTP/1.1|200|0.1|Mozilla/5.0 (X11; Linux x86_64)";

    fn dispatcher(workers: usize, classifier: Arc<FakeClassifier>, sink: Arc<InMemorySink>) -> Dispatcher {
        let pool = WorkerPool::from_fn(workers, |_| worker_with(classifier.clone(), sink.clone())).unwrap();
        Dispatcher::new(Arc::new(pool), sink)
    }

    #[tokio::test]
    async fn test_busy_pool_drops_line() {
        let sink = Arc::new(InMemorySink::new());
        let classifier = Arc::new(FakeClassifier::new("x", "y", "z").with_delay(Duration::from_millis(300)));

        let (tx, rx) = mpsc::channel(8);
        tx.send(LogLine::new("web1", LINE)).await.unwrap();
        tx.send(LogLine::new("web1", LINE)).await.unwrap();
        drop(tx);

        dispatcher(1, classifier.clone(), sink.clone())
            .run(rx, CancellationToken::new())
            .await;

        assert_eq!(sink.counter(MetricName::LogsTotal, &["web1"]), 2);
        assert_eq!(sink.counter(MetricName::LogsDroppedTotal, &["web1"]), 1);
        assert_eq!(sink.counter(MetricName::NginxRequestsTotal, &["web1"]), 1);
        assert_eq!(classifier.calls(), 1);
    }

    #[tokio::test]
    async fn test_all_lines_processed_when_workers_free() {
        let sink = Arc::new(InMemorySink::new());
        let classifier = Arc::new(FakeClassifier::new("x", "y", "z"));

        let (tx, rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(dispatcher(2, classifier, sink.clone()).run(rx, cancel));

        for _ in 0..5 {
            tx.send(LogLine::new("web1", LINE)).await.unwrap();
            // let the previous line finish
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        drop(tx);
        task.await.unwrap();

        assert_eq!(sink.counter(MetricName::LogsTotal, &["web1"]), 5);
        assert_eq!(sink.counter(MetricName::LogsDroppedTotal, &["web1"]), 0);
        assert_eq!(sink.counter(MetricName::NginxRequestsTotal, &["web1"]), 5);
    }

    #[tokio::test]
    async fn test_cancel_leaves_queue_undrained() {
        let sink = Arc::new(InMemorySink::new());
        let classifier = Arc::new(FakeClassifier::new("x", "y", "z"));

        let (tx, rx) = mpsc::channel(8);
        for _ in 0..3 {
            tx.send(LogLine::new("web1", LINE)).await.unwrap();
        }

        let cancel = CancellationToken::new();
        cancel.cancel();
        dispatcher(4, classifier.clone(), sink.clone()).run(rx, cancel).await;

        assert_eq!(sink.total(MetricName::LogsTotal), 0);
        assert_eq!(classifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancel_waits_for_in_flight_worker() {
        let sink = Arc::new(InMemorySink::new());
        let classifier = Arc::new(FakeClassifier::new("x", "y", "z").with_delay(Duration::from_millis(200)));

        let (tx, rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(dispatcher(1, classifier, sink.clone()).run(rx, cancel.clone()));

        tx.send(LogLine::new("web1", LINE)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        task.await.unwrap();

        // the leased line completed even though cancellation came first
        assert_eq!(sink.counter(MetricName::NginxRequestsTotal, &["web1"]), 1);
    }
}
