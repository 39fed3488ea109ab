/// Dispatch pipeline
///
/// A single dispatch loop reads [`LogLine`](crate::input::LogLine)s from the
/// inbound queue and leases an idle [`ExportWorker`] for each one. Workers
/// run on tokio's blocking pool; when none is idle the line is dropped and
/// counted instead of queued.
///
/// - `pool.rs`: fixed worker stack with RAII leases
/// - `worker.rs`: tokenize → classify → emit for one line
/// - `dispatcher.rs`: the dispatch loop and cooperative shutdown

pub mod dispatcher;
pub mod pool;
pub mod worker;

pub use dispatcher::Dispatcher;
pub use pool::{EmptyPool, WorkerLease, WorkerPool};
pub use worker::ExportWorker;
