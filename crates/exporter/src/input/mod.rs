//! Input: line sources feeding the dispatch pipeline.
//!
//! A [`LineSource`] pushes [`LogLine`]s into a bounded mpsc channel until it
//! is cancelled. `udp.rs` is the syslog-over-UDP listener used by the binary.

pub mod model;
pub mod syslog;
pub mod udp;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub use model::LogLine;
pub use udp::UdpSyslogSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Receive failed: {0}")]
    Receive(#[from] std::io::Error),
}

/// Producer of raw access-log lines.
///
/// Object-safe thanks to the `Pin<Box<…>>` return, so the binary can hold
/// an `Arc<dyn LineSource>`. Returns once `cancel` fires or the receiving
/// side of `lines` is gone.
pub trait LineSource: Send + Sync {
    fn run(
        &self,
        lines: mpsc::Sender<LogLine>,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<(), SourceError>> + Send + '_>>;
}
