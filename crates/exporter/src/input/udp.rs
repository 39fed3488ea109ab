use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;

use bytes::BytesMut;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::model::LogLine;
use super::syslog::parse_envelope;
use super::{LineSource, SourceError};

/// Largest datagram read; longer ones are truncated.
const MAX_DATAGRAM: usize = 64 * 1024;

/// Syslog-over-UDP listener.
///
/// The origin host of each line is the syslog hostname, or the sender's IP
/// when the envelope has none.
pub struct UdpSyslogSource {
    socket: UdpSocket,
}

impl UdpSyslogSource {
    pub async fn bind(address: &str) -> Result<Self, SourceError> {
        let socket = UdpSocket::bind(address).await.map_err(|source| SourceError::Bind {
            address: address.to_string(),
            source,
        })?;

        Ok(Self { socket })
    }

    /// Listen on an already bound socket.
    pub fn from_socket(socket: UdpSocket) -> Self {
        Self { socket }
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SourceError> {
        Ok(self.socket.local_addr()?)
    }
}

impl LineSource for UdpSyslogSource {
    fn run(
        &self,
        lines: mpsc::Sender<LogLine>,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<(), SourceError>> + Send + '_>> {
        Box::pin(async move {
            if let Ok(addr) = self.socket.local_addr() {
                info!("Syslog listener on udp://{}", addr);
            }

            let mut buf = BytesMut::with_capacity(MAX_DATAGRAM);

            loop {
                buf.clear();

                let received = tokio::select! {
                    _ = cancel.cancelled() => break,
                    received = self.socket.recv_buf_from(&mut buf) => received,
                };

                // one failed read (e.g. ICMP-induced reset) must not stop the listener
                let (len, peer) = match received {
                    Ok(received) => received,
                    Err(e) => {
                        warn!(error = %e, "Failed to receive syslog datagram");
                        continue;
                    }
                };

                let record = match parse_envelope(&buf[..len]) {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(peer = %peer, error = %e, "Skipping datagram without syslog envelope");
                        continue;
                    }
                };

                let origin = record.hostname.unwrap_or_else(|| peer.ip().to_string());
                let line = LogLine::new(origin, record.message);

                tokio::select! {
                    _ = cancel.cancelled() => break,
                    sent = lines.send(line) => {
                        if sent.is_err() {
                            debug!("Line queue closed, stopping syslog listener");
                            break;
                        }
                    }
                }
            }

            info!("Syslog listener stopped");
            Ok(())
        })
    }
}
