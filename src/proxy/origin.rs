//! Origin server fetching.
//!
//! # Responsibilities
//! - Resolve the target hostname
//! - Connect and send the synthesized request
//! - Expose the response as a lazy sequence of byte chunks until EOF
//!
//! # Design Decisions
//! - The outbound request is always `GET <path> HTTP/1.1` with `Host` and
//!   `Connection: close`; client headers are never forwarded
//! - Resolution and connection failures are distinct error variants so the
//!   handler can log them apart
//! - A stream is finite and not restartable; a re-fetch opens a fresh
//!   connection

use std::io;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};

/// Errors raised while reaching an origin server.
#[derive(Debug, Error)]
pub enum OriginError {
    /// DNS lookup failed or returned no addresses.
    #[error("failed to resolve {host}: {source}")]
    Resolve { host: String, source: io::Error },

    /// TCP connect to the resolved address failed.
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        source: io::Error,
    },

    /// Writing the synthesized request failed.
    #[error("failed to send request to origin: {0}")]
    Send(#[source] io::Error),
}

/// Opens origin connections on a fixed port (80 unless reconfigured).
#[derive(Debug, Clone, Copy)]
pub struct OriginFetcher {
    port: u16,
}

impl OriginFetcher {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    /// Resolve `hostname`, connect, and send the synthesized GET request.
    ///
    /// On success the origin has the full request and the returned stream
    /// yields its response chunks.
    pub async fn fetch(&self, hostname: &str, path: &str) -> Result<OriginStream, OriginError> {
        let mut addrs = lookup_host((hostname, self.port))
            .await
            .map_err(|source| OriginError::Resolve {
                host: hostname.to_string(),
                source,
            })?;
        let addr = addrs.next().ok_or_else(|| OriginError::Resolve {
            host: hostname.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no addresses returned"),
        })?;

        let mut stream = TcpStream::connect(addr)
            .await
            .map_err(|source| OriginError::Connect {
                host: hostname.to_string(),
                port: self.port,
                source,
            })?;

        let request =
            format!("GET {path} HTTP/1.1\r\nHost: {hostname}\r\nConnection: close\r\n\r\n");
        stream
            .write_all(request.as_bytes())
            .await
            .map_err(OriginError::Send)?;

        tracing::debug!(host = %hostname, port = self.port, path = %path, "forwarded request to origin");
        Ok(OriginStream { stream })
    }
}

/// The origin's response as a finite chunk sequence, terminated by the
/// origin closing the connection (`Connection: close` guarantees it does).
pub struct OriginStream {
    stream: TcpStream,
}

impl OriginStream {
    /// Read the next chunk into `buf`. `Ok(0)` signals EOF.
    pub async fn next_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf).await
    }
}
