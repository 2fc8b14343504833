use std::io;

use thiserror::Error;

/// Why a probe could not reach a conclusive answer. These never leave the
/// probe: every variant is folded into an inconclusive signal.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("address resolution for {host} failed: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("no socket address available for {host}")]
    NoAddress { host: String },
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("timed out waiting for the server")]
    Timeout,
    #[error("handshake deadline exceeded")]
    DeadlineExceeded,
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: io::Error,
    },
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ProbeError {
    pub(crate) fn io(source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout,
            _ => Self::Io { source },
        }
    }
}
