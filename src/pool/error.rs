use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("worker pool is closed")]
    Closed,
    #[error("failed to spawn worker thread: {source}")]
    Spawn {
        #[source]
        source: io::Error,
    },
}
