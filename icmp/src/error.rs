use thiserror::Error;

/// Errors surfaced by packet framing, parsing, and probing.
///
/// Mirrors the reference source's three failure classes (decode, lookup, io)
/// by funneling them through `#[from]` at the boundary rather than matching
/// on raw `std::io::Error` deep inside the probe logic.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid icmp reply: {0}")]
    InvalidReply(&'static str),

    #[error("failed to resolve host {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
