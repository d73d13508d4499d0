use thiserror::Error;

/// Errors surfaced by the RDT layer's upper API.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no send channel configured")]
    NoSendChannel,

    #[error("no receive channel configured")]
    NoReceiveChannel,
}

pub type Result<T> = std::result::Result<T, Error>;
