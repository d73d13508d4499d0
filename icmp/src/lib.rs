//! ICMP echo/traceroute engine: packet framing, reply parsing and
//! validation, the injectable `Transport` collaborator, and the
//! `PingSession`/`TracerouteSession` upper API.

pub mod checksum;
pub mod codes;
pub mod config;
pub mod error;
pub mod packet;
pub mod probe;
pub mod reply;
pub mod session;
pub mod transport;
pub mod validate;

pub use config::ProbeConfig;
pub use error::{Error, Result};
pub use packet::EchoRequest;
pub use probe::{ProbeResult, RawSocketProbe};
pub use reply::IcmpReplyView;
pub use session::{resolve, PingSession, Statistics, TracerouteSession};
pub use transport::{RawIcmpFactory, RawIcmpSocket, Transport, TransportFactory};
