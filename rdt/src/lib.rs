//! Selective-Repeat reliable data transfer over an opaque, unreliable
//! segment channel: `Sender`, `Receiver`, and the `RdtLayer` facade that
//! combines them, ticked once per externally-driven iteration.

pub mod channel;
pub mod constants;
pub mod error;
pub mod layer;
pub mod receiver;
pub mod segment;
pub mod sender;

pub use channel::{Channel, ChannelConfig, SimulatedChannel};
pub use error::{Error, Result};
pub use layer::RdtLayer;
pub use receiver::Receiver;
pub use segment::Segment;
pub use sender::Sender;
