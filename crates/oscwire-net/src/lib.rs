//! OSC endpoints over UDP.
//!
//! This is the "just works" layer: bind a [`UdpReceiver`] and get decoded
//! packets delivered to a [`PacketHandler`], or connect a [`UdpTransmitter`]
//! and send packets. Malformed datagrams never stop a receiver.

pub mod error;
pub mod events;
pub mod receiver;
pub mod transmitter;

pub use error::{NetError, Result};
pub use events::{dispatch, PacketHandler};
pub use receiver::{ReceiverConfig, ReceiverHandle, StopSignal, UdpReceiver};
pub use transmitter::UdpTransmitter;
