//! UDP transport for OSC.
//!
//! The lowest layer of oscwire. Binds receive sockets for the four
//! transmission types the protocol is used with:
//! - unicast on a specific local address
//! - multicast, joining a group on every interface
//! - broadcast and local broadcast on the wildcard address
//!
//! and opens connected sockets for sending. Everything else builds on the
//! [`UdpTransport`] type provided here.

pub mod error;
pub mod udp;

pub use error::{Result, TransportError};
pub use udp::{TransmissionType, UdpEndpoint, UdpTransport};
