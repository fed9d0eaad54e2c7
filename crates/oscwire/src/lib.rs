//! Open Sound Control over UDP.
//!
//! # Crate Structure
//!
//! - [`codec`]: packet model and binary encoding (messages, bundles, time tags)
//! - [`transport`]: UDP sockets for unicast, multicast and broadcast
//! - [`net`]: receiver with packet event dispatch, and transmitter
//!
//! ```
//! use oscwire::codec::{Codec, ByteOrder, Message, Packet};
//!
//! let codec = Codec::new(ByteOrder::LittleEndian);
//! let packet: Packet = Message::with_argument("/volume", 0.5f32)?.into();
//! let wire = codec.encode(&packet)?;
//! assert_eq!(codec.decode(&wire)?, packet);
//! # Ok::<(), oscwire::codec::CodecError>(())
//! ```

/// Re-export codec types.
pub mod codec {
    pub use oscwire_codec::*;
}

/// Re-export transport types.
pub mod transport {
    pub use oscwire_transport::*;
}

/// Re-export receiver and transmitter types.
pub mod net {
    pub use oscwire_net::*;
}
