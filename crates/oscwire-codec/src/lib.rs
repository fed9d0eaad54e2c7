//! Open Sound Control packet codec.
//!
//! Every OSC packet is either a [`Message`] (an address plus typed
//! arguments) or a [`Bundle`] (a [`TimeTag`] plus nested packets). On the
//! wire every field ends on a 4-byte boundary:
//! - strings and blobs are NUL padded, always by at least one byte
//! - numbers and time tags use one configurable [`ByteOrder`]
//! - a leading `#` marks a bundle, anything else is a message
//!
//! ```
//! use oscwire_codec::{decode, encode, Message, Packet};
//!
//! let packet: Packet = Message::with_argument("/test", 42)?.into();
//! let wire = encode(&packet)?;
//! assert_eq!(decode(&wire)?, packet);
//! # Ok::<(), oscwire_codec::CodecError>(())
//! ```

pub mod bundle;
pub mod byte_order;
pub mod codec;
pub mod error;
#[cfg(feature = "async")]
pub mod framed;
pub mod message;
pub mod packet;
pub mod tags;
pub mod time_tag;
pub mod value;
mod wire;

pub use bundle::{Bundle, BUNDLE_PREFIX};
pub use byte_order::ByteOrder;
pub use codec::{decode, encode, Codec};
pub use error::{CodecError, Result};
#[cfg(feature = "async")]
pub use framed::OscCodec;
pub use message::{Message, ADDRESS_PREFIX};
pub use packet::Packet;
pub use time_tag::{TimeTag, NTP_UNIX_OFFSET_SECS, TIME_TAG_SIZE};
pub use value::{Argument, Color, FromArgument};
