use bytes::BytesMut;

use crate::bundle::{Bundle, BUNDLE_PREFIX};
use crate::byte_order::ByteOrder;
use crate::error::{CodecError, Result};
use crate::message::Message;
use crate::wire::ByteCursor;

/// Top-level unit of exchange: a message or a bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Message(Message),
    Bundle(Bundle),
}

impl Packet {
    pub fn is_bundle(&self) -> bool {
        matches!(self, Self::Bundle(_))
    }

    /// The message address, or the `#bundle` prefix for bundles.
    pub fn address(&self) -> &str {
        match self {
            Self::Message(message) => message.address(),
            Self::Bundle(_) => BUNDLE_PREFIX,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::Message(message) => Some(message),
            Self::Bundle(_) => None,
        }
    }

    pub fn as_bundle(&self) -> Option<&Bundle> {
        match self {
            Self::Bundle(bundle) => Some(bundle),
            Self::Message(_) => None,
        }
    }

    pub(crate) fn encode_into(&self, order: ByteOrder, dst: &mut BytesMut) -> Result<()> {
        match self {
            Self::Message(message) => message.encode_into(order, dst),
            Self::Bundle(bundle) => bundle.encode_into(order, dst),
        }
    }

    /// A leading `#` selects a bundle; anything else is read as a message.
    pub(crate) fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        match cursor.peek() {
            None => Err(CodecError::malformed(cursor.position(), "empty packet")),
            Some(b'#') => Bundle::decode_from(cursor).map(Self::Bundle),
            Some(_) => Message::decode_from(cursor).map(Self::Message),
        }
    }
}

impl From<Message> for Packet {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}

impl From<Bundle> for Packet {
    fn from(bundle: Bundle) -> Self {
        Self::Bundle(bundle)
    }
}
