use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::byte_order::ByteOrder;
use crate::error::{CodecError, Result};
use crate::message::Message;
use crate::packet::Packet;
use crate::time_tag::TimeTag;
use crate::value::put_padded_string;
use crate::wire::ByteCursor;

/// Fixed prefix that opens every bundle.
pub const BUNDLE_PREFIX: &str = "#bundle";

/// A time-stamped, ordered collection of nested packets.
///
/// Wire format:
/// ```text
/// ┌──────────────┬────────────┬─────────────┬────────────┬─────┐
/// │ "#bundle\0"  │ Time tag   │ Length (4B) │ Packet     │ ... │
/// │ (8B)         │ (8B)       │             │ (Length B) │     │
/// └──────────────┴────────────┴─────────────┴────────────┴─────┘
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    time_tag: TimeTag,
    elements: Vec<Packet>,
}

impl Bundle {
    /// Create an empty bundle stamped with `time_tag`.
    pub fn new(time_tag: TimeTag) -> Self {
        Self {
            time_tag,
            elements: Vec::new(),
        }
    }

    pub fn time_tag(&self) -> TimeTag {
        self.time_tag
    }

    /// Nested packets in append order.
    pub fn elements(&self) -> &[Packet] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append a nested packet and return its index.
    ///
    /// A nested bundle must not be stamped earlier than this one.
    pub fn append(&mut self, packet: impl Into<Packet>) -> Result<usize> {
        let packet = packet.into();
        if let Packet::Bundle(nested) = &packet {
            if nested.time_tag < self.time_tag {
                return Err(CodecError::OrderingViolation {
                    parent: self.time_tag,
                    child: nested.time_tag,
                });
            }
        }
        self.elements.push(packet);
        Ok(self.elements.len() - 1)
    }

    /// Directly nested bundles, in append order.
    pub fn bundles(&self) -> Vec<&Bundle> {
        self.elements.iter().filter_map(Packet::as_bundle).collect()
    }

    /// Directly nested messages, in append order.
    pub fn messages(&self) -> Vec<&Message> {
        self.elements.iter().filter_map(Packet::as_message).collect()
    }

    pub(crate) fn encode_into(&self, order: ByteOrder, dst: &mut BytesMut) -> Result<()> {
        let start = dst.len();
        put_padded_string(dst, BUNDLE_PREFIX, start);
        self.time_tag.encode_into(order, dst);

        for element in &self.elements {
            let len_at = dst.len();
            dst.put_bytes(0, 4);
            element.encode_into(order, dst)?;

            let len = dst.len() - len_at - 4;
            if len % 4 != 0 {
                return Err(CodecError::Unaligned { len });
            }
            let len = i32::try_from(len).map_err(|_| {
                CodecError::malformed(len_at - start, "nested packet longer than i32::MAX")
            })?;
            dst[len_at..len_at + 4].copy_from_slice(&order.i32_bytes(len));
        }
        Ok(())
    }

    pub(crate) fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let prefix = cursor.read_string()?;
        if prefix != BUNDLE_PREFIX {
            return Err(CodecError::FormatMismatch(format!(
                "bundle prefix {prefix:?} is not {BUNDLE_PREFIX:?}"
            )));
        }

        let mut bundle = Self::new(TimeTag::decode_from(cursor)?);

        while cursor.has_remaining() {
            let offset = cursor.position();
            let len = cursor.read_i32()?;
            let len = usize::try_from(len)
                .map_err(|_| CodecError::malformed(offset, "negative nested packet length"))?;
            let packet_end = cursor
                .position()
                .checked_add(len)
                .filter(|end| *end <= cursor.end())
                .ok_or_else(|| {
                    CodecError::malformed(offset, "nested packet length exceeds remaining input")
                })?;

            let mut nested = cursor.bounded(packet_end)?;
            let packet = Packet::decode_from(&mut nested)?;
            trace!(offset, len, bundle = packet.is_bundle(), "decoded nested packet");

            bundle.append(packet)?;
            cursor.seek(packet_end);
        }

        Ok(bundle)
    }
}

impl Default for Bundle {
    /// An empty bundle stamped with the current time.
    fn default() -> Self {
        Self::new(TimeTag::now())
    }
}
