use bytes::{Bytes, BytesMut};

use crate::byte_order::ByteOrder;
use crate::error::Result;
use crate::packet::Packet;
use crate::wire::ByteCursor;

/// Initial capacity for a single encoded packet.
const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Encodes and decodes packets with a fixed byte order.
///
/// `Codec` is `Copy` and holds no mutable state, so one instance can be
/// shared freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    byte_order: ByteOrder,
}

impl Codec {
    pub const fn new(byte_order: ByteOrder) -> Self {
        Self { byte_order }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Encode a packet into a fresh buffer.
    pub fn encode(&self, packet: &Packet) -> Result<Bytes> {
        let mut dst = BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY);
        self.encode_into(packet, &mut dst)?;
        Ok(dst.freeze())
    }

    /// Append an encoded packet to `dst`.
    ///
    /// Alignment is computed from where the packet starts, so `dst` may
    /// already hold unrelated bytes. On error `dst` may hold a partial packet.
    pub fn encode_into(&self, packet: &Packet, dst: &mut BytesMut) -> Result<()> {
        packet.encode_into(self.byte_order, dst)
    }

    /// Decode one packet from the whole of `bytes`.
    pub fn decode(&self, bytes: &[u8]) -> Result<Packet> {
        let mut cursor = 0;
        self.decode_at(bytes, &mut cursor, bytes.len())
    }

    /// Decode one packet from `bytes[*cursor..end]`, advancing `cursor` past it.
    pub fn decode_at(&self, bytes: &[u8], cursor: &mut usize, end: usize) -> Result<Packet> {
        let mut reader = ByteCursor::new(bytes, *cursor, end, self.byte_order)?;
        let packet = Packet::decode_from(&mut reader)?;
        *cursor = reader.position();
        Ok(packet)
    }
}

/// Encode a packet in network byte order.
pub fn encode(packet: &Packet) -> Result<Bytes> {
    Codec::default().encode(packet)
}

/// Decode a packet in network byte order.
pub fn decode(bytes: &[u8]) -> Result<Packet> {
    Codec::default().decode(bytes)
}
