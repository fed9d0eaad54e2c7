//! `tokio_util` codec for datagram transports.
//!
//! OSC over UDP carries exactly one packet per datagram, so the decoder
//! consumes whatever the transport hands it in one piece. Pair with
//! `tokio_util::udp::UdpFramed`.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::byte_order::ByteOrder;
use crate::codec::Codec;
use crate::error::CodecError;
use crate::packet::Packet;

/// Datagram codec yielding one [`Packet`] per datagram.
#[derive(Debug, Clone, Copy, Default)]
pub struct OscCodec {
    codec: Codec,
}

impl OscCodec {
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            codec: Codec::new(byte_order),
        }
    }
}

impl Decoder for OscCodec {
    type Item = Packet;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        let datagram = src.split();
        self.codec.decode(&datagram).map(Some)
    }
}

impl Encoder<Packet> for OscCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Packet, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.codec.encode_into(&item, dst)
    }
}

impl Encoder<&Packet> for OscCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &Packet, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.codec.encode_into(item, dst)
    }
}
