use std::net::SocketAddr;

use bytes::BytesMut;
use oscwire_codec::{ByteOrder, Codec, Packet};
use oscwire_transport::UdpTransport;
use tracing::debug;

use crate::error::{NetError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Sends OSC packets to a single UDP target.
#[derive(Debug)]
pub struct UdpTransmitter {
    transport: UdpTransport,
    codec: Codec,
    target: SocketAddr,
    buf: BytesMut,
}

impl UdpTransmitter {
    /// Connect to `target`, encoding in network byte order.
    pub fn connect(target: SocketAddr) -> Result<Self> {
        Self::connect_with_byte_order(target, ByteOrder::default())
    }

    /// Connect to `target` with an explicit byte order.
    pub fn connect_with_byte_order(target: SocketAddr, byte_order: ByteOrder) -> Result<Self> {
        let transport = UdpTransport::connect(target)?;
        Ok(Self {
            transport,
            codec: Codec::new(byte_order),
            target,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.transport.local_addr()
    }

    /// Allow sending to subnet-directed broadcast addresses.
    pub fn set_broadcast(&self, enabled: bool) -> Result<()> {
        self.transport.set_broadcast(enabled).map_err(Into::into)
    }

    /// Encode `packet` and send it as one datagram. Returns the bytes sent.
    pub fn send(&mut self, packet: &Packet) -> Result<usize> {
        self.buf.clear();
        self.codec.encode_into(packet, &mut self.buf)?;

        let sent = self
            .transport
            .send(&self.buf)
            .map_err(|source| NetError::Send {
                target: self.target,
                source,
            })?;
        if sent != self.buf.len() {
            return Err(NetError::ShortSend {
                target: self.target,
                sent,
                len: self.buf.len(),
            });
        }

        debug!(target = %self.target, address = packet.address(), len = sent, "sent packet");
        Ok(sent)
    }
}
