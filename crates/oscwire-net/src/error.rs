use std::net::SocketAddr;

/// Errors that can occur while receiving or transmitting OSC packets.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] oscwire_transport::TransportError),

    /// Packet could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] oscwire_codec::CodecError),

    /// A datagram could not be sent.
    #[error("error sending an OSC packet to {target}: {source}")]
    Send {
        target: SocketAddr,
        source: oscwire_transport::TransportError,
    },

    /// The socket accepted fewer bytes than the encoded packet.
    #[error("short send to {target}: {sent} of {len} bytes")]
    ShortSend {
        target: SocketAddr,
        sent: usize,
        len: usize,
    },

    /// The background receive thread panicked.
    #[error("receiver thread panicked")]
    ReceiverPanicked,
}

pub type Result<T> = std::result::Result<T, NetError>;
