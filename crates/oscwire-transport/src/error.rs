use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};

/// Errors that can occur in UDP transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Failed to connect a sending socket to the specified address.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Failed to join or leave a multicast group.
    #[error("multicast membership for {group} failed: {source}")]
    Multicast {
        group: IpAddr,
        source: std::io::Error,
    },

    /// A multicast endpoint was requested without a group address.
    #[error("multicast transmission requires a group address")]
    MissingMulticastGroup,

    /// The configured group is not a multicast address.
    #[error("{0} is not a multicast address")]
    NotMulticast(IpAddr),

    /// An I/O error occurred on the socket.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;

impl TransportError {
    /// True for the error a receive returns when its read timeout elapses.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            TransportError::Io(err)
                if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
        )
    }
}
