use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};
use tracing::{debug, info, warn};

use crate::error::{Result, TransportError};

/// How a receiving socket is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransmissionType {
    /// Bind the configured local address.
    #[default]
    Unicast,
    /// Bind the wildcard address and join a multicast group.
    Multicast,
    /// Bind the wildcard address with broadcast enabled.
    Broadcast,
    /// Same socket setup as [`TransmissionType::Broadcast`], for subnet-local senders.
    LocalBroadcast,
}

impl TransmissionType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Unicast => "unicast",
            Self::Multicast => "multicast",
            Self::Broadcast => "broadcast",
            Self::LocalBroadcast => "local-broadcast",
        }
    }
}

/// Where and how to listen for datagrams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdpEndpoint {
    /// Local address for unicast. Ignored by the other transmission types.
    pub address: IpAddr,
    pub port: u16,
    pub transmission: TransmissionType,
    /// Required for [`TransmissionType::Multicast`].
    pub multicast_group: Option<IpAddr>,
}

impl UdpEndpoint {
    /// Unicast on a specific local address.
    pub fn unicast(address: IpAddr, port: u16) -> Self {
        Self {
            address,
            port,
            transmission: TransmissionType::Unicast,
            multicast_group: None,
        }
    }

    /// Unicast on every IPv4 interface.
    pub fn any(port: u16) -> Self {
        Self::unicast(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)
    }

    /// Join `group` on every interface.
    pub fn multicast(group: IpAddr, port: u16) -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port,
            transmission: TransmissionType::Multicast,
            multicast_group: Some(group),
        }
    }

    pub fn broadcast(port: u16) -> Self {
        Self {
            transmission: TransmissionType::Broadcast,
            ..Self::any(port)
        }
    }

    pub fn local_broadcast(port: u16) -> Self {
        Self {
            transmission: TransmissionType::LocalBroadcast,
            ..Self::any(port)
        }
    }

    fn bind_addr(&self) -> Result<SocketAddr> {
        let ip = match self.transmission {
            TransmissionType::Unicast => self.address,
            TransmissionType::Multicast => match self.group()? {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
            },
            TransmissionType::Broadcast | TransmissionType::LocalBroadcast => {
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            }
        };
        Ok(SocketAddr::new(ip, self.port))
    }

    fn group(&self) -> Result<IpAddr> {
        let group = self
            .multicast_group
            .ok_or(TransportError::MissingMulticastGroup)?;
        if !group.is_multicast() {
            return Err(TransportError::NotMulticast(group));
        }
        Ok(group)
    }
}

/// A bound UDP socket carrying one OSC packet per datagram.
///
/// Multicast memberships are dropped when the transport is dropped.
pub struct UdpTransport {
    socket: UdpSocket,
    local_addr: SocketAddr,
    transmission: TransmissionType,
    multicast_group: Option<IpAddr>,
}

impl UdpTransport {
    /// Bind a receiving socket for `endpoint`.
    pub fn bind(endpoint: &UdpEndpoint) -> Result<Self> {
        let addr = endpoint.bind_addr()?;
        let socket = match endpoint.transmission {
            TransmissionType::Multicast => bind_shared(addr),
            _ => UdpSocket::bind(addr),
        }
        .map_err(|source| TransportError::Bind { addr, source })?;

        let mut multicast_group = None;
        match endpoint.transmission {
            TransmissionType::Unicast => {}
            TransmissionType::Multicast => {
                let group = endpoint.group()?;
                join(&socket, group)?;
                multicast_group = Some(group);
            }
            TransmissionType::Broadcast | TransmissionType::LocalBroadcast => {
                socket.set_broadcast(true)?;
            }
        }

        let local_addr = socket.local_addr()?;
        info!(
            %local_addr,
            transmission = endpoint.transmission.name(),
            group = ?multicast_group,
            "listening on udp socket"
        );

        Ok(Self {
            socket,
            local_addr,
            transmission: endpoint.transmission,
            multicast_group,
        })
    }

    /// Open a sending socket connected to `target`.
    ///
    /// Broadcast is enabled automatically when `target` is the limited
    /// broadcast address; use [`UdpTransport::set_broadcast`] for
    /// subnet-directed broadcasts.
    pub fn connect(target: SocketAddr) -> Result<Self> {
        let local = match target {
            SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        let socket = UdpSocket::bind(local).map_err(|source| TransportError::Bind {
            addr: local,
            source,
        })?;

        let transmission = match target.ip() {
            IpAddr::V4(ip) if ip.is_broadcast() => {
                socket.set_broadcast(true)?;
                TransmissionType::Broadcast
            }
            ip if ip.is_multicast() => TransmissionType::Multicast,
            _ => TransmissionType::Unicast,
        };

        socket
            .connect(target)
            .map_err(|source| TransportError::Connect {
                addr: target,
                source,
            })?;
        let local_addr = socket.local_addr()?;
        debug!(%local_addr, %target, "connected udp socket");

        Ok(Self {
            socket,
            local_addr,
            transmission,
            multicast_group: None,
        })
    }

    /// Receive one datagram (blocking, subject to the read timeout).
    pub fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        Ok(self.socket.recv_from(buf)?)
    }

    /// Send one datagram to the connected peer.
    pub fn send(&self, data: &[u8]) -> Result<usize> {
        Ok(self.socket.send(data)?)
    }

    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.socket.set_read_timeout(timeout).map_err(Into::into)
    }

    pub fn set_broadcast(&self, enabled: bool) -> Result<()> {
        self.socket.set_broadcast(enabled).map_err(Into::into)
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The peer this socket is connected to, if any.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.socket.peer_addr().ok()
    }

    pub fn transmission(&self) -> TransmissionType {
        self.transmission
    }

    /// The multicast group currently joined, if any.
    pub fn multicast_group(&self) -> Option<IpAddr> {
        self.multicast_group
    }

    /// Leave the joined multicast group. A no-op for other transports.
    pub fn leave_multicast(&mut self) -> Result<()> {
        if let Some(group) = self.multicast_group.take() {
            leave(&self.socket, group)?;
            debug!(%group, "left multicast group");
        }
        Ok(())
    }
}

impl Drop for UdpTransport {
    fn drop(&mut self) {
        if let Err(err) = self.leave_multicast() {
            warn!(error = %err, "failed to leave multicast group");
        }
    }
}

impl std::fmt::Debug for UdpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpTransport")
            .field("local_addr", &self.local_addr)
            .field("transmission", &self.transmission)
            .field("multicast_group", &self.multicast_group)
            .finish()
    }
}

/// Bind with address reuse so several receivers can share a multicast port.
fn bind_shared(addr: SocketAddr) -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    // BSD-derived stacks only share a wildcard bind with SO_REUSEPORT.
    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "dragonfly"
    ))]
    socket.set_reuse_port(true)?;
    socket.bind(&addr.into())?;
    Ok(socket.into())
}

fn join(socket: &UdpSocket, group: IpAddr) -> Result<()> {
    let joined = match group {
        IpAddr::V4(g) => socket.join_multicast_v4(&g, &Ipv4Addr::UNSPECIFIED),
        IpAddr::V6(g) => socket.join_multicast_v6(&g, 0),
    };
    joined.map_err(|source| TransportError::Multicast { group, source })
}

fn leave(socket: &UdpSocket, group: IpAddr) -> Result<()> {
    let left = match group {
        IpAddr::V4(g) => socket.leave_multicast_v4(&g, &Ipv4Addr::UNSPECIFIED),
        IpAddr::V6(g) => socket.leave_multicast_v6(&g, 0),
    };
    left.map_err(|source| TransportError::Multicast { group, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback() -> UdpEndpoint {
        UdpEndpoint::unicast(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    #[test]
    fn unicast_send_and_receive() {
        let receiver = UdpTransport::bind(&loopback()).unwrap();
        let sender = UdpTransport::connect(receiver.local_addr()).unwrap();
        assert_eq!(sender.peer_addr(), Some(receiver.local_addr()));

        sender.send(b"/ping\0\0\0,\0\0\0").unwrap();

        let mut buf = [0u8; 64];
        receiver
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let (n, from) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"/ping\0\0\0,\0\0\0");
        assert_eq!(from.port(), sender.local_addr().port());
    }

    #[test]
    fn read_timeout_is_reported_as_timeout() {
        let receiver = UdpTransport::bind(&loopback()).unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_millis(10)))
            .unwrap();
        let mut buf = [0u8; 16];
        let err = receiver.recv_from(&mut buf).unwrap_err();
        assert!(err.is_timeout(), "{err}");
    }

    #[test]
    fn multicast_requires_group() {
        let endpoint = UdpEndpoint {
            multicast_group: None,
            ..UdpEndpoint::multicast(IpAddr::V4(Ipv4Addr::new(239, 0, 0, 1)), 0)
        };
        assert!(matches!(
            UdpTransport::bind(&endpoint),
            Err(TransportError::MissingMulticastGroup)
        ));
    }

    #[test]
    fn multicast_group_must_be_multicast() {
        let endpoint = UdpEndpoint::multicast(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 0);
        assert!(matches!(
            UdpTransport::bind(&endpoint),
            Err(TransportError::NotMulticast(_))
        ));
    }

    #[test]
    fn broadcast_endpoints_bind_wildcard() {
        let endpoint = UdpEndpoint::broadcast(0);
        assert_eq!(
            endpoint.bind_addr().unwrap().ip(),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
        let transport = UdpTransport::bind(&UdpEndpoint::local_broadcast(0)).unwrap();
        assert_eq!(transport.transmission(), TransmissionType::LocalBroadcast);
        assert_eq!(transport.multicast_group(), None);
    }

    #[test]
    fn leave_multicast_is_noop_for_unicast() {
        let mut transport = UdpTransport::bind(&loopback()).unwrap();
        transport.leave_multicast().unwrap();
        assert_eq!(transport.multicast_group(), None);
    }

    #[test]
    fn multicast_receivers_share_a_port() {
        let group = IpAddr::V4(Ipv4Addr::new(239, 1, 2, 3));
        let first = UdpTransport::bind(&UdpEndpoint::multicast(group, 0)).unwrap();
        let port = first.local_addr().port();

        let second = UdpTransport::bind(&UdpEndpoint::multicast(group, port)).unwrap();
        assert_eq!(second.local_addr().port(), port);
        assert_eq!(first.multicast_group(), Some(group));
        assert_eq!(second.multicast_group(), Some(group));
    }
}
