use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use oscwire_codec::{ByteOrder, Codec, Packet};
use oscwire_transport::{TransportError, UdpEndpoint, UdpTransport};
use tracing::{debug, trace, warn};

use crate::error::{NetError, Result};
use crate::events::{dispatch, PacketHandler};

/// Largest possible UDP payload.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// How often a blocked receive wakes up to check for a stop request.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for a [`UdpReceiver`].
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Byte order of incoming packets. Default: big-endian.
    pub byte_order: ByteOrder,
    /// Receive buffer size; longer datagrams are truncated by the OS.
    pub buffer_size: usize,
    /// Read timeout used to poll the stop flag.
    pub poll_interval: Duration,
    /// Drop undecodable datagrams silently instead of calling
    /// [`PacketHandler::on_error`].
    pub consume_parse_errors: bool,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            consume_parse_errors: false,
        }
    }
}

/// Receives OSC packets on a UDP socket and dispatches them to a handler.
pub struct UdpReceiver {
    transport: UdpTransport,
    codec: Codec,
    config: ReceiverConfig,
    shutdown: Arc<AtomicBool>,
    running: AtomicBool,
}

impl UdpReceiver {
    /// Bind with the default configuration.
    pub fn bind(endpoint: &UdpEndpoint) -> Result<Self> {
        Self::bind_with_config(endpoint, ReceiverConfig::default())
    }

    /// Bind with explicit configuration.
    pub fn bind_with_config(endpoint: &UdpEndpoint, config: ReceiverConfig) -> Result<Self> {
        let transport = UdpTransport::bind(endpoint)?;
        transport.set_read_timeout(Some(config.poll_interval))?;
        Ok(Self {
            transport,
            codec: Codec::new(config.byte_order),
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
            running: AtomicBool::new(false),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.transport.local_addr()
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// True while [`UdpReceiver::run`] is looping.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Ask a running loop to return after its current receive.
    ///
    /// A stopped receiver stays stopped; a later `run` returns immediately.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// A cloneable handle that stops this receiver, for use from handlers
    /// or other threads.
    pub fn stop_signal(&self) -> StopSignal {
        StopSignal(Arc::clone(&self.shutdown))
    }

    /// Receive and decode a single datagram.
    ///
    /// Returns `Ok(None)` when the poll interval elapses or the datagram is
    /// empty, and `Err(NetError::Codec(_))` when it does not decode.
    pub fn recv_packet(&self, buf: &mut [u8]) -> Result<Option<(Packet, SocketAddr)>> {
        let (len, from) = match self.transport.recv_from(buf) {
            Ok(received) => received,
            Err(err) if err.is_timeout() => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if len == 0 {
            trace!(%from, "ignoring empty datagram");
            return Ok(None);
        }
        let packet = self.codec.decode(&buf[..len])?;
        trace!(%from, len, address = packet.address(), "received packet");
        Ok(Some((packet, from)))
    }

    /// Receive until stopped, dispatching every packet to `handler`.
    ///
    /// Decode failures are reported and skipped; socket failures end the loop.
    pub fn run<H: PacketHandler + ?Sized>(&self, handler: &mut H) -> Result<()> {
        self.running.store(true, Ordering::SeqCst);
        let result = self.receive_loop(handler);
        self.running.store(false, Ordering::SeqCst);
        result
    }

    fn receive_loop<H: PacketHandler + ?Sized>(&self, handler: &mut H) -> Result<()> {
        let mut buf = vec![0u8; self.config.buffer_size];
        while !self.shutdown.load(Ordering::SeqCst) {
            match self.recv_packet(&mut buf) {
                Ok(Some((packet, _from))) => dispatch(&packet, handler),
                Ok(None) => {}
                Err(NetError::Codec(err)) => {
                    if self.config.consume_parse_errors {
                        debug!(error = %err, "dropping undecodable datagram");
                    } else {
                        warn!(error = %err, "received undecodable datagram");
                        handler.on_error(&err);
                    }
                }
                Err(err) => return Err(err),
            }
        }
        debug!(local_addr = %self.local_addr(), "receiver stopped");
        Ok(())
    }

    /// Move the receiver onto a background thread.
    pub fn spawn<H>(self, mut handler: H) -> Result<ReceiverHandle>
    where
        H: PacketHandler + Send + 'static,
    {
        let shutdown = Arc::clone(&self.shutdown);
        let local_addr = self.local_addr();
        let thread = std::thread::Builder::new()
            .name("oscwire-receiver".to_string())
            .spawn(move || self.run(&mut handler))
            .map_err(TransportError::Io)?;
        Ok(ReceiverHandle {
            shutdown,
            local_addr,
            thread: Some(thread),
        })
    }
}

/// Stops a [`UdpReceiver`] from anywhere.
#[derive(Debug, Clone)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle to a receiver running on a background thread.
///
/// Dropping the handle stops the receiver and waits for the thread.
pub struct ReceiverHandle {
    shutdown: Arc<AtomicBool>,
    local_addr: SocketAddr,
    thread: Option<JoinHandle<Result<()>>>,
}

impl ReceiverHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the receiver and wait for its loop to return.
    pub fn join(mut self) -> Result<()> {
        self.stop();
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| NetError::ReceiverPanicked)?,
            None => Ok(()),
        }
    }
}

impl Drop for ReceiverHandle {
    fn drop(&mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::mpsc;

    use oscwire_codec::{Bundle, CodecError, Message, TimeTag};

    use super::*;
    use crate::transmitter::UdpTransmitter;

    enum Event {
        Packet(Packet),
        Message(String),
        Bundle,
        Error,
    }

    struct ChannelHandler(mpsc::Sender<Event>);

    impl PacketHandler for ChannelHandler {
        fn on_packet(&mut self, packet: &Packet) {
            let _ = self.0.send(Event::Packet(packet.clone()));
        }

        fn on_bundle(&mut self, _bundle: &Bundle) {
            let _ = self.0.send(Event::Bundle);
        }

        fn on_message(&mut self, message: &Message) {
            let _ = self.0.send(Event::Message(message.address().to_string()));
        }

        fn on_error(&mut self, _error: &CodecError) {
            let _ = self.0.send(Event::Error);
        }
    }

    fn loopback() -> UdpEndpoint {
        UdpEndpoint::unicast(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    fn fast_config() -> ReceiverConfig {
        ReceiverConfig {
            poll_interval: Duration::from_millis(20),
            ..ReceiverConfig::default()
        }
    }

    fn next(rx: &mpsc::Receiver<Event>) -> Event {
        rx.recv_timeout(Duration::from_secs(3))
            .expect("event should arrive")
    }

    #[test]
    fn message_reaches_handler() {
        let receiver = UdpReceiver::bind_with_config(&loopback(), fast_config()).unwrap();
        let (tx, rx) = mpsc::channel();
        let handle = receiver.spawn(ChannelHandler(tx)).unwrap();

        let mut transmitter = UdpTransmitter::connect(handle.local_addr()).unwrap();
        let sent: Packet = Message::with_argument("/hello", 1).unwrap().into();
        transmitter.send(&sent).unwrap();

        assert!(matches!(next(&rx), Event::Packet(p) if p == sent));
        assert!(matches!(next(&rx), Event::Message(a) if a == "/hello"));

        handle.join().unwrap();
    }

    #[test]
    fn bundle_events_follow_append_order() {
        let receiver = UdpReceiver::bind_with_config(&loopback(), fast_config()).unwrap();
        let (tx, rx) = mpsc::channel();
        let handle = receiver.spawn(ChannelHandler(tx)).unwrap();

        let t0 = TimeTag::from_millis(1_000).unwrap();
        let mut nested = Bundle::new(t0);
        nested.append(Message::new("/nested").unwrap()).unwrap();
        let mut bundle = Bundle::new(t0);
        bundle.append(Message::new("/a").unwrap()).unwrap();
        bundle.append(nested).unwrap();

        let mut transmitter = UdpTransmitter::connect(handle.local_addr()).unwrap();
        transmitter.send(&bundle.into()).unwrap();

        assert!(matches!(next(&rx), Event::Packet(p) if p.is_bundle()));
        assert!(matches!(next(&rx), Event::Bundle));
        assert!(matches!(next(&rx), Event::Message(a) if a == "/a"));
        assert!(matches!(next(&rx), Event::Bundle));
        assert!(matches!(next(&rx), Event::Message(a) if a == "/nested"));

        handle.join().unwrap();
    }

    #[test]
    fn garbage_is_reported_and_loop_continues() {
        let receiver = UdpReceiver::bind_with_config(&loopback(), fast_config()).unwrap();
        let (tx, rx) = mpsc::channel();
        let handle = receiver.spawn(ChannelHandler(tx)).unwrap();

        let raw = UdpTransport::connect(handle.local_addr()).unwrap();
        raw.send(b"no-slash\0\0\0\0,\0\0\0").unwrap();
        assert!(matches!(next(&rx), Event::Error));

        let mut transmitter = UdpTransmitter::connect(handle.local_addr()).unwrap();
        transmitter
            .send(&Message::new("/after").unwrap().into())
            .unwrap();
        assert!(matches!(next(&rx), Event::Packet(_)));

        handle.join().unwrap();
    }

    #[test]
    fn consumed_parse_errors_are_silent() {
        let config = ReceiverConfig {
            consume_parse_errors: true,
            ..fast_config()
        };
        let receiver = UdpReceiver::bind_with_config(&loopback(), config).unwrap();
        let (tx, rx) = mpsc::channel();
        let handle = receiver.spawn(ChannelHandler(tx)).unwrap();

        let raw = UdpTransport::connect(handle.local_addr()).unwrap();
        raw.send(b"#bundle\0").unwrap();
        let mut transmitter = UdpTransmitter::connect(handle.local_addr()).unwrap();
        transmitter.send(&Message::new("/ok").unwrap().into()).unwrap();

        // The first event must be the valid packet, not an error.
        assert!(matches!(next(&rx), Event::Packet(p) if p.address() == "/ok"));

        handle.join().unwrap();
    }

    #[test]
    fn recv_packet_times_out_to_none() {
        let receiver = UdpReceiver::bind_with_config(&loopback(), fast_config()).unwrap();
        let mut buf = [0u8; 128];
        assert!(receiver.recv_packet(&mut buf).unwrap().is_none());
    }

    #[test]
    fn stop_before_run_returns_immediately() {
        let receiver = UdpReceiver::bind_with_config(&loopback(), fast_config()).unwrap();
        receiver.stop_signal().stop();

        struct Never;
        impl PacketHandler for Never {}

        receiver.run(&mut Never).unwrap();
        assert!(!receiver.is_running());
    }

    #[test]
    fn little_endian_receiver() {
        let config = ReceiverConfig {
            byte_order: ByteOrder::LittleEndian,
            ..fast_config()
        };
        let receiver = UdpReceiver::bind_with_config(&loopback(), config).unwrap();
        let (tx, rx) = mpsc::channel();
        let handle = receiver.spawn(ChannelHandler(tx)).unwrap();

        let mut transmitter =
            UdpTransmitter::connect_with_byte_order(handle.local_addr(), ByteOrder::LittleEndian)
                .unwrap();
        let sent: Packet = Message::with_argument("/le", 258).unwrap().into();
        transmitter.send(&sent).unwrap();

        assert!(matches!(next(&rx), Event::Packet(p) if p == sent));
        handle.join().unwrap();
    }
}
