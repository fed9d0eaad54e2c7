use oscwire_codec::{ByteOrder, CodecError, Packet};
use oscwire_net::{PacketHandler, ReceiverConfig, StopSignal, UdpReceiver};
use oscwire_transport::UdpEndpoint;
use tracing::info;

use crate::cmd::ListenArgs;
use crate::exit::{net_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_packet, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat, byte_order: ByteOrder) -> CliResult<i32> {
    let endpoint = endpoint_for(&args);
    let config = ReceiverConfig {
        byte_order,
        consume_parse_errors: args.quiet_errors,
        ..ReceiverConfig::default()
    };
    let receiver = UdpReceiver::bind_with_config(&endpoint, config)
        .map_err(|err| net_error("bind failed", err))?;
    info!(
        local_addr = %receiver.local_addr(),
        transmission = endpoint.transmission.name(),
        "listening"
    );

    install_ctrlc_handler(receiver.stop_signal())?;

    let mut printer = Printer {
        format,
        count: args.count,
        printed: 0,
        stop: receiver.stop_signal(),
    };
    receiver
        .run(&mut printer)
        .map_err(|err| net_error("receive failed", err))?;

    Ok(SUCCESS)
}

fn endpoint_for(args: &ListenArgs) -> UdpEndpoint {
    if let Some(group) = args.multicast {
        UdpEndpoint::multicast(group, args.port)
    } else if args.broadcast {
        UdpEndpoint::broadcast(args.port)
    } else {
        UdpEndpoint::unicast(args.bind, args.port)
    }
}

/// Prints each top-level packet and stops after `count` of them.
struct Printer {
    format: OutputFormat,
    count: Option<usize>,
    printed: usize,
    stop: StopSignal,
}

impl PacketHandler for Printer {
    fn on_packet(&mut self, packet: &Packet) {
        if self.stop.is_stopped() {
            return;
        }
        print_packet(packet, None, self.format);
        self.printed = self.printed.saturating_add(1);

        if self.count.is_some_and(|count| self.printed >= count) {
            self.stop.stop();
        }
    }

    fn on_error(&mut self, error: &CodecError) {
        eprintln!("undecodable datagram: {error}");
    }
}

fn install_ctrlc_handler(stop: StopSignal) -> CliResult<()> {
    ctrlc::set_handler(move || stop.stop())
        .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
