use oscwire_codec::ByteOrder;
use oscwire_net::UdpTransmitter;
use serde_json::json;

use crate::cmd::SendArgs;
use crate::exit::{net_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

pub fn run(args: SendArgs, format: OutputFormat, byte_order: ByteOrder) -> CliResult<i32> {
    let packet = args.packet.to_packet()?;

    let mut transmitter = UdpTransmitter::connect_with_byte_order(args.target, byte_order)
        .map_err(|err| net_error("connect failed", err))?;
    if args.broadcast {
        transmitter
            .set_broadcast(true)
            .map_err(|err| net_error("enabling broadcast failed", err))?;
    }
    let sent = transmitter
        .send(&packet)
        .map_err(|err| net_error("send failed", err))?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "target": args.target.to_string(),
                "address": packet.address(),
                "size": sent,
            })
        ),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("sent {} ({sent} bytes) to {}", packet.address(), args.target);
        }
    }

    Ok(SUCCESS)
}
