use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::{Args, Subcommand};
use oscwire_codec::{Bundle, ByteOrder, Message, Packet, TimeTag};

use crate::argument::parse_argument;
use crate::exit::{codec_error, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a single packet.
    Send(SendArgs),
    /// Listen and print received packets.
    Listen(ListenArgs),
    /// Encode a packet and print it as hex.
    Encode(EncodeArgs),
    /// Decode a hex or binary packet and print it.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, byte_order: ByteOrder) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format, byte_order),
        Command::Listen(args) => listen::run(args, format, byte_order),
        Command::Encode(args) => encode::run(args, format, byte_order),
        Command::Decode(args) => decode::run(args, format, byte_order),
        Command::Version(args) => version::run(args),
    }
}

/// A message described on the command line.
#[derive(Args, Debug)]
pub struct PacketArgs {
    /// OSC address, e.g. /synth/freq.
    pub address: String,
    /// Arguments as TAG:VALUE (i:42, f:1.5, s:hi, b:00ff, t:MILLIS) or a bare T, F, N, I.
    pub args: Vec<String>,
    /// Wrap the message in a bundle.
    #[arg(long)]
    pub bundle: bool,
    /// Bundle time tag in milliseconds since 1900. Default: now.
    #[arg(long, value_name = "MILLIS", requires = "bundle")]
    pub time_tag: Option<u64>,
}

impl PacketArgs {
    pub fn to_packet(&self) -> CliResult<Packet> {
        let mut message =
            Message::new(self.address.as_str()).map_err(|err| codec_error("invalid address", err))?;
        for arg in &self.args {
            message.append(parse_argument(arg)?);
        }
        if !self.bundle {
            return Ok(message.into());
        }

        let time_tag = match self.time_tag {
            Some(millis) => {
                TimeTag::from_millis(millis).map_err(|err| codec_error("invalid time tag", err))?
            }
            None => TimeTag::now(),
        };
        let mut bundle = Bundle::new(time_tag);
        bundle
            .append(message)
            .map_err(|err| codec_error("invalid bundle", err))?;
        Ok(bundle.into())
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Destination, e.g. 127.0.0.1:9000.
    pub target: SocketAddr,
    #[command(flatten)]
    pub packet: PacketArgs,
    /// Allow sending to a broadcast address.
    #[arg(long)]
    pub broadcast: bool,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// UDP port to listen on.
    pub port: u16,
    /// Local address to bind for unicast.
    #[arg(long, default_value = "0.0.0.0", conflicts_with_all = ["multicast", "broadcast"])]
    pub bind: IpAddr,
    /// Join a multicast group.
    #[arg(long, value_name = "GROUP", conflicts_with = "broadcast")]
    pub multicast: Option<IpAddr>,
    /// Receive broadcast datagrams.
    #[arg(long)]
    pub broadcast: bool,
    /// Exit after receiving N packets.
    #[arg(long)]
    pub count: Option<usize>,
    /// Drop undecodable datagrams without reporting them.
    #[arg(long)]
    pub quiet_errors: bool,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub packet: PacketArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Packet bytes as hex; whitespace is ignored.
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read raw packet bytes from a file.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
