use oscwire_codec::{ByteOrder, Codec};

use crate::cmd::EncodeArgs;
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat, byte_order: ByteOrder) -> CliResult<i32> {
    let packet = args.packet.to_packet()?;
    let wire = Codec::new(byte_order)
        .encode(&packet)
        .map_err(|err| codec_error("encode failed", err))?;
    print_encoded(&wire, format);
    Ok(SUCCESS)
}
