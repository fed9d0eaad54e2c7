use std::fs;

use oscwire_codec::{ByteOrder, Codec};

use crate::cmd::DecodeArgs;
use crate::exit::{codec_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_packet, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat, byte_order: ByteOrder) -> CliResult<i32> {
    let bytes = resolve_bytes(&args)?;
    let packet = Codec::new(byte_order)
        .decode(&bytes)
        .map_err(|err| codec_error("decode failed", err))?;
    print_packet(&packet, Some(bytes.len()), format);
    Ok(SUCCESS)
}

fn resolve_bytes(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    match &args.hex {
        Some(text) => parse_hex(text),
        None => Err(CliError::new(USAGE, "either HEX or --file is required")),
    }
}

fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.strip_prefix("0x").unwrap_or(compact.as_str());
    hex::decode(compact).map_err(|err| CliError::new(USAGE, format!("invalid hex input: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_ignores_whitespace_and_prefix() {
        assert_eq!(parse_hex("2f 74 00 00").unwrap(), b"/t\0\0");
        assert_eq!(parse_hex("0x2c000000").unwrap(), b",\0\0\0");
    }

    #[test]
    fn odd_length_hex_is_usage_error() {
        assert_eq!(parse_hex("abc").unwrap_err().code, USAGE);
    }
}
