use std::str::FromStr;

use bytes::Bytes;
use oscwire_codec::tags::{self, is_payload_free};
use oscwire_codec::{Argument, Color, TimeTag};

use crate::exit::{CliError, CliResult};

/// Parse a `TAG:VALUE` argument, or a bare payload-free tag such as `T`.
pub fn parse_argument(input: &str) -> CliResult<Argument> {
    let (tag, value) = match input.split_once(':') {
        Some((tag, value)) => (tag, Some(value)),
        None => (input, None),
    };
    let mut chars = tag.chars();
    let tag = match (chars.next(), chars.next()) {
        (Some(tag), None) => tag,
        _ => {
            return Err(CliError::usage(format!(
                "argument {input:?} must start with a single type tag"
            )));
        }
    };

    let Some(value) = value else {
        return match tag {
            tags::TRUE => Ok(Argument::True),
            tags::FALSE => Ok(Argument::False),
            tags::NIL => Ok(Argument::Nil),
            tags::INFINITUM => Ok(Argument::Float(f32::INFINITY)),
            _ => Err(CliError::usage(format!(
                "argument {input:?} needs a value, e.g. {tag}:VALUE"
            ))),
        };
    };
    if is_payload_free(tag) {
        return Err(CliError::usage(format!("argument tag '{tag}' takes no value")));
    }

    match tag {
        tags::INT32 => number(value, tag).map(Argument::Int),
        tags::INT64 => number(value, tag).map(Argument::Long),
        tags::FLOAT32 => number(value, tag).map(Argument::Float),
        tags::FLOAT64 => number(value, tag).map(Argument::Double),
        tags::STRING | tags::SYMBOL => Ok(Argument::String(value.to_string())),
        tags::BLOB => hex::decode(value)
            .map(|data| Argument::Blob(Bytes::from(data)))
            .map_err(|err| CliError::usage(format!("blob {value:?} is not valid hex: {err}"))),
        tags::TIME_TAG => {
            let millis = number(value, tag)?;
            TimeTag::from_millis(millis)
                .map(Argument::TimeTag)
                .map_err(|err| CliError::usage(format!("time tag {value:?}: {err}")))
        }
        tags::CHAR => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Argument::Char(c)),
                _ => Err(CliError::usage(format!(
                    "char argument {value:?} must be exactly one character"
                ))),
            }
        }
        tags::COLOR => parse_color(value).map(Argument::Color),
        other => Err(CliError::usage(format!("unknown type tag '{other}'"))),
    }
}

fn number<T: FromStr>(value: &str, tag: char) -> CliResult<T> {
    value.trim().parse().map_err(|_| {
        CliError::usage(format!(
            "{value:?} is not a valid {} value",
            tags::tag_name(tag)
        ))
    })
}

fn parse_color(value: &str) -> CliResult<Color> {
    let parts = value
        .split(',')
        .map(|part| number::<u8>(part, tags::COLOR))
        .collect::<CliResult<Vec<_>>>()?;
    match parts.as_slice() {
        [r, g, b, a] => Ok(Color::new(*r, *g, *b, *a)),
        _ => Err(CliError::usage(format!("color {value:?} must be R,G,B,A"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::USAGE;

    #[test]
    fn parses_numeric_arguments() {
        assert_eq!(parse_argument("i:42").unwrap(), Argument::Int(42));
        assert_eq!(parse_argument("i:-7").unwrap(), Argument::Int(-7));
        assert_eq!(
            parse_argument("h:5000000000").unwrap(),
            Argument::Long(5_000_000_000)
        );
        assert_eq!(parse_argument("f:1.5").unwrap(), Argument::Float(1.5));
        assert_eq!(parse_argument("d:0.25").unwrap(), Argument::Double(0.25));
    }

    #[test]
    fn string_values_keep_colons() {
        assert_eq!(
            parse_argument("s:host:port").unwrap(),
            Argument::String("host:port".to_string())
        );
        assert_eq!(parse_argument("s:").unwrap(), Argument::String(String::new()));
    }

    #[test]
    fn parses_payload_free_tags() {
        assert_eq!(parse_argument("T").unwrap(), Argument::True);
        assert_eq!(parse_argument("F").unwrap(), Argument::False);
        assert_eq!(parse_argument("N").unwrap(), Argument::Nil);
        assert_eq!(parse_argument("I").unwrap(), Argument::Float(f32::INFINITY));
    }

    #[test]
    fn parses_blob_char_time_tag_and_color() {
        assert_eq!(
            parse_argument("b:00ff10").unwrap(),
            Argument::Blob(Bytes::from_static(&[0x00, 0xff, 0x10]))
        );
        assert_eq!(parse_argument("c:x").unwrap(), Argument::Char('x'));
        assert_eq!(
            parse_argument("t:1000").unwrap(),
            Argument::TimeTag(TimeTag::from_millis(1000).unwrap())
        );
        assert_eq!(
            parse_argument("r:1,2,3,4").unwrap(),
            Argument::Color(Color::new(1, 2, 3, 4))
        );
    }

    #[test]
    fn rejects_bad_arguments() {
        for input in ["42", "x:1", "i:abc", "T:1", "i", "c:ab", "b:zz", "t:0", "r:1,2"] {
            let err = parse_argument(input).unwrap_err();
            assert_eq!(err.code, USAGE, "input {input:?}");
        }
    }
}
