use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use oscwire_codec::{Argument, Bundle, Message, Packet};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PacketOutput<'a> {
    Message {
        address: &'a str,
        type_tag: &'a str,
        arguments: Vec<ArgumentOutput>,
    },
    Bundle {
        time_tag: String,
        time_tag_millis: u64,
        elements: Vec<PacketOutput<'a>>,
    },
}

#[derive(Serialize)]
struct ArgumentOutput {
    tag: char,
    kind: &'static str,
    value: Value,
}

#[derive(Serialize)]
struct PrintedOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<usize>,
    packet: PacketOutput<'a>,
}

/// Print a packet; `size` is the encoded length when known.
pub fn print_packet(packet: &Packet, size: Option<usize>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PrintedOutput {
                size,
                packet: packet_output(packet),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["DEPTH", "ADDRESS", "TYPE TAG", "ARGUMENTS"]);
            table_rows(&mut table, packet, 0);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if let Some(size) = size {
                println!("size={size}");
            }
            pretty(packet, 0);
        }
    }
}

/// Print encoded bytes as lowercase hex.
pub fn print_encoded(data: &[u8], format: OutputFormat) {
    let encoded = hex::encode(data);
    match format {
        OutputFormat::Json => {
            println!("{}", json!({ "size": data.len(), "hex": encoded }));
        }
        OutputFormat::Table | OutputFormat::Pretty => println!("{encoded}"),
    }
}

fn packet_output(packet: &Packet) -> PacketOutput<'_> {
    match packet {
        Packet::Message(message) => PacketOutput::Message {
            address: message.address(),
            type_tag: message.type_tag(),
            arguments: message
                .arguments()
                .iter()
                .map(|arg| ArgumentOutput {
                    tag: arg.type_tag(),
                    kind: arg.kind(),
                    value: argument_value(arg),
                })
                .collect(),
        },
        Packet::Bundle(bundle) => PacketOutput::Bundle {
            time_tag: bundle.time_tag().to_string(),
            time_tag_millis: bundle.time_tag().as_millis(),
            elements: bundle.elements().iter().map(packet_output).collect(),
        },
    }
}

fn argument_value(arg: &Argument) -> Value {
    match arg {
        Argument::Int(v) => json!(v),
        Argument::Long(v) => json!(v),
        // Non-finite floats have no JSON number form.
        Argument::Float(v) if v.is_finite() => json!(v),
        Argument::Float(v) => json!(v.to_string()),
        Argument::Double(v) if v.is_finite() => json!(v),
        Argument::Double(v) => json!(v.to_string()),
        Argument::String(v) => json!(v),
        Argument::Blob(v) => json!(hex::encode(v)),
        Argument::TimeTag(v) => json!(v.as_millis()),
        Argument::Char(v) => json!(v.to_string()),
        Argument::Color(c) => json!([c.r, c.g, c.b, c.a]),
        Argument::True => json!(true),
        Argument::False => json!(false),
        Argument::Nil => Value::Null,
    }
}

fn argument_text(arg: &Argument) -> String {
    match arg {
        Argument::String(v) => format!("{v:?}"),
        Argument::Blob(v) => format!("<blob {}>", hex::encode(v)),
        Argument::Char(v) => format!("{v:?}"),
        other => argument_value(other).to_string(),
    }
}

fn arguments_text(message: &Message) -> String {
    message
        .arguments()
        .iter()
        .map(argument_text)
        .collect::<Vec<_>>()
        .join(" ")
}

fn table_rows(table: &mut Table, packet: &Packet, depth: usize) {
    match packet {
        Packet::Message(message) => {
            table.add_row(vec![
                depth.to_string(),
                message.address().to_string(),
                message.type_tag().to_string(),
                arguments_text(message),
            ]);
        }
        Packet::Bundle(bundle) => {
            table.add_row(vec![
                depth.to_string(),
                bundle_label(bundle),
                String::new(),
                format!("{} elements", bundle.len()),
            ]);
            for element in bundle.elements() {
                table_rows(table, element, depth + 1);
            }
        }
    }
}

fn pretty(packet: &Packet, depth: usize) {
    let indent = "  ".repeat(depth);
    match packet {
        Packet::Message(message) => {
            println!(
                "{indent}{} {} {}",
                message.address(),
                message.type_tag(),
                arguments_text(message)
            );
        }
        Packet::Bundle(bundle) => {
            println!("{indent}{}", bundle_label(bundle));
            for element in bundle.elements() {
                pretty(element, depth + 1);
            }
        }
    }
}

fn bundle_label(bundle: &Bundle) -> String {
    format!("#bundle @{}", bundle.time_tag())
}

#[cfg(test)]
mod tests {
    use oscwire_codec::TimeTag;

    use super::*;

    #[test]
    fn json_shape_for_nested_bundle() {
        let mut bundle = Bundle::new(TimeTag::from_millis(1_500).unwrap());
        let mut message = Message::new("/a").unwrap();
        message.append(1);
        message.append("x");
        message.append_nil();
        bundle.append(message).unwrap();

        let value = serde_json::to_value(packet_output(&bundle.into())).unwrap();
        assert_eq!(value["kind"], "bundle");
        assert_eq!(value["time_tag"], "1.500");
        assert_eq!(value["time_tag_millis"], 1_500);
        let element = &value["elements"][0];
        assert_eq!(element["kind"], "message");
        assert_eq!(element["type_tag"], ",isN");
        assert_eq!(element["arguments"][0]["value"], 1);
        assert_eq!(element["arguments"][1]["kind"], "string");
        assert!(element["arguments"][2]["value"].is_null());
    }

    #[test]
    fn infinitum_is_serialized_as_text() {
        assert_eq!(argument_value(&Argument::Float(f32::INFINITY)), json!("inf"));
    }
}
