#![cfg(feature = "cli")]

use std::net::UdpSocket;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn oscwire(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_oscwire"))
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("oscwire should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn encode_prints_wire_hex() {
    let output = oscwire(&["--format", "pretty", "encode", "/test", "i:42"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "2f746573740000002c6900000000002a");
}

#[test]
fn encode_little_endian() {
    let output = oscwire(&[
        "--format",
        "pretty",
        "--byte-order",
        "little",
        "encode",
        "/test",
        "i:42",
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).ends_with("2a000000"));
}

#[test]
fn encode_json_reports_size() {
    let output = oscwire(&["--format", "json", "encode", "/a", "T", "N"]);
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(value["size"], 8);
    assert_eq!(value["hex"], "2f6100002c544e00");
}

#[test]
fn encode_rejects_bad_address() {
    let output = oscwire(&["encode", "no-slash"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn encode_rejects_bad_argument() {
    let output = oscwire(&["encode", "/a", "q:1"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn encode_color_is_unsupported() {
    let output = oscwire(&["encode", "/a", "r:1,2,3,4"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("color"));
}

#[test]
fn decode_prints_json_message() {
    let output = oscwire(&["--format", "json", "decode", "2f746573740000002c6900000000002a"]);
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(value["size"], 16);
    assert_eq!(value["packet"]["kind"], "message");
    assert_eq!(value["packet"]["address"], "/test");
    assert_eq!(value["packet"]["arguments"][0]["value"], 42);
}

#[test]
fn encode_bundle_then_decode() {
    let encoded = oscwire(&[
        "--format",
        "pretty",
        "encode",
        "/b",
        "s:hi",
        "--bundle",
        "--time-tag",
        "2000",
    ]);
    assert!(encoded.status.success());
    let hex = stdout(&encoded);
    assert!(hex.starts_with("2362756e646c6500"));

    let decoded = oscwire(&["--format", "json", "decode", &hex]);
    assert!(decoded.status.success());
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&decoded)).expect("stdout should be JSON");
    assert_eq!(value["packet"]["kind"], "bundle");
    assert_eq!(value["packet"]["time_tag_millis"], 2000);
    assert_eq!(value["packet"]["elements"][0]["address"], "/b");
}

#[test]
fn decode_reads_file() {
    let path = std::env::temp_dir().join(format!("oscwire-decode-{}.bin", std::process::id()));
    std::fs::write(&path, b"/f\0\0,\0\0\0").expect("temp file should be writable");

    let output = oscwire(&["--format", "pretty", "decode", "--file", path.to_str().unwrap()]);
    let _ = std::fs::remove_file(&path);

    assert!(output.status.success());
    assert!(stdout(&output).contains("/f"));
}

#[test]
fn decode_malformed_is_data_invalid() {
    let output = oscwire(&["decode", "2362756e646c6500"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn decode_bad_hex_is_usage() {
    let output = oscwire(&["decode", "zz"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_prints_name() {
    let output = oscwire(&["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("oscwire "));
}

fn free_udp_port() -> u16 {
    UdpSocket::bind("127.0.0.1:0")
        .and_then(|socket| socket.local_addr())
        .expect("ephemeral port should be available")
        .port()
}

#[test]
fn listen_receives_sent_packet() {
    let port = free_udp_port();
    let port_arg = port.to_string();
    let mut child = Command::new(env!("CARGO_BIN_EXE_oscwire"))
        .args(["--log-level", "error", "--format", "json"])
        .args(["listen", &port_arg, "--bind", "127.0.0.1", "--count", "1"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("listen should start");

    // Datagrams sent before the listener binds are lost, so keep sending.
    let target = format!("127.0.0.1:{port}");
    let deadline = Instant::now() + Duration::from_secs(5);
    let status = loop {
        let sent = oscwire(&["send", &target, "/ping", "i:7"]);
        assert!(sent.status.success());
        if let Some(status) = child.try_wait().expect("child status should be readable") {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            panic!("listener did not exit after one packet");
        }
        thread::sleep(Duration::from_millis(100));
    };
    assert!(status.success());

    let output = child.wait_with_output().expect("listen output should be readable");
    let first = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string();
    let value: serde_json::Value = serde_json::from_str(&first).expect("line should be JSON");
    assert_eq!(value["packet"]["address"], "/ping");
    assert_eq!(value["packet"]["arguments"][0]["value"], 7);
}
