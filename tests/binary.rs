use std::io::Write;
use std::process::{Command, Output, Stdio};

const BINARY: &str = env!("CARGO_BIN_EXE_ocdeflate");

fn binary_output(args: &[&str]) -> Output {
    Command::new(BINARY)
        .args(args)
        .output()
        .unwrap_or_else(|error| panic!("failed to run {BINARY}: {error}"))
}

fn piped_output(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(BINARY)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|error| panic!("failed to spawn {BINARY}: {error}"));
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin)
        .expect("write stdin");
    child.wait_with_output().expect("wait for child")
}

#[test]
fn help_lists_usage() {
    let output = binary_output(&["--help"]);
    assert!(output.status.success(), "--help should succeed");
    assert!(
        output.stderr.is_empty(),
        "help output should not write to stderr"
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("ocdeflate"));
}

#[test]
fn without_subcommand_shows_usage_and_fails() {
    let output = binary_output(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));
}

#[test]
fn standard_streams_round_trip() {
    let payload = b"piped through standard input and standard output\n".repeat(200);

    let compressed = piped_output(&["compress", "-f", "gzip", "-"], &payload);
    assert!(compressed.status.success());
    assert_eq!(&compressed.stdout[..2], &[0x1f, 0x8b]);

    let restored = piped_output(&["decompress", "--format", "gz"], &compressed.stdout);
    assert!(restored.status.success());
    assert_eq!(restored.stdout, payload);
}

#[test]
fn corrupt_stream_exits_with_status_two() {
    let output = piped_output(&["decompress", "-f", "zlib"], b"not a zlib stream");
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("ocdeflate: "));
}

#[test]
fn crc32_of_standard_input() {
    let output = piped_output(&["crc32"], b"123456789");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"3421780262\n");
}

#[test]
fn level_falls_back_to_environment() {
    let payload = b"environment supplied level ".repeat(100);

    let output = Command::new(BINARY)
        .args(["compress", "-f", "zlib"])
        .env("OC_DEFLATE_LEVEL", "1")
        .env_remove("OC_DEFLATE_FORMAT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            child
                .stdin
                .take()
                .expect("stdin is piped")
                .write_all(&payload)?;
            child.wait_with_output()
        })
        .expect("run with environment");
    assert!(output.status.success());
    // FLEVEL 0 in the zlib header marks the fastest setting.
    assert_eq!(&output.stdout[..2], &[0x78, 0x01]);

    let rejected = Command::new(BINARY)
        .args(["compress"])
        .env("OC_DEFLATE_LEVEL", "99")
        .stdin(Stdio::null())
        .output()
        .expect("run with bad environment");
    assert_eq!(rejected.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("OC_DEFLATE_LEVEL"));
}
