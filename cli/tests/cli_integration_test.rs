use std::path::PathBuf;
use std::process::{Command, Output};

fn run_chirplink(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chirplink"))
        .args(args)
        .output()
        .expect("Failed to execute chirplink")
}

fn tmp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("chirplink_cli_{name}"))
}

#[test]
fn test_encode_then_decode_round_trip() {
    let wav = tmp_path("round_trip.wav");

    let encode = run_chirplink(&["encode", wav.to_str().unwrap(), "--message", "hello"]);
    assert!(encode.status.success(), "encode failed: {encode:?}");
    assert!(wav.exists(), "Output WAV was not created");

    let decode = run_chirplink(&["decode", wav.to_str().unwrap()]);
    assert!(decode.status.success(), "decode failed: {decode:?}");
    let stdout = String::from_utf8_lossy(&decode.stdout);
    assert!(
        stdout.contains("68656c6c6f"),
        "expected payload hex in output, got: {stdout}"
    );
    assert!(stdout.contains("hello"), "expected lossy text in output");
}

#[test]
fn test_encode_accepts_hex_payload() {
    let wav = tmp_path("hex_payload.wav");

    let encode = run_chirplink(&["encode", wav.to_str().unwrap(), "--hex", "00ff10"]);
    assert!(encode.status.success(), "encode failed: {encode:?}");

    let decode = run_chirplink(&["decode", wav.to_str().unwrap()]);
    assert!(decode.status.success());
    let stdout = String::from_utf8_lossy(&decode.stdout);
    assert!(stdout.contains("00ff10"), "got: {stdout}");
}

#[test]
fn test_encode_rejects_bad_hex() {
    let wav = tmp_path("bad_hex.wav");
    let output = run_chirplink(&["encode", wav.to_str().unwrap(), "--hex", "xyz"]);
    assert!(!output.status.success());
}

#[test]
fn test_encode_requires_payload() {
    let wav = tmp_path("no_payload.wav");
    let output = run_chirplink(&["encode", wav.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_decode_of_silence_fails() {
    let wav = tmp_path("silence.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&wav, spec).unwrap();
    for _ in 0..44100 {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();

    let output = run_chirplink(&["decode", wav.to_str().unwrap()]);
    assert!(
        !output.status.success(),
        "decoding pure silence must exit nonzero"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no frame decoded"), "got: {stderr}");
}
