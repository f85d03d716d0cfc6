//! End-to-end tests for the crcforge command layer.
//!
//! These tests verify the complete flow:
//! 1. Configuration (preset or custom polynomial)
//! 2. Argument parsing
//! 3. Command execution through crcforge-core
//! 4. JSON report rendering

use crcforge_cli::{execute, CliError, Config, Report};
use crcforge_core::{Engine, Preset};
use serde_json::Value;
use std::collections::HashMap;

/// Build a config from explicit variables, ignoring the process environment
fn config_with(pairs: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

/// Run a command and parse its rendered JSON
fn run_json(args: &[&str], config: &Config) -> (Report, Value) {
    let (report, rendered) = execute(args, config).unwrap();
    let json: Value = serde_json::from_str(&rendered).unwrap();
    (report, json)
}

#[test]
fn compute_default_crc32_check_value() {
    let (report, json) = run_json(&["compute", "123456789"], &config_with(&[]));
    assert!(report.passed());
    assert_eq!(json["command"], "compute");
    assert_eq!(json["crc"], "crc32");
    assert_eq!(json["checksum"], "0xcbf43926");
    assert_eq!(json["data_len"], 9);
}

#[test]
fn compute_each_preset() {
    for preset in Preset::ALL {
        let config = config_with(&[("CRCFORGE_PRESET", preset.name())]);
        let (_, json) = run_json(&["compute", "123456789"], &config);
        let width = preset.engine().unwrap().width_bytes();
        let expected = format!("{:#0w$x}", preset.check(), w = 2 + 2 * width);
        assert_eq!(json["checksum"], expected.as_str(), "{preset}");
    }
}

#[test]
fn forge_raw_crc32_regression_vector() {
    let config = config_with(&[("CRCFORGE_POLY", "0x1db710640")]);
    let (report, json) = run_json(
        &["forge", "The quick brown fox jumps over the lazy dog", "deadbeef"],
        &config,
    );
    assert!(report.passed());
    assert_eq!(json["command"], "forge");
    assert_eq!(json["suffix"], "56da3bd2");
    assert_eq!(json["checksum"], "0xdeadbeef");
    assert_eq!(json["verified"], true);
}

#[test]
fn forge_hex_input_round_trips_through_engine() {
    let config = config_with(&[("CRCFORGE_PRESET", "crc64-xz")]);
    let (_, json) = run_json(&["forge", "--hex", "00ff10", "0x0123456789abcdef"], &config);

    let forged = hex::decode(json["forged"].as_str().unwrap()).unwrap();
    assert_eq!(&forged[..3], &[0x00, 0xFF, 0x10]);
    assert_eq!(forged.len(), 3 + 8);

    let engine = Preset::Crc64Xz.engine().unwrap();
    assert_eq!(engine.checksum(&forged), 0x0123_4567_89AB_CDEF);
}

#[test]
fn forge_rejects_target_wider_than_crc() {
    let config = config_with(&[("CRCFORGE_PRESET", "crc8")]);
    let err = execute(&["forge", "x", "0x1ff"], &config).unwrap_err();
    assert!(matches!(
        err,
        CliError::Core(crcforge_core::Error::ValueOutOfRange { .. })
    ));
    assert!(!err.is_usage());
}

#[test]
fn brute_crc8_single_byte() {
    let config = config_with(&[("CRCFORGE_PRESET", "crc8")]);
    let (report, json) = run_json(&["brute", "data", "ef"], &config);
    assert!(report.passed());
    assert_eq!(json["command"], "brute");
    assert_eq!(json["suffix"].as_str().unwrap().len(), 2);
    assert_eq!(json["checksum"], "0xef");
}

#[test]
fn brute_two_bytes_of_crc32() {
    let engine = Preset::Crc32.engine().unwrap();
    let target = engine.checksum(b"abc\x01\x02");
    let target_arg = format!("{target:x}");

    let (_, json) = run_json(&["brute", "abc", target_arg.as_str(), "2"], &config_with(&[]));
    assert_eq!(json["suffix"], "0102");
}

#[test]
fn brute_exhaustion_is_reported() {
    let engine = Preset::Crc32.engine().unwrap();
    let target = engine.checksum(b"abc\xFF\xFF");
    let target_arg = format!("{target:x}");
    let config = config_with(&[("CRCFORGE_SEARCH_LIMIT", "16")]);

    let err = execute(&["brute", "abc", target_arg.as_str(), "2"], &config).unwrap_err();
    assert!(matches!(
        err,
        CliError::Core(crcforge_core::Error::SearchExhausted { tried: 16 })
    ));
}

#[test]
fn tamper_preserves_crc_and_is_seeded() {
    let config = config_with(&[("CRCFORGE_SEED", "99")]);
    let (report, first) = run_json(&["tamper"], &config);
    let (_, second) = run_json(&["tamper"], &config);

    assert!(report.passed());
    assert_eq!(first["checksum_preserved"], true);
    assert_eq!(first["original_crc"], first["tampered_crc"]);
    assert_ne!(first["message"], first["tampered_message"]);
    assert_eq!(first["key"], second["key"]);
    assert_eq!(first["seed"], 99);
}

#[test]
fn tamper_message_shorter_than_crc_fails() {
    let config = config_with(&[("CRCFORGE_PRESET", "crc64-go-iso")]);
    let err = execute(&["tamper", "short"], &config).unwrap_err();
    assert!(matches!(
        err,
        CliError::Core(crcforge_core::Error::DeltaTooShort { .. })
    ));
}

#[test]
fn selftest_passes() {
    let (report, json) = run_json(&["selftest"], &config_with(&[]));
    assert!(report.passed());
    assert_eq!(json["passed"], true);
    assert_eq!(json["tamper_passed"], true);

    let cases = json["cases"].as_array().unwrap();
    assert_eq!(cases.len(), 5);
    assert!(cases.iter().all(|case| case["passed"] == true));
    assert_eq!(cases[0]["suffix"], "56da3bd2");
    assert_eq!(cases[4]["target"], "0xef");
}

#[test]
fn invalid_polynomial_is_a_core_error() {
    let config = config_with(&[("CRCFORGE_POLY", "0x3db710640")]);
    let err = execute(&["compute", "x"], &config).unwrap_err();
    assert!(matches!(
        err,
        CliError::Core(crcforge_core::Error::InvalidPolynomial { .. })
    ));
}

#[test]
fn usage_errors() {
    let config = config_with(&[]);
    assert!(execute::<&str>(&[], &config).unwrap_err().is_usage());
    assert!(execute(&["forge", "x"], &config).unwrap_err().is_usage());
    assert!(execute(&["compute", "--hex", "0g"], &config)
        .unwrap_err()
        .is_usage());
}

#[test]
fn custom_masks_apply() {
    let config = config_with(&[
        ("CRCFORGE_POLY", "0x105EC76F1"),
        ("CRCFORGE_INIT_XOR", "0x12345678"),
        ("CRCFORGE_END_XOR", "0x0"),
    ]);
    let (_, json) = run_json(&["forge", "payload", "cafebabe"], &config);

    let forged = hex::decode(json["forged"].as_str().unwrap()).unwrap();
    let engine = Engine::new(0x1_05EC_76F1, 0x1234_5678, 0).unwrap();
    assert_eq!(engine.checksum(&forged), 0xCAFE_BABE);
}

#[test]
fn oversized_mask_is_rejected() {
    let config = config_with(&[
        ("CRCFORGE_POLY", "0x1DB710640"),
        ("CRCFORGE_INIT_XOR", "0x1FFFFFFFFFFFFFFFF"),
    ]);
    let err = execute(&["compute", "x"], &config).unwrap_err();
    assert!(matches!(err, CliError::MaskOutOfRange { .. }));
    assert!(!err.is_usage());
}

#[test]
fn dash_data_after_command() {
    let (_, json) = run_json(&["compute", "-h"], &config_with(&[]));
    let engine = Preset::Crc32.engine().unwrap();
    let expected = format!("{:#010x}", engine.checksum(b"-h"));
    assert_eq!(json["checksum"], expected.as_str());
    assert_eq!(json["data_len"], 2);
}
