//! Unit tests for config module
//!
//! Tests configuration types, defaults, parsing and loading from disk.

#![allow(clippy::unwrap_used)]

use std::io::Write;

use crate::BridgeError;
use crate::config::{BridgeConfig, BusKind, Config, LogLevel};

#[test]
fn config_default() {
    let config = Config::default();

    assert_eq!(config.general.log_level, LogLevel::Info);
    assert_eq!(config.bridge.bus, BusKind::Session);
    assert_eq!(config.bridge.namespace, "org.mpris.MediaPlayer2");
    assert!(config.bridge.ignored_devices.is_empty());
    assert!(!config.bridge.collapse_paused);
}

#[test]
fn config_serialize_toml() {
    let toml_str = toml::to_string(&Config::default()).unwrap();

    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[bridge]"));
    assert!(toml_str.contains("bus = \"session\""));
}

#[test]
fn config_deserialize_toml() {
    let toml_str = r#"
        [general]
        log_level = "debug"

        [bridge]
        bus = "system"
        namespace = "org.example.Bridge"
        ignored_devices = ["Speaker Group", "Nest"]
        collapse_paused = true
    "#;

    let config = Config::from_toml(toml_str, None).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(
        config.bridge,
        BridgeConfig {
            bus: BusKind::System,
            namespace: "org.example.Bridge".to_string(),
            ignored_devices: vec!["Speaker Group".to_string(), "Nest".to_string()],
            collapse_paused: true,
        }
    );
}

#[test]
fn config_serialize_roundtrip() {
    let original = Config::default();

    let toml_str = toml::to_string(&original).unwrap();
    let deserialized: Config = toml::from_str(&toml_str).unwrap();

    assert_eq!(original, deserialized);
}

#[test]
fn config_minimal_toml() {
    let config = Config::from_toml("[general]\n", None).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn partial_bridge_section_keeps_other_defaults() {
    let config = Config::from_toml("[bridge]\ncollapse_paused = true\n", None).unwrap();

    assert!(config.bridge.collapse_paused);
    assert_eq!(config.bridge.namespace, "org.mpris.MediaPlayer2");
    assert_eq!(config.bridge.bus, BusKind::Session);
}

#[test]
fn unknown_bus_is_rejected() {
    let result = Config::from_toml("[bridge]\nbus = \"tcp\"\n", None);

    assert!(matches!(result, Err(BridgeError::TomlParseError { .. })));
}

#[test]
fn unknown_log_level_is_rejected() {
    let result = Config::from_toml("[general]\nlog_level = \"loud\"\n", None);

    assert!(matches!(result, Err(BridgeError::TomlParseError { .. })));
}

#[test]
fn malformed_namespace_is_rejected() {
    for namespace in ["", "nodots", "org..mpris", "org.1mpris", "org.mpris!"] {
        let toml_str = format!("[bridge]\nnamespace = \"{namespace}\"\n");

        let result = Config::from_toml(&toml_str, None);

        assert!(
            matches!(result, Err(BridgeError::InvalidConfigField { ref field, .. }) if field == "bridge.namespace"),
            "{namespace:?} accepted"
        );
    }
}

#[test]
fn empty_ignore_pattern_is_rejected() {
    let result = Config::from_toml("[bridge]\nignored_devices = [\"\"]\n", None);

    assert!(matches!(
        result,
        Err(BridgeError::InvalidConfigField { .. })
    ));
}

#[test]
fn load_reads_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[bridge]\nbus = \"system\"").unwrap();

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.bridge.bus, BusKind::System);
}

#[test]
fn load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    let result = Config::load(&dir.path().join("absent.toml"));

    assert!(matches!(result, Err(BridgeError::IoError { .. })));
}

#[test]
fn load_reports_file_on_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[bridge\nbus = ").unwrap();

    let result = Config::load(file.path());

    match result {
        Err(BridgeError::TomlParseError { location, .. }) => assert_ne!(location, "string"),
        other => panic!("unexpected result: {other:?}"),
    }
}
