#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use clap::Parser;

use super::formatting::{format_device_event, format_discovery_event};
use super::{Cli, Commands};
use crate::services::cast::{
    DeviceEvent, DeviceId, DeviceIdentity, DiscoveredDevice, DiscoveryEvent, TrackSnapshot,
    TransitionEvent,
};

#[test]
fn parses_discover_with_timeout() {
    let cli = Cli::try_parse_from(["cast-mpris", "discover", "--timeout", "5"]).unwrap();

    assert_eq!(cli.command, Commands::Discover { timeout: Some(5) });
    assert!(cli.config.is_none());
    assert!(!cli.system_bus);
}

#[test]
fn parses_replay_with_defaults() {
    let cli = Cli::try_parse_from(["cast-mpris", "replay", "session.jsonl"]).unwrap();

    assert_eq!(
        cli.command,
        Commands::Replay {
            file: PathBuf::from("session.jsonl"),
            name: "Replay".to_string(),
            uuid: "00000000000000000000000000000000".to_string(),
            interval_ms: 1000,
        }
    );
}

#[test]
fn global_flags_follow_subcommand() {
    let cli = Cli::try_parse_from([
        "cast-mpris",
        "replay",
        "session.jsonl",
        "--system-bus",
        "--config",
        "/tmp/bridge.toml",
    ])
    .unwrap();

    assert!(cli.system_bus);
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/bridge.toml")));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["cast-mpris"]).is_err());
}

#[test]
fn system_bus_flag_overrides_config() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "[bridge]\nbus = \"session\"\n").unwrap();
    let path = file.path().to_str().unwrap();
    let cli =
        Cli::try_parse_from(["cast-mpris", "--config", path, "--system-bus", "discover"]).unwrap();

    let config = cli.load_config().unwrap();

    assert_eq!(config.bridge.bus, crate::config::BusKind::System);
}

#[test]
fn explicit_config_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    let cli = Cli::try_parse_from(["cast-mpris", "--config", path.to_str().unwrap(), "discover"])
        .unwrap();

    assert!(cli.load_config().is_err());
}

#[test]
fn discovery_lines_name_the_receiver() {
    let identity = DeviceIdentity::new(DeviceId::new("abc"), "Kitchen");
    let appeared = DiscoveryEvent::Appeared(DiscoveredDevice {
        identity: identity.clone(),
        address: Some("192.168.1.20".parse().unwrap()),
        port: 8009,
        model: Some("Chromecast Audio".to_string()),
    });

    let line = format_discovery_event(&appeared);

    assert!(line.contains("Kitchen"));
    assert!(line.contains("192.168.1.20:8009"));
    assert!(format_discovery_event(&DiscoveryEvent::Removed(identity.id)).contains("abc"));
}

#[test]
fn transition_lines_prefer_title_over_uri() {
    let track = TrackSnapshot {
        uri: Some("http://host/a.mp3".to_string()),
        title: Some("Song".to_string()),
        ..Default::default()
    };
    let event = DeviceEvent {
        device: DeviceIdentity::new(DeviceId::new("abc"), "Kitchen"),
        event: TransitionEvent::TrackChanged(track),
    };

    let line = format_device_event(&event);

    assert!(line.contains("Kitchen: Song"));
}
