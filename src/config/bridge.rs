use serde::{Deserialize, Serialize};

/// Message bus the MPRIS players are exported on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BusKind {
    /// The user's session bus, where media controllers look for players.
    #[default]
    Session,

    /// The system-wide bus.
    System,
}

/// Settings for how receivers are bridged onto the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Bus to export players on.
    pub bus: BusKind,

    /// Prefix of each player's well-known name, completed with
    /// `.Chromecast<uuid>`.
    pub namespace: String,

    /// Receivers whose friendly name contains any of these substrings are
    /// never bridged.
    pub ignored_devices: Vec<String>,

    /// Report paused receivers as playing, matching older bridges.
    pub collapse_paused: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bus: BusKind::Session,
            namespace: "org.mpris.MediaPlayer2".to_string(),
            ignored_devices: Vec::new(),
            collapse_paused: false,
        }
    }
}
