//! Configuration schema definitions and loading.
//!
//! Defines the configuration structure of the bridge: general settings and
//! the bridge section controlling bus export and discovery filtering. All
//! configurations are serializable to/from TOML format.

mod bridge;
mod general;
mod loading;
mod paths;

pub use bridge::{BridgeConfig, BusKind};
pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;

use serde::{Deserialize, Serialize};

/// Main configuration structure.
///
/// Represents the complete configuration schema that can be loaded
/// from TOML files. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Bridge settings.
    #[serde(default)]
    pub bridge: BridgeConfig,
}

#[cfg(test)]
mod tests;
