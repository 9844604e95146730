use std::{fs, io::ErrorKind, path::Path};

use tracing::debug;

use super::{Config, ConfigPaths};
use crate::{BridgeError, Result};

impl Config {
    /// Loads a configuration file.
    ///
    /// Fields missing from the file take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file cannot be read
    /// - The TOML content is invalid
    /// - A field holds an unusable value
    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| BridgeError::io(&e, path))?;
        let config = Self::from_toml(&content, Some(path))?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Loads the configuration from its default location.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load_default() -> Result<Config> {
        let path = ConfigPaths::main_config()?;
        match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content, Some(&path)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No configuration file, using defaults");
                Ok(Config::default())
            }
            Err(e) => Err(BridgeError::io(&e, &path)),
        }
    }

    /// Parses and validates a configuration from TOML text
    ///
    /// # Errors
    /// Returns an error if the TOML is invalid or a field holds an unusable value
    pub fn from_toml(content: &str, path: Option<&Path>) -> Result<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| BridgeError::toml_parse(e, path))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let namespace = &self.bridge.namespace;
        let well_formed = !namespace.is_empty()
            && namespace.split('.').all(|element| {
                !element.is_empty()
                    && !element.starts_with(|c: char| c.is_ascii_digit())
                    && element
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            });
        if !well_formed || !namespace.contains('.') {
            return Err(BridgeError::InvalidConfigField {
                field: "bridge.namespace".to_string(),
                reason: format!("'{namespace}' is not a valid D-Bus name prefix"),
            });
        }

        if self.bridge.ignored_devices.iter().any(String::is_empty) {
            return Err(BridgeError::InvalidConfigField {
                field: "bridge.ignored_devices".to_string(),
                reason: "an empty pattern would ignore every receiver".to_string(),
            });
        }

        Ok(())
    }
}
