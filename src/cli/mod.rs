//! Command-line interface.
//!
//! Parses arguments with clap and routes each subcommand to its runner.

mod commands;
pub mod formatting;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::Result;
use crate::config::{BusKind, Config};

/// Command-line arguments of the `cast-mpris` binary
#[derive(Parser, Debug)]
#[command(name = "cast-mpris")]
#[command(about = "Expose Cast receivers as MPRIS media players", version)]
pub struct Cli {
    /// Configuration file, instead of the default location
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Export players on the system bus instead of the session bus
    #[arg(long, global = true)]
    pub system_bus: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Browse the network for Cast receivers and print what is found
    Discover {
        /// Stop after this many seconds instead of waiting for Ctrl-C
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Bridge a virtual receiver driven by a recorded session
    Replay {
        /// JSON-lines recording, one status report or load failure per line
        file: PathBuf,

        /// Friendly name of the virtual receiver
        #[arg(short, long, default_value = "Replay")]
        name: String,

        /// UUID of the virtual receiver
        #[arg(short, long, default_value = "00000000000000000000000000000000")]
        uuid: String,

        /// Delay between recorded notifications, in milliseconds
        #[arg(short, long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

impl Cli {
    /// Load the configuration this invocation asks for.
    ///
    /// An explicit `--config` file must exist; the default location may be
    /// absent. `--system-bus` overrides the configured bus.
    ///
    /// # Errors
    /// Returns error if the configuration cannot be read or parsed
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_default()?,
        };
        if self.system_bus {
            config.bridge.bus = BusKind::System;
        }
        Ok(config)
    }

    /// Run the selected subcommand to completion
    ///
    /// # Errors
    /// Returns error if the subcommand fails to start
    pub async fn run(self, config: Config) -> Result<()> {
        match self.command {
            Commands::Discover { timeout } => commands::discover::run(timeout).await,
            Commands::Replay {
                file,
                name,
                uuid,
                interval_ms,
            } => commands::replay::run(&config, file, name, uuid, interval_ms).await,
        }
    }
}

#[cfg(test)]
mod tests;
