//! cast-mpris - bridges Cast receivers on the local network to MPRIS players.

use std::{error::Error, process};

use cast_mpris::{
    cli::{Cli, formatting::format_error},
    tracing_config,
};
use clap::Parser;
use tracing::{Level, info, span};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    };

    tracing_config::init(config.general.log_level)?;
    let _span = span!(Level::INFO, "cast_mpris").entered();
    info!(bus = ?config.bridge.bus, "Starting cast-mpris");

    if let Err(e) = cli.run(config).await {
        eprintln!("{}", format_error(&e.to_string()));
        process::exit(1);
    }

    Ok(())
}
