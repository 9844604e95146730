use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::Result;
use crate::cli::formatting::format_device_event;
use crate::config::Config;
use crate::services::cast::{
    DEFAULT_CAST_PORT, DeviceId, DeviceIdentity, DeviceRegistry, DiscoveredDevice,
    RegistryOptions, ReplayConnector,
};

/// Bridge one recorded receiver until Ctrl-C is pressed
pub async fn run(
    config: &Config,
    file: PathBuf,
    name: String,
    uuid: String,
    interval_ms: u64,
) -> Result<()> {
    let connector = ReplayConnector::new(&file, Duration::from_millis(interval_ms));
    let registry = DeviceRegistry::new(
        Arc::new(connector),
        RegistryOptions::from(&config.bridge),
    );
    let mut events = registry.subscribe();

    let device = DiscoveredDevice {
        identity: DeviceIdentity::new(DeviceId::new(uuid), name),
        address: None,
        port: DEFAULT_CAST_PORT,
        model: Some("Recorded session".to_string()),
    };
    if !registry.add(device).await? {
        warn!("Receiver was not added, nothing to replay");
        return Ok(());
    }
    info!(recording = %file.display(), "Replaying, press Ctrl-C to stop");

    loop {
        tokio::select! {
            received = events.recv() => match received {
                Ok(event) => println!("{}", format_device_event(&event)),
                Err(RecvError::Lagged(missed)) => warn!(missed, "Dropped transition events"),
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    registry.shutdown().await;
    Ok(())
}
