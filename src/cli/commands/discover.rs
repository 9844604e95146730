use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use crate::Result;
use crate::cli::formatting::format_discovery_event;
use crate::services::cast::{DiscoveryEvent, MdnsDiscovery};

const EVENT_BUFFER: usize = 32;

/// Print discovery events until the timeout passes or Ctrl-C is pressed
pub async fn run(timeout: Option<u64>) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<DiscoveryEvent>(EVENT_BUFFER);
    let discovery = MdnsDiscovery::start(tx)?;
    info!("Browsing for Cast receivers");

    let deadline = async {
        match timeout {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => println!("{}", format_discovery_event(&event)),
                None => break,
            },
            _ = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    discovery.stop();
    Ok(())
}
