use std::collections::HashMap;
use std::net::IpAddr;

use mdns_sd::{ServiceDaemon, ServiceEvent, ServiceInfo};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::{CastError, DeviceId, DeviceIdentity, DiscoveredDevice};

/// mDNS service type advertised by Cast receivers
pub const CAST_SERVICE_TYPE: &str = "_googlecast._tcp.local.";

/// Default Cast control port
pub const DEFAULT_CAST_PORT: u16 = 8009;

/// Device lifecycle events produced by discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// A receiver appeared on the network
    Appeared(DiscoveredDevice),

    /// A known receiver renewed or changed its advertisement
    Updated(DeviceIdentity),

    /// A receiver disappeared
    Removed(DeviceId),
}

/// Maps mDNS instance names onto stable receiver identities.
///
/// Advertisements are removed by instance name, while the rest of the bridge
/// keys devices by UUID, so the mapping has to be remembered here.
#[derive(Debug, Default)]
pub struct DiscoveryTracker {
    known: HashMap<String, DeviceIdentity>,
}

impl DiscoveryTracker {
    /// Record a resolved advertisement.
    ///
    /// A different receiver taking over an instance name retires the old one.
    pub fn resolved(&mut self, fullname: &str, device: DiscoveredDevice) -> Vec<DiscoveryEvent> {
        match self
            .known
            .insert(fullname.to_string(), device.identity.clone())
        {
            Some(previous) if previous.id == device.identity.id => {
                vec![DiscoveryEvent::Updated(device.identity)]
            }
            Some(previous) => vec![
                DiscoveryEvent::Removed(previous.id),
                DiscoveryEvent::Appeared(device),
            ],
            None => vec![DiscoveryEvent::Appeared(device)],
        }
    }

    /// Record a removed advertisement
    pub fn removed(&mut self, fullname: &str) -> Vec<DiscoveryEvent> {
        self.known
            .remove(fullname)
            .map(|identity| DiscoveryEvent::Removed(identity.id))
            .into_iter()
            .collect()
    }
}

/// Build a device description from a resolved Cast advertisement.
///
/// Uses the `id` TXT record as identity and `fn` as friendly name. Returns
/// `None` when the advertisement carries no UUID.
pub fn device_from_service(info: &ServiceInfo) -> Option<DiscoveredDevice> {
    let uuid = info.get_property_val_str("id")?;
    let name = info
        .get_property_val_str("fn")
        .map(str::to_string)
        .unwrap_or_else(|| info.get_fullname().to_string());

    Some(DiscoveredDevice {
        identity: DeviceIdentity::new(DeviceId::new(uuid), name),
        address: info.get_addresses().iter().next().map(|addr| IpAddr::from(*addr)),
        port: match info.get_port() {
            0 => DEFAULT_CAST_PORT,
            port => port,
        },
        model: info.get_property_val_str("md").map(str::to_string),
    })
}

/// Cast receiver discovery over mDNS.
///
/// Owns its daemon explicitly; dropping or stopping it ends discovery.
pub struct MdnsDiscovery {
    daemon: ServiceDaemon,
    task: JoinHandle<()>,
}

impl MdnsDiscovery {
    /// Start browsing and forward events to `events`.
    ///
    /// # Errors
    /// Returns `CastError::DiscoveryFailed` if the mDNS daemon cannot start
    #[instrument(skip(events))]
    pub fn start(events: mpsc::Sender<DiscoveryEvent>) -> Result<Self, CastError> {
        info!("Starting Cast receiver discovery");
        let daemon =
            ServiceDaemon::new().map_err(|e| CastError::DiscoveryFailed(e.to_string()))?;
        let browser = daemon
            .browse(CAST_SERVICE_TYPE)
            .map_err(|e| CastError::DiscoveryFailed(e.to_string()))?;

        let task = tokio::spawn(async move {
            let mut tracker = DiscoveryTracker::default();

            while let Ok(event) = browser.recv_async().await {
                let discovered = match event {
                    ServiceEvent::ServiceResolved(info) => {
                        let Some(device) = device_from_service(&info) else {
                            warn!(fullname = info.get_fullname(), "Ignoring receiver without id");
                            continue;
                        };
                        tracker.resolved(info.get_fullname(), device)
                    }
                    ServiceEvent::ServiceRemoved(_, fullname) => tracker.removed(&fullname),
                    other => {
                        debug!("mDNS event: {other:?}");
                        continue;
                    }
                };

                for event in discovered {
                    if events.send(event).await.is_err() {
                        debug!("Discovery consumer gone");
                        return;
                    }
                }
            }
        });

        Ok(Self { daemon, task })
    }

    /// Stop browsing and shut the daemon down
    pub fn stop(self) {
        self.task.abort();
        if let Err(e) = self.daemon.shutdown() {
            warn!("Failed to shut down mDNS daemon: {e}");
        }
    }
}
