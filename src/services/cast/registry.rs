use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::Stream;
use tokio::sync::{Mutex, RwLock, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, instrument, warn};

use crate::config::{BridgeConfig, BusKind};
use crate::services::mpris::{MprisDevice, MprisServer};
use crate::{BridgeError, Result};

use super::{
    ControlDispatcher, DeviceEvent, DeviceId, DeviceIdentity, DiscoveredDevice, DiscoveryEvent,
    ReceiverConnector, ReceiverControl, ReceiverNotification, SharedTranslator, StatusTranslator,
};

const EVENT_BUFFER: usize = 256;

/// How the registry sets up each device
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Bus to export MPRIS players on, `None` to keep devices off the bus
    pub bus: Option<BusKind>,

    /// Prefix of each player's well-known name
    pub namespace: String,

    /// Friendly-name substrings of receivers to skip
    pub ignored_devices: Vec<String>,

    /// Fold `PAUSED` into `PLAYING` like older bridges did
    pub collapse_paused: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self::from(&BridgeConfig::default())
    }
}

impl From<&BridgeConfig> for RegistryOptions {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            bus: Some(config.bus),
            namespace: config.namespace.clone(),
            ignored_devices: config.ignored_devices.clone(),
            collapse_paused: config.collapse_paused,
        }
    }
}

struct DeviceEntry {
    identity: Arc<RwLock<DeviceIdentity>>,
    translator: SharedTranslator,
    control: Arc<dyn ReceiverControl>,
    status_task: JoinHandle<()>,
    server: Option<Arc<MprisServer>>,
}

/// Set of currently known receivers.
///
/// Owns one translator per receiver, the task feeding it, and the receiver's
/// MPRIS export. Cloning yields another handle onto the same registry.
#[derive(Clone)]
pub struct DeviceRegistry {
    connector: Arc<dyn ReceiverConnector>,
    options: Arc<RegistryOptions>,
    devices: Arc<RwLock<HashMap<DeviceId, DeviceEntry>>>,
    connecting: Arc<Mutex<HashSet<DeviceId>>>,
    events_tx: broadcast::Sender<DeviceEvent>,
    device_list: Arc<watch::Sender<Vec<DeviceIdentity>>>,
}

impl DeviceRegistry {
    /// Create an empty registry
    pub fn new(connector: Arc<dyn ReceiverConnector>, options: RegistryOptions) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
        let (device_list, _) = watch::channel(Vec::new());

        Self {
            connector,
            options: Arc::new(options),
            devices: Arc::new(RwLock::new(HashMap::new())),
            connecting: Arc::new(Mutex::new(HashSet::new())),
            events_tx,
            device_list: Arc::new(device_list),
        }
    }

    /// Consume discovery events until the channel closes
    pub async fn run(&self, mut discovery: mpsc::Receiver<DiscoveryEvent>) {
        while let Some(event) = discovery.recv().await {
            self.handle(event).await;
        }
        debug!("Discovery channel closed");
    }

    /// Apply a single discovery event.
    ///
    /// Failures are logged and absorbed; one bad receiver never affects the
    /// others.
    pub async fn handle(&self, event: DiscoveryEvent) {
        match event {
            DiscoveryEvent::Appeared(device) => {
                let id = device.identity.id.clone();
                if let Err(e) = self.add(device).await {
                    warn!(device = %id, "Failed to add receiver: {e}");
                }
            }
            DiscoveryEvent::Updated(identity) => self.update(identity).await,
            DiscoveryEvent::Removed(id) => self.remove(&id).await,
        }
    }

    /// Register a receiver, connect to it and export it.
    ///
    /// Returns `false` if the receiver is ignored or already registered.
    ///
    /// # Errors
    /// Returns error if connecting or exporting fails
    #[instrument(skip(self, device), fields(device = %device.identity.id, name = %device.identity.name))]
    pub async fn add(&self, device: DiscoveredDevice) -> Result<bool> {
        if self.should_ignore(&device.identity.name) {
            info!("Ignoring receiver based on configuration");
            return Ok(false);
        }
        let id = device.identity.id.clone();
        {
            let devices = self.devices.read().await;
            let mut connecting = self.connecting.lock().await;
            if devices.contains_key(&id) || !connecting.insert(id.clone()) {
                debug!("Receiver already registered");
                return Ok(false);
            }
        }

        let result = self.connect_and_insert(device).await;
        self.connecting.lock().await.remove(&id);
        result
    }

    /// Connect, export and insert a receiver whose id is reserved
    async fn connect_and_insert(&self, device: DiscoveredDevice) -> Result<bool> {
        info!("Adding receiver");
        let link = self.connector.connect(&device).await?;
        let id = device.identity.id.clone();
        let identity = Arc::new(RwLock::new(device.identity));
        let translator = if self.options.collapse_paused {
            StatusTranslator::with_collapsed_pause()
        } else {
            StatusTranslator::new()
        }
        .shared();

        let server = match self.options.bus {
            Some(bus) => {
                let mpris = MprisDevice {
                    identity: Arc::clone(&identity),
                    translator: Arc::clone(&translator),
                    dispatcher: ControlDispatcher::new(Arc::clone(&link.control)),
                };
                match MprisServer::export(bus, &self.options.namespace, mpris).await {
                    Ok(server) => Some(Arc::new(server)),
                    Err(e) => {
                        if let Err(e) = link.control.disconnect().await {
                            debug!("Disconnect after failed export: {e}");
                        }
                        return Err(BridgeError::from(e));
                    }
                }
            }
            None => None,
        };

        let status_task = tokio::spawn(run_status_loop(
            Arc::clone(&identity),
            Arc::clone(&translator),
            link.notifications,
            self.events_tx.clone(),
            server.clone(),
        ));

        let entry = DeviceEntry {
            identity,
            translator,
            control: link.control,
            status_task,
            server,
        };
        self.devices.write().await.insert(id, entry);
        self.publish_device_list().await;

        info!("Receiver added");
        Ok(true)
    }

    /// Refresh a known receiver's name
    #[instrument(skip(self), fields(device = %identity.id))]
    pub async fn update(&self, identity: DeviceIdentity) {
        let renamed = {
            let devices = self.devices.read().await;
            let Some(entry) = devices.get(&identity.id) else {
                debug!("Update for unknown receiver");
                return;
            };
            let mut current = entry.identity.write().await;
            if current.name == identity.name {
                false
            } else {
                info!(old = %current.name, new = %identity.name, "Receiver renamed");
                current.name = identity.name;
                true
            }
        };

        if renamed {
            self.publish_device_list().await;
        } else {
            debug!("Receiver advertisement renewed");
        }
    }

    /// Forget a receiver.
    ///
    /// Stops routing its status, releases its bus name and closes its
    /// connection. Holders of its translator keep the last known state.
    #[instrument(skip(self), fields(device = %id))]
    pub async fn remove(&self, id: &DeviceId) {
        let Some(entry) = self.devices.write().await.remove(id) else {
            debug!("Removal of unknown receiver");
            return;
        };

        entry.status_task.abort();
        if let Err(e) = entry.status_task.await {
            debug!("Status task ended: {e}");
        }
        if let Some(server) = &entry.server {
            server.release().await;
        }
        if let Err(e) = entry.control.disconnect().await {
            debug!("Disconnect of removed receiver failed: {e}");
        }

        self.publish_device_list().await;
        info!("Receiver removed");
    }

    /// Remove every receiver
    pub async fn shutdown(&self) {
        let ids: Vec<DeviceId> = self.devices.read().await.keys().cloned().collect();
        for id in ids {
            self.remove(&id).await;
        }
    }

    /// Currently known receivers, ordered by id
    pub async fn devices(&self) -> Vec<DeviceIdentity> {
        let devices = self.devices.read().await;
        let mut identities = Vec::with_capacity(devices.len());
        for entry in devices.values() {
            identities.push(entry.identity.read().await.clone());
        }
        identities.sort_by(|a, b| a.id.cmp(&b.id));
        identities
    }

    /// Stream of the receiver list, starting with the current one
    pub fn devices_monitored(&self) -> impl Stream<Item = Vec<DeviceIdentity>> + Send {
        WatchStream::new(self.device_list.subscribe())
    }

    /// Translator of a receiver
    pub async fn translator(&self, id: &DeviceId) -> Option<SharedTranslator> {
        self.devices
            .read()
            .await
            .get(id)
            .map(|entry| Arc::clone(&entry.translator))
    }

    /// Control dispatcher of a receiver
    ///
    /// # Errors
    /// Returns `CastError::DeviceNotFound` if the receiver is not registered
    pub async fn dispatcher(&self, id: &DeviceId) -> Result<ControlDispatcher> {
        self.devices
            .read()
            .await
            .get(id)
            .map(|entry| ControlDispatcher::new(Arc::clone(&entry.control)))
            .ok_or_else(|| super::CastError::DeviceNotFound(id.clone()).into())
    }

    /// Subscribe to transition events of all receivers
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events_tx.subscribe()
    }

    fn should_ignore(&self, name: &str) -> bool {
        self.options
            .ignored_devices
            .iter()
            .any(|pattern| name.contains(pattern.as_str()))
    }

    async fn publish_device_list(&self) {
        let list = self.devices().await;
        self.device_list.send_replace(list);
    }
}

/// Single writer of a device's translator.
///
/// Notifications are applied strictly in arrival order.
async fn run_status_loop(
    identity: Arc<RwLock<DeviceIdentity>>,
    translator: SharedTranslator,
    mut notifications: mpsc::Receiver<ReceiverNotification>,
    events_tx: broadcast::Sender<DeviceEvent>,
    server: Option<Arc<MprisServer>>,
) {
    while let Some(notification) = notifications.recv().await {
        let (event, state_changed) = {
            let mut translator = translator.write().await;
            let before = translator.state();
            let event = match notification {
                ReceiverNotification::Status(status) => translator.observe(&status),
                ReceiverNotification::LoadFailed { error_code } => {
                    warn!(?error_code, "Receiver failed to load media");
                    Some(translator.load_failed())
                }
            };
            (event, before != translator.state())
        };

        if let Some(event) = event {
            let device = identity.read().await.clone();
            info!(device = %device.id, ?event, "Track transition");
            let _ = events_tx.send(DeviceEvent { device, event });
        } else if !state_changed {
            continue;
        }

        if let Some(server) = &server {
            if let Err(e) = server.notify_changed().await {
                debug!("Failed to announce changes: {e}");
            }
        }
    }
    debug!("Receiver notifications ended");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use futures::StreamExt;

    use super::*;
    use crate::services::cast::{
        CastError, MediaInfo, PlaybackState, RawStatus, ReceiverLink, TransitionEvent,
    };

    struct IdleReceiver;

    #[async_trait]
    impl ReceiverControl for IdleReceiver {
        async fn is_playing(&self) -> bool {
            false
        }

        async fn is_paused(&self) -> bool {
            false
        }

        async fn play(&self) -> std::result::Result<(), CastError> {
            Ok(())
        }

        async fn pause(&self) -> std::result::Result<(), CastError> {
            Ok(())
        }

        async fn stop(&self) -> std::result::Result<(), CastError> {
            Ok(())
        }

        async fn disconnect(&self) -> std::result::Result<(), CastError> {
            Ok(())
        }
    }

    /// Hands out channel-backed links and keeps the sending halves
    #[derive(Default)]
    struct ChannelConnector {
        connects: AtomicUsize,
        senders: Mutex<HashMap<DeviceId, mpsc::Sender<ReceiverNotification>>>,
    }

    impl ChannelConnector {
        fn sender(&self, id: &str) -> mpsc::Sender<ReceiverNotification> {
            self.senders
                .lock()
                .unwrap()
                .get(&DeviceId::new(id))
                .cloned()
                .unwrap()
        }
    }

    #[async_trait]
    impl ReceiverConnector for ChannelConnector {
        async fn connect(
            &self,
            device: &DiscoveredDevice,
        ) -> std::result::Result<ReceiverLink, CastError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            let (tx, rx) = mpsc::channel(16);
            self.senders
                .lock()
                .unwrap()
                .insert(device.identity.id.clone(), tx);
            Ok(ReceiverLink {
                control: Arc::new(IdleReceiver),
                notifications: rx,
            })
        }
    }

    /// Refuses the first connection attempt
    #[derive(Default)]
    struct RefusingOnceConnector {
        refused: AtomicBool,
        inner: ChannelConnector,
    }

    #[async_trait]
    impl ReceiverConnector for RefusingOnceConnector {
        async fn connect(
            &self,
            device: &DiscoveredDevice,
        ) -> std::result::Result<ReceiverLink, CastError> {
            if !self.refused.swap(true, Ordering::SeqCst) {
                return Err(CastError::ConnectFailed {
                    device: device.identity.id.clone(),
                    reason: "connection refused".to_string(),
                });
            }
            self.inner.connect(device).await
        }
    }

    fn options() -> RegistryOptions {
        RegistryOptions {
            bus: None,
            ignored_devices: vec!["Speaker Group".to_string()],
            ..RegistryOptions::default()
        }
    }

    fn appeared(uuid: &str, name: &str) -> DiscoveryEvent {
        DiscoveryEvent::Appeared(DiscoveredDevice {
            identity: DeviceIdentity::new(DeviceId::new(uuid), name),
            address: None,
            port: 8009,
            model: None,
        })
    }

    fn registry() -> (DeviceRegistry, Arc<ChannelConnector>) {
        let connector = Arc::new(ChannelConnector::default());
        let registry = DeviceRegistry::new(connector.clone(), options());
        (registry, connector)
    }

    async fn next_event(events: &mut broadcast::Receiver<DeviceEvent>) -> DeviceEvent {
        tokio::time::timeout(Duration::from_secs(2), events.recv())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn appeared_device_gets_a_translator() {
        let (registry, connector) = registry();

        registry.handle(appeared("u-1", "Kitchen")).await;
        registry.handle(appeared("u-1", "Kitchen")).await;

        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
        assert_eq!(
            registry.devices().await,
            vec![DeviceIdentity::new(DeviceId::new("u-1"), "Kitchen")]
        );
        let translator = registry.translator(&DeviceId::new("u-1")).await.unwrap();
        assert_eq!(translator.read().await.state(), PlaybackState::Stopped);
    }

    #[tokio::test]
    async fn concurrent_adds_connect_once() {
        let (registry, connector) = registry();
        let device = DiscoveredDevice {
            identity: DeviceIdentity::new(DeviceId::new("u-1"), "Kitchen"),
            address: None,
            port: 8009,
            model: None,
        };

        let (first, second) = tokio::join!(registry.add(device.clone()), registry.add(device));

        let mut added = vec![first.unwrap(), second.unwrap()];
        added.sort_unstable();
        assert_eq!(added, vec![false, true]);
        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
        assert_eq!(registry.devices().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_connect_allows_retry() {
        let connector = Arc::new(RefusingOnceConnector::default());
        let registry = DeviceRegistry::new(connector.clone(), options());
        let device = DiscoveredDevice {
            identity: DeviceIdentity::new(DeviceId::new("u-1"), "Kitchen"),
            address: None,
            port: 8009,
            model: None,
        };

        assert!(registry.add(device.clone()).await.is_err());
        assert!(registry.add(device).await.unwrap());

        assert_eq!(connector.inner.connects.load(Ordering::SeqCst), 1);
        assert_eq!(registry.devices().await.len(), 1);
    }

    #[tokio::test]
    async fn ignored_devices_are_skipped() {
        let (registry, connector) = registry();

        registry.handle(appeared("g-1", "Living Speaker Group")).await;

        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
        assert!(registry.devices().await.is_empty());
    }

    #[tokio::test]
    async fn status_reports_become_events() {
        let (registry, connector) = registry();
        let mut events = registry.subscribe();
        registry.handle(appeared("u-1", "Kitchen")).await;
        let sender = connector.sender("u-1");

        sender
            .send(ReceiverNotification::Status(RawStatus::with_state("IDLE")))
            .await
            .unwrap();
        sender
            .send(ReceiverNotification::Status(
                RawStatus::with_state("BUFFERING").media(MediaInfo::new("u1", "audio/mp3")),
            ))
            .await
            .unwrap();
        sender
            .send(ReceiverNotification::LoadFailed {
                error_code: Some(104),
            })
            .await
            .unwrap();

        let changed = next_event(&mut events).await;
        assert_eq!(changed.device.name, "Kitchen");
        assert!(matches!(changed.event, TransitionEvent::TrackChanged(_)));
        assert_eq!(changed.event.track().uri.as_deref(), Some("u1"));

        let failed = next_event(&mut events).await;
        assert!(matches!(failed.event, TransitionEvent::TrackFailed(_)));
    }

    #[tokio::test]
    async fn removed_device_freezes_last_snapshot() {
        let (registry, connector) = registry();
        let mut events = registry.subscribe();
        registry.handle(appeared("u-1", "Kitchen")).await;
        connector
            .sender("u-1")
            .send(ReceiverNotification::Status(
                RawStatus::with_state("PLAYING").media(MediaInfo::new("u1", "audio/mp3")),
            ))
            .await
            .unwrap();
        next_event(&mut events).await;
        let held = registry.translator(&DeviceId::new("u-1")).await.unwrap();

        registry.handle(DiscoveryEvent::Removed(DeviceId::new("u-1"))).await;

        assert!(registry.translator(&DeviceId::new("u-1")).await.is_none());
        assert!(registry.dispatcher(&DeviceId::new("u-1")).await.is_err());
        assert!(registry.devices().await.is_empty());
        let translator = held.read().await;
        assert_eq!(translator.state(), PlaybackState::Playing);
        assert_eq!(translator.snapshot().uri.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn update_renames_device() {
        let (registry, _connector) = registry();
        let mut list = Box::pin(registry.devices_monitored());
        assert!(list.next().await.unwrap().is_empty());

        registry.handle(appeared("u-1", "Kitchen")).await;
        registry
            .handle(DiscoveryEvent::Updated(DeviceIdentity::new(
                DeviceId::new("u-1"),
                "Cuisine",
            )))
            .await;

        assert_eq!(registry.devices().await[0].name, "Cuisine");
        let latest = list.next().await.unwrap();
        assert_eq!(latest[0].name, "Cuisine");
    }

    #[tokio::test]
    async fn removing_unknown_device_is_harmless() {
        let (registry, _connector) = registry();

        registry.remove(&DeviceId::new("nope")).await;
        registry.shutdown().await;

        assert!(registry.devices().await.is_empty());
    }
}
