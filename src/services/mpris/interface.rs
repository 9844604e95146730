use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::debug;
use zbus::fdo;
use zbus::interface;
use zbus::zvariant::{ObjectPath, OwnedValue};

use crate::services::cast::{
    CastError, ControlDispatcher, ControlOutcome, DeviceIdentity, SharedTranslator,
};

use super::adapter::{
    DESKTOP_ENTRY, PlayerProperties, SUPPORTED_MIME_TYPES, SUPPORTED_URI_SCHEMES,
};
use super::utils;

/// Everything the MPRIS interfaces need to serve one receiver.
///
/// Reads go through the translator only, never through the receiver
/// connection; commands go through the dispatcher.
#[derive(Clone)]
pub struct MprisDevice {
    /// Receiver identity (the name may change while exported)
    pub identity: Arc<RwLock<DeviceIdentity>>,

    /// Translated playback state
    pub translator: SharedTranslator,

    /// Guarded control surface
    pub dispatcher: ControlDispatcher,
}

impl MprisDevice {
    async fn properties(&self) -> PlayerProperties {
        let name = self.identity.read().await.name.clone();
        let translator = self.translator.read().await;
        PlayerProperties::read(&name, &translator, Instant::now())
    }
}

fn control_result(result: Result<ControlOutcome, CastError>) -> fdo::Result<()> {
    match result {
        Ok(outcome) => {
            debug!(?outcome, "Control call handled");
            Ok(())
        }
        Err(e) => Err(fdo::Error::Failed(e.to_string())),
    }
}

fn string_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// `org.mpris.MediaPlayer2` root interface
pub struct RootInterface {
    device: MprisDevice,
}

impl RootInterface {
    /// Create the root interface for a device
    pub fn new(device: MprisDevice) -> Self {
        Self { device }
    }
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootInterface {
    async fn quit(&self) -> fdo::Result<()> {
        control_result(self.device.dispatcher.quit().await)
    }

    fn raise(&self) {}

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        ControlDispatcher::CAN_QUIT
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn fullscreen(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_set_fullscreen(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    async fn identity(&self) -> String {
        self.device.identity.read().await.name.clone()
    }

    #[zbus(property)]
    fn desktop_entry(&self) -> String {
        DESKTOP_ENTRY.to_string()
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        string_list(SUPPORTED_MIME_TYPES)
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        string_list(SUPPORTED_URI_SCHEMES)
    }
}

/// `org.mpris.MediaPlayer2.Player` interface
pub struct PlayerInterface {
    device: MprisDevice,
}

impl PlayerInterface {
    /// Create the player interface for a device
    pub fn new(device: MprisDevice) -> Self {
        Self { device }
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerInterface {
    async fn stop(&self) -> fdo::Result<()> {
        control_result(self.device.dispatcher.stop().await)
    }

    async fn play(&self) -> fdo::Result<()> {
        control_result(self.device.dispatcher.play().await)
    }

    async fn pause(&self) -> fdo::Result<()> {
        control_result(self.device.dispatcher.pause().await)
    }

    async fn play_pause(&self) -> fdo::Result<()> {
        control_result(self.device.dispatcher.play_pause().await)
    }

    // CanGoNext, CanGoPrevious and CanSeek are false: these are no-ops.
    fn next(&self) {}

    fn previous(&self) {}

    fn seek(&self, _offset: i64) {}

    fn set_position(&self, _track_id: ObjectPath<'_>, _position: i64) {}

    fn open_uri(&self, _uri: &str) {}

    #[zbus(property)]
    async fn playback_status(&self) -> String {
        self.device.properties().await.playback_status().to_string()
    }

    #[zbus(property)]
    async fn metadata(&self) -> HashMap<String, OwnedValue> {
        self.device.properties().await.metadata_map()
    }

    #[zbus(property)]
    async fn position(&self) -> f64 {
        utils::to_mpris_seconds(self.device.properties().await.position)
    }

    #[zbus(property)]
    async fn can_play(&self) -> bool {
        self.device.properties().await.can_play
    }

    #[zbus(property)]
    async fn can_pause(&self) -> bool {
        self.device.properties().await.can_pause
    }

    #[zbus(property)]
    fn loop_status(&self) -> String {
        "None".to_string()
    }

    #[zbus(property)]
    fn shuffle(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn minimum_rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn maximum_rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn volume(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }
}
