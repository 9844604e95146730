use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::warn;
use zbus::zvariant::{OwnedValue, Value};

use crate::services::cast::{PlaybackState, StatusTranslator};

use super::utils;

/// MIME types advertised on the root interface
pub const SUPPORTED_MIME_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/x-mpeg",
    "video/mpeg",
    "video/x-mpeg",
    "video/mpeg-system",
    "video/x-mpeg-system",
    "video/mp4",
    "audio/mp4",
    "video/x-msvideo",
    "video/quicktime",
    "application/ogg",
    "application/x-ogg",
    "video/x-ms-asf",
    "video/x-ms-asf-plugin",
    "application/x-mplayer2",
    "video/x-ms-wmv",
    "video/x-google-vlc-plugin",
    "audio/wav",
    "audio/x-wav",
    "audio/3gpp",
    "video/3gpp",
    "audio/3gpp2",
    "video/3gpp2",
    "video/divx",
    "video/flv",
    "video/x-flv",
    "video/x-matroska",
    "audio/x-matroska",
    "application/xspf+xml",
];

/// Desktop entry advertised on the root interface
pub const DESKTOP_ENTRY: &str = "Chromecast";

/// URI schemes advertised on the root interface
pub const SUPPORTED_URI_SCHEMES: &[&str] = &[
    "file", "http", "https", "rtsp", "realrtsp", "pnm", "ftp", "mtp", "smb", "mms", "mmsu", "mmst",
    "mmsh", "unsv", "itpc", "icyx", "rtmp", "rtp", "dccp", "dvd", "vcd",
];

/// MPRIS `PlaybackStatus` string for a playback state
pub fn playback_status(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
        PlaybackState::Stopped => "Stopped",
    }
}

/// Metadata of the current track as exposed over MPRIS
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    /// `xesam:url`
    pub url: Option<String>,

    /// `xesam:artist`, the receiver name
    pub artist: String,

    /// `xesam:title`
    pub title: Option<String>,

    /// `mpris:artUrl`
    pub art_url: Option<String>,

    /// `mpris:length`
    pub length: Option<Duration>,
}

impl TrackMetadata {
    /// Encode as an MPRIS `a{sv}` metadata map
    pub fn to_mpris(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();

        if let Some(url) = &self.url {
            insert(&mut map, "xesam:url", url.clone());
        }
        insert(&mut map, "xesam:artist", vec![self.artist.clone()]);
        if let Some(title) = &self.title {
            insert(&mut map, "xesam:title", title.clone());
        }
        if let Some(art_url) = &self.art_url {
            insert(&mut map, "mpris:artUrl", art_url.clone());
        }
        if let Some(length) = self.length {
            insert(&mut map, "mpris:length", utils::to_mpris_seconds(length));
        }

        map
    }
}

fn insert(map: &mut HashMap<String, OwnedValue>, key: &str, value: impl Into<Value<'static>>) {
    match OwnedValue::try_from(value.into()) {
        Ok(value) => {
            map.insert(key.to_string(), value);
        }
        Err(e) => warn!("Dropping metadata entry {key}: {e}"),
    }
}

/// Dynamic player properties, derived from the translator on every read
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerProperties {
    /// Coarse state backing `PlaybackStatus`
    pub state: PlaybackState,

    /// Track metadata, `None` while stopped
    pub metadata: Option<TrackMetadata>,

    /// Elapsed position
    pub position: Duration,

    /// `CanPlay`: only a paused player can be resumed
    pub can_play: bool,

    /// `CanPause`: only a playing player can be paused
    pub can_pause: bool,
}

impl PlayerProperties {
    /// Read the current properties of a device
    pub fn read(device_name: &str, translator: &StatusTranslator, now: Instant) -> Self {
        let state = translator.state();
        let metadata = (state != PlaybackState::Stopped).then(|| {
            let track = translator.snapshot();
            TrackMetadata {
                url: track.uri,
                artist: device_name.to_string(),
                title: track.title,
                art_url: track.artwork,
                length: (track.duration > 0.0).then(|| Duration::from_secs_f64(track.duration)),
            }
        });

        Self {
            state,
            metadata,
            position: translator.position_at(now),
            can_play: state == PlaybackState::Paused,
            can_pause: state == PlaybackState::Playing,
        }
    }

    /// MPRIS `PlaybackStatus`
    pub fn playback_status(&self) -> &'static str {
        playback_status(self.state)
    }

    /// MPRIS `Metadata`, empty while stopped
    pub fn metadata_map(&self) -> HashMap<String, OwnedValue> {
        self.metadata
            .as_ref()
            .map(TrackMetadata::to_mpris)
            .unwrap_or_default()
    }
}
