use std::fmt;
use std::net::IpAddr;
use std::time::Instant;

/// Stable identifier of a receiver (its hardware UUID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a DeviceId from the receiver UUID
    pub fn new(uuid: impl Into<String>) -> Self {
        Self(uuid.into())
    }

    /// Get the raw UUID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a receiver: stable id plus its friendly name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Stable receiver UUID
    pub id: DeviceId,

    /// Human-readable name, as advertised by the receiver
    pub name: String,
}

impl DeviceIdentity {
    /// Create a new identity
    pub fn new(id: DeviceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A receiver found on the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// Receiver identity
    pub identity: DeviceIdentity,

    /// Address the receiver control channel listens on
    pub address: Option<IpAddr>,

    /// Control channel port
    pub port: u16,

    /// Model name from the advertisement (if any)
    pub model: Option<String>,
}

/// Coarse playback state used for transition detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing loaded, or playback ended
    #[default]
    Stopped,

    /// Playing or buffering
    Playing,

    /// Paused by a controller
    Paused,
}

/// Kind of media loaded on the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackType {
    /// No content type known
    #[default]
    Undefined,

    /// Audio-only content
    Audio,

    /// Anything that is not audio
    Video,
}

impl PlaybackType {
    /// Derive the playback type from a raw content type
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            None => Self::Undefined,
            Some(kind) if kind.contains("audio") => Self::Audio,
            Some(_) => Self::Video,
        }
    }
}

/// The track currently known for a device
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackSnapshot {
    /// Content URI
    pub uri: Option<String>,

    /// Track title from the media metadata
    pub title: Option<String>,

    /// First artwork URL
    pub artwork: Option<String>,

    /// Duration in seconds, 0 if unknown
    pub duration: f64,

    /// Derived playback type
    pub playback_type: PlaybackType,

    /// When the current track started playing
    pub started_at: Option<Instant>,
}

impl TrackSnapshot {
    /// Whether all track metadata is at its empty default
    pub fn is_empty(&self) -> bool {
        self.uri.is_none()
            && self.title.is_none()
            && self.artwork.is_none()
            && self.duration == 0.0
            && self.playback_type == PlaybackType::Undefined
    }

    pub(crate) fn clear_media(&mut self) {
        self.uri = None;
        self.title = None;
        self.artwork = None;
        self.duration = 0.0;
        self.playback_type = PlaybackType::Undefined;
    }
}

/// Clean event derived from a raw status report
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionEvent {
    /// A new track started playing
    TrackChanged(TrackSnapshot),

    /// The track played to the end
    TrackStopped(TrackSnapshot),

    /// The receiver failed to load or play the track
    TrackFailed(TrackSnapshot),
}

impl TransitionEvent {
    /// The snapshot carried by the event
    pub fn track(&self) -> &TrackSnapshot {
        match self {
            Self::TrackChanged(track) | Self::TrackStopped(track) | Self::TrackFailed(track) => {
                track
            }
        }
    }
}

/// Transition event tagged with the device it came from
#[derive(Debug, Clone)]
pub struct DeviceEvent {
    /// Device that produced the event
    pub device: DeviceIdentity,

    /// The event itself
    pub event: TransitionEvent,
}
