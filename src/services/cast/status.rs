use serde::Deserialize;

/// Raw media status report as sent by the receiver.
///
/// Mirrors the shape of the Cast media channel `MEDIA_STATUS` entries. Every
/// field is optional: partial or malformed reports must never be rejected, so
/// absent values simply fall back to their empty defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStatus {
    /// `IDLE`, `BUFFERING`, `PLAYING` or `PAUSED`
    pub player_state: Option<String>,

    /// Qualifier attached to the `IDLE` state
    pub idle_reason: Option<String>,

    /// Loaded media, only present when it changed since the last report
    pub media: Option<MediaInfo>,
}

/// Description of the loaded media item
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaInfo {
    /// Content URI
    pub content_id: Option<String>,

    /// MIME type of the content
    pub content_type: Option<String>,

    /// Duration in seconds
    pub duration: Option<f64>,

    /// Generic metadata block
    pub metadata: Option<MediaMetadata>,
}

/// Metadata attached to a media item
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MediaMetadata {
    /// Track title
    pub title: Option<String>,

    /// Artwork, best first
    pub images: Vec<Image>,
}

/// Artwork reference
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Image {
    /// Artwork URL
    pub url: String,
}

/// Typed view of the raw player state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPlayerState {
    /// Nothing playing
    Idle,

    /// Loading or rebuffering
    Buffering,

    /// Playing
    Playing,

    /// Paused
    Paused,

    /// Absent or not recognised
    Unknown,
}

impl From<Option<&str>> for RawPlayerState {
    fn from(state: Option<&str>) -> Self {
        match state {
            Some("IDLE") => Self::Idle,
            Some("BUFFERING") => Self::Buffering,
            Some("PLAYING") => Self::Playing,
            Some("PAUSED") => Self::Paused,
            _ => Self::Unknown,
        }
    }
}

/// Typed view of the raw idle reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleReason {
    /// Playback reached the end of the media
    Finished,

    /// The receiver failed to play the media
    Error,

    /// A sender stopped playback
    Cancelled,

    /// Another load replaced the media
    Interrupted,

    /// Absent or not recognised
    Unknown,
}

impl From<Option<&str>> for IdleReason {
    fn from(reason: Option<&str>) -> Self {
        match reason {
            Some("FINISHED") => Self::Finished,
            Some("ERROR") => Self::Error,
            Some("CANCELLED") => Self::Cancelled,
            Some("INTERRUPTED") => Self::Interrupted,
            _ => Self::Unknown,
        }
    }
}

impl RawStatus {
    /// Build a report carrying only a player state
    pub fn with_state(player_state: &str) -> Self {
        Self {
            player_state: Some(player_state.to_string()),
            ..Default::default()
        }
    }

    /// Attach an idle reason
    pub fn idle_reason(mut self, reason: &str) -> Self {
        self.idle_reason = Some(reason.to_string());
        self
    }

    /// Attach a media block
    pub fn media(mut self, media: MediaInfo) -> Self {
        self.media = Some(media);
        self
    }

    /// Typed player state
    pub fn player_state(&self) -> RawPlayerState {
        RawPlayerState::from(self.player_state.as_deref())
    }

    /// Typed idle reason
    pub fn reason(&self) -> IdleReason {
        IdleReason::from(self.idle_reason.as_deref())
    }
}

impl MediaInfo {
    /// Build a media block from a content URI and MIME type
    pub fn new(content_id: &str, content_type: &str) -> Self {
        Self {
            content_id: Some(content_id.to_string()),
            content_type: Some(content_type.to_string()),
            ..Default::default()
        }
    }

    /// First artwork URL, if any
    pub fn artwork(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.images.first())
            .map(|image| image.url.as_str())
    }

    /// Track title, if any
    pub fn title(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.title.as_deref())
    }
}
