use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, instrument, warn};

use super::{
    CastError, DiscoveredDevice, RawPlayerState, RawStatus, ReceiverConnector, ReceiverControl,
    ReceiverLink, ReceiverNotification,
};

const NOTIFICATION_BUFFER: usize = 64;

/// One line of a recorded receiver session
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RecordedNotification {
    Status(RawStatus),
    LoadFailed(Option<i64>),
}

impl From<RecordedNotification> for ReceiverNotification {
    fn from(recorded: RecordedNotification) -> Self {
        match recorded {
            RecordedNotification::Status(status) => Self::Status(status),
            RecordedNotification::LoadFailed(error_code) => Self::LoadFailed { error_code },
        }
    }
}

/// Parse a JSON-lines recording.
///
/// Each line is either `{"status": {...}}` holding a Cast media status, or
/// `{"load_failed": <code>}`. Blank lines and lines that fail to parse are
/// skipped.
pub fn parse_recording(text: &str) -> Vec<ReceiverNotification> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(
            |(index, line)| match serde_json::from_str::<RecordedNotification>(line) {
                Ok(recorded) => Some(recorded.into()),
                Err(e) => {
                    warn!(line = index + 1, "Skipping malformed recording line: {e}");
                    None
                }
            },
        )
        .collect()
}

#[derive(Debug, Default)]
struct ReplayState {
    playing: bool,
    paused: bool,
    connected: bool,
}

/// Virtual receiver driven by a recorded session.
///
/// Control commands update its media state and are echoed back as status
/// reports, the way a real receiver answers a command.
pub struct ReplayReceiver {
    state: RwLock<ReplayState>,
    notifications: mpsc::Sender<ReceiverNotification>,
}

impl ReplayReceiver {
    /// Start replaying `recording`, one notification every `interval`.
    pub fn start(recording: Vec<ReceiverNotification>, interval: Duration) -> ReceiverLink {
        let (tx, rx) = mpsc::channel(NOTIFICATION_BUFFER);
        let receiver = Arc::new(Self {
            state: RwLock::new(ReplayState {
                connected: true,
                ..Default::default()
            }),
            notifications: tx,
        });

        let feeder = Arc::clone(&receiver);
        tokio::spawn(async move {
            for notification in recording {
                if let Err(e) = feeder.deliver(notification).await {
                    debug!("Replay stopped: {e}");
                    return;
                }
                tokio::time::sleep(interval).await;
            }
            info!("Recording finished");
        });

        ReceiverLink {
            control: receiver,
            notifications: rx,
        }
    }

    async fn deliver(&self, notification: ReceiverNotification) -> Result<(), CastError> {
        {
            let mut state = self.state.write().await;
            if !state.connected {
                return Err(CastError::ControlFailed("receiver disconnected".to_string()));
            }
            match &notification {
                ReceiverNotification::Status(status) => {
                    state.playing = matches!(
                        status.player_state(),
                        RawPlayerState::Playing | RawPlayerState::Buffering
                    );
                    state.paused = status.player_state() == RawPlayerState::Paused;
                }
                ReceiverNotification::LoadFailed { .. } => {
                    state.playing = false;
                    state.paused = false;
                }
            }
        }

        self.notifications
            .send(notification)
            .await
            .map_err(|_| CastError::ControlFailed("status consumer gone".to_string()))
    }

    async fn answer(&self, player_state: &str) -> Result<(), CastError> {
        debug!(player_state, "Replay receiver answering command");
        self.deliver(ReceiverNotification::Status(RawStatus::with_state(
            player_state,
        )))
        .await
    }
}

#[async_trait]
impl ReceiverControl for ReplayReceiver {
    async fn is_playing(&self) -> bool {
        self.state.read().await.playing
    }

    async fn is_paused(&self) -> bool {
        self.state.read().await.paused
    }

    async fn play(&self) -> Result<(), CastError> {
        self.answer("PLAYING").await
    }

    async fn pause(&self) -> Result<(), CastError> {
        self.answer("PAUSED").await
    }

    async fn stop(&self) -> Result<(), CastError> {
        self.deliver(ReceiverNotification::Status(
            RawStatus::with_state("IDLE").idle_reason("CANCELLED"),
        ))
        .await
    }

    async fn disconnect(&self) -> Result<(), CastError> {
        info!("Replay receiver disconnected");
        self.state.write().await.connected = false;
        Ok(())
    }
}

/// Connects every discovered device to the same recorded session
pub struct ReplayConnector {
    recording: PathBuf,
    interval: Duration,
}

impl ReplayConnector {
    /// Create a connector replaying the recording at `path`
    pub fn new(path: impl AsRef<Path>, interval: Duration) -> Self {
        Self {
            recording: path.as_ref().to_path_buf(),
            interval,
        }
    }
}

#[async_trait]
impl ReceiverConnector for ReplayConnector {
    #[instrument(skip(self), fields(device = %device.identity.id))]
    async fn connect(&self, device: &DiscoveredDevice) -> Result<ReceiverLink, CastError> {
        let text = tokio::fs::read_to_string(&self.recording).await?;
        let recording = parse_recording(&text);
        info!(
            notifications = recording.len(),
            "Replaying {}",
            self.recording.display()
        );
        Ok(ReplayReceiver::start(recording, self.interval))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn parses_recording_and_skips_garbage() {
        let text = r#"
{"status": {"playerState": "IDLE"}}
not json
{"status": {"playerState": "BUFFERING", "media": {"contentId": "u1", "contentType": "audio/mp3"}}}

{"load_failed": 104}
{"load_failed": null}
"#;

        let notifications = parse_recording(text);

        assert_eq!(notifications.len(), 4);
        assert_eq!(
            notifications[0],
            ReceiverNotification::Status(RawStatus::with_state("IDLE"))
        );
        assert_eq!(
            notifications[2],
            ReceiverNotification::LoadFailed {
                error_code: Some(104)
            }
        );
        assert_eq!(
            notifications[3],
            ReceiverNotification::LoadFailed { error_code: None }
        );
    }

    #[tokio::test]
    async fn replays_in_order_and_tracks_state() {
        let recording = vec![
            ReceiverNotification::Status(RawStatus::with_state("BUFFERING")),
            ReceiverNotification::Status(RawStatus::with_state("PAUSED")),
        ];
        let mut link = ReplayReceiver::start(recording.clone(), Duration::ZERO);

        assert_eq!(link.notifications.recv().await.unwrap(), recording[0]);
        assert_eq!(link.notifications.recv().await.unwrap(), recording[1]);
        assert!(link.control.is_paused().await);
        assert!(!link.control.is_playing().await);
    }

    #[tokio::test]
    async fn commands_are_echoed_as_status() {
        let mut link = ReplayReceiver::start(Vec::new(), Duration::ZERO);

        link.control.pause().await.unwrap();

        assert_eq!(
            link.notifications.recv().await.unwrap(),
            ReceiverNotification::Status(RawStatus::with_state("PAUSED"))
        );
        assert!(link.control.is_paused().await);
    }

    #[tokio::test]
    async fn disconnected_receiver_rejects_commands() {
        let link = ReplayReceiver::start(Vec::new(), Duration::ZERO);

        link.control.disconnect().await.unwrap();

        assert!(link.control.play().await.is_err());
    }
}
