use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::{
    IdleReason, MediaInfo, PlaybackState, PlaybackType, RawPlayerState, RawStatus, TrackSnapshot,
    TransitionEvent,
};

/// Translator shared between the status task (single writer) and IPC readers.
pub type SharedTranslator = Arc<RwLock<StatusTranslator>>;

/// Elapsed-time clock for the current track.
///
/// Runs while playing, banks the elapsed time when paused or stopped.
#[derive(Debug, Default)]
struct PlaybackClock {
    running_since: Option<Instant>,
    banked: Duration,
    armed: bool,
}

impl PlaybackClock {
    fn restart(&mut self, now: Instant) {
        self.banked = Duration::ZERO;
        self.running_since = Some(now);
        self.armed = true;
    }

    fn freeze(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.banked += now.saturating_duration_since(since);
        }
    }

    fn resume(&mut self, now: Instant) {
        if self.armed && self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    fn disarm(&mut self, now: Instant) {
        self.freeze(now);
        self.armed = false;
    }

    fn elapsed(&self, now: Instant) -> Duration {
        let running = self
            .running_since
            .map_or(Duration::ZERO, |since| now.saturating_duration_since(since));
        self.banked + running
    }
}

/// Per-device state machine turning noisy receiver reports into clean
/// track-changed / track-stopped / track-failed events.
///
/// Each call to [`observe`](Self::observe) yields at most one event. The
/// translator never performs I/O and never suspends.
#[derive(Debug, Default)]
pub struct StatusTranslator {
    state: PlaybackState,
    track: TrackSnapshot,
    clock: PlaybackClock,
    collapse_paused: bool,
}

impl StatusTranslator {
    /// Create a translator with `PAUSED` treated as its own state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a translator that folds `PAUSED` into `PLAYING`.
    ///
    /// Matches the behaviour of older bridges, where a paused receiver is
    /// reported as playing and never produces a resume transition.
    pub fn with_collapsed_pause() -> Self {
        Self {
            collapse_paused: true,
            ..Self::default()
        }
    }

    /// Wrap the translator for sharing with IPC readers
    pub fn shared(self) -> SharedTranslator {
        Arc::new(RwLock::new(self))
    }

    /// Consume a raw status report, using the current time.
    pub fn observe(&mut self, status: &RawStatus) -> Option<TransitionEvent> {
        self.observe_at(status, Instant::now())
    }

    /// Consume a raw status report observed at `now`.
    ///
    /// Every `IDLE`/`FINISHED` report yields `TrackStopped`, even while
    /// already stopped; its snapshot then holds whatever media the receiver
    /// announced while idle.
    pub fn observe_at(&mut self, status: &RawStatus, now: Instant) -> Option<TransitionEvent> {
        let raw_state = status.player_state();
        let prev = self.state;
        let next = self.derive_state(raw_state);

        if let Some(media) = &status.media {
            self.refresh(media);
        }

        // IDLE always precedes real playback, so it never counts as a start.
        // A track loaded paused starts too, with its clock held at zero.
        let event = if prev == PlaybackState::Stopped
            && raw_state != RawPlayerState::Idle
            && next != PlaybackState::Stopped
        {
            self.clock.restart(now);
            if next == PlaybackState::Paused {
                self.clock.freeze(now);
            }
            self.track.started_at = Some(now);
            Some(TransitionEvent::TrackChanged(self.track.clone()))
        } else if raw_state == RawPlayerState::Idle && status.reason() == IdleReason::Finished {
            let finished = self.track.clone();
            self.track.clear_media();
            Some(TransitionEvent::TrackStopped(finished))
        } else {
            // IDLE/ERROR is reported through load_failed
            None
        };

        self.advance(prev, next, now);
        event
    }

    /// Handle the receiver's dedicated load-failure notification.
    pub fn load_failed(&mut self) -> TransitionEvent {
        self.load_failed_at(Instant::now())
    }

    /// Handle a load failure observed at `now`.
    pub fn load_failed_at(&mut self, now: Instant) -> TransitionEvent {
        self.state = PlaybackState::Stopped;
        self.clock.disarm(now);

        let failed = self.track.clone();
        self.track.clear_media();
        TransitionEvent::TrackFailed(failed)
    }

    /// Current coarse playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current track.
    ///
    /// While stopped the media fields are always reported empty, even if the
    /// receiver already announced the next item.
    pub fn snapshot(&self) -> TrackSnapshot {
        if self.state == PlaybackState::Stopped {
            TrackSnapshot {
                started_at: self.track.started_at,
                ..TrackSnapshot::default()
            }
        } else {
            self.track.clone()
        }
    }

    /// Elapsed position of the current track
    pub fn position(&self) -> Duration {
        self.position_at(Instant::now())
    }

    /// Elapsed position of the current track at `now`
    pub fn position_at(&self, now: Instant) -> Duration {
        self.clock.elapsed(now)
    }

    fn derive_state(&self, raw_state: RawPlayerState) -> PlaybackState {
        match raw_state {
            RawPlayerState::Playing | RawPlayerState::Buffering => PlaybackState::Playing,
            RawPlayerState::Paused if self.collapse_paused => PlaybackState::Playing,
            RawPlayerState::Paused => PlaybackState::Paused,
            RawPlayerState::Idle | RawPlayerState::Unknown => PlaybackState::Stopped,
        }
    }

    fn refresh(&mut self, media: &MediaInfo) {
        self.track.uri = media.content_id.clone();
        self.track.title = media.title().map(str::to_string);
        self.track.artwork = media.artwork().map(str::to_string);
        self.track.duration = media
            .duration
            .filter(|duration| duration.is_finite() && *duration > 0.0)
            .unwrap_or(0.0);
        self.track.playback_type = PlaybackType::from_content_type(media.content_type.as_deref());
    }

    fn advance(&mut self, prev: PlaybackState, next: PlaybackState, now: Instant) {
        match (prev, next) {
            (PlaybackState::Playing, PlaybackState::Paused) => self.clock.freeze(now),
            (PlaybackState::Paused, PlaybackState::Playing) => self.clock.resume(now),
            (_, PlaybackState::Stopped) => self.clock.disarm(now),
            _ => {}
        }
        self.state = next;
    }
}
