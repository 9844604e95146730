use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::CastError;

/// Imperative control surface of a connected receiver.
///
/// Implemented by the receiver transport. The queries reflect the receiver's
/// own view of its media session, not the translated state.
#[async_trait]
pub trait ReceiverControl: Send + Sync {
    /// Whether the receiver reports itself playing
    async fn is_playing(&self) -> bool;

    /// Whether the receiver reports itself paused
    async fn is_paused(&self) -> bool;

    /// Resume playback
    ///
    /// # Errors
    /// Returns error if the command cannot be delivered
    async fn play(&self) -> Result<(), CastError>;

    /// Pause playback
    ///
    /// # Errors
    /// Returns error if the command cannot be delivered
    async fn pause(&self) -> Result<(), CastError>;

    /// Stop playback
    ///
    /// # Errors
    /// Returns error if the command cannot be delivered
    async fn stop(&self) -> Result<(), CastError>;

    /// Close the connection to the receiver
    ///
    /// # Errors
    /// Returns error if the connection cannot be closed cleanly
    async fn disconnect(&self) -> Result<(), CastError>;
}

/// Result of a guarded control call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    /// A command was sent to the receiver
    Issued,

    /// The receiver already satisfied the request, nothing was sent
    Skipped,
}

/// Maps MPRIS control methods onto guarded receiver calls.
///
/// Every call first checks the receiver state and does nothing when the
/// request is already satisfied. Skipped calls are not errors.
#[derive(Clone)]
pub struct ControlDispatcher {
    receiver: Arc<dyn ReceiverControl>,
}

impl ControlDispatcher {
    /// Whether `quit` is allowed to disconnect the receiver
    pub const CAN_QUIT: bool = true;

    /// Create a dispatcher for a receiver
    pub fn new(receiver: Arc<dyn ReceiverControl>) -> Self {
        Self { receiver }
    }

    /// Stop playback if the receiver is playing.
    ///
    /// # Errors
    /// Returns `CastError::ControlFailed` if the receiver rejects the command
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<ControlOutcome, CastError> {
        if !self.receiver.is_playing().await {
            debug!("Stop skipped, receiver not playing");
            return Ok(ControlOutcome::Skipped);
        }
        self.receiver.stop().await?;
        Ok(ControlOutcome::Issued)
    }

    /// Resume playback if the receiver is paused.
    ///
    /// # Errors
    /// Returns `CastError::ControlFailed` if the receiver rejects the command
    #[instrument(skip(self))]
    pub async fn play(&self) -> Result<ControlOutcome, CastError> {
        if !self.receiver.is_paused().await {
            debug!("Play skipped, receiver not paused");
            return Ok(ControlOutcome::Skipped);
        }
        self.receiver.play().await?;
        Ok(ControlOutcome::Issued)
    }

    /// Pause playback unless the receiver is already paused.
    ///
    /// # Errors
    /// Returns `CastError::ControlFailed` if the receiver rejects the command
    #[instrument(skip(self))]
    pub async fn pause(&self) -> Result<ControlOutcome, CastError> {
        if self.receiver.is_paused().await {
            debug!("Pause skipped, receiver already paused");
            return Ok(ControlOutcome::Skipped);
        }
        self.receiver.pause().await?;
        Ok(ControlOutcome::Issued)
    }

    /// Resume when paused, pause when playing, otherwise do nothing.
    ///
    /// # Errors
    /// Returns `CastError::ControlFailed` if the receiver rejects the command
    #[instrument(skip(self))]
    pub async fn play_pause(&self) -> Result<ControlOutcome, CastError> {
        if self.receiver.is_paused().await {
            self.receiver.play().await?;
            return Ok(ControlOutcome::Issued);
        }
        if self.receiver.is_playing().await {
            self.receiver.pause().await?;
            return Ok(ControlOutcome::Issued);
        }
        debug!("PlayPause skipped, nothing loaded");
        Ok(ControlOutcome::Skipped)
    }

    /// Disconnect from the receiver.
    ///
    /// # Errors
    /// Returns `CastError::ControlFailed` if the connection cannot be closed
    #[instrument(skip(self))]
    pub async fn quit(&self) -> Result<ControlOutcome, CastError> {
        if !Self::CAN_QUIT {
            return Ok(ControlOutcome::Skipped);
        }
        self.receiver.disconnect().await?;
        Ok(ControlOutcome::Issued)
    }
}
