use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{CastError, DiscoveredDevice, RawStatus, ReceiverControl};

/// Notifications delivered by a connected receiver, in order
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiverNotification {
    /// General media status report
    Status(RawStatus),

    /// The receiver failed to load the requested media
    LoadFailed {
        /// Receiver-specific error code
        error_code: Option<i64>,
    },
}

/// An established connection to a receiver
pub struct ReceiverLink {
    /// Imperative control surface
    pub control: Arc<dyn ReceiverControl>,

    /// Ordered status notifications
    pub notifications: mpsc::Receiver<ReceiverNotification>,
}

/// Establishes receiver connections for discovered devices
#[async_trait]
pub trait ReceiverConnector: Send + Sync {
    /// Connect to a receiver
    ///
    /// # Errors
    /// Returns `CastError::ConnectFailed` if the receiver cannot be reached
    async fn connect(&self, device: &DiscoveredDevice) -> Result<ReceiverLink, CastError>;
}
