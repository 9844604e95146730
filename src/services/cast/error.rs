use super::DeviceId;

/// Errors that can occur while talking to receivers
#[derive(thiserror::Error, Debug)]
pub enum CastError {
    /// Device with the given ID is not registered
    #[error("Device {0} not found")]
    DeviceNotFound(DeviceId),

    /// Connecting to the receiver failed
    #[error("Failed to connect to {device}: {reason}")]
    ConnectFailed {
        /// Device that could not be reached
        device: DeviceId,
        /// Transport error details
        reason: String,
    },

    /// The receiver rejected or never received a control command
    #[error("Failed to control receiver: {0}")]
    ControlFailed(String),

    /// Network discovery could not be started
    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),

    /// A recorded session could not be read
    #[error("Failed to read recording: {0}")]
    Recording(#[from] std::io::Error),
}
