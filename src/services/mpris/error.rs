/// Errors that can occur while exporting receivers over MPRIS
#[derive(thiserror::Error, Debug)]
pub enum MprisError {
    /// D-Bus communication error
    #[error("D-Bus operation failed: {0}")]
    DbusError(#[from] zbus::Error),

    /// The service could not be published on the bus
    #[error("Failed to export {bus_name}: {reason}")]
    ExportFailed {
        /// Name that was requested
        bus_name: String,
        /// Underlying failure
        reason: String,
    },
}
