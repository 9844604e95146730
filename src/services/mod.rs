/// Receiver status tracking and control
pub mod cast;
/// MPRIS D-Bus export
pub mod mpris;

pub use cast::{DeviceRegistry, RegistryOptions, StatusTranslator};
pub use mpris::MprisServer;
