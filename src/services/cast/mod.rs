//! Receiver side of the bridge: raw status, translation, control and registry.

/// Guarded control dispatch
pub mod control;
/// Receiver discovery over mDNS
pub mod discovery;
/// Receiver error types
pub mod error;
/// Receiver connection boundary
pub mod link;
/// Device registry
pub mod registry;
/// Recorded-session receiver
pub mod replay;
/// Raw receiver status reports
pub mod status;
/// Status translation state machine
pub mod translator;
/// Receiver domain types
pub mod types;

pub use control::{ControlDispatcher, ControlOutcome, ReceiverControl};
pub use discovery::{
    CAST_SERVICE_TYPE, DEFAULT_CAST_PORT, DiscoveryEvent, DiscoveryTracker, MdnsDiscovery,
};
pub use error::*;
pub use link::{ReceiverConnector, ReceiverLink, ReceiverNotification};
pub use registry::{DeviceRegistry, RegistryOptions};
pub use replay::{ReplayConnector, ReplayReceiver};
pub use status::*;
pub use translator::{SharedTranslator, StatusTranslator};
pub use types::*;
