//! MPRIS side of the bridge: property derivation, D-Bus interfaces and export.

/// Pull-based property derivation from translator state
pub mod adapter;
/// MPRIS export error types
pub mod error;
/// zbus interface implementations
pub mod interface;
/// Per-receiver bus connection
pub mod server;
/// MPRIS encoding helpers
pub mod utils;

pub use adapter::{PlayerProperties, TrackMetadata, playback_status};
pub use error::*;
pub use interface::{MprisDevice, PlayerInterface, RootInterface};
pub use server::MprisServer;
