//! cast-mpris - Cast receivers as MPRIS media players.
//!
//! Each Cast receiver found on the local network is published on D-Bus as an
//! MPRIS player. The main pieces are:
//!
//! - A status translator that folds the receiver's media status reports into
//!   a coarse playback state and detects track transitions
//! - An MPRIS property adapter deriving `PlaybackStatus`, `Metadata` and
//!   `Position` from the translator
//! - A control dispatcher forwarding guarded play/pause/stop commands
//! - A device registry tracking receivers as they come and go
//!
//! # Quick Start
//!
//! ```rust
//! use cast_mpris::services::cast::{RawStatus, StatusTranslator, TransitionEvent};
//!
//! let mut translator = StatusTranslator::new();
//! let event = translator.observe(&RawStatus::with_state("PLAYING"));
//! assert!(matches!(event, Some(TransitionEvent::TrackChanged(_))));
//! ```

/// Configuration schema definitions and loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Command-line interface.
pub mod cli;

/// Receiver and MPRIS services.
pub mod services;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use crate::core::{BridgeError, Result};
