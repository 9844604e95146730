//! Formatting utilities for CLI output.
//!
//! Renders discovery and transition events as styled terminal lines.

use crate::services::cast::{DeviceEvent, DiscoveryEvent, TransitionEvent};

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";

    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Yellow color
    pub const YELLOW: &'static str = "\x1b[33m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

fn styled(color: &str, label: &str) -> String {
    format!("{}{}{:<8}{}", Colors::BOLD, color, label, Colors::RESET)
}

fn dim(text: &str) -> String {
    format!("{}{}{}", Colors::DIM, text, Colors::RESET)
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Formats one discovery event as a single line
pub fn format_discovery_event(event: &DiscoveryEvent) -> String {
    match event {
        DiscoveryEvent::Appeared(device) => {
            let address = device
                .address
                .map(|ip| format!("{ip}:{}", device.port))
                .unwrap_or_else(|| "unresolved".to_string());
            let model = device.model.as_deref().unwrap_or("unknown model");
            format!(
                "{} {} {} {}",
                styled(Colors::GREEN, "found"),
                device.identity.name,
                dim(&format!("[{}]", device.identity.id)),
                dim(&format!("{model} at {address}")),
            )
        }
        DiscoveryEvent::Updated(identity) => format!(
            "{} {} {}",
            styled(Colors::CYAN, "updated"),
            identity.name,
            dim(&format!("[{}]", identity.id)),
        ),
        DiscoveryEvent::Removed(id) => {
            format!("{} {}", styled(Colors::YELLOW, "gone"), dim(&format!("[{id}]")))
        }
    }
}

/// Formats one transition event as a single line
pub fn format_device_event(event: &DeviceEvent) -> String {
    let (color, label) = match event.event {
        TransitionEvent::TrackChanged(_) => (Colors::GREEN, "playing"),
        TransitionEvent::TrackStopped(_) => (Colors::YELLOW, "stopped"),
        TransitionEvent::TrackFailed(_) => (Colors::RED, "failed"),
    };
    let track = event.event.track();
    let title = track
        .title
        .as_deref()
        .or(track.uri.as_deref())
        .unwrap_or("(no media)");

    format!(
        "{} {}: {}",
        styled(color, label),
        event.device.name,
        title
    )
}
