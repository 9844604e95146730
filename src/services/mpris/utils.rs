use std::time::Duration;

/// D-Bus object path both MPRIS interfaces are served at
pub const MPRIS_OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

/// Convert a Duration to the fractional seconds carried on the bus
pub fn to_mpris_seconds(duration: Duration) -> f64 {
    duration.as_secs_f64()
}

/// Well-known bus name for a receiver: `<namespace>.Chromecast<uuid>`
pub fn bus_name(namespace: &str, uuid: &str) -> String {
    format!("{namespace}.Chromecast{uuid}")
}
