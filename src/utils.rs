use chrono::{DateTime, Local};
use rand::{Rng, distr::Alphanumeric};

/// Length of the random `state` sent with the authorize request.
pub const STATE_LEN: usize = 16;

pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(char::from)
        .collect()
}

/// Renders an epoch timestamp in local time, e.g. `2024-05-01 13:37:00`.
pub fn format_timestamp(epoch_secs: i64) -> String {
    match DateTime::from_timestamp(epoch_secs, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => epoch_secs.to_string(),
    }
}

/// Human readable time left until `expires_at`, or `expired`.
pub fn format_remaining(expires_at: i64, now: i64) -> String {
    let left = expires_at - now;
    if left < 0 {
        return "expired".to_string();
    }

    match (left / 3600, (left % 3600) / 60, left % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m {s}s"),
        (h, m, _) => format!("{h}h {m}m"),
    }
}
