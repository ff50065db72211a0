//! Utility functions for time and size formatting.
//!
//! These helpers convert between seconds and the `HH:MM:SS.ff` timecodes that
//! ffmpeg prints, and format values for display in front ends.

/// Parses an ffmpeg timecode (`HH:MM:SS` with an optional fraction) to seconds.
///
/// The fractional part may have any number of digits: `00:01:40.5`,
/// `00:01:40.50` and `00:01:40.500000` all parse to `100.5`. Returns `None`
/// for anything else, including ffmpeg's `N/A` and hour fields too large to
/// represent.
#[must_use]
pub fn parse_timecode(time: &str) -> Option<f64> {
    let parts: Vec<&str> = time.trim().split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let hours = parts[0].parse::<u64>().ok()?;
    let minutes = parts[1].parse::<u64>().ok()?;
    if minutes >= 60 {
        return None;
    }

    let (whole, fraction) = match parts[2].split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (parts[2], ""),
    };
    let secs = whole.parse::<u64>().ok()?;
    if secs >= 60 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let frac = if fraction.is_empty() {
        0.0
    } else {
        format!("0.{fraction}").parse::<f64>().ok()?
    };

    let whole_secs = hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + secs)?;
    Some(whole_secs as f64 + frac)
}

/// Formats seconds as `HH:MM:SS.mmm` (e.g., 3725.5 -> "01:02:05.500").
/// Returns "??:??:??" for negative or non-finite input.
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_millis = (seconds * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02}.{millis:03}")
}

/// Formats seconds for an ffmpeg `-ss`/`-t` argument with microsecond precision.
#[must_use]
pub fn format_seconds_arg(seconds: f64) -> String {
    format!("{:.6}", seconds.max(0.0))
}

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}
