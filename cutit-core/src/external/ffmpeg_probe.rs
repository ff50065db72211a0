// ============================================================================
// cutit-core/src/external/ffmpeg_probe.rs
// ============================================================================
//
// FFMPEG PROBE: Reading the Duration of a Media File
//
// Runs `ffmpeg -hide_banner -nostdin -i <input>` and reads the
// `Duration: HH:MM:SS.ff` line ffmpeg prints to stderr. Without an output
// file ffmpeg always exits with an error, so a parsed duration takes
// precedence over the exit status.
//
// AI-ASSISTANT-INFO: MediaProbe implementation backed by the ffmpeg binary

// ---- Internal crate imports ----
use super::{MediaProbe, hide_console_window};
use crate::error::{CoreResult, command_start_error, probe_error};
use crate::planning::MediaDuration;
use crate::utils::parse_timecode;

// ---- External crate imports ----
use once_cell::sync::Lazy;
use regex::Regex;

// ---- Standard library imports ----
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Duration:\s*(N/A|\d+:\d{2}:\d{2}(?:\.\d+)?)").expect("valid duration regex")
});

/// Result of scanning ffmpeg diagnostics for a duration line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedDuration {
    Seconds(f64),
    /// ffmpeg printed `Duration: N/A`
    NotAvailable,
}

/// Finds the first `Duration:` line in ffmpeg's stderr output.
#[must_use]
pub fn parse_duration(stderr: &str) -> Option<ParsedDuration> {
    let caps = DURATION_RE.captures(stderr)?;
    let value = caps.get(1)?.as_str();
    if value == "N/A" {
        return Some(ParsedDuration::NotAvailable);
    }
    parse_timecode(value).map(ParsedDuration::Seconds)
}

/// `MediaProbe` that shells out to ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegProbe {
    ffmpeg_path: PathBuf,
}

impl FfmpegProbe {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }
}

impl MediaProbe for FfmpegProbe {
    fn duration(&self, path: &Path) -> CoreResult<MediaDuration> {
        let mut command = Command::new(&self.ffmpeg_path);
        command
            .arg("-hide_banner")
            .arg("-nostdin")
            .arg("-i")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        hide_console_window(&mut command);

        log::debug!("Running probe command: {:?}", command);
        let output = command
            .output()
            .map_err(|e| command_start_error(self.ffmpeg_path.display().to_string(), e))?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        match parse_duration(&stderr) {
            Some(ParsedDuration::Seconds(secs)) => {
                let duration = MediaDuration::new(secs)?;
                log::debug!("Probed duration of {}: {:.3}s", path.display(), secs);
                Ok(duration)
            }
            Some(ParsedDuration::NotAvailable) => {
                Err(probe_error(path, "ffmpeg reported the duration as N/A"))
            }
            None => {
                let detail = last_meaningful_line(&stderr)
                    .map(|line| format!(" ({line})"))
                    .unwrap_or_default();
                Err(probe_error(
                    path,
                    format!(
                        "no duration in ffmpeg output, exit status {}{}",
                        output.status, detail
                    ),
                ))
            }
        }
    }
}

fn last_meaningful_line(stderr: &str) -> Option<&str> {
    stderr.lines().map(str::trim).rev().find(|l| !l.is_empty())
}
