// ============================================================================
// cutit-core/src/external/ffmpeg_cutter.rs
// ============================================================================
//
// FFMPEG CUTTER: Stream-Copy Extraction of a Time Range
//
// This module builds and runs the ffmpeg command that copies one segment of
// the input into its own file without re-encoding. The child is polled so an
// abort request can kill it while it is still running.
//
// KEY COMPONENTS:
// - build_cut_command: ffmpeg-sidecar command for a CutRequest
// - SidecarCutter: MediaCutter implementation spawning that command
//
// AI-ASSISTANT-INFO: MediaCutter implementation backed by ffmpeg-sidecar

// ---- Internal crate imports ----
use super::{CutRequest, MediaCutter, hide_console_window};
use crate::config::DEFAULT_POLL_INTERVAL_MS;
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::progress::CancelToken;
use crate::utils::format_seconds_arg;

// ---- External crate imports ----
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};

// ---- Standard library imports ----
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Number of ffmpeg diagnostic lines kept for the failure reason.
const MAX_ERROR_LINES: usize = 5;

/// Builds `ffmpeg -hide_banner -nostdin -y -i <in> -ss <start> [-t <dur>] -c copy <out>`.
pub fn build_cut_command(ffmpeg_path: &Path, request: &CutRequest) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new_with_path(ffmpeg_path);
    cmd.hide_banner();
    cmd.arg("-nostdin");
    // Only ever overwrites the placeholder reserved for this segment
    cmd.arg("-y");
    cmd.input(request.input.to_string_lossy().as_ref());
    cmd.arg("-ss");
    cmd.arg(format_seconds_arg(request.start));
    if let Some(duration) = request.duration {
        cmd.arg("-t");
        cmd.arg(format_seconds_arg(duration));
    }
    cmd.arg("-c");
    cmd.arg("copy");
    cmd.output(request.output.to_string_lossy().as_ref());
    cmd
}

/// `MediaCutter` that runs ffmpeg through ffmpeg-sidecar.
#[derive(Debug, Clone)]
pub struct SidecarCutter {
    ffmpeg_path: PathBuf,
    poll_interval: Duration,
}

impl SidecarCutter {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Sets how often the running child is checked for exit and abort.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl MediaCutter for SidecarCutter {
    fn cut(&self, request: &CutRequest, cancel: &CancelToken) -> CoreResult<()> {
        let cmd_name = self.ffmpeg_path.display().to_string();
        let mut cmd = build_cut_command(&self.ffmpeg_path, request);
        hide_console_window(cmd.as_inner_mut());
        log::debug!("Running cut command: {:?}", cmd);

        let mut child = cmd
            .spawn()
            .map_err(|e| command_start_error(cmd_name.clone(), e))?;

        let events = child.iter().map_err(|e| {
            CoreError::OperationFailed(format!("Failed to read ffmpeg output: {e}"))
        });
        let events = match events {
            Ok(events) => events,
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(err);
            }
        };

        // Drain diagnostics on a helper thread while this one watches for abort
        let reader = thread::spawn(move || {
            let mut errors: Vec<String> = Vec::new();
            let mut tail: VecDeque<String> = VecDeque::with_capacity(MAX_ERROR_LINES);
            for event in events {
                match event {
                    FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line)
                    | FfmpegEvent::Error(line) => {
                        log::debug!("ffmpeg: {}", line);
                        errors.push(line.trim().to_string());
                    }
                    FfmpegEvent::Log(_, line) => {
                        log::trace!("ffmpeg: {}", line);
                        if tail.len() == MAX_ERROR_LINES {
                            tail.pop_front();
                        }
                        tail.push_back(line.trim().to_string());
                    }
                    _ => {}
                }
            }
            // Untagged diagnostics stand in when ffmpeg printed no error-level line
            if errors.is_empty() {
                errors.extend(tail);
            }
            errors
        });

        let mut killed = false;
        let status = loop {
            if cancel.is_aborted() && !killed {
                log::info!("Abort requested, stopping ffmpeg for {}", request.output.display());
                if let Err(e) = child.kill() {
                    log::warn!("Failed to kill ffmpeg: {}", e);
                }
                killed = true;
            }
            match child.as_inner_mut().try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(self.poll_interval),
                Err(e) => {
                    let _ = child.kill();
                    let _ = reader.join();
                    return Err(CoreError::Io(e));
                }
            }
        };

        let errors = reader.join().unwrap_or_default();

        if killed {
            return Err(CoreError::Cancelled);
        }
        if !status.success() {
            let tail: Vec<&str> = errors
                .iter()
                .rev()
                .take(MAX_ERROR_LINES)
                .rev()
                .map(String::as_str)
                .collect();
            log::warn!("ffmpeg exited with {} for {}", status, request.output.display());
            return Err(command_failed_error(cmd_name, status, tail.join("; ")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &FfmpegCommand) -> Vec<String> {
        cmd.get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }

    fn position(args: &[String], needle: &str) -> usize {
        args.iter()
            .position(|a| a == needle)
            .unwrap_or_else(|| panic!("{needle} missing from {args:?}"))
    }

    #[test]
    fn middle_segment_has_start_and_duration() {
        let request = CutRequest {
            input: PathBuf::from("/videos/clip.mp4"),
            start: 33.333333333,
            duration: Some(33.333333333),
            output: PathBuf::from("/videos/clip_parts/clip_part_2.mp4"),
        };
        let args = args_of(&build_cut_command(Path::new("ffmpeg"), &request));

        let i = position(&args, "-i");
        let ss = position(&args, "-ss");
        let t = position(&args, "-t");
        let c = position(&args, "-c");
        assert!(position(&args, "-nostdin") < i);
        assert!(position(&args, "-y") < i);
        assert!(i < ss && ss < t && t < c);
        assert_eq!(args[i + 1], "/videos/clip.mp4");
        assert_eq!(args[ss + 1], "33.333333");
        assert_eq!(args[t + 1], "33.333333");
        assert_eq!(args[c + 1], "copy");
        assert_eq!(args.last().unwrap(), "/videos/clip_parts/clip_part_2.mp4");
    }

    #[test]
    fn last_segment_runs_to_end() {
        let request = CutRequest {
            input: PathBuf::from("in.mkv"),
            start: 66.666667,
            duration: None,
            output: PathBuf::from("in_part_3.mkv"),
        };
        let args = args_of(&build_cut_command(Path::new("ffmpeg"), &request));
        assert!(!args.iter().any(|a| a == "-t"));
        assert_eq!(args[position(&args, "-ss") + 1], "66.666667");
    }

    #[test]
    fn missing_binary_is_dependency_error() {
        let cutter = SidecarCutter::new("/definitely/not/here/ffmpeg-cutit");
        let request = CutRequest {
            input: PathBuf::from("in.mp4"),
            start: 0.0,
            duration: None,
            output: PathBuf::from("out.mp4"),
        };
        let err = cutter.cut(&request, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, CoreError::DependencyNotFound(_)));
    }
}
