// ============================================================================
// cutit-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the cutit Core Library
//
// This module defines the single error enum used throughout the library and a
// few constructor helpers for failures of external commands.
//
// KEY COMPONENTS:
// - CoreError: every failure a job or one of its stages can report
// - CoreResult: result alias used by all fallible functions
// - Helpers: command_start_error, command_failed_error, probe_error
//
// AI-ASSISTANT-INFO: Error taxonomy for probing, planning and cutting

// ---- Standard library imports ----
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

// ---- External crate imports ----
use thiserror::Error;

/// Errors produced by the cutit core library.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The input file does not exist or cannot be opened for reading.
    #[error("Input file not found or unreadable: {0}")]
    InputNotFound(PathBuf),

    /// The duration of the input could not be determined.
    #[error("Could not determine duration of {path}: {reason}")]
    Probe { path: PathBuf, reason: String },

    /// The requested number of parts is below 1 or above `MAX_PART_COUNT`.
    #[error("Invalid part count {0}: the number of parts must be between 1 and 10000")]
    InvalidPartCount(i64),

    /// A duration value was negative or not a finite number.
    #[error("Invalid duration {0}: duration must be a finite, non-negative number of seconds")]
    InvalidDuration(f64),

    /// The computed output path already exists and may not be overwritten.
    #[error("Output file already exists: {0}")]
    Collision(PathBuf),

    /// A single segment could not be produced.
    #[error("Segment {index} failed: {reason}")]
    Segment { index: usize, reason: String },

    /// The job was stopped by a cancellation request.
    #[error("Job cancelled")]
    Cancelled,

    /// The controller already has an active job.
    #[error("A job is already running on this controller")]
    Busy,

    /// A required external tool could not be found.
    #[error("Required dependency '{0}' not found. Install ffmpeg or place it in the assets folder.")]
    DependencyNotFound(String),

    /// An external tool exists but could not be started.
    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, #[source] std::io::Error),

    /// An external tool ran but exited unsuccessfully.
    #[error("'{cmd}' exited with {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for cutit core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error, or `DependencyNotFound` when the binary is missing.
pub fn command_start_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    let cmd = cmd.into();
    if err.kind() == std::io::ErrorKind::NotFound {
        CoreError::DependencyNotFound(cmd)
    } else {
        CoreError::CommandStart(cmd, err)
    }
}

/// Builds a `CommandFailed` error from an exit status and captured diagnostics.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Builds a `Probe` error for the given input.
pub fn probe_error(path: &Path, reason: impl Into<String>) -> CoreError {
    CoreError::Probe {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_maps_to_dependency_not_found() {
        let err = command_start_error(
            "ffmpeg",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(matches!(err, CoreError::DependencyNotFound(ref name) if name == "ffmpeg"));
    }

    #[test]
    fn permission_denied_maps_to_command_start() {
        let err = command_start_error(
            "ffmpeg",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, CoreError::CommandStart(..)));
    }

    #[test]
    fn segment_error_message_names_the_segment() {
        let err = CoreError::Segment {
            index: 2,
            reason: "exit status 1".to_string(),
        };
        assert_eq!(err.to_string(), "Segment 2 failed: exit status 1");
    }
}
