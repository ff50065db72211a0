// ============================================================================
// cutit-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with the ffmpeg Binary
//
// This module encapsulates every interaction with ffmpeg. The rest of the
// library only sees the MediaProbe and MediaCutter traits, so the controller
// can be driven by mocks in tests and by the real binary in production.
//
// KEY COMPONENTS:
// - MediaProbe / MediaCutter: traits for the two ffmpeg operations
// - CutRequest: everything a single cut invocation needs
// - FfmpegProbe / SidecarCutter: implementations spawning ffmpeg
// - locate_ffmpeg / check_dependency: finding a usable binary
//
// AI-ASSISTANT-INFO: External tool abstractions for probing and cutting

// ---- Internal crate imports ----
use crate::config::FFMPEG_ENV_VAR;
use crate::error::{CoreError, CoreResult};
use crate::planning::MediaDuration;
use crate::progress::CancelToken;

// ---- Standard library imports ----
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Duration probing through `ffmpeg -i`
pub mod ffmpeg_probe;

/// Stream-copy cutting through ffmpeg-sidecar
pub mod ffmpeg_cutter;

/// Test doubles, compiled with the `test-mocks` feature
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_cutter::{SidecarCutter, build_cut_command};
pub use ffmpeg_probe::{FfmpegProbe, parse_duration};

// ============================================================================
// TRAITS
// ============================================================================

/// Something that can report the total duration of a media file.
pub trait MediaProbe: Send + Sync {
    /// Returns the duration of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Probe` when the duration cannot be determined, or
    /// `CoreError::DependencyNotFound` when the tool is missing.
    fn duration(&self, path: &Path) -> CoreResult<MediaDuration>;
}

/// Something that can copy a time range of a media file into a new file.
pub trait MediaCutter: Send + Sync {
    /// Writes `request.output` from the requested range of `request.input`.
    ///
    /// Implementations poll `cancel.is_aborted()` while the cut runs and stop
    /// the work when it becomes true, returning an error.
    fn cut(&self, request: &CutRequest, cancel: &CancelToken) -> CoreResult<()>;
}

/// A single cut invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CutRequest {
    pub input: PathBuf,
    /// Start offset in seconds
    pub start: f64,
    /// Length in seconds; `None` copies to the end of the input
    pub duration: Option<f64>,
    pub output: PathBuf,
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that `cmd` can be started by running it with `-version`.
///
/// # Returns
///
/// * `Ok(())` - The command started (its exit status is not inspected)
/// * `Err(CoreError::DependencyNotFound)` - If the command is not found
/// * `Err(CoreError::CommandStart)` - If the command exists but fails to start
pub fn check_dependency(cmd: &Path) -> CoreResult<()> {
    let mut command = Command::new(cmd);
    command
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    hide_console_window(&mut command);

    match command.status() {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd.display());
            Err(CoreError::DependencyNotFound(cmd.display().to_string()))
        }
        Err(e) => {
            log::error!(
                "Failed to start dependency check command '{}': {}",
                cmd.display(),
                e
            );
            Err(CoreError::CommandStart(cmd.display().to_string(), e))
        }
    }
}

/// Name of the bundled binary inside the `assets` folder.
pub fn bundled_binary_name() -> &'static str {
    if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" }
}

/// Resolves which ffmpeg binary to use.
///
/// Order: `explicit`, then the `CUTIT_FFMPEG` environment variable, then
/// `<app_dir>/assets/ffmpeg(.exe)`, then `ffmpeg` on `PATH`. Only the `PATH`
/// fallback is verified here; explicit choices are reported as given so a
/// broken path fails loudly at the first use.
pub fn locate_ffmpeg(explicit: Option<&Path>, app_dir: Option<&Path>) -> CoreResult<PathBuf> {
    if let Some(path) = explicit {
        log::debug!("Using ffmpeg from explicit path: {}", path.display());
        return Ok(path.to_path_buf());
    }

    if let Some(value) = env::var_os(FFMPEG_ENV_VAR).filter(|v| !v.is_empty()) {
        let path = PathBuf::from(value);
        log::debug!("Using ffmpeg from {}: {}", FFMPEG_ENV_VAR, path.display());
        return Ok(path);
    }

    if let Some(dir) = app_dir {
        let bundled = dir.join("assets").join(bundled_binary_name());
        if bundled.is_file() {
            log::debug!("Using bundled ffmpeg: {}", bundled.display());
            return Ok(bundled);
        }
    }

    let fallback = PathBuf::from("ffmpeg");
    check_dependency(&fallback)?;
    Ok(fallback)
}

/// Keeps ffmpeg from opening a console window on Windows.
pub(crate) fn hide_console_window(command: &mut Command) {
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        command.creation_flags(CREATE_NO_WINDOW);
    }
    #[cfg(not(windows))]
    let _ = command;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let located = locate_ffmpeg(Some(Path::new("/custom/ffmpeg")), Some(dir.path())).unwrap();
        assert_eq!(located, PathBuf::from("/custom/ffmpeg"));
    }

    #[test]
    fn missing_dependency_is_reported() {
        let err = check_dependency(Path::new("/definitely/not/here/ffmpeg-cutit")).unwrap_err();
        assert!(matches!(err, CoreError::DependencyNotFound(_)));
    }
}
