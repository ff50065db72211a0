// ============================================================================
// cutit-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and File Logging for the cutit CLI
//
// This file installs the global logger. Console output goes to stderr so it
// never mixes with the JSON report on stdout; an optional log file receives
// every debug line with a timestamp.
//
// KEY COMPONENTS:
// - get_timestamp: timestamp used in log file names
// - init_logging: fern dispatch with a console and an optional file sink
//
// AI-ASSISTANT-INFO: Logging setup and helper functions

// ---- Internal crate imports ----
use crate::config::{
    DEFAULT_CONSOLE_LEVEL, FILE_LOG_LEVEL, LOG_FILE_PREFIX, VERBOSE_CONSOLE_LEVEL,
};
use crate::error::{CliErrorContext, CliResult};

// ---- External crate imports ----
use cutit_core::CoreError;
use log::LevelFilter;

// ---- Standard library imports ----
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("cutit_{}.log", cutit_cli::logging::get_timestamp());
/// assert!(log_filename.starts_with("cutit_"));
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Path of the log file for a run started now.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("{}_{}.log", LOG_FILE_PREFIX, get_timestamp()))
}

/// Console level for the given verbosity.
pub fn console_level(verbose: bool) -> LevelFilter {
    if verbose {
        VERBOSE_CONSOLE_LEVEL
    } else {
        DEFAULT_CONSOLE_LEVEL
    }
}

/// Installs the global logger and returns the log file path, if any.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> CliResult<Option<PathBuf>> {
    let console = fern::Dispatch::new()
        .level(console_level(verbose))
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new()
        .level(LevelFilter::Off)
        .level_for("cutit_core", LevelFilter::Trace)
        .level_for("cutit_cli", LevelFilter::Trace)
        .level_for("cutit", LevelFilter::Trace)
        .chain(console);

    let mut log_path = None;
    if let Some(dir) = log_dir {
        fs::create_dir_all(dir)
            .cli_with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        let path = log_file_path(dir);
        let file = fern::log_file(&path)
            .cli_with_context(|| format!("Failed to open log file {}", path.display()))?;
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .level(FILE_LOG_LEVEL)
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{} [{} {}] {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .chain(file),
        );
        log_path = Some(path);
    }

    dispatch
        .apply()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logging: {e}")))?;
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_has_expected_shape() {
        let ts = get_timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(ts.as_bytes()[8], b'_');
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn log_file_is_named_after_prefix() {
        let path = log_file_path(Path::new("/tmp/logs"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("cutit_"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn verbose_lowers_console_level() {
        assert_eq!(console_level(false), LevelFilter::Warn);
        assert_eq!(console_level(true), LevelFilter::Debug);
    }
}
