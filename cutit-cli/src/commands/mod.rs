//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `split` command.
/// This command cuts a video into N equal parts and reports the outcome.
pub mod split;

/// Module containing the implementation of the `probe` command.
pub mod probe;

use std::path::PathBuf;

/// Directory containing the running executable, where `assets/` is looked up.
pub fn app_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
}
