// cutit-cli/src/lib.rs
//
// Library portion of the cutit CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ProbeArgs, SplitArgs};
pub use commands::probe::run_probe;
pub use commands::split::{exit_code, run_split};
pub use error::{CliErrorContext, CliResult};
