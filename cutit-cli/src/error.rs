// cutit-cli/src/error.rs
//
// The CLI reports every failure as a `CoreError`. Errors raised by the CLI
// itself (log setup, job submission) are prefixed with what it was doing and
// wrapped as `CoreError::OperationFailed`.

use cutit_core::{CoreError, CoreResult};
use std::fmt::Display;

pub type CliResult<T> = CoreResult<T>;

/// Adds a lazily built description to a failed operation.
pub trait CliErrorContext<T> {
    fn cli_with_context<C: Display>(self, describe: impl FnOnce() -> C) -> CliResult<T>;
}

impl<T, E: Into<CoreError>> CliErrorContext<T> for Result<T, E> {
    fn cli_with_context<C: Display>(self, describe: impl FnOnce() -> C) -> CliResult<T> {
        self.map_err(|e| CoreError::OperationFailed(format!("{}: {}", describe(), e.into())))
    }
}
