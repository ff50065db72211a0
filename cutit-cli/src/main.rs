// cutit-cli/src/main.rs
//
// Entry point of the `cutit` binary.
//
// Responsibilities include:
// - Parsing user-provided arguments.
// - Setting up logging to the console and, optionally, a file.
// - Invoking the `split` or `probe` command.
// - Mapping the outcome to the process exit code.

use clap::Parser;
use cutit_cli::commands::app_dir;
use cutit_cli::logging::init_logging;
use cutit_cli::output::print_error;
use cutit_cli::{Cli, Commands, exit_code, run_probe, run_split};
use std::process;

fn main() {
    let cli = Cli::parse();

    match init_logging(cli.verbose, cli.log_dir.as_deref()) {
        Ok(Some(path)) => log::debug!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            print_error(&e.to_string());
            process::exit(1);
        }
    }

    let app_dir = app_dir();
    let code = match cli.command {
        Commands::Split(args) => match run_split(args, app_dir.as_deref()) {
            Ok(state) => exit_code(state),
            Err(e) => {
                log::error!("{}", e);
                print_error(&e.to_string());
                1
            }
        },
        Commands::Probe(args) => match run_probe(args, app_dir.as_deref()) {
            Ok(()) => 0,
            Err(e) => {
                log::error!("{}", e);
                print_error(&e.to_string());
                1
            }
        },
    };
    process::exit(code);
}
