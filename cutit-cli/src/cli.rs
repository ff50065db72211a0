// cutit-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "cutit: split a video into equal parts",
    long_about = "Splits a video into N equal-length parts with a lossless ffmpeg stream copy."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug output on the console
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Optional: Directory for a timestamped log file
    #[arg(long, global = true, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Splits a video into equal-length parts
    Split(SplitArgs),
    /// Prints a video's duration and, optionally, the planned parts
    Probe(ProbeArgs),
}

/// Location of the ffmpeg binary, shared by all subcommands.
#[derive(Args, Debug, Clone)]
pub struct FfmpegArgs {
    /// Path to the ffmpeg binary (defaults to assets/ffmpeg next to cutit, then PATH)
    #[arg(long, value_name = "PATH", env = "CUTIT_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Video file to split
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// Number of parts to produce
    #[arg(short = 'n', long, value_name = "N", allow_negative_numbers = true)]
    pub parts: i64,

    /// Directory for the parts (defaults to <name>_parts next to the input)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub ffmpeg: FfmpegArgs,

    /// Write name_part_1_1.ext instead of failing when a part already exists
    #[arg(long, default_value_t = false)]
    pub auto_suffix: bool,

    /// Print the final report as JSON on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Video file to inspect
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// Also show the segments a split into N parts would use
    #[arg(short = 'n', long, value_name = "N", allow_negative_numbers = true)]
    pub parts: Option<i64>,

    #[command(flatten)]
    pub ffmpeg: FfmpegArgs,
}
