// cutit-cli/src/commands/probe.rs
//
// `cutit probe`: prints the duration ffmpeg reports for a file and, with
// `--parts`, the segments a split would produce. Nothing is written.

use crate::cli::ProbeArgs;
use crate::error::CliResult;
use crate::output::{print_heading, print_info};

use cutit_core::external::locate_ffmpeg;
use cutit_core::{CoreError, FfmpegProbe, MediaProbe, SegmentPlan, format_timestamp};
use std::path::Path;

pub fn run_probe(args: ProbeArgs, app_dir: Option<&Path>) -> CliResult<()> {
    if !args.input.is_file() {
        return Err(CoreError::InputNotFound(args.input.clone()));
    }
    let ffmpeg = locate_ffmpeg(args.ffmpeg.ffmpeg.as_deref(), app_dir)?;
    let duration = FfmpegProbe::new(ffmpeg).duration(&args.input)?;

    print_heading("Probe");
    print_info("Input", args.input.display());
    print_info(
        "Duration",
        format!("{} ({:.3}s)", duration, duration.as_secs()),
    );

    if let Some(parts) = args.parts {
        let plan = SegmentPlan::new(duration, parts)?;
        for segment in plan.segments() {
            print_info(
                &format!("Part {}", segment.index),
                format!(
                    "{} -> {} ({:.3}s)",
                    format_timestamp(segment.start),
                    format_timestamp(segment.end()),
                    segment.duration
                ),
            );
        }
    }
    Ok(())
}
