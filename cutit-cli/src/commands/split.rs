// ============================================================================
// cutit-cli/src/commands/split.rs
// ============================================================================
//
// SPLIT COMMAND: Cutting a Video into Equal Parts
//
// Resolves ffmpeg, submits one job to the core controller, follows its
// events with a progress bar and prints the final report, either styled for
// a terminal or as JSON.
//
// AI-ASSISTANT-INFO: Implementation of the `cutit split` command

// ---- Internal crate imports ----
use crate::cli::SplitArgs;
use crate::config::build_cut_config;
use crate::error::{CliErrorContext, CliResult};
use crate::output::{create_progress_bar, print_report};

// ---- External crate imports ----
use cutit_core::external::locate_ffmpeg;
use cutit_core::{CutReport, JobController, JobEvent, JobState};
use log::{debug, info};

// ---- Standard library imports ----
use std::path::Path;

/// Process exit code for a finished job.
///
/// 0 when every part was written, 2 when the job was cancelled or only some
/// parts were written, 1 when it failed.
pub fn exit_code(state: JobState) -> i32 {
    match state {
        JobState::Completed => 0,
        JobState::PartiallyFailed | JobState::Cancelled => 2,
        _ => 1,
    }
}

/// Runs `cutit split` and returns the final state of the job.
pub fn run_split(args: SplitArgs, app_dir: Option<&Path>) -> CliResult<JobState> {
    let ffmpeg = locate_ffmpeg(args.ffmpeg.ffmpeg.as_deref(), app_dir)?;
    debug!("Using ffmpeg at {}", ffmpeg.display());

    let config = build_cut_config(ffmpeg, args.auto_suffix);
    let controller = JobController::with_ffmpeg(config)?;
    let handle = controller
        .submit_job(args.input.clone(), args.parts, args.output.clone())
        .cli_with_context(|| format!("Could not start splitting {}", args.input.display()))?;

    let total = u64::try_from(args.parts).unwrap_or(0);
    let pb = create_progress_bar(total);
    let mut report: Option<CutReport> = None;
    for event in handle.subscribe() {
        match &event {
            JobEvent::StateChanged(state) => pb.set_message(format!("{state}")),
            JobEvent::SegmentStarted { total, .. } => {
                pb.set_length(*total as u64);
                pb.set_message(event.status_text());
            }
            JobEvent::Progress(update) => {
                pb.set_position(update.completed as u64);
                info!("{}", update);
            }
            JobEvent::Finished(final_report) => report = Some(final_report.clone()),
        }
    }
    pb.finish_and_clear();

    let report = report.unwrap_or_else(|| handle.wait());
    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| {
            cutit_core::CoreError::OperationFailed(format!("Failed to serialize report: {e}"))
        })?;
        println!("{json}");
    } else {
        print_report(&report);
    }
    Ok(report.state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_job_state() {
        assert_eq!(exit_code(JobState::Completed), 0);
        assert_eq!(exit_code(JobState::PartiallyFailed), 2);
        assert_eq!(exit_code(JobState::Cancelled), 2);
        assert_eq!(exit_code(JobState::Failed), 1);
    }
}
