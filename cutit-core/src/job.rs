//! Job state, per-segment status and the final report of a cut job.
//!
//! A `CutJob` lives on the worker thread for the duration of one job. The
//! caller only ever sees `JobState` transitions and the `CutReport` built
//! from the job once it reaches a terminal state.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::output::OutputFile;
use crate::planning::{Segment, SegmentPlan};

/// Lifecycle of a job, from submission to a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Idle,
    Probing,
    Planning,
    Cutting,
    /// Every segment was written.
    Completed,
    /// Some segments were written and some failed.
    PartiallyFailed,
    /// Stopped on request; outputs already written are kept.
    Cancelled,
    /// Probe or planning failed, or no segment could be written.
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::PartiallyFailed | JobState::Cancelled | JobState::Failed
        )
    }

    /// Picks the terminal state once cutting has stopped.
    ///
    /// A cancellation wins over everything else, so an aborted segment still
    /// ends the job as `Cancelled`.
    pub fn after_cutting(cancelled: bool, succeeded: usize, failed: usize) -> JobState {
        if cancelled {
            JobState::Cancelled
        } else if failed == 0 {
            JobState::Completed
        } else if succeeded == 0 {
            JobState::Failed
        } else {
            JobState::PartiallyFailed
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Idle => "idle",
            JobState::Probing => "probing",
            JobState::Planning => "planning",
            JobState::Cutting => "cutting",
            JobState::Completed => "completed",
            JobState::PartiallyFailed => "partially failed",
            JobState::Cancelled => "cancelled",
            JobState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Progress of one planned segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum SegmentStatus {
    Pending,
    Running,
    Done,
    Failed(String),
}

/// A segment that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentFailure {
    /// 1-based segment index
    pub index: usize,
    pub reason: String,
}

/// Mutable state of a job while its segments are being cut.
#[derive(Debug, Clone)]
pub struct CutJob {
    input: PathBuf,
    output_dir: PathBuf,
    plan: SegmentPlan,
    statuses: Vec<SegmentStatus>,
}

impl CutJob {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>, plan: SegmentPlan) -> Self {
        let statuses = vec![SegmentStatus::Pending; plan.len()];
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            plan,
            statuses,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn part_count(&self) -> usize {
        self.plan.len()
    }

    pub fn plan(&self) -> &SegmentPlan {
        &self.plan
    }

    pub fn segments(&self) -> &[Segment] {
        self.plan.segments()
    }

    /// Updates the status of the segment with the given 1-based index.
    pub fn set_status(&mut self, index: usize, status: SegmentStatus) {
        if let Some(slot) = index.checked_sub(1).and_then(|i| self.statuses.get_mut(i)) {
            *slot = status;
        }
    }

    pub fn statuses(&self) -> &[SegmentStatus] {
        &self.statuses
    }

    pub fn into_statuses(self) -> Vec<SegmentStatus> {
        self.statuses
    }
}

/// Outcome of a job, delivered to completion callbacks and `JobHandle::wait`.
#[derive(Debug, Clone, Serialize)]
pub struct CutReport {
    pub state: JobState,
    pub input: PathBuf,
    /// Directory the parts were written to; absent when the job failed early
    pub output_dir: Option<PathBuf>,
    /// Probed duration in seconds
    pub duration_secs: Option<f64>,
    pub outputs: Vec<OutputFile>,
    pub failures: Vec<SegmentFailure>,
    pub statuses: Vec<SegmentStatus>,
    /// Reason the job failed before cutting started
    pub error: Option<String>,
    pub elapsed_secs: f64,
}

impl CutReport {
    /// Report for a job that stopped before any segment was attempted.
    pub fn early_failure(input: &Path, duration_secs: Option<f64>, error: String, elapsed_secs: f64) -> Self {
        Self {
            state: JobState::Failed,
            input: input.to_path_buf(),
            output_dir: None,
            duration_secs,
            outputs: Vec::new(),
            failures: Vec::new(),
            statuses: Vec::new(),
            error: Some(error),
            elapsed_secs,
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == JobState::Completed
    }

    /// Paths of the produced parts, in segment order.
    pub fn output_paths(&self) -> Vec<&Path> {
        self.outputs.iter().map(|o| o.path.as_path()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::MediaDuration;

    #[test]
    fn final_state_rules() {
        assert_eq!(JobState::after_cutting(false, 3, 0), JobState::Completed);
        assert_eq!(JobState::after_cutting(false, 2, 1), JobState::PartiallyFailed);
        assert_eq!(JobState::after_cutting(false, 0, 3), JobState::Failed);
        assert_eq!(JobState::after_cutting(true, 1, 1), JobState::Cancelled);
        assert_eq!(JobState::after_cutting(true, 0, 0), JobState::Cancelled);
    }

    #[test]
    fn terminal_states() {
        assert!(!JobState::Cutting.is_terminal());
        assert!(JobState::PartiallyFailed.is_terminal());
        assert_eq!(JobState::PartiallyFailed.to_string(), "partially failed");
    }

    #[test]
    fn statuses_track_one_based_indices() {
        let plan = SegmentPlan::new(MediaDuration::new(9.0).unwrap(), 3).unwrap();
        let mut job = CutJob::new("in.mp4", "in_parts", plan);
        assert_eq!(job.statuses(), vec![SegmentStatus::Pending; 3].as_slice());

        job.set_status(1, SegmentStatus::Done);
        job.set_status(3, SegmentStatus::Failed("boom".into()));
        job.set_status(0, SegmentStatus::Running);
        job.set_status(4, SegmentStatus::Running);

        assert_eq!(
            job.statuses(),
            &[
                SegmentStatus::Done,
                SegmentStatus::Pending,
                SegmentStatus::Failed("boom".into())
            ]
        );
    }

    #[test]
    fn status_serializes_with_reason() {
        let json = serde_json::to_string(&SegmentStatus::Failed("exit 1".into())).unwrap();
        assert_eq!(json, r#"{"status":"failed","reason":"exit 1"}"#);
        let json = serde_json::to_string(&SegmentStatus::Done).unwrap();
        assert_eq!(json, r#"{"status":"done"}"#);
    }
}
