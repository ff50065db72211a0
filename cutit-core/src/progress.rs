// ============================================================================
// cutit-core/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: Job Events and Cancellation
//
// This module defines the events a running job sends to the presentation
// layer and the shared token used to stop it.
//
// KEY COMPONENTS:
// - JobEvent: state changes, per-segment start and progress, final report
// - ProgressUpdate: (completed, total, last outcome) after each segment
// - CancelToken: cooperative cancel flag plus the abort flag polled by cutters
//
// AI-ASSISTANT-INFO: Progress events and cancellation primitives

// ---- Standard library imports ----
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ---- Internal crate imports ----
use crate::job::{CutReport, JobState, SegmentFailure};
use crate::output::OutputFile;

// ============================================================================
// EVENTS
// ============================================================================

/// Events emitted by a job, in the order they happen.
#[derive(Debug, Clone)]
pub enum JobEvent {
    /// The job moved to a new state
    StateChanged(JobState),

    /// A segment is about to be cut
    SegmentStarted {
        /// 1-based segment index
        index: usize,
        total: usize,
    },

    /// A segment finished, successfully or not
    Progress(ProgressUpdate),

    /// The job reached a terminal state; always the last event
    Finished(CutReport),
}

impl JobEvent {
    /// Short human readable status line for this event.
    pub fn status_text(&self) -> String {
        match self {
            JobEvent::StateChanged(state) => format!("Job {state}"),
            JobEvent::SegmentStarted { index, total } => {
                format!("Processing part {index} of {total}")
            }
            JobEvent::Progress(update) => update.to_string(),
            JobEvent::Finished(report) => format!("Job {}", report.state),
        }
    }
}

/// What happened to the last segment.
#[derive(Debug, Clone)]
pub enum SegmentOutcome {
    Written(OutputFile),
    Failed(SegmentFailure),
}

impl SegmentOutcome {
    pub fn index(&self) -> usize {
        match self {
            SegmentOutcome::Written(output) => output.index,
            SegmentOutcome::Failed(failure) => failure.index,
        }
    }
}

/// Progress after one segment.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Segments finished so far, including failed ones
    pub completed: usize,
    pub total: usize,
    pub last: SegmentOutcome,
}

impl ProgressUpdate {
    /// Fraction of segments finished, from 0.0 to 1.0.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.last {
            SegmentOutcome::Written(output) => write!(
                f,
                "[{}/{}] wrote {}",
                self.completed,
                self.total,
                output.path.display()
            ),
            SegmentOutcome::Failed(failure) => write!(
                f,
                "[{}/{}] part {} failed: {}",
                self.completed, self.total, failure.index, failure.reason
            ),
        }
    }
}

// ============================================================================
// CANCELLATION
// ============================================================================

#[derive(Debug, Default)]
struct CancelFlags {
    cancelled: AtomicBool,
    aborted: AtomicBool,
}

/// Shared stop signal for a job.
///
/// `cancel` stops the job before the next segment. `abort` also asks the
/// running cutter to kill its child process.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flags: Arc<CancelFlags>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flags.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn abort(&self) {
        self.flags.aborted.store(true, Ordering::SeqCst);
        self.flags.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flags.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_aborted(&self) -> bool {
        self.flags.aborted.load(Ordering::SeqCst)
    }
}
