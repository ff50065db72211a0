// ============================================================================
// cutit-core/src/executor.rs
// ============================================================================
//
// SEGMENT EXECUTION: Producing One Part File per Planned Segment
//
// This module runs a single planned segment through a MediaCutter and checks
// the result. The output path is reserved before the cutter runs and removed
// again if the segment fails, so a failed segment never leaves an empty or
// truncated file behind and never touches a file that existed before.
//
// KEY COMPONENTS:
// - SegmentExecutor: reserve, cut, verify for one segment
//
// AI-ASSISTANT-INFO: Per-segment execution with collision-safe output handling

// ---- Standard library imports ----
use std::fs;
use std::path::Path;

// ---- Internal crate imports ----
use crate::config::CollisionPolicy;
use crate::error::{CoreError, CoreResult};
use crate::external::{CutRequest, MediaCutter};
use crate::output::{OutputFile, discard_output, reserve_output};
use crate::planning::Segment;
use crate::progress::CancelToken;
use crate::utils::format_timestamp;

/// Reason recorded for a segment whose cutter was killed by an abort.
pub const ABORTED_REASON: &str = "aborted";

/// Runs planned segments one at a time.
pub struct SegmentExecutor<'a, C: MediaCutter + ?Sized> {
    cutter: &'a C,
    collision_policy: CollisionPolicy,
}

impl<'a, C: MediaCutter + ?Sized> SegmentExecutor<'a, C> {
    pub fn new(cutter: &'a C, collision_policy: CollisionPolicy) -> Self {
        Self {
            cutter,
            collision_policy,
        }
    }

    /// Cuts `segment` of `input` into `output_path`.
    ///
    /// With `run_to_end` set the cut has no duration limit and copies to the
    /// end of the input; the controller sets it for the final segment.
    ///
    /// # Errors
    ///
    /// * `CoreError::Collision` - The output exists and the policy is `Fail`
    /// * `CoreError::Segment` - The cutter failed, was aborted, or produced
    ///   no usable file
    pub fn run_segment(
        &self,
        input: &Path,
        segment: &Segment,
        output_path: &Path,
        run_to_end: bool,
        cancel: &CancelToken,
    ) -> CoreResult<OutputFile> {
        let index = segment.index;
        let output = match reserve_output(output_path, self.collision_policy) {
            Ok(path) => path,
            Err(CoreError::Collision(path)) => return Err(CoreError::Collision(path)),
            Err(e) => {
                return Err(CoreError::Segment {
                    index,
                    reason: format!("could not create {}: {}", output_path.display(), e),
                });
            }
        };

        let request = CutRequest {
            input: input.to_path_buf(),
            start: segment.start,
            duration: if run_to_end { None } else { Some(segment.duration) },
            output: output.clone(),
        };
        log::debug!(
            "Cutting part {} from {} ({:.6}s) into {}",
            index,
            format_timestamp(segment.start),
            segment.duration,
            output.display()
        );

        if let Err(e) = self.cutter.cut(&request, cancel) {
            discard_output(&output);
            return Err(CoreError::Segment {
                index,
                reason: cutter_failure_reason(&e),
            });
        }

        let size_bytes = match fs::metadata(&output) {
            Ok(meta) => meta.len(),
            Err(_) => {
                return Err(CoreError::Segment {
                    index,
                    reason: format!("output file {} was not created", output.display()),
                });
            }
        };
        if size_bytes == 0 {
            discard_output(&output);
            return Err(CoreError::Segment {
                index,
                reason: format!("output file {} is empty", output.display()),
            });
        }

        Ok(OutputFile {
            index,
            path: output,
            size_bytes,
        })
    }
}

fn cutter_failure_reason(err: &CoreError) -> String {
    match err {
        CoreError::Cancelled => ABORTED_REASON.to_string(),
        CoreError::CommandFailed { status, stderr, .. } if stderr.is_empty() => {
            format!("ffmpeg exited with {status}")
        }
        CoreError::CommandFailed { status, stderr, .. } => {
            format!("ffmpeg exited with {status}: {stderr}")
        }
        CoreError::OperationFailed(reason) => reason.clone(),
        other => other.to_string(),
    }
}

/// Human readable reason for a failed segment.
pub fn segment_failure_reason(err: &CoreError) -> String {
    match err {
        CoreError::Segment { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::{MediaDuration, SegmentPlan};

    struct FnCutter<F>(F);

    impl<F> MediaCutter for FnCutter<F>
    where
        F: Fn(&CutRequest) -> CoreResult<()> + Send + Sync,
    {
        fn cut(&self, request: &CutRequest, _cancel: &CancelToken) -> CoreResult<()> {
            (self.0)(request)
        }
    }

    fn segments() -> Vec<Segment> {
        SegmentPlan::new(MediaDuration::new(30.0).unwrap(), 3)
            .unwrap()
            .segments()
            .to_vec()
    }

    #[test]
    fn successful_cut_reports_size() {
        let dir = tempfile::tempdir().unwrap();
        let cutter = FnCutter(|req: &CutRequest| -> CoreResult<()> {
            assert_eq!(req.duration, Some(10.0));
            fs::write(&req.output, b"0123456789")?;
            Ok(())
        });
        let executor = SegmentExecutor::new(&cutter, CollisionPolicy::Fail);
        let out = dir.path().join("a_part_1.mp4");

        let file = executor
            .run_segment(Path::new("a.mp4"), &segments()[0], &out, false, &CancelToken::new())
            .unwrap();
        assert_eq!(file.index, 1);
        assert_eq!(file.path, out);
        assert_eq!(file.size_bytes, 10);
    }

    #[test]
    fn run_to_end_drops_duration() {
        let dir = tempfile::tempdir().unwrap();
        let cutter = FnCutter(|req: &CutRequest| -> CoreResult<()> {
            assert_eq!(req.duration, None);
            assert_eq!(req.start, 20.0);
            fs::write(&req.output, b"x")?;
            Ok(())
        });
        let executor = SegmentExecutor::new(&cutter, CollisionPolicy::Fail);
        let out = dir.path().join("a_part_3.mp4");
        executor
            .run_segment(Path::new("a.mp4"), &segments()[2], &out, true, &CancelToken::new())
            .unwrap();
    }

    #[test]
    fn empty_output_is_a_failure_and_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let cutter = FnCutter(|_: &CutRequest| -> CoreResult<()> { Ok(()) });
        let executor = SegmentExecutor::new(&cutter, CollisionPolicy::Fail);
        let out = dir.path().join("a_part_2.mp4");

        let err = executor
            .run_segment(Path::new("a.mp4"), &segments()[1], &out, false, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, CoreError::Segment { index: 2, ref reason } if reason.contains("empty")));
        assert!(!out.exists());
    }

    #[test]
    fn cutter_error_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let cutter = FnCutter(|req: &CutRequest| -> CoreResult<()> {
            fs::write(&req.output, b"half")?;
            Err(CoreError::OperationFailed("Invalid data found".into()))
        });
        let executor = SegmentExecutor::new(&cutter, CollisionPolicy::Fail);
        let out = dir.path().join("a_part_1.mp4");

        let err = executor
            .run_segment(Path::new("a.mp4"), &segments()[0], &out, false, &CancelToken::new())
            .unwrap_err();
        assert_eq!(segment_failure_reason(&err), "Invalid data found");
        assert!(!out.exists());
    }

    #[test]
    fn aborted_cut_is_reported_as_aborted() {
        let dir = tempfile::tempdir().unwrap();
        let cutter = FnCutter(|_: &CutRequest| -> CoreResult<()> { Err(CoreError::Cancelled) });
        let executor = SegmentExecutor::new(&cutter, CollisionPolicy::Fail);
        let out = dir.path().join("a_part_1.mp4");

        let err = executor
            .run_segment(Path::new("a.mp4"), &segments()[0], &out, false, &CancelToken::new())
            .unwrap_err();
        assert_eq!(segment_failure_reason(&err), ABORTED_REASON);
    }

    #[test]
    fn collision_skips_the_cutter() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a_part_1.mp4");
        fs::write(&out, b"keep me").unwrap();
        let cutter = FnCutter(|_: &CutRequest| -> CoreResult<()> { panic!("cutter must not run") });
        let executor = SegmentExecutor::new(&cutter, CollisionPolicy::Fail);

        let err = executor
            .run_segment(Path::new("a.mp4"), &segments()[0], &out, false, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, CoreError::Collision(_)));
        assert_eq!(fs::read(&out).unwrap(), b"keep me");
    }
}
