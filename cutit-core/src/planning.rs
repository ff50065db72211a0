// ============================================================================
// cutit-core/src/planning.rs
// ============================================================================
//
// SEGMENT PLANNING: Dividing a Media Duration into Equal Parts
//
// This module turns a probed duration and a requested part count into a list
// of contiguous time ranges. Every segment except the last has the same
// length; the last one absorbs the floating point remainder so the plan
// covers the whole input exactly.
//
// KEY COMPONENTS:
// - MediaDuration: validated, immutable total length of an input in seconds
// - Segment: one planned time range with its 1-based index
// - SegmentPlan: the ordered list of segments for a job
//
// AI-ASSISTANT-INFO: Pure planning logic, no I/O

// ---- External crate imports ----
use serde::Serialize;

// ---- Internal crate imports ----
use crate::config::{MAX_PART_COUNT, PLAN_TOLERANCE_SECS};
use crate::error::{CoreError, CoreResult};
use crate::utils::format_timestamp;

/// Total playable length of an input file, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct MediaDuration(f64);

impl MediaDuration {
    /// Creates a duration, rejecting negative, NaN and infinite values.
    pub fn new(seconds: f64) -> CoreResult<Self> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(CoreError::InvalidDuration(seconds));
        }
        Ok(Self(seconds))
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl std::fmt::Display for MediaDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_timestamp(self.0))
    }
}

/// One planned time range of the source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    /// 1-based position of the segment in the plan
    pub index: usize,
    /// Offset from the start of the input, in seconds
    pub start: f64,
    /// Length of the range, in seconds
    pub duration: f64,
}

impl Segment {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Ordered, contiguous segments covering a whole input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentPlan {
    total: MediaDuration,
    segments: Vec<Segment>,
}

impl SegmentPlan {
    /// Splits `duration` into `part_count` equal segments.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPartCount` when `part_count` is below 1 or
    /// above `MAX_PART_COUNT`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cutit_core::{MediaDuration, SegmentPlan};
    ///
    /// let plan = SegmentPlan::new(MediaDuration::new(100.0).unwrap(), 3).unwrap();
    /// assert_eq!(plan.len(), 3);
    /// assert_eq!(plan.segments()[1].index, 2);
    /// assert!((plan.total_planned() - 100.0).abs() < 1e-6);
    /// ```
    pub fn new(duration: MediaDuration, part_count: i64) -> CoreResult<Self> {
        if !(1..=MAX_PART_COUNT).contains(&part_count) {
            return Err(CoreError::InvalidPartCount(part_count));
        }
        let count = usize::try_from(part_count).map_err(|_| CoreError::InvalidPartCount(part_count))?;

        let total = duration.as_secs();
        let base = total / part_count as f64;

        let mut segments = Vec::with_capacity(count);
        for i in 0..count {
            let start = i as f64 * base;
            let length = if i + 1 == count {
                total - (count - 1) as f64 * base
            } else {
                base
            };
            segments.push(Segment {
                index: i + 1,
                start,
                duration: length.max(0.0),
            });
        }

        let plan = Self {
            total: duration,
            segments,
        };
        let drift = (plan.total_planned() - total).abs();
        if drift > PLAN_TOLERANCE_SECS {
            log::warn!(
                "Planned segments cover {:.9}s of {:.9}s (drift {:.3e}s)",
                plan.total_planned(),
                total,
                drift
            );
        }
        log::debug!(
            "Planned {} segment(s) of {:.6}s for {}",
            count,
            base,
            duration
        );
        Ok(plan)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn total(&self) -> MediaDuration {
        self.total
    }

    /// Sum of all planned segment durations.
    pub fn total_planned(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    /// Whether `segment` is the final one of this plan.
    pub fn is_last(&self, segment: &Segment) -> bool {
        segment.index == self.segments.len()
    }
}
