//! Core library for splitting a video into equal-length parts with ffmpeg.
//!
//! The library probes the input's duration, plans N contiguous segments and
//! stream-copies each one into its own file, on a background thread that
//! reports progress and can be cancelled.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use cutit_core::{CutConfigBuilder, JobController};
//! use cutit_core::external::locate_ffmpeg;
//!
//! let ffmpeg = locate_ffmpeg(None, None).unwrap();
//! let config = CutConfigBuilder::new().ffmpeg_path(ffmpeg).build();
//! let controller = JobController::with_ffmpeg(config).unwrap();
//!
//! let handle = controller.submit_job("/videos/lecture.mp4", 3, None).unwrap();
//! handle.on_progress(|update| println!("{update}"));
//! let report = handle.wait();
//! for output in &report.outputs {
//!     println!("{}", output.path.display());
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod executor;
pub mod external;
pub mod job;
pub mod output;
pub mod planning;
pub mod progress;
pub mod utils;

// Re-exports for public API
pub use config::{CollisionPolicy, CutConfig, CutConfigBuilder};
pub use controller::{JobController, JobHandle};
pub use error::{CoreError, CoreResult};
pub use executor::SegmentExecutor;
pub use external::{CutRequest, FfmpegProbe, MediaCutter, MediaProbe, SidecarCutter, locate_ffmpeg};
pub use job::{CutJob, CutReport, JobState, SegmentFailure, SegmentStatus};
pub use output::OutputFile;
pub use planning::{MediaDuration, Segment, SegmentPlan};
pub use progress::{CancelToken, JobEvent, ProgressUpdate, SegmentOutcome};
pub use utils::{format_bytes, format_timestamp, parse_timecode};
