//! Configuration structures and constants for the cutit-core library.
//!
//! `CutConfig` is created by the consumer of the library (e.g., cutit-cli)
//! and passed explicitly into the probe, the cutter and the job controller.
//! The ffmpeg location is part of it so tests can point at a fake binary.

mod builder;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub use builder::CutConfigBuilder;

// Default constants

/// Extension used for output parts when the source file has none.
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Suffix appended to the source stem to name the default output directory.
pub const DEFAULT_OUTPUT_DIR_SUFFIX: &str = "_parts";

/// Tolerance (seconds) within which a plan's total must equal the media duration.
pub const PLAN_TOLERANCE_SECS: f64 = 1e-6;

/// Largest part count the planner accepts.
pub const MAX_PART_COUNT: i64 = 10_000;

/// How often a running cut checks for an abort request.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Environment variable that overrides the ffmpeg location.
pub const FFMPEG_ENV_VAR: &str = "CUTIT_FFMPEG";

/// What to do when a computed output path already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Leave the existing file alone and report the segment as failed.
    #[default]
    Fail,
    /// Pick the first free name of the form `name_part_1_1.ext`, `name_part_1_2.ext`, ...
    AutoSuffix,
}

/// Main configuration structure for the cutit-core library.
///
/// # Examples
///
/// ```rust
/// use cutit_core::config::{CollisionPolicy, CutConfigBuilder};
///
/// let config = CutConfigBuilder::new()
///     .ffmpeg_path("/opt/ffmpeg/bin/ffmpeg")
///     .collision_policy(CollisionPolicy::AutoSuffix)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutConfig {
    /// Path to the ffmpeg binary used for probing and cutting
    pub ffmpeg_path: PathBuf,

    /// Behaviour when an output file of the computed name already exists
    pub collision_policy: CollisionPolicy,

    /// Extension (without the dot) for parts of an input without extension
    pub default_extension: String,

    /// Suffix for the default `<stem><suffix>` output directory
    pub output_dir_suffix: String,

    /// Interval between abort checks while a cut is running
    #[serde(with = "millis")]
    pub poll_interval: Duration,
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            collision_policy: CollisionPolicy::default(),
            default_extension: DEFAULT_EXTENSION.to_string(),
            output_dir_suffix: DEFAULT_OUTPUT_DIR_SUFFIX.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl CutConfig {
    /// Checks the configuration for values that would make every job fail.
    pub fn validate(&self) -> CoreResult<()> {
        if self.ffmpeg_path.as_os_str().is_empty() {
            return Err(CoreError::Config("ffmpeg path must not be empty".to_string()));
        }
        if self.default_extension.is_empty()
            || self.default_extension.starts_with('.')
            || self.default_extension.contains(['/', '\\'])
        {
            return Err(CoreError::Config(format!(
                "default extension '{}' must be a bare extension such as 'mp4'",
                self.default_extension
            )));
        }
        if self.output_dir_suffix.contains(['/', '\\']) {
            return Err(CoreError::Config(format!(
                "output directory suffix '{}' must not contain path separators",
                self.output_dir_suffix
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(CoreError::Config("poll interval must be greater than zero".to_string()));
        }
        Ok(())
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = CutConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.collision_policy, CollisionPolicy::Fail);
        assert_eq!(config.default_extension, "mp4");
        assert_eq!(config.output_dir_suffix, "_parts");
    }

    #[test]
    fn rejects_dotted_extension() {
        let config = CutConfig {
            default_extension: ".mkv".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn rejects_separator_in_suffix() {
        let config = CutConfig {
            output_dir_suffix: "/parts".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let config = CutConfig {
            poll_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let config = CutConfig {
            collision_policy: CollisionPolicy::AutoSuffix,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"auto_suffix\""));
        assert!(json.contains("\"poll_interval\":50"));
        let back: CutConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.collision_policy, CollisionPolicy::AutoSuffix);
        assert_eq!(back.poll_interval, Duration::from_millis(50));
    }
}
