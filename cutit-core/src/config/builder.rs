// ============================================================================
// cutit-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CutConfig
//
// This module implements a fluent builder for CutConfig so front ends can
// map their own flags onto the configuration and fall back to the defaults
// for everything they do not set.
//
// AI-ASSISTANT-INFO: Builder pattern implementation for CutConfig

// ---- Standard library imports ----
use std::path::PathBuf;
use std::time::Duration;

// ---- Internal crate imports ----
use super::{CollisionPolicy, CutConfig};

/// Builder for creating CutConfig instances.
///
/// # Examples
///
/// ```rust
/// use cutit_core::config::CutConfigBuilder;
/// use std::time::Duration;
///
/// let config = CutConfigBuilder::new()
///     .ffmpeg_path("ffmpeg")
///     .default_extension("mkv")
///     .poll_interval(Duration::from_millis(20))
///     .build();
/// assert_eq!(config.default_extension, "mkv");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CutConfigBuilder {
    config: CutConfig,
}

impl CutConfigBuilder {
    /// Creates a new builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ffmpeg binary used for probing and cutting.
    pub fn ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ffmpeg_path = path.into();
        self
    }

    /// Sets the policy applied when an output file already exists.
    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.config.collision_policy = policy;
        self
    }

    /// Sets the extension used when the source file has none.
    ///
    /// A leading dot is stripped.
    pub fn default_extension(mut self, ext: &str) -> Self {
        self.config.default_extension = ext.trim_start_matches('.').to_string();
        self
    }

    /// Sets the suffix of the default output directory.
    pub fn output_dir_suffix(mut self, suffix: &str) -> Self {
        self.config.output_dir_suffix = suffix.to_string();
        self
    }

    /// Sets how often a running cut checks for an abort request.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Builds the CutConfig instance.
    pub fn build(self) -> CutConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = CutConfigBuilder::new()
            .ffmpeg_path("/usr/local/bin/ffmpeg")
            .collision_policy(CollisionPolicy::AutoSuffix)
            .default_extension(".mkv")
            .output_dir_suffix("-split")
            .poll_interval(Duration::from_millis(10))
            .build();

        assert_eq!(config.ffmpeg_path, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(config.collision_policy, CollisionPolicy::AutoSuffix);
        assert_eq!(config.default_extension, "mkv");
        assert_eq!(config.output_dir_suffix, "-split");
        assert_eq!(config.poll_interval, Duration::from_millis(10));
    }

    #[test]
    fn untouched_builder_matches_default() {
        let built = CutConfigBuilder::new().build();
        let default = CutConfig::default();
        assert_eq!(built.ffmpeg_path, default.ffmpeg_path);
        assert_eq!(built.collision_policy, default.collision_policy);
        assert_eq!(built.default_extension, default.default_extension);
    }
}
