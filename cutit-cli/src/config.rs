// cutit-cli/src/config.rs
//
// Default values for the `cutit` command line and the mapping from parsed
// arguments onto the core library's configuration.

use cutit_core::config::{CollisionPolicy, CutConfig, CutConfigBuilder};
use log::LevelFilter;
use std::path::PathBuf;

/// Console log level without `--verbose`.
pub const DEFAULT_CONSOLE_LEVEL: LevelFilter = LevelFilter::Warn;

/// Console log level with `--verbose`.
pub const VERBOSE_CONSOLE_LEVEL: LevelFilter = LevelFilter::Debug;

/// Level written to the log file.
pub const FILE_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

/// Prefix of log file names (`cutit_<timestamp>.log`).
pub const LOG_FILE_PREFIX: &str = "cutit";

/// Longest path shown in the summary before it is shortened.
pub const DISPLAY_PATH_MAX_CHARS: usize = 40;

/// Builds the core configuration for a split.
pub fn build_cut_config(ffmpeg_path: PathBuf, auto_suffix: bool) -> CutConfig {
    let policy = if auto_suffix {
        CollisionPolicy::AutoSuffix
    } else {
        CollisionPolicy::Fail
    };
    CutConfigBuilder::new()
        .ffmpeg_path(ffmpeg_path)
        .collision_policy(policy)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_suffix_flag_selects_policy() {
        let config = build_cut_config(PathBuf::from("/opt/ffmpeg"), true);
        assert_eq!(config.collision_policy, CollisionPolicy::AutoSuffix);
        assert_eq!(config.ffmpeg_path, PathBuf::from("/opt/ffmpeg"));

        let config = build_cut_config(PathBuf::from("ffmpeg"), false);
        assert_eq!(config.collision_policy, CollisionPolicy::Fail);
    }
}
