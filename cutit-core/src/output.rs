//! Output naming and collision-safe reservation of part files.
//!
//! Parts are named `<stem>_part_<index>.<ext>` and written to a sibling
//! `<stem>_parts` directory unless the caller chooses one. A part path is
//! reserved by creating it with `create_new`, so an existing file is never
//! opened for writing and two writers can not claim the same name.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::CollisionPolicy;
use crate::error::{CoreError, CoreResult};

/// Upper bound on `_1`, `_2`, ... suffixes tried for one part.
const MAX_SUFFIX_ATTEMPTS: u32 = 9999;

/// A part file written by a successful segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    /// 1-based segment index
    pub index: usize,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Base name used for the parts of `input`.
pub fn source_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "output".to_string())
}

/// Extension of `input`, or `default_ext` when it has none.
pub fn source_extension(input: &Path, default_ext: &str) -> String {
    input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| default_ext.to_string())
}

/// Default output directory: `<stem><suffix>` next to the input.
pub fn default_output_dir(input: &Path, suffix: &str) -> PathBuf {
    let dir_name = format!("{}{}", source_stem(input), suffix);
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(dir_name),
        _ => PathBuf::from(dir_name),
    }
}

/// File name of part `index`: `name_part_1.ext`.
pub fn segment_file_name(stem: &str, index: usize, ext: &str) -> String {
    format!("{stem}_part_{index}.{ext}")
}

/// Path of part `index` of `input` inside `output_dir`.
pub fn segment_output_path(input: &Path, output_dir: &Path, index: usize, default_ext: &str) -> PathBuf {
    output_dir.join(segment_file_name(
        &source_stem(input),
        index,
        &source_extension(input, default_ext),
    ))
}

fn try_create_new(path: &Path) -> io::Result<()> {
    OpenOptions::new().write(true).create_new(true).open(path).map(|_| ())
}

/// Atomically creates an empty placeholder for a part.
///
/// With `CollisionPolicy::Fail` an existing file yields `CoreError::Collision`.
/// With `CollisionPolicy::AutoSuffix` the first free name of the form
/// `name_part_1_1.ext`, `name_part_1_2.ext`, ... is reserved instead.
/// Returns the reserved path.
pub fn reserve_output(path: &Path, policy: CollisionPolicy) -> CoreResult<PathBuf> {
    match try_create_new(path) {
        Ok(()) => return Ok(path.to_path_buf()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
        Err(e) => return Err(CoreError::Io(e)),
    }

    if policy == CollisionPolicy::Fail {
        log::warn!("Output already exists, refusing to overwrite: {}", path.display());
        return Err(CoreError::Collision(path.to_path_buf()));
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    for n in 1..=MAX_SUFFIX_ATTEMPTS {
        let name = match &ext {
            Some(ext) => format!("{stem}_{n}.{ext}"),
            None => format!("{stem}_{n}"),
        };
        let candidate = path.with_file_name(name);
        match try_create_new(&candidate) {
            Ok(()) => {
                log::warn!(
                    "Output {} exists, writing to {} instead",
                    path.display(),
                    candidate.display()
                );
                return Ok(candidate);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(CoreError::Io(e)),
        }
    }
    Err(CoreError::Collision(path.to_path_buf()))
}

/// Removes a reserved or partially written part, ignoring a missing file.
pub fn discard_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("Removed incomplete output {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove incomplete output {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_source() {
        let input = Path::new("/videos/My Trip.mkv");
        assert_eq!(default_output_dir(input, "_parts"), PathBuf::from("/videos/My Trip_parts"));
        assert_eq!(
            segment_output_path(input, Path::new("/out"), 3, "mp4"),
            PathBuf::from("/out/My Trip_part_3.mkv")
        );
    }

    #[test]
    fn missing_extension_uses_default() {
        let input = Path::new("recording");
        assert_eq!(source_extension(input, "mp4"), "mp4");
        assert_eq!(default_output_dir(input, "_parts"), PathBuf::from("recording_parts"));
        assert_eq!(segment_file_name("recording", 1, "mp4"), "recording_part_1.mp4");
    }

    #[test]
    fn reserve_creates_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip_part_1.mp4");
        let reserved = reserve_output(&path, CollisionPolicy::Fail).unwrap();
        assert_eq!(reserved, path);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn fail_policy_leaves_existing_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip_part_2.mp4");
        fs::write(&path, b"precious").unwrap();

        let err = reserve_output(&path, CollisionPolicy::Fail).unwrap_err();
        assert!(matches!(err, CoreError::Collision(ref p) if p == &path));
        assert_eq!(fs::read(&path).unwrap(), b"precious");
    }

    #[test]
    fn auto_suffix_picks_next_free_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip_part_2.mp4");
        fs::write(&path, b"precious").unwrap();
        fs::write(dir.path().join("clip_part_2_1.mp4"), b"also taken").unwrap();

        let reserved = reserve_output(&path, CollisionPolicy::AutoSuffix).unwrap();
        assert_eq!(reserved, dir.path().join("clip_part_2_2.mp4"));
        assert_eq!(fs::read(&path).unwrap(), b"precious");
    }

    #[test]
    fn discard_ignores_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.mp4");
        discard_output(&path);
        fs::write(&path, b"").unwrap();
        discard_output(&path);
        assert!(!path.exists());
    }
}
