// cutit-cli/tests/cli_integration.rs
//
// Runs the compiled `cutit` binary end to end.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn cutit() -> Command {
    let mut cmd = Command::cargo_bin("cutit").expect("cutit binary should build");
    cmd.env_remove("CUTIT_FFMPEG");
    cmd
}

fn create_dummy_file(dir: &Path, filename: &str) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, b"dummy content").expect("Failed to create dummy file");
    file_path
}

#[test]
fn test_help_lists_subcommands() {
    cutit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("split"))
        .stdout(predicate::str::contains("probe"));
}

#[test]
fn test_split_requires_parts() {
    let dir = tempdir().unwrap();
    let input = create_dummy_file(dir.path(), "clip.mp4");
    cutit()
        .arg("split")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--parts"));
}

#[test]
fn test_split_missing_input_exits_with_error() {
    let dir = tempdir().unwrap();
    cutit()
        .args(["split", "-n", "3"])
        .arg(dir.path().join("missing.mp4"))
        .arg("--ffmpeg")
        .arg(dir.path().join("no-such-ffmpeg"))
        .assert()
        .code(1);
}

#[cfg(unix)]
mod with_fake_ffmpeg {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::OnceLock;
    use tempfile::TempDir;

    const FAKE_FFMPEG: &str = r#"#!/bin/sh
input=""
out=""
copy=0
prev=""
for arg in "$@"; do
  if [ "$prev" = "-i" ]; then input="$arg"; fi
  if [ "$arg" = "copy" ]; then copy=1; fi
  prev="$arg"
  out="$arg"
done
if [ "$1" = "-version" ]; then echo "ffmpeg version 6.1-fake"; exit 0; fi
if [ "$copy" -eq 0 ]; then
  echo "  Duration: 00:01:30.00, start: 0.000000, bitrate: 900 kb/s" >&2
  exit 1
fi
printf '%s\n' "$@" > "$out"
exit 0
"#;

    static FAKE_TOOL: OnceLock<(TempDir, PathBuf)> = OnceLock::new();

    fn fake_ffmpeg() -> &'static Path {
        &FAKE_TOOL
            .get_or_init(|| {
                let dir = tempdir().expect("Failed to create tool dir");
                let path = dir.path().join("ffmpeg");
                fs::write(&path, FAKE_FFMPEG).expect("Failed to write fake ffmpeg");
                fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                    .expect("chmod fake ffmpeg");
                (dir, path)
            })
            .1
    }

    #[test]
    fn test_split_writes_all_parts() {
        let dir = tempdir().unwrap();
        let input = create_dummy_file(dir.path(), "clip.mp4");
        cutit()
            .arg("split")
            .arg(&input)
            .args(["--parts", "3", "--ffmpeg"])
            .arg(fake_ffmpeg())
            .assert()
            .code(0)
            .stdout(predicate::str::contains("3 parts"));

        let out_dir = dir.path().join("clip_parts");
        for index in 1..=3 {
            assert!(out_dir.join(format!("clip_part_{index}.mp4")).is_file());
        }
    }

    #[test]
    fn test_split_json_report() {
        let dir = tempdir().unwrap();
        let input = create_dummy_file(dir.path(), "talk.mkv");
        let out_dir = dir.path().join("pieces");
        let assert = cutit()
            .arg("split")
            .arg(&input)
            .args(["-n", "2", "--json", "-o"])
            .arg(&out_dir)
            .arg("--ffmpeg")
            .arg(fake_ffmpeg())
            .assert()
            .code(0);

        let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(report["state"], "completed");
        assert_eq!(report["outputs"].as_array().unwrap().len(), 2);
        assert!(out_dir.join("talk_part_2.mkv").is_file());
    }

    #[test]
    fn test_split_existing_part_fails_without_auto_suffix() {
        let dir = tempdir().unwrap();
        let input = create_dummy_file(dir.path(), "clip.mp4");
        let out_dir = dir.path().join("clip_parts");
        fs::create_dir(&out_dir).unwrap();
        fs::write(out_dir.join("clip_part_1.mp4"), b"keep me").unwrap();

        cutit()
            .arg("split")
            .arg(&input)
            .args(["-n", "2", "--ffmpeg"])
            .arg(fake_ffmpeg())
            .assert()
            .code(2);
        assert_eq!(fs::read(out_dir.join("clip_part_1.mp4")).unwrap(), b"keep me");

        cutit()
            .arg("split")
            .arg(&input)
            .args(["-n", "2", "--auto-suffix", "--ffmpeg"])
            .arg(fake_ffmpeg())
            .assert()
            .code(0);
        assert!(out_dir.join("clip_part_1_1.mp4").is_file());
    }

    #[test]
    fn test_split_zero_parts_fails() {
        let dir = tempdir().unwrap();
        let input = create_dummy_file(dir.path(), "clip.mp4");
        cutit()
            .arg("split")
            .arg(&input)
            .args(["-n", "0", "--ffmpeg"])
            .arg(fake_ffmpeg())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("part count"));
    }

    #[test]
    fn test_probe_rejects_huge_part_count() {
        let dir = tempdir().unwrap();
        let input = create_dummy_file(dir.path(), "clip.mp4");
        cutit()
            .arg("probe")
            .arg(&input)
            .args(["-n", "9223372036854775807", "--ffmpeg"])
            .arg(fake_ffmpeg())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid part count"));
    }

    #[test]
    fn test_probe_prints_duration_and_plan() {
        let dir = tempdir().unwrap();
        let input = create_dummy_file(dir.path(), "clip.mp4");
        cutit()
            .arg("probe")
            .arg(&input)
            .args(["-n", "3", "--ffmpeg"])
            .arg(fake_ffmpeg())
            .assert()
            .success()
            .stdout(predicate::str::contains("Part 3"))
            .stdout(predicate::str::contains("90.000s"));
    }
}
