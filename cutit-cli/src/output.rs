// ============================================================================
// cutit-cli/src/output.rs
// ============================================================================
//
// TERMINAL OUTPUT: Styled Messages, Progress Bar and Job Summary
//
// Helpers for everything the CLI prints for humans. Styling comes from
// `console`, which drops colours automatically when stdout is not a
// terminal; the progress bar is an `indicatif` bar drawn on stderr.
//
// AI-ASSISTANT-INFO: Terminal presentation helpers for the CLI

// ---- External crate imports ----
use console::style;
use cutit_core::{CutReport, JobState, format_bytes};
use indicatif::{ProgressBar, ProgressStyle};

// ---- Standard library imports ----
use std::fmt::Display;
use std::path::{MAIN_SEPARATOR, Path};
use std::time::Duration;

// ---- Internal crate imports ----
use crate::config::DISPLAY_PATH_MAX_CHARS;

/// Print a heading with styling and clear separation
pub fn print_heading(text: &str) {
    let line = "=".repeat(50);
    println!("\n{}", style(&line).blue().bright());
    println!("{}", style(format!(" {text} ")).bold().white().bright());
    println!("{}\n", style(&line).blue().bright());
}

/// Print an info line with label and value, with the label coloured
pub fn print_info<T: Display>(label: &str, value: T) {
    println!("{}: {}", style(label).cyan().bright(), value);
}

/// Print an error message with red styling
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("Error:").red().bright().bold(), message);
}

/// Print a success message with green styling and a checkmark
pub fn print_success(message: &str) {
    println!("{} {}", style("✔").green(), message);
}

/// Print a warning message with yellow styling
pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), style(message).yellow());
}

/// Create a progress bar counting finished parts
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ");
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Formats elapsed wall-clock time as `H:MM:SS`.
pub fn format_elapsed(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Shortens a path for display, keeping the file name whenever possible.
///
/// Paths up to `max_chars` characters are returned unchanged. Otherwise the
/// directory part is cut and marked with `...`; when the file name alone is
/// too long, its stem is cut instead and the extension kept.
pub fn truncate_path(path: &Path, max_chars: usize) -> String {
    let full = path.display().to_string();
    if full.chars().count() <= max_chars {
        return full;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name_len = file_name.chars().count();

    if name_len + 5 >= max_chars {
        let (stem, ext) = match file_name.rfind('.') {
            Some(pos) if pos > 0 => file_name.split_at(pos),
            _ => (file_name.as_str(), ""),
        };
        let avail = max_chars.saturating_sub(5 + ext.chars().count());
        let head: String = stem.chars().take(avail).collect();
        return format!("{head}...{ext}");
    }

    let dir = path
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let avail = max_chars - name_len - 5;
    let head: String = dir.chars().take(avail).collect();
    format!("{head}...{MAIN_SEPARATOR}{file_name}")
}

/// Prints the outcome of a split for humans.
pub fn print_report(report: &CutReport) {
    print_heading("Split Summary");
    print_info("Input", truncate_path(&report.input, DISPLAY_PATH_MAX_CHARS));
    if let Some(dir) = &report.output_dir {
        print_info("Output folder", truncate_path(dir, DISPLAY_PATH_MAX_CHARS));
    }
    if let Some(secs) = report.duration_secs {
        print_info("Duration", cutit_core::format_timestamp(secs));
    }
    print_info("Elapsed", format_elapsed(report.elapsed_secs));

    for output in &report.outputs {
        print_info(
            &format!("Part {}", output.index),
            format!(
                "{} ({})",
                truncate_path(&output.path, DISPLAY_PATH_MAX_CHARS),
                format_bytes(output.size_bytes)
            ),
        );
    }
    for failure in &report.failures {
        print_warning(&format!("Part {} failed: {}", failure.index, failure.reason));
    }

    println!();
    match report.state {
        JobState::Completed => print_success(&format!(
            "Video split into {} parts successfully",
            report.outputs.len()
        )),
        JobState::PartiallyFailed => print_warning(&format!(
            "{} of {} parts written",
            report.outputs.len(),
            report.outputs.len() + report.failures.len()
        )),
        JobState::Cancelled => print_warning(&format!(
            "Cancelled after {} part(s)",
            report.outputs.len()
        )),
        _ => print_error(
            report
                .error
                .as_deref()
                .unwrap_or("No part could be written"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn short_paths_are_untouched() {
        assert_eq!(truncate_path(Path::new("/tmp/a.mp4"), 40), "/tmp/a.mp4");
    }

    #[test]
    fn long_directories_are_cut() {
        let path = PathBuf::from("/home/someone/videos/holidays/2024/summer/beach.mp4");
        let shown = truncate_path(&path, 40);
        assert_eq!(shown.chars().count(), 39);
        assert!(shown.ends_with(&format!("...{MAIN_SEPARATOR}beach.mp4")));
        assert!(shown.starts_with("/home/someone"));
    }

    #[test]
    fn long_file_names_keep_extension() {
        let path = PathBuf::from("/v/an_extremely_long_recording_name_from_the_camera.mkv");
        let shown = truncate_path(&path, 40);
        assert!(shown.ends_with("....mkv"));
        assert_eq!(shown.chars().count(), 38);
        assert!(shown.starts_with("an_extremely"));
    }

    #[test]
    fn elapsed_formats_like_a_clock() {
        assert_eq!(format_elapsed(0.0), "0:00:00");
        assert_eq!(format_elapsed(59.9), "0:00:59");
        assert_eq!(format_elapsed(3725.0), "1:02:05");
        assert_eq!(format_elapsed(f64::NAN), "0:00:00");
    }
}
