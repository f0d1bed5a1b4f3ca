//! Directory traversal and per-video result aggregation.
//!
//! Walks the input tree, runs the frame extractor for every candidate video,
//! and collects a per-video outcome. Any error raised for one video is
//! converted into a failed outcome for that video only; siblings still run.

use std::{collections::BTreeMap, path::{Path, PathBuf}};

use chrono::Local;
use walkdir::WalkDir;

use crate::{config::Config, error::FramegrabError, extractor};

/// File extensions (lowercased, without the dot) treated as videos.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv"];

/// Outcome of processing one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// The video was processed; the paths of the frames written, in
    /// ascending offset order. Empty when every offset was skipped.
    Saved(Vec<PathBuf>),
    /// The video could not be processed at all.
    Failed(String),
}

impl ExtractionOutcome {
    /// `true` for [`ExtractionOutcome::Saved`], even with zero frames.
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Saved(_))
    }
}

/// Recursively discover candidate video files under `root`.
///
/// A file qualifies when its extension, lowercased, is one of
/// [`VIDEO_EXTENSIONS`]. Unreadable directory entries are skipped with a
/// diagnostic. Traversal order is not guaranteed to be sorted.
pub fn discover_videos(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                log::warn!("Skipping unreadable directory entry: {error}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && has_video_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

/// Whether `path` carries one of the supported video extensions,
/// case-insensitively.
pub fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .map(|extension| extension.to_string_lossy().to_lowercase())
        .is_some_and(|extension| VIDEO_EXTENSIONS.contains(&extension.as_str()))
}

/// Process every video under the configured input directory.
///
/// Equivalent to [`process_directory_with`] without an observer.
///
/// # Errors
///
/// Only setup failures (creating the output root) are returned; per-video
/// errors are recorded in the result map.
pub fn process_directory(
    config: &Config,
) -> Result<BTreeMap<PathBuf, ExtractionOutcome>, FramegrabError> {
    process_directory_with(config, |_, _| {})
}

/// Process every video under the configured input directory, invoking
/// `observe` with each video's path and outcome as it completes.
///
/// Creates the output root idempotently, captures one wall-clock run stamp
/// used for every filename in the run, and extracts the configured offsets
/// from each discovered video. A failure for one video is recorded as
/// [`ExtractionOutcome::Failed`] and does not abort the run.
///
/// # Errors
///
/// Returns [`FramegrabError::Io`] when the output root cannot be created.
pub fn process_directory_with<F>(
    config: &Config,
    mut observe: F,
) -> Result<BTreeMap<PathBuf, ExtractionOutcome>, FramegrabError>
where
    F: FnMut(&Path, &ExtractionOutcome),
{
    std::fs::create_dir_all(&config.output_directory)?;

    // One stamp for the whole run; every file written by this invocation
    // shares it.
    let run_stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

    let videos = discover_videos(&config.input_directory);
    log::info!(
        "Discovered {} video file(s) under {}",
        videos.len(),
        config.input_directory.display(),
    );

    let mut results = BTreeMap::new();
    for video_path in videos {
        let outcome = match extractor::extract_frames(
            &video_path,
            &config.extract_times,
            &config.output_directory,
            &run_stamp,
        ) {
            Ok(saved_paths) => ExtractionOutcome::Saved(saved_paths),
            Err(error) => {
                log::error!("Failed to process {}: {error}", video_path.display());
                ExtractionOutcome::Failed(error.to_string())
            }
        };

        observe(&video_path, &outcome);
        results.insert(video_path, outcome);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{ExtractionOutcome, has_video_extension};

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(has_video_extension(Path::new("a/b/clip.mp4")));
        assert!(has_video_extension(Path::new("a/b/CLIP.MP4")));
        assert!(has_video_extension(Path::new("clip.MkV")));
        assert!(has_video_extension(Path::new("clip.mov")));
        assert!(has_video_extension(Path::new("clip.avi")));
    }

    #[test]
    fn non_video_extensions_are_rejected() {
        assert!(!has_video_extension(Path::new("notes.txt")));
        assert!(!has_video_extension(Path::new("clip.mp3")));
        assert!(!has_video_extension(Path::new("archive.mp4.bak")));
        assert!(!has_video_extension(Path::new("no_extension")));
    }

    #[test]
    fn zero_frame_outcome_is_still_a_success() {
        assert!(ExtractionOutcome::Saved(Vec::new()).is_success());
        assert!(!ExtractionOutcome::Failed("boom".to_string()).is_success());
    }
}
