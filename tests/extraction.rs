//! Frame extraction integration tests.
//!
//! Tests that need a real decodable video use a fixture at
//! `tests/fixtures/sample_video.mp4` (any short clip works, e.g.
//! `ffmpeg -f lavfi -i testsrc=duration=5:rate=30 tests/fixtures/sample_video.mp4`)
//! and return early when it is absent.

use std::fs;
use std::path::Path;

use framegrab::{FramegrabError, extract_frames};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

#[test]
fn nonexistent_file_is_a_hard_failure() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let result = extract_frames(
        Path::new("this_file_does_not_exist.mp4"),
        &[1.0],
        scratch.path(),
        "20260829_120000",
    );

    let error = result.expect_err("opening a missing file must fail");
    assert!(
        matches!(error, FramegrabError::FileOpen { .. }),
        "expected FileOpen, got: {error}",
    );
}

#[test]
fn unreadable_media_is_a_hard_failure() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let bogus = scratch.path().join("invalid.mp4");
    fs::write(&bogus, b"not a real container").expect("Failed to write file");

    let result = extract_frames(&bogus, &[1.0], scratch.path(), "20260829_120000");
    assert!(result.is_err(), "garbage input should fail to open");
}

#[test]
fn offsets_are_processed_in_ascending_order() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let saved = extract_frames(
        Path::new(path),
        &[3.0, 1.0, 2.0],
        scratch.path(),
        "20260829_120000",
    )
    .expect("Extraction should succeed");

    assert_eq!(saved.len(), 3);
    let names: Vec<_> = saved
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names[0].contains("time1.0s"), "got {names:?}");
    assert!(names[1].contains("time2.0s"), "got {names:?}");
    assert!(names[2].contains("time3.0s"), "got {names:?}");
}

#[test]
fn offsets_beyond_duration_are_skipped() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    // The fixture is a few seconds long; one hour is far past the end.
    let saved = extract_frames(
        Path::new(path),
        &[1.0, 3600.0],
        scratch.path(),
        "20260829_120000",
    )
    .expect("Extraction should succeed");

    assert_eq!(saved.len(), 1);
    assert!(
        saved[0]
            .file_name()
            .unwrap()
            .to_string_lossy()
            .contains("time1.0s")
    );
}

#[test]
fn frames_land_in_a_per_video_subdirectory() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let saved = extract_frames(Path::new(path), &[0.0], scratch.path(), "20260829_120000")
        .expect("Extraction should succeed");

    assert_eq!(saved.len(), 1);
    let expected_dir = scratch.path().join("sample_video");
    assert!(expected_dir.is_dir());
    assert_eq!(saved[0].parent(), Some(expected_dir.as_path()));
    assert_eq!(
        saved[0].file_name().unwrap().to_string_lossy(),
        "sample_video_20260829_120000_time0.0s.jpg",
    );
}

#[test]
fn duplicate_offsets_collapse_to_one_frame() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let saved = extract_frames(
        Path::new(path),
        &[2.0, 2.0, 2.0],
        scratch.path(),
        "20260829_120000",
    )
    .expect("Extraction should succeed");

    assert_eq!(saved.len(), 1);
}
