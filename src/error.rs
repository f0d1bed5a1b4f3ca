//! Error types for the `framegrab` crate.
//!
//! This module defines [`FramegrabError`], the unified error type returned by
//! all fallible operations in the crate. Variants carry enough context
//! (paths, offending input, upstream messages) to diagnose a failure from the
//! run summary alone.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framegrab` operations.
///
/// Configuration and timestamp-parse errors are fatal for the whole run;
/// everything else is absorbed at the per-video granularity by the directory
/// walker.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramegrabError {
    /// Required configuration is missing or unusable at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A time expression could not be parsed.
    #[error("Failed to parse time expression {input:?}: {reason}")]
    TimeParse {
        /// The expression as supplied by the user.
        input: String,
        /// Why parsing failed.
        reason: String,
    },

    /// The video file could not be opened by the decode library.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to the extractor.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in {path}")]
    NoVideoStream {
        /// Path of the offending file.
        path: PathBuf,
    },

    /// The stream reports a zero or invalid frame rate, so frame indices and
    /// the video duration cannot be computed.
    #[error("Video at {path} reports a zero or invalid frame rate")]
    DegenerateFrameRate {
        /// Path of the offending file.
        path: PathBuf,
    },

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecode(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while creating directories or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate while encoding a frame.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),
}

impl From<FfmpegError> for FramegrabError {
    fn from(error: FfmpegError) -> Self {
        FramegrabError::Ffmpeg(error.to_string())
    }
}
