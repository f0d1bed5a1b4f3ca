//! # framegrab
//!
//! Batch-extract still frames from video files at configured timestamps.
//!
//! `framegrab` walks an input directory tree, finds video files (`.mp4`,
//! `.avi`, `.mov`, `.mkv`), and for each one decodes the frame nearest each
//! requested offset and writes it as a JPEG into a per-video subdirectory of
//! the output root. Decoding is powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate; frames are
//! encoded with the [`image`](https://crates.io/crates/image) crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use framegrab::{Config, process_directory};
//!
//! let config = Config::resolve(
//!     Some("videos".to_string()),
//!     Some("frames".to_string()),
//!     Some("20,2:30,3m".to_string()),
//! ).unwrap();
//!
//! let results = process_directory(&config).unwrap();
//! for (video, outcome) in &results {
//!     println!("{}: {outcome:?}", video.display());
//! }
//! ```
//!
//! Time expressions accept colon notation (`1:07:40`, `2:30`, `20`) and unit
//! suffixes (`3m`, `1h2m3s`); see [`timespec::parse`].
//!
//! One bad video never aborts a run: per-video failures are recorded in the
//! returned map, and per-offset failures (an offset beyond the video's
//! length, or a frame that cannot be decoded) are logged and skipped.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod config;
pub mod error;
pub mod extractor;
pub mod timespec;
pub mod walker;

pub use config::{Config, DEFAULT_EXTRACT_TIMES};
pub use error::FramegrabError;
pub use extractor::extract_frames;
pub use walker::{
    ExtractionOutcome, VIDEO_EXTENSIONS, discover_videos, process_directory,
    process_directory_with,
};
