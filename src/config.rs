//! Run configuration.
//!
//! [`Config`] is built once at process entry and passed into the directory
//! walker; extraction logic never reads the environment on its own. The
//! binary resolves values from CLI flags with the `INPUT_DIRECTORY`,
//! `OUTPUT_DIRECTORY`, and `EXTRACT_TIMES` environment variables (and `.env`)
//! as fallback.
//!
//! All configured time expressions are parsed here, before any video is
//! touched, so a malformed expression fails the whole run up front.

use std::{env, path::PathBuf};

use crate::{error::FramegrabError, timespec};

/// Extraction times used when `EXTRACT_TIMES` is not set.
pub const DEFAULT_EXTRACT_TIMES: &str = "20,2:30,3m,5m";

/// Resolved configuration for one extraction run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory tree to scan for video files.
    pub input_directory: PathBuf,
    /// Root directory that receives one subdirectory per video.
    pub output_directory: PathBuf,
    /// Requested offsets into each video, in seconds, already parsed.
    pub extract_times: Vec<f64>,
}

impl Config {
    /// Build a configuration from already-looked-up values.
    ///
    /// `times` is a comma-separated list of time expressions; `None` selects
    /// [`DEFAULT_EXTRACT_TIMES`].
    ///
    /// # Errors
    ///
    /// Returns [`FramegrabError::Config`] when the input or output directory
    /// is missing or empty, and [`FramegrabError::TimeParse`] when any time
    /// expression is malformed.
    pub fn resolve(
        input: Option<String>,
        output: Option<String>,
        times: Option<String>,
    ) -> Result<Self, FramegrabError> {
        let input_directory = required_path(input, "INPUT_DIRECTORY")?;
        let output_directory = required_path(output, "OUTPUT_DIRECTORY")?;

        let times = times.unwrap_or_else(|| DEFAULT_EXTRACT_TIMES.to_string());
        let extract_times = parse_time_list(&times)?;
        if extract_times.is_empty() {
            return Err(FramegrabError::Config(
                "EXTRACT_TIMES contains no time expressions".to_string(),
            ));
        }

        Ok(Self {
            input_directory,
            output_directory,
            extract_times,
        })
    }

    /// Build a configuration from the process environment.
    ///
    /// Reads `INPUT_DIRECTORY`, `OUTPUT_DIRECTORY`, and `EXTRACT_TIMES`.
    ///
    /// # Errors
    ///
    /// Same as [`Config::resolve`].
    pub fn from_env() -> Result<Self, FramegrabError> {
        Self::resolve(
            env::var("INPUT_DIRECTORY").ok(),
            env::var("OUTPUT_DIRECTORY").ok(),
            env::var("EXTRACT_TIMES").ok(),
        )
    }
}

fn required_path(value: Option<String>, name: &str) -> Result<PathBuf, FramegrabError> {
    match value {
        Some(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => Err(FramegrabError::Config(format!("{name} is not set"))),
    }
}

/// Parse a comma-separated list of time expressions. Blank entries are
/// skipped; any malformed entry fails the whole list.
fn parse_time_list(raw: &str) -> Result<Vec<f64>, FramegrabError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(timespec::parse)
        .collect()
}
