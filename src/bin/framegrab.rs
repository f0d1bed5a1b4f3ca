use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use framegrab::{Config, ExtractionOutcome};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Configuration falls back to the environment (and .env):\n  INPUT_DIRECTORY   directory tree to scan for videos (required)\n  OUTPUT_DIRECTORY  directory receiving one subdirectory per video (required)\n  EXTRACT_TIMES     comma-separated offsets, default \"20,2:30,3m,5m\"\n\nExamples:\n  framegrab --input videos --output frames\n  framegrab --input videos --output frames --times 10,1:30,2m --progress\n  INPUT_DIRECTORY=videos OUTPUT_DIRECTORY=frames framegrab --json";

#[derive(Debug, Parser)]
#[command(
    name = "framegrab",
    version,
    about = "Batch-extract still frames from video files at configured timestamps",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Directory tree to scan for video files (overrides INPUT_DIRECTORY).
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output root directory (overrides OUTPUT_DIRECTORY).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Comma-separated extraction times, e.g. "20,2:30,3m" (overrides EXTRACT_TIMES).
    #[arg(long)]
    times: Option<String>,

    /// Show a per-video progress bar.
    #[arg(long)]
    progress: bool,

    /// Print each saved frame path as extraction proceeds.
    #[arg(long)]
    verbose: bool,

    /// Output the run summary as machine-readable JSON.
    #[arg(long)]
    json: bool,
}

fn resolve_config(cli: &Cli) -> Result<Config, framegrab::FramegrabError> {
    let flag_or_env = |flag: Option<String>, variable: &str| {
        flag.or_else(|| std::env::var(variable).ok())
    };

    Config::resolve(
        flag_or_env(
            cli.input
                .as_ref()
                .map(|path| path.to_string_lossy().into_owned()),
            "INPUT_DIRECTORY",
        ),
        flag_or_env(
            cli.output
                .as_ref()
                .map(|path| path.to_string_lossy().into_owned()),
            "OUTPUT_DIRECTORY",
        ),
        flag_or_env(cli.times.clone(), "EXTRACT_TIMES"),
    )
}

fn print_summary(results: &std::collections::BTreeMap<PathBuf, ExtractionOutcome>) {
    println!("\n{}", "Run summary:".bold());
    for (video_path, outcome) in results {
        println!("\n{} {}", "video:".cyan().bold(), video_path.display());
        match outcome {
            ExtractionOutcome::Saved(saved_paths) => {
                println!(
                    "{}",
                    format!("  extracted {} frame(s)", saved_paths.len()).green()
                );
                for frame_path in saved_paths {
                    println!("  - {}", frame_path.display());
                }
            }
            ExtractionOutcome::Failed(reason) => {
                println!("{} {}", "  failed:".red().bold(), reason.red());
            }
        }
    }
}

fn print_json_summary(
    results: &std::collections::BTreeMap<PathBuf, ExtractionOutcome>,
) -> Result<(), Box<dyn std::error::Error>> {
    let videos: Vec<_> = results
        .iter()
        .map(|(video_path, outcome)| match outcome {
            ExtractionOutcome::Saved(saved_paths) => json!({
                "video": video_path,
                "success": true,
                "saved_frames": saved_paths,
            }),
            ExtractionOutcome::Failed(reason) => json!({
                "video": video_path,
                "success": false,
                "error": reason,
            }),
        })
        .collect();

    let failed = results.values().filter(|o| !o.is_success()).count();
    let payload = json!({
        "videos": videos,
        "total": results.len(),
        "failed": failed,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Keep FFmpeg's own stderr output down to real errors; Rust-side
    // diagnostics go through env_logger.
    ffmpeg_next::util::log::set_level(ffmpeg_next::util::log::Level::Error);

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let progress_bar = if cli.progress {
        let count = framegrab::discover_videos(&config.input_directory).len();
        let pb = ProgressBar::new(count as u64);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        pb.set_style(style.progress_chars("##-"));
        Some(pb)
    } else {
        None
    };

    let results = framegrab::process_directory_with(&config, |video_path, outcome| {
        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
        if cli.verbose {
            match outcome {
                ExtractionOutcome::Saved(saved_paths) => {
                    for frame_path in saved_paths {
                        eprintln!("saved {}", frame_path.display());
                    }
                }
                ExtractionOutcome::Failed(reason) => {
                    eprintln!("failed {}: {reason}", video_path.display());
                }
            }
        }
    })?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message("done");
    }

    if cli.json {
        print_json_summary(&results)?;
    } else {
        print_summary(&results);
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
