//! Per-video frame extraction.
//!
//! Opens one video file, seeks to each requested offset, decodes the nearest
//! frame, and writes it as a JPEG into a per-video subdirectory of the output
//! root. The FFmpeg demuxer and decoder are plain owned values, so they are
//! released on every exit path, including early error returns.

use std::path::{Path, PathBuf};

use ffmpeg_next::{
    Rational,
    codec::context::Context as CodecContext,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::error::FramegrabError;

/// Extract still frames from `video_path` at each of the requested offsets.
///
/// Offsets are processed in ascending numeric order regardless of input
/// order, and duplicates collapse to a single frame. An offset beyond the
/// video's duration, or one whose frame cannot be decoded, is skipped with a
/// diagnostic; the remaining offsets still run. Frames land in
/// `<output_root>/<video_stem>/` (created idempotently) as
/// `<stem>_<run_stamp>_time<offset>s.jpg`.
///
/// Returns the written paths in ascending offset order, possibly empty.
///
/// # Errors
///
/// - [`FramegrabError::FileOpen`] if the file cannot be opened.
/// - [`FramegrabError::NoVideoStream`] if the file has no video stream.
/// - [`FramegrabError::DegenerateFrameRate`] if the stream reports no usable
///   frame rate.
/// - [`FramegrabError::Io`] / [`FramegrabError::Image`] if a decoded frame
///   cannot be written.
pub fn extract_frames(
    video_path: &Path,
    offsets: &[f64],
    output_root: &Path,
    run_stamp: &str,
) -> Result<Vec<PathBuf>, FramegrabError> {
    // Initialise ffmpeg (safe to call multiple times).
    ffmpeg_next::init().map_err(|error| FramegrabError::FileOpen {
        path: video_path.to_path_buf(),
        reason: format!("FFmpeg initialisation failed: {error}"),
    })?;

    log::debug!("Opening video file: {}", video_path.display());
    let mut input =
        ffmpeg_next::format::input(&video_path).map_err(|error| FramegrabError::FileOpen {
            path: video_path.to_path_buf(),
            reason: error.to_string(),
        })?;

    let stream = input
        .streams()
        .best(Type::Video)
        .ok_or_else(|| FramegrabError::NoVideoStream {
            path: video_path.to_path_buf(),
        })?;
    let stream_index = stream.index();
    let time_base = stream.time_base();

    let frames_per_second = stream_frame_rate(&stream).ok_or_else(|| {
        FramegrabError::DegenerateFrameRate {
            path: video_path.to_path_buf(),
        }
    })?;
    let frame_count = stream_frame_count(&stream, &input, frames_per_second);
    let duration_seconds = frame_count as f64 / frames_per_second;

    let codec_parameters = stream.parameters();
    let decoder_context = CodecContext::from_parameters(codec_parameters)?;
    let mut decoder = decoder_context.decoder().video()?;

    let width = decoder.width();
    let height = decoder.height();
    let mut scaler = ScalingContext::get(
        decoder.format(),
        width,
        height,
        Pixel::RGB24,
        width,
        height,
        ScalingFlags::BILINEAR,
    )?;

    let stem = video_stem(video_path)?;
    let video_output_dir = output_root.join(&stem);
    std::fs::create_dir_all(&video_output_dir)?;

    // Deterministic ascending processing order, independent of input order.
    let mut sorted_offsets = offsets.to_vec();
    sorted_offsets.sort_by(f64::total_cmp);
    sorted_offsets.dedup();

    let mut saved_paths = Vec::new();
    for offset in sorted_offsets {
        if offset > duration_seconds {
            log::warn!(
                "Requested time {offset}s exceeds video length {duration_seconds:.2}s, \
                 skipping: {}",
                video_path.display(),
            );
            continue;
        }

        let frame_number = offset_to_frame_number(offset, frames_per_second);
        let image = match decode_frame_at(
            &mut input,
            &mut decoder,
            &mut scaler,
            stream_index,
            time_base,
            frames_per_second,
            frame_number,
        ) {
            Ok(image) => image,
            Err(error) => {
                log::warn!(
                    "Could not decode frame {frame_number} ({offset}s) from {}: {error}",
                    video_path.display(),
                );
                continue;
            }
        };

        let output_path = video_output_dir.join(frame_file_name(&stem, run_stamp, offset));
        image.save(&output_path)?;
        log::info!("Saved frame: {}", output_path.display());
        saved_paths.push(output_path);
    }

    Ok(saved_paths)
}

/// Seek to `frame_number` and decode the nearest frame at or after it.
///
/// Seeks land on the nearest keyframe before the target, so the decoder is
/// flushed and then run forward until the target index is reached. When
/// rounding leaves no frame at the exact index, the first frame past it is
/// returned instead.
fn decode_frame_at(
    input: &mut Input,
    decoder: &mut ffmpeg_next::decoder::Video,
    scaler: &mut ScalingContext,
    stream_index: usize,
    time_base: Rational,
    frames_per_second: f64,
    frame_number: u64,
) -> Result<DynamicImage, FramegrabError> {
    let target_timestamp = frame_number_to_stream_timestamp(frame_number, frames_per_second, time_base);
    input.seek(target_timestamp, ..target_timestamp)?;
    decoder.flush();

    let mut decoded_frame = VideoFrame::empty();
    let mut rgb_frame = VideoFrame::empty();

    for (stream, packet) in input.packets() {
        if stream.index() != stream_index {
            continue;
        }

        decoder.send_packet(&packet)?;

        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            let pts = decoded_frame.pts().unwrap_or(0);
            let current = pts_to_frame_number(pts, time_base, frames_per_second);

            if current >= frame_number {
                scaler.run(&decoded_frame, &mut rgb_frame)?;
                return frame_to_image(&rgb_frame);
            }
        }
    }

    // Drain buffered frames at end of stream.
    decoder.send_eof()?;
    while decoder.receive_frame(&mut decoded_frame).is_ok() {
        let pts = decoded_frame.pts().unwrap_or(0);
        let current = pts_to_frame_number(pts, time_base, frames_per_second);

        if current >= frame_number {
            scaler.run(&decoded_frame, &mut rgb_frame)?;
            decoder.flush();
            return frame_to_image(&rgb_frame);
        }
    }
    decoder.flush();

    Err(FramegrabError::VideoDecode(format!(
        "Could not locate frame {frame_number} in the video stream"
    )))
}

/// Frames per second from the stream's average frame rate, falling back to
/// the raw rate. `None` when neither yields a positive finite value.
fn stream_frame_rate(stream: &ffmpeg_next::Stream<'_>) -> Option<f64> {
    let from_rational = |rate: Rational| {
        if rate.denominator() != 0 {
            Some(rate.numerator() as f64 / rate.denominator() as f64)
        } else {
            None
        }
    };

    from_rational(stream.avg_frame_rate())
        .or_else(|| from_rational(stream.rate()))
        .filter(|fps| fps.is_finite() && *fps > 0.0)
}

/// Total frame count from the stream when the container records it,
/// otherwise estimated from the container duration.
fn stream_frame_count(
    stream: &ffmpeg_next::Stream<'_>,
    input: &Input,
    frames_per_second: f64,
) -> u64 {
    let recorded = stream.frames();
    if recorded > 0 {
        return recorded as u64;
    }

    let duration_microseconds = input.duration();
    if duration_microseconds > 0 {
        let seconds = duration_microseconds as f64 / 1_000_000.0;
        (seconds * frames_per_second) as u64
    } else {
        0
    }
}

/// Output file name for one extracted frame: the video stem, the run's
/// wall-clock stamp, and the requested offset rounded to one decimal.
pub(crate) fn frame_file_name(stem: &str, run_stamp: &str, offset: f64) -> String {
    format!("{stem}_{run_stamp}_time{offset:.1}s.jpg")
}

/// Target frame index for an offset: floor(fps × offset).
fn offset_to_frame_number(offset: f64, frames_per_second: f64) -> u64 {
    (frames_per_second * offset.max(0.0)) as u64
}

/// Convert a frame number to a timestamp in the stream's time base, suitable
/// for FFmpeg seeking.
fn frame_number_to_stream_timestamp(
    frame_number: u64,
    frames_per_second: f64,
    time_base: Rational,
) -> i64 {
    let seconds = frame_number as f64 / frames_per_second;
    let numerator = time_base.numerator() as f64;
    let denominator = time_base.denominator() as f64;
    (seconds * denominator / numerator) as i64
}

/// Rescale a PTS value from the stream time base to a frame number.
///
/// Rounds to the nearest index so that a timestamp sitting a fraction under
/// an exact frame boundary still maps to that frame.
fn pts_to_frame_number(pts: i64, time_base: Rational, frames_per_second: f64) -> u64 {
    let seconds = pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64;
    (seconds * frames_per_second).round().max(0.0) as u64
}

/// Convert a scaled RGB24 frame to an [`image::DynamicImage`].
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3), which
/// is stripped before handing the buffer to [`image::RgbImage::from_raw`].
fn frame_to_image(rgb_frame: &VideoFrame) -> Result<DynamicImage, FramegrabError> {
    let width = rgb_frame.width();
    let height = rgb_frame.height();
    let stride = rgb_frame.stride(0);
    let expected_stride = (width as usize) * 3;
    let data = rgb_frame.data(0);

    let buffer = if stride == expected_stride {
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    };

    let rgb_image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        FramegrabError::VideoDecode(
            "Failed to construct RGB image from decoded frame data".to_string(),
        )
    })?;
    Ok(DynamicImage::ImageRgb8(rgb_image))
}

fn video_stem(video_path: &Path) -> Result<String, FramegrabError> {
    video_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| FramegrabError::FileOpen {
            path: video_path.to_path_buf(),
            reason: "path has no file name".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use ffmpeg_next::Rational;

    use super::{
        frame_file_name, frame_number_to_stream_timestamp, offset_to_frame_number,
        pts_to_frame_number,
    };

    #[test]
    fn frame_number_floors_fps_times_offset() {
        assert_eq!(offset_to_frame_number(20.0, 30.0), 600);
        assert_eq!(offset_to_frame_number(1.5, 29.97), 44);
        assert_eq!(offset_to_frame_number(0.0, 25.0), 0);
    }

    #[test]
    fn frame_number_round_trips_through_stream_timestamps() {
        let time_base = Rational::new(1, 90_000);
        let fps = 30.0;
        for frame_number in [0_u64, 1, 10, 599, 9000] {
            let ts = frame_number_to_stream_timestamp(frame_number, fps, time_base);
            assert_eq!(pts_to_frame_number(ts, time_base, fps), frame_number);
        }
    }

    #[test]
    fn file_name_carries_stem_stamp_and_offset() {
        assert_eq!(
            frame_file_name("clip", "20260829_101500", 150.0),
            "clip_20260829_101500_time150.0s.jpg",
        );
        assert_eq!(
            frame_file_name("clip", "20260829_101500", 2.25),
            "clip_20260829_101500_time2.2s.jpg",
        );
    }
}
