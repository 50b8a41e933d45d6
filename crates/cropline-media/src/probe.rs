// crates/cropline-media/src/probe.rs
//
// In-process FFmpeg probe: intrinsic dimensions and duration.
// The dimensions here are the video-native pixel space every crop position
// is expressed in; they come from the stream parameters, never from however
// large the preview happens to be drawn.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::input;
use ffmpeg::media::Type;

/// Open `path` and report `(width, height, duration_secs)`.
pub fn probe_metadata(path: &PathBuf) -> Result<(u32, u32, f64)> {
    let ictx = input(path)
        .with_context(|| format!("cannot open {}", path.display()))?;

    let stream = ictx
        .streams()
        .best(Type::Video)
        .context("file has no video stream")?;

    let decoder = ffmpeg::codec::context::Context::from_parameters(stream.parameters())
        .context("unreadable codec parameters")?
        .decoder()
        .video()
        .context("not decodable as video")?;
    let (width, height) = (decoder.width(), decoder.height());
    anyhow::ensure!(width > 0 && height > 0, "stream reports zero dimensions");

    // Container duration, falling back to the stream's own when unset.
    let mut duration = ictx.duration() as f64 / ffmpeg::ffi::AV_TIME_BASE as f64;
    if duration <= 0.0 {
        let tb = stream.time_base();
        duration = stream.duration() as f64 * tb.numerator() as f64 / tb.denominator() as f64;
    }

    Ok((width, height, duration.max(0.0)))
}
