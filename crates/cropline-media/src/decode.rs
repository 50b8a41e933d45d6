// crates/cropline-media/src/decode.rs
//
// Single-frame RGBA decode for the preview canvas: open, seek, decode the
// first frame at or after the requested timestamp, scale to a bounded
// preview size. Each call stands alone — the worker's latest-wins request
// slot makes a persistent decoder unnecessary for a one-file crop preview.

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::{input, Pixel};
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};

/// Preview frames are scaled down to at most this width. The overlay math
/// runs on probed intrinsic dimensions, so texture resolution only affects
/// sharpness, never the crop mapping.
pub const MAX_PREVIEW_WIDTH: u32 = 1280;

pub struct RgbaFrame {
    pub width:  u32,
    pub height: u32,
    pub data:   Vec<u8>,
}

pub fn decode_rgba_frame(path: &PathBuf, timestamp: f64) -> Result<RgbaFrame> {
    let mut ictx = input(path)
        .with_context(|| format!("cannot open {}", path.display()))?;

    let (stream_idx, params) = {
        let stream = ictx
            .streams()
            .best(Type::Video)
            .context("file has no video stream")?;
        (stream.index(), stream.parameters())
    };

    if timestamp > 0.0 {
        let ts = (timestamp * ffmpeg::ffi::AV_TIME_BASE as f64) as i64;
        // Seek lands on the preceding keyframe; close enough for a preview.
        let _ = ictx.seek(ts, ..=ts);
    }

    let mut decoder = ffmpeg::codec::context::Context::from_parameters(params)
        .context("unreadable codec parameters")?
        .decoder()
        .video()
        .context("not decodable as video")?;

    let (src_w, src_h) = (decoder.width(), decoder.height());
    anyhow::ensure!(src_w > 0 && src_h > 0, "stream reports zero dimensions");

    // Bounded output size, both dimensions even.
    let out_w = (src_w.min(MAX_PREVIEW_WIDTH)).max(2) & !1;
    let out_h = ((out_w as u64 * src_h as u64 / src_w as u64) as u32).max(2) & !1;

    let mut scaler = SwsContext::get(
        decoder.format(), src_w, src_h,
        Pixel::RGBA, out_w, out_h, Flags::BILINEAR,
    )
    .context("scaler init failed")?;

    for (stream, packet) in ictx.packets().flatten() {
        if stream.index() != stream_idx {
            continue;
        }
        if decoder.send_packet(&packet).is_err() {
            continue;
        }
        let mut decoded = ffmpeg::util::frame::video::Video::empty();
        while decoder.receive_frame(&mut decoded).is_ok() {
            let mut rgba = ffmpeg::util::frame::video::Video::empty();
            if scaler.run(&decoded, &mut rgba).is_err() {
                continue;
            }
            // Destripe: copy only visible pixels, not stride padding.
            let stride    = rgba.stride(0);
            let raw       = rgba.data(0);
            let row_bytes = out_w as usize * 4;
            let data: Vec<u8> = (0..out_h as usize)
                .flat_map(|row| &raw[row * stride..row * stride + row_bytes])
                .copied()
                .collect();
            return Ok(RgbaFrame { width: out_w, height: out_h, data });
        }
    }

    bail!("no frame decoded from {}", path.display())
}
