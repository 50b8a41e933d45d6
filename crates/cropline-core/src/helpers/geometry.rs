// crates/cropline-core/src/helpers/geometry.rs
//
// Aspect-fit ("contain") letterbox math and the screen↔video coordinate
// mapping for the crop line.
//
// All functions are pure. The UI recomputes the display rect every frame
// from the current canvas size, so a window resize repositions the overlay
// without touching the stored video-native crop position.

use crate::state::VideoMetrics;

/// The sub-rectangle of the preview canvas actually covered by rendered
/// video pixels, in canvas-relative coordinates.
///
/// Exactly one axis is offset: a video relatively wider than the canvas is
/// centered vertically (letterbox bars above/below), a relatively taller one
/// is centered horizontally (pillarbox bars left/right).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayRect {
    pub width:       f32,
    pub height:      f32,
    pub top_offset:  f32,
    pub left_offset: f32,
}

/// Aspect-fit `video` into a `container_w` × `container_h` canvas.
///
/// ```
/// use cropline_core::state::VideoMetrics;
/// use cropline_core::helpers::geometry::compute_display_rect;
/// // 1920x1080 video in a 800x800 canvas: width-limited, letterboxed.
/// let r = compute_display_rect(VideoMetrics { width: 1920, height: 1080 }, 800.0, 800.0);
/// assert_eq!(r.width, 800.0);
/// assert!(r.height < 800.0 && r.top_offset > 0.0 && r.left_offset == 0.0);
/// ```
pub fn compute_display_rect(video: VideoMetrics, container_w: f32, container_h: f32) -> DisplayRect {
    let video_ratio     = video.width as f32 / video.height as f32;
    let container_ratio = container_w / container_h;

    if video_ratio > container_ratio {
        // Video is relatively wider: fill the width, center vertically.
        let height = container_w * video.height as f32 / video.width as f32;
        DisplayRect {
            width:       container_w,
            height,
            top_offset:  (container_h - height) / 2.0,
            left_offset: 0.0,
        }
    } else {
        // Video is relatively taller (or equal): fill the height, center horizontally.
        let width = container_h * video.width as f32 / video.height as f32;
        DisplayRect {
            width,
            height:      container_h,
            top_offset:  0.0,
            left_offset: (container_w - width) / 2.0,
        }
    }
}

/// Map a canvas-relative pointer Y to a video-native row in `[1, height]`.
///
/// Pointer positions in the letterbox bars clamp to the nearest edge of the
/// display band, so drags that wander outside the video still produce a
/// valid position. The lower bound is 1, not 0: a zero-row crop is
/// meaningless to the downstream crop operation.
pub fn screen_y_to_video_y(screen_y: f32, rect: &DisplayRect, video_height: u32) -> u32 {
    let y   = screen_y.clamp(rect.top_offset, rect.top_offset + rect.height);
    let pos = ((y - rect.top_offset) * video_height as f32 / rect.height).round() as u32;
    pos.clamp(1, video_height)
}

/// Inverse of [`screen_y_to_video_y`]: project a video-native row back to a
/// canvas-relative Y for overlay placement. Not clamped; the caller only
/// passes positions already within `[1, video_height]`.
pub fn video_y_to_screen_y(video_y: u32, rect: &DisplayRect, video_height: u32) -> f32 {
    video_y as f32 * rect.height / video_height as f32 + rect.top_offset
}

/// Default crop position on metadata load.
///
/// Short videos get half their own height so the proposed line never sits at
/// or beyond the bottom edge; everything else gets the configured threshold.
/// Clamped to at least 1 so the `[1, height]` invariant holds even for a
/// degenerate one-pixel-tall input.
///
/// ```
/// use cropline_core::helpers::geometry::default_crop_position;
/// assert_eq!(default_crop_position(400, 720),  200);
/// assert_eq!(default_crop_position(1080, 720), 720);
/// ```
pub fn default_crop_position(video_height: u32, threshold: u32) -> u32 {
    if video_height <= threshold {
        (video_height / 2).max(1)
    } else {
        threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(w: u32, h: u32) -> VideoMetrics {
        VideoMetrics { width: w, height: h }
    }

    #[test]
    fn wide_video_is_letterboxed() {
        // 16:9 video in a square canvas: bars above and below.
        let r = compute_display_rect(metrics(1920, 1080), 600.0, 600.0);
        assert_eq!(r.width, 600.0);
        assert!(r.height < 600.0);
        assert!(r.top_offset > 0.0);
        assert_eq!(r.left_offset, 0.0);
        // Centered: equal bars top and bottom.
        assert!((r.top_offset * 2.0 + r.height - 600.0).abs() < 1e-3);
    }

    #[test]
    fn tall_video_is_pillarboxed() {
        // 9:16 video in a square canvas: bars left and right.
        let r = compute_display_rect(metrics(1080, 1920), 600.0, 600.0);
        assert_eq!(r.height, 600.0);
        assert!(r.width < 600.0);
        assert!(r.left_offset > 0.0);
        assert_eq!(r.top_offset, 0.0);
    }

    #[test]
    fn matching_ratio_fills_container() {
        let r = compute_display_rect(metrics(1600, 900), 800.0, 450.0);
        assert!((r.width - 800.0).abs() < 1e-3);
        assert!((r.height - 450.0).abs() < 1e-3);
        assert!(r.top_offset.abs() < 1e-3);
        assert!(r.left_offset.abs() < 1e-3);
    }

    #[test]
    fn screen_to_video_always_in_range() {
        // Any pointer Y, including far outside the canvas, maps into [1, H].
        let v = metrics(1920, 1080);
        let rect = compute_display_rect(v, 640.0, 640.0);
        for y in -200..=840 {
            let pos = screen_y_to_video_y(y as f32, &rect, v.height);
            assert!((1..=v.height).contains(&pos), "y={y} mapped to {pos}");
        }
    }

    #[test]
    fn letterbox_clicks_snap_to_edges() {
        let v = metrics(1920, 1080);
        let rect = compute_display_rect(v, 600.0, 600.0);
        // Above the display band: nearest edge is the top row (clamped to 1).
        assert_eq!(screen_y_to_video_y(0.0, &rect, v.height), 1);
        // Below the band: bottom row.
        assert_eq!(screen_y_to_video_y(600.0, &rect, v.height), v.height);
    }

    #[test]
    fn round_trip_within_one_unit() {
        // video_y_to_screen_y ∘ screen_y_to_video_y reconstructs the clamped
        // input to within one display-to-video rounding unit.
        let v = metrics(1280, 720);
        let rect = compute_display_rect(v, 500.0, 400.0);
        let unit = rect.height / v.height as f32;
        for y in 0..400 {
            let y = y as f32;
            let clamped = y.clamp(rect.top_offset, rect.top_offset + rect.height);
            let back = video_y_to_screen_y(
                screen_y_to_video_y(y, &rect, v.height), &rect, v.height);
            assert!(
                (back - clamped).abs() <= unit + 1e-3,
                "y={y}: clamped={clamped} back={back} unit={unit}"
            );
        }
    }

    #[test]
    fn default_position_policy() {
        assert_eq!(default_crop_position(400, 720),  200);
        assert_eq!(default_crop_position(1080, 720), 720);
        // Exactly at the threshold counts as short.
        assert_eq!(default_crop_position(720, 720),  360);
        // Degenerate input never produces a zero position.
        assert_eq!(default_crop_position(1, 720),    1);
    }
}
