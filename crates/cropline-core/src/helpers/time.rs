// crates/cropline-core/src/helpers/time.rs

/// Format a playhead position in seconds as `MM:SS:FF` (frames at 30 fps).
///
/// ```
/// use cropline_core::helpers::time::format_time;
/// assert_eq!(format_time(0.0),  "00:00:00");
/// assert_eq!(format_time(61.5), "01:01:15");
/// ```
pub fn format_time(s: f64) -> String {
    let m  = (s / 60.0) as u32;
    let sc = (s % 60.0) as u32;
    let fr = ((s * 30.0) as u32) % 30;
    format!("{m:02}:{sc:02}:{fr:02}")
}
