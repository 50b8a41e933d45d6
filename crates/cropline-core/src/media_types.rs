// crates/cropline-core/src/media_types.rs
//
// Types that flow across the channel between cropline-media and cropline-ui.
// No egui, no ffmpeg — just plain data.

use uuid::Uuid;

/// Results sent from the MediaWorker background threads to the UI.
/// `id` is the video the work was started for; the UI drops results whose id
/// no longer matches the loaded video.
pub enum MediaResult {
    /// Intrinsic dimensions and duration from the probe. This is the
    /// "metadata loaded" event: the overlay appears and the default crop
    /// position is computed when it arrives.
    Metadata { id: Uuid, width: u32, height: u32, duration: f64 },
    /// One decoded RGBA preview frame (poster, scrub, or playback tick).
    Frame { id: Uuid, width: u32, height: u32, data: Vec<u8> },
    Error { id: Uuid, msg: String },
}
