// crates/cropline-media/src/lib.rs
//
// FFmpeg probing and preview-frame decoding for the crop UI.
// No egui dependency — communicates with cropline-ui via channels only.

pub mod decode;
pub mod probe;
pub mod worker;

// Re-export the main public API so cropline-ui imports are simple.
pub use worker::MediaWorker;
pub use cropline_core::media_types::MediaResult;

/// Initialize FFmpeg once at startup, before any probe or decode runs.
pub fn init() -> anyhow::Result<()> {
    ffmpeg_the_third::init()?;
    Ok(())
}
