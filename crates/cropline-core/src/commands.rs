// crates/cropline-core/src/commands.rs
//
// Every user action in Cropline is expressed as a CropCommand.
// UI modules emit these; app.rs processes them after the UI pass.
// Adding a new interaction = add a variant here + one match arm in app.rs.

use std::path::PathBuf;

use crate::state::AudioMode;

#[derive(Debug, Clone)]
pub enum CropCommand {
    // ── Playback ─────────────────────────────────────────────────────────────
    TogglePlay,
    SetPlayhead(f64),

    // ── Crop interaction ─────────────────────────────────────────────────────
    /// Flip Normal ↔ CropAdjust. Emitted by the mode button, or by the `A`
    /// shortcut when the crop-height input does not own keyboard focus.
    ToggleCropMode,
    /// Pointer-down on the crop line (CropAdjust only).
    BeginDrag,
    /// Pointer-up, document-wide.
    EndDrag,
    /// A position already mapped to video-native pixels by the geometry
    /// helpers, from a line drag or a click inside the display rect.
    SetCropPosition(u32),
    /// Raw text from the crop-height input; validated against the intrinsic
    /// height in the state layer.
    CropInputChanged(String),

    // ── File selection ───────────────────────────────────────────────────────
    SelectVideo(PathBuf),

    // ── Audio replacement ────────────────────────────────────────────────────
    SetAudioMode(AudioMode),
    SelectAudioFile(PathBuf),

    // ── Submission ───────────────────────────────────────────────────────────
    Submit,
    /// Dismiss the result/error banner.
    ClearUploadStatus,
}
