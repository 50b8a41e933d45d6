// crates/cropline-core/src/state.rs
//
// The session state machine: loaded video, crop position, interaction mode,
// drag flag, playback clock, audio replacement, upload status. The single
// source of truth for both the overlay line and the crop-height input.
//
// UI modules read this and emit CropCommands; app.rs processes the commands
// by calling the methods below. Keeping the transitions here means the whole
// event table is unit-testable with synthetic coordinates and metrics.

use std::path::PathBuf;

use uuid::Uuid;

use crate::helpers::geometry::default_crop_position;
use crate::protocol::{ProcessOk, DEFAULT_CROP_HEIGHT_FALLBACK};

/// Intrinsic (decoded) dimensions of the loaded video. Immutable until a new
/// file is selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoMetrics {
    pub width:  u32,
    pub height: u32,
}

/// The currently selected file. `metrics` stays `None` between file
/// selection and the probe result; submission is disabled for that window.
/// The `id` is the file-selection generation token: every media and gateway
/// result carries the id it was started for, and stale results are dropped
/// by comparing against the current one.
#[derive(Clone, Debug)]
pub struct LoadedVideo {
    pub id:       Uuid,
    pub path:     PathBuf,
    pub name:     String,
    pub metrics:  Option<VideoMetrics>,
    pub duration: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    Normal,
    CropAdjust,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioMode {
    Keep,
    Mute,
    Replace,
}

impl AudioMode {
    /// Wire token for the `audio_mode` multipart field.
    pub fn token(self) -> &'static str {
        match self {
            AudioMode::Keep    => "keep",
            AudioMode::Mute    => "mute",
            AudioMode::Replace => "replace",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AudioMode::Keep    => "Keep original audio",
            AudioMode::Mute    => "Remove audio",
            AudioMode::Replace => "Replace audio",
        }
    }
}

/// Audio handling for the submission. `file` is only meaningful under
/// `Replace`; switching to any other mode clears it.
#[derive(Clone, Debug)]
pub struct AudioReplacement {
    pub mode: AudioMode,
    pub file: Option<PathBuf>,
}

impl Default for AudioReplacement {
    fn default() -> Self {
        Self { mode: AudioMode::Keep, file: None }
    }
}

/// Why the crop-height input is currently rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CropInputError {
    /// Value exceeds the intrinsic height (carried for the message).
    AboveMax(u32),
    BelowMin,
    NotANumber,
}

impl CropInputError {
    pub fn message(self) -> String {
        match self {
            CropInputError::AboveMax(max) => {
                format!("crop height cannot exceed the video height ({max}px)")
            }
            CropInputError::BelowMin  => "crop height must be at least 1".to_string(),
            CropInputError::NotANumber => "enter a whole number of pixels".to_string(),
        }
    }
}

// ── SessionState ──────────────────────────────────────────────────────────────

pub struct SessionState {
    pub video: Option<LoadedVideo>,

    /// The crop line in video-native pixels, `[1, height]` once set.
    /// `None` until metadata loads.
    pub crop_pos: Option<u32>,
    /// Raw text of the crop-height input. Mirrors `crop_pos` after every
    /// accepted change; keeps whatever the user typed while invalid.
    pub crop_input: String,
    pub crop_input_error: Option<CropInputError>,

    pub mode:     InteractionMode,
    /// True between pointer-down on the crop line and the matching pointer-up.
    pub dragging: bool,

    pub is_playing:   bool,
    pub current_time: f64,

    pub audio: AudioReplacement,

    /// Threshold for the default-position policy, from `GET /config`.
    pub default_crop_height: u32,

    /// Probe failure for the current file, shown next to the file row.
    pub media_error: Option<String>,

    // ── Upload status (runtime-only) ─────────────────────────────────────────
    /// Id of the video an upload was started for, or None when idle.
    /// Stays set after completion so the banner persists until dismissed.
    pub upload_job:   Option<Uuid>,
    pub upload_done:  Option<ProcessOk>,
    pub upload_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            video:               None,
            crop_pos:            None,
            crop_input:          String::new(),
            crop_input_error:    None,
            mode:                InteractionMode::Normal,
            dragging:            false,
            is_playing:          false,
            current_time:        0.0,
            audio:               AudioReplacement::default(),
            default_crop_height: DEFAULT_CROP_HEIGHT_FALLBACK,
            media_error:         None,
            upload_job:          None,
            upload_done:         None,
            upload_error:        None,
        }
    }
}

impl SessionState {
    // ── File lifecycle ───────────────────────────────────────────────────────

    /// Select a new file. Resets mode, drag, playback, crop and upload state;
    /// metadata (and with it the overlay and submission) arrives later via
    /// `metadata_loaded`. Returns the fresh generation id for the probe.
    pub fn select_video(&mut self, path: PathBuf) -> Uuid {
        let id = Uuid::new_v4();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        self.video = Some(LoadedVideo {
            id,
            path,
            name,
            metrics: None,
            duration: 0.0,
        });
        self.crop_pos         = None;
        self.crop_input.clear();
        self.crop_input_error = None;
        self.mode             = InteractionMode::Normal;
        self.dragging         = false;
        self.is_playing       = false;
        self.current_time     = 0.0;
        self.media_error      = None;
        self.upload_job       = None;
        self.upload_done      = None;
        self.upload_error     = None;
        id
    }

    /// Probe result arrived. No-op (returns false) when `id` is stale.
    /// Sets the default crop position per the configured threshold.
    pub fn metadata_loaded(&mut self, id: Uuid, width: u32, height: u32, duration: f64) -> bool {
        let Some(video) = self.video.as_mut().filter(|v| v.id == id) else {
            return false;
        };
        video.metrics  = Some(VideoMetrics { width, height });
        video.duration = duration;

        let pos = default_crop_position(height, self.default_crop_height);
        self.crop_pos         = Some(pos);
        self.crop_input       = pos.to_string();
        self.crop_input_error = None;
        true
    }

    /// Probe failure for the current file. Returns false when stale.
    pub fn probe_failed(&mut self, id: Uuid, msg: String) -> bool {
        if self.video.as_ref().map(|v| v.id) != Some(id) {
            return false;
        }
        self.media_error = Some(msg);
        true
    }

    pub fn intrinsic_height(&self) -> Option<u32> {
        self.video.as_ref()?.metrics.map(|m| m.height)
    }

    // ── Mode ─────────────────────────────────────────────────────────────────

    pub fn toggle_mode(&mut self) {
        let next = match self.mode {
            InteractionMode::Normal     => InteractionMode::CropAdjust,
            InteractionMode::CropAdjust => InteractionMode::Normal,
        };
        self.set_mode(next);
    }

    /// Entering CropAdjust pauses playback. The pause fires only on the
    /// actual transition, never while already in that mode.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        if mode == InteractionMode::CropAdjust {
            self.is_playing = false;
        }
        if mode == InteractionMode::Normal {
            self.dragging = false;
        }
    }

    // ── Crop position ────────────────────────────────────────────────────────

    /// Store a position the geometry mapper already clamped to `[1, height]`
    /// and sync the input text to it.
    pub fn set_crop_position(&mut self, video_y: u32) {
        debug_assert!(video_y >= 1);
        self.crop_pos         = Some(video_y);
        self.crop_input       = video_y.to_string();
        self.crop_input_error = None;
    }

    /// Validate typed input against the intrinsic height. Accepted values
    /// update the position; rejected ones leave the stored position untouched
    /// and record why, which disables submission. No-op before metadata.
    pub fn apply_crop_input(&mut self, text: &str) {
        let Some(max) = self.intrinsic_height() else {
            return;
        };
        self.crop_input = text.to_string();
        match text.trim().parse::<i64>() {
            Err(_)             => self.crop_input_error = Some(CropInputError::NotANumber),
            Ok(v) if v < 1     => self.crop_input_error = Some(CropInputError::BelowMin),
            Ok(v) if v > max as i64 => {
                self.crop_input_error = Some(CropInputError::AboveMax(max))
            }
            Ok(v) => {
                self.crop_pos         = Some(v as u32);
                self.crop_input_error = None;
            }
        }
    }

    /// Re-parse the input text against the current intrinsic height.
    /// The submission gateway calls this instead of trusting `crop_pos`,
    /// since the user may have typed a value directly.
    pub fn validated_crop(&self) -> Option<u32> {
        let max = self.intrinsic_height()?;
        match self.crop_input.trim().parse::<i64>() {
            Ok(v) if (1..=max as i64).contains(&v) => Some(v as u32),
            _ => None,
        }
    }

    // ── Drag ─────────────────────────────────────────────────────────────────

    pub fn begin_drag(&mut self) {
        if self.mode == InteractionMode::CropAdjust {
            self.dragging = true;
        }
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    // ── Playback ─────────────────────────────────────────────────────────────

    /// Play/pause toggle. Playback only starts in Normal mode; CropAdjust
    /// leaves the transport inert (and pauses on entry).
    pub fn toggle_play(&mut self) {
        if self.is_playing {
            self.is_playing = false;
            return;
        }
        if self.mode != InteractionMode::Normal {
            return;
        }
        let Some(video) = &self.video else { return };
        if video.metrics.is_none() {
            return;
        }
        // Restart from the top when the playhead is parked at the end.
        if video.duration > 0.0 && self.current_time >= video.duration - 0.1 {
            self.current_time = 0.0;
        }
        self.is_playing = true;
    }

    pub fn set_playhead(&mut self, t: f64) {
        let max = self.video.as_ref().map(|v| v.duration).unwrap_or(0.0);
        self.current_time = t.clamp(0.0, max);
    }

    // ── Audio ────────────────────────────────────────────────────────────────

    pub fn set_audio_mode(&mut self, mode: AudioMode) {
        self.audio.mode = mode;
        if mode != AudioMode::Replace {
            self.audio.file = None;
        }
    }

    pub fn set_audio_file(&mut self, path: PathBuf) {
        if self.audio.mode == AudioMode::Replace {
            self.audio.file = Some(path);
        }
    }

    // ── Submission gating ────────────────────────────────────────────────────

    /// A request is currently on the wire (terminal results re-enable the
    /// action even while the banner is still shown).
    pub fn upload_in_flight(&self) -> bool {
        self.upload_job.is_some() && self.upload_done.is_none() && self.upload_error.is_none()
    }

    /// Submission is possible: file selected, metadata present, position in
    /// range, input not marked invalid, nothing in flight.
    pub fn can_submit(&self) -> bool {
        self.intrinsic_height().is_some()
            && self.crop_pos.is_some()
            && self.crop_input_error.is_none()
            && !self.upload_in_flight()
    }

    pub fn clear_upload_status(&mut self) {
        self.upload_job   = None;
        self.upload_done  = None;
        self.upload_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn loaded_session(width: u32, height: u32) -> SessionState {
        let mut s = SessionState::default();
        let id = s.select_video(PathBuf::from("/tmp/in.mp4"));
        assert!(s.metadata_loaded(id, width, height, 30.0));
        s
    }

    #[test]
    fn metadata_sets_default_position_from_threshold() {
        let s = loaded_session(1920, 1080);
        assert_eq!(s.crop_pos, Some(720));
        assert_eq!(s.crop_input, "720");
    }

    #[test]
    fn short_video_defaults_to_half_height() {
        let s = loaded_session(640, 400);
        assert_eq!(s.crop_pos, Some(200));
    }

    #[test]
    fn stale_metadata_is_discarded() {
        let mut s = SessionState::default();
        let old = s.select_video(PathBuf::from("/tmp/a.mp4"));
        let _new = s.select_video(PathBuf::from("/tmp/b.mp4"));
        assert!(!s.metadata_loaded(old, 1280, 720, 10.0));
        assert!(s.crop_pos.is_none());
        assert!(!s.can_submit());
    }

    #[test]
    fn selecting_a_file_resets_mode_and_disables_submission() {
        let mut s = loaded_session(1920, 1080);
        s.set_mode(InteractionMode::CropAdjust);
        s.dragging = true;
        assert!(s.can_submit());

        s.select_video(PathBuf::from("/tmp/other.mp4"));
        assert_eq!(s.mode, InteractionMode::Normal);
        assert!(!s.dragging);
        // No metadata yet: submission stays disabled.
        assert!(!s.can_submit());
    }

    #[test]
    fn entering_crop_adjust_pauses_exactly_once() {
        let mut s = loaded_session(1920, 1080);
        s.toggle_play();
        assert!(s.is_playing);

        s.set_mode(InteractionMode::CropAdjust);
        assert!(!s.is_playing);

        // Re-entry while already in the mode is a no-op: force the flag back
        // on and confirm a repeated set_mode does not pause again.
        s.is_playing = true;
        s.set_mode(InteractionMode::CropAdjust);
        assert!(s.is_playing);
    }

    #[test]
    fn playback_does_not_start_in_crop_adjust() {
        let mut s = loaded_session(1920, 1080);
        s.set_mode(InteractionMode::CropAdjust);
        s.toggle_play();
        assert!(!s.is_playing);
    }

    #[test]
    fn input_validation_reasons_are_distinct() {
        let mut s = loaded_session(1920, 1080);

        s.apply_crop_input("0");
        assert_eq!(s.crop_input_error, Some(CropInputError::BelowMin));
        assert!(!s.can_submit());

        s.apply_crop_input("12abc");
        assert_eq!(s.crop_input_error, Some(CropInputError::NotANumber));
        assert!(!s.can_submit());

        s.apply_crop_input("1081");
        assert_eq!(s.crop_input_error, Some(CropInputError::AboveMax(1080)));
        assert!(!s.can_submit());
    }

    #[test]
    fn boundary_values_are_accepted() {
        let mut s = loaded_session(1920, 1080);

        s.apply_crop_input("1");
        assert_eq!(s.crop_pos, Some(1));
        assert!(s.can_submit());

        s.apply_crop_input("1080");
        assert_eq!(s.crop_pos, Some(1080));
        assert!(s.can_submit());
    }

    #[test]
    fn rejected_input_keeps_previous_position() {
        let mut s = loaded_session(1920, 1080);
        s.set_crop_position(500);

        s.apply_crop_input("99999");
        assert_eq!(s.crop_pos, Some(500));
        assert_eq!(s.crop_input, "99999");
        assert!(s.validated_crop().is_none());

        // Fixing the text recovers both position and submission.
        s.apply_crop_input("640");
        assert_eq!(s.crop_pos, Some(640));
        assert_eq!(s.validated_crop(), Some(640));
        assert!(s.can_submit());
    }

    #[test]
    fn switching_audio_mode_away_from_replace_clears_file() {
        let mut s = loaded_session(1920, 1080);
        s.set_audio_mode(AudioMode::Replace);
        s.set_audio_file(PathBuf::from("/tmp/track.mp3"));
        assert!(s.audio.file.is_some());

        s.set_audio_mode(AudioMode::Keep);
        assert_eq!(s.audio.mode, AudioMode::Keep);
        assert!(s.audio.file.is_none());
    }

    #[test]
    fn audio_file_ignored_outside_replace_mode() {
        let mut s = loaded_session(1920, 1080);
        s.set_audio_file(PathBuf::from("/tmp/track.mp3"));
        assert!(s.audio.file.is_none());
    }

    #[test]
    fn drag_only_starts_in_crop_adjust() {
        let mut s = loaded_session(1920, 1080);
        s.begin_drag();
        assert!(!s.dragging);

        s.set_mode(InteractionMode::CropAdjust);
        s.begin_drag();
        assert!(s.dragging);
        s.end_drag();
        assert!(!s.dragging);
    }

    #[test]
    fn in_flight_upload_disables_submission_until_terminal() {
        let mut s = loaded_session(1920, 1080);
        let id = s.video.as_ref().unwrap().id;

        s.upload_job = Some(id);
        assert!(s.upload_in_flight());
        assert!(!s.can_submit());

        // Any terminal outcome re-enables the action, banner still up.
        s.upload_error = Some("bad codec".into());
        assert!(!s.upload_in_flight());
        assert!(s.can_submit());

        s.clear_upload_status();
        assert!(s.upload_job.is_none());
    }

    #[test]
    fn end_to_end_default_then_submit_eligibility() {
        // Full walk: 1000-px video, threshold 720 → default 720, submittable
        // with keep-mode audio and no replacement file.
        let mut s = SessionState::default();
        let id = s.select_video(PathBuf::from("/tmp/clip.mp4"));
        assert!(!s.can_submit());

        assert!(s.metadata_loaded(id, 1600, 1000, 12.0));
        assert_eq!(s.crop_pos, Some(720));
        assert_eq!(s.validated_crop(), Some(720));
        assert_eq!(s.audio.mode, AudioMode::Keep);
        assert!(s.audio.file.is_none());
        assert!(s.can_submit());
    }
}
