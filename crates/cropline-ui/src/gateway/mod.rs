// crates/cropline-ui/src/gateway/mod.rs
//
// Submission gateway: the one-shot config fetch and the /process upload.
//
// Both run on background threads (the UI never blocks on the network) and
// report back over a crossbeam channel drained once per frame, the same way
// MediaWorker results travel. Upload results are tagged with the id of the
// video they were started for; app.rs drops any result whose id no longer
// matches the loaded video, so replacing the file mid-request is safe.

pub mod multipart;

use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use uuid::Uuid;

use cropline_core::protocol::{failure_message, ProcessOk, RemoteConfig};
use cropline_core::state::AudioMode;

use self::multipart::MultipartBody;

/// The processing service. The original tool serves everything from one
/// local server; there is deliberately no CLI or env override.
pub const SERVER_BASE_URL: &str = "http://localhost:8000";

/// Transport-level ceiling for one processing request. Cropping long videos
/// is slow server-side; anything beyond this surfaces as a transport error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

pub enum GatewayResult {
    Config { default_crop_height: u32 },
    UploadDone { id: Uuid, outcome: ProcessOk },
    UploadError { id: Uuid, msg: String },
}

pub struct UploadRequest {
    pub id:          Uuid,
    pub video_path:  PathBuf,
    pub video_name:  String,
    pub crop_height: u32,
    pub audio_mode:  AudioMode,
    pub audio_file:  Option<PathBuf>,
}

pub struct Gateway {
    pub rx: Receiver<GatewayResult>,
    tx:     Sender<GatewayResult>,
}

impl Gateway {
    pub fn new() -> Self {
        let (tx, rx) = bounded(8);
        Self { rx, tx }
    }

    /// One-shot startup fetch of the server's default crop height.
    /// Failures are logged and swallowed; the built-in fallback stays.
    pub fn fetch_config(&self, ctx: egui::Context) {
        let tx = self.tx.clone();
        std::thread::spawn(move || match fetch_config_blocking() {
            Ok(cfg) => {
                eprintln!("[gateway] default crop height {}", cfg.default_crop_height);
                let _ = tx.send(GatewayResult::Config {
                    default_crop_height: cfg.default_crop_height,
                });
                ctx.request_repaint();
            }
            Err(e) => eprintln!("[gateway] config fetch failed ({e}), using fallback"),
        });
    }

    /// Upload on a background thread. Exactly one result lands on the
    /// channel for every call, success or not, so the submit action always
    /// comes back to life.
    pub fn submit(&self, req: UploadRequest, ctx: egui::Context) {
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            eprintln!(
                "[gateway] POST /process crop_height={} audio_mode={}",
                req.crop_height,
                req.audio_mode.token()
            );
            let result = match run_submit(&req) {
                Ok(outcome) => GatewayResult::UploadDone { id: req.id, outcome },
                Err(msg)    => GatewayResult::UploadError { id: req.id, msg },
            };
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}

// ── Blocking HTTP ─────────────────────────────────────────────────────────────

fn agent() -> ureq::Agent {
    // Non-2xx must come back as responses, not transport errors: failure
    // bodies carry the server's own message and are parsed below.
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(REQUEST_TIMEOUT))
        .build()
        .new_agent()
}

fn fetch_config_blocking() -> Result<RemoteConfig, String> {
    let mut resp = agent()
        .get(format!("{SERVER_BASE_URL}/config"))
        .call()
        .map_err(|e| e.to_string())?;
    if !resp.status().is_success() {
        return Err(format!("HTTP {}", resp.status()));
    }
    let text = resp.body_mut().read_to_string().map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

fn run_submit(req: &UploadRequest) -> Result<ProcessOk, String> {
    let video_bytes = std::fs::read(&req.video_path)
        .map_err(|e| format!("cannot read {}: {e}", req.video_path.display()))?;

    let audio = match (&req.audio_mode, &req.audio_file) {
        (AudioMode::Replace, Some(path)) => {
            let bytes = std::fs::read(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            let name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            Some((name, bytes))
        }
        _ => None,
    };

    let (content_type, payload) = build_upload_body(
        req.crop_height,
        req.audio_mode,
        (&req.video_name, &video_bytes),
        audio.as_ref().map(|(n, b)| (n.as_str(), b.as_slice())),
    );

    let mut resp = agent()
        .post(format!("{SERVER_BASE_URL}/process"))
        .header("Content-Type", content_type.as_str())
        .send(&payload[..])
        .map_err(|e| e.to_string())?;

    let status = resp.status();
    let text = resp.body_mut().read_to_string().map_err(|e| e.to_string())?;
    if status.is_success() {
        serde_json::from_str(&text).map_err(|e| format!("unexpected server response: {e}"))
    } else {
        Err(failure_message(&text))
    }
}

/// Assemble the /process form body. The `audio_file` part is attached only
/// in Replace mode with a chosen file; every other combination sends the
/// mode token alone.
fn build_upload_body(
    crop_height: u32,
    audio_mode: AudioMode,
    video: (&str, &[u8]),
    audio: Option<(&str, &[u8])>,
) -> (String, Vec<u8>) {
    let mut body = MultipartBody::new();
    body.add_file("video", video.0, content_type_for(video.0), video.1);
    body.add_text("crop_height", &crop_height.to_string());
    body.add_text("audio_mode", audio_mode.token());
    if audio_mode == AudioMode::Replace {
        if let Some((name, bytes)) = audio {
            body.add_file("audio_file", name, content_type_for(name), bytes);
        }
    }
    body.finish()
}

/// Best-effort MIME type from the filename extension. The server only
/// sniffs the leading `video/` / `audio/` family.
fn content_type_for(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov"         => "video/quicktime",
        "mkv"         => "video/x-matroska",
        "avi"         => "video/x-msvideo",
        "webm"        => "video/webm",
        "mp3"         => "audio/mpeg",
        "wav"         => "audio/wav",
        "aac"         => "audio/aac",
        "ogg"         => "audio/ogg",
        _             => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_mode_body_has_no_audio_part() {
        let (_, bytes) = build_upload_body(
            720,
            AudioMode::Keep,
            ("clip.mp4", b"FRAMES"),
            None,
        );
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("name=\"crop_height\"\r\n\r\n720"));
        assert!(text.contains("name=\"audio_mode\"\r\n\r\nkeep"));
        assert!(!text.contains("name=\"audio_file\""));
    }

    #[test]
    fn replace_mode_attaches_the_audio_file() {
        let (_, bytes) = build_upload_body(
            480,
            AudioMode::Replace,
            ("clip.mp4", b"FRAMES"),
            Some(("track.mp3", b"AUDIO")),
        );
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("name=\"audio_mode\"\r\n\r\nreplace"));
        assert!(text.contains("name=\"audio_file\"; filename=\"track.mp3\""));
        assert!(text.contains("Content-Type: audio/mpeg"));
    }

    #[test]
    fn replace_mode_without_file_sends_token_only() {
        let (_, bytes) = build_upload_body(
            480,
            AudioMode::Replace,
            ("clip.mp4", b"FRAMES"),
            None,
        );
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("name=\"audio_mode\"\r\n\r\nreplace"));
        assert!(!text.contains("name=\"audio_file\""));
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for("a.mp4"), "video/mp4");
        assert_eq!(content_type_for("a.MOV"), "video/quicktime");
        assert_eq!(content_type_for("a.mp3"), "audio/mpeg");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
