// crates/cropline-ui/src/context.rs
//
// AppContext owns all runtime handles that are NOT part of SessionState:
// the media worker, the gateway, the current frame texture, and the frame
// request dedup key. CroplineApp holds one of these plus a SessionState and
// the two panel modules — nothing else.

use cropline_core::media_types::MediaResult;
use cropline_core::state::SessionState;
use cropline_media::MediaWorker;
use eframe::egui;

use crate::gateway::{Gateway, GatewayResult};

pub struct AppContext {
    pub media_worker: MediaWorker,
    pub gateway:      Gateway,

    /// Latest decoded preview frame as a GPU texture.
    pub frame_tex: Option<egui::TextureHandle>,

    /// (video id, time bucket) of the last preview frame request. Keeps the
    /// per-frame tick from re-requesting the same position.
    pub last_frame_req: Option<(uuid::Uuid, u32)>,

    /// Widget id of the crop-height input, recorded by the controls panel.
    /// The `A` shortcut is suppressed while this widget owns focus.
    pub crop_input_id: Option<egui::Id>,
}

impl AppContext {
    pub fn new(media_worker: MediaWorker, gateway: Gateway) -> Self {
        Self {
            media_worker,
            gateway,
            frame_tex:      None,
            last_frame_req: None,
            crop_input_id:  None,
        }
    }

    /// Drain the MediaWorker channel into state and the frame texture.
    /// Results are tagged with the video id they were started for; anything
    /// from a superseded selection is dropped here.
    pub fn ingest_media_results(&mut self, state: &mut SessionState, ctx: &egui::Context) {
        while let Ok(result) = self.media_worker.rx.try_recv() {
            match result {
                MediaResult::Metadata { id, width, height, duration } => {
                    if state.metadata_loaded(id, width, height, duration) {
                        ctx.request_repaint();
                    }
                }

                MediaResult::Frame { id, width, height, data } => {
                    if state.video.as_ref().map(|v| v.id) != Some(id) {
                        continue;
                    }
                    let tex = ctx.load_texture(
                        format!("frame-{id}"),
                        egui::ColorImage::from_rgba_unmultiplied(
                            [width as usize, height as usize],
                            &data,
                        ),
                        egui::TextureOptions::LINEAR,
                    );
                    self.frame_tex = Some(tex);
                    ctx.request_repaint();
                }

                MediaResult::Error { id, msg } => {
                    eprintln!("[media] {id}: {msg}");
                    if state.probe_failed(id, format!("cannot read this file: {msg}")) {
                        ctx.request_repaint();
                    }
                }
            }
        }
    }

    /// Drain the gateway channel. Upload results only land while the id
    /// still matches the upload the user is waiting on; a response that
    /// arrives after the video was replaced is discarded.
    pub fn ingest_gateway_results(&mut self, state: &mut SessionState, ctx: &egui::Context) {
        while let Ok(result) = self.gateway.rx.try_recv() {
            match result {
                GatewayResult::Config { default_crop_height } => {
                    state.default_crop_height = default_crop_height;
                }

                GatewayResult::UploadDone { id, outcome } => {
                    if state.upload_job == Some(id) {
                        state.upload_done = Some(outcome);
                        ctx.request_repaint();
                    }
                }

                GatewayResult::UploadError { id, msg } => {
                    if state.upload_job == Some(id) {
                        state.upload_error = Some(msg);
                        ctx.request_repaint();
                    }
                }
            }
        }
    }
}
