// crates/cropline-ui/src/app.rs
//
// CroplineApp wires everything together: panels emit CropCommands during
// the UI pass, process_command applies them to SessionState afterwards, and
// the media/gateway channels are drained at the top of every frame.

use cropline_core::commands::CropCommand;
use cropline_core::state::SessionState;
use cropline_media::MediaWorker;
use eframe::egui;

use crate::context::AppContext;
use crate::gateway::{Gateway, UploadRequest};
use crate::modules::{controls::ControlsModule, preview::PreviewModule, PanelModule};
use crate::theme::configure_style;

/// Preview decode granularity: playback and seeks request one frame per
/// bucket, so a slow decode never piles up a queue of stale positions.
const FRAME_BUCKETS_PER_SEC: f64 = 10.0;

pub struct CroplineApp {
    state:    SessionState,
    context:  AppContext,
    preview:  PreviewModule,
    controls: ControlsModule,
    /// Commands emitted by panels each frame, processed after the UI pass.
    pending_cmds: Vec<CropCommand>,
}

impl CroplineApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        configure_style(&cc.egui_ctx);
        // Pin to dark mode so OS light/dark switches don't overwrite the theme.
        cc.egui_ctx.options_mut(|o| {
            o.theme_preference = egui::ThemePreference::Dark;
        });

        let gateway = Gateway::new();
        gateway.fetch_config(cc.egui_ctx.clone());

        Self {
            state:        SessionState::default(),
            context:      AppContext::new(MediaWorker::new(), gateway),
            preview:      PreviewModule,
            controls:     ControlsModule,
            pending_cmds: Vec::new(),
        }
    }

    fn process_command(&mut self, ctx: &egui::Context, cmd: CropCommand) {
        match cmd {
            // ── Playback ─────────────────────────────────────────────────────
            CropCommand::TogglePlay => self.state.toggle_play(),
            CropCommand::SetPlayhead(t) => self.state.set_playhead(t),

            // ── Crop interaction ─────────────────────────────────────────────
            CropCommand::ToggleCropMode => self.state.toggle_mode(),
            CropCommand::BeginDrag => self.state.begin_drag(),
            CropCommand::EndDrag => self.state.end_drag(),
            CropCommand::SetCropPosition(y) => self.state.set_crop_position(y),
            CropCommand::CropInputChanged(text) => self.state.apply_crop_input(&text),

            // ── File selection ───────────────────────────────────────────────
            CropCommand::SelectVideo(path) => {
                let id = self.state.select_video(path.clone());
                self.context.frame_tex = None;
                // The probe delivers a poster frame; mark position zero as
                // covered so the first tick doesn't race it with a second decode.
                self.context.last_frame_req = Some((id, 0));
                self.context.media_worker.probe_video(id, path);
            }

            // ── Audio ────────────────────────────────────────────────────────
            CropCommand::SetAudioMode(mode) => self.state.set_audio_mode(mode),
            CropCommand::SelectAudioFile(path) => self.state.set_audio_file(path),

            // ── Submission ───────────────────────────────────────────────────
            CropCommand::Submit => self.begin_submit(ctx),
            CropCommand::ClearUploadStatus => self.state.clear_upload_status(),
        }
    }

    /// Kick off the upload. Re-validates the typed crop value against the
    /// intrinsic height with the same bounds the geometry mapper enforces;
    /// an out-of-range value renders an inline error and sends nothing.
    fn begin_submit(&mut self, ctx: &egui::Context) {
        let Some(video) = &self.state.video else { return };
        if video.metrics.is_none() || self.state.upload_in_flight() {
            return;
        }

        let Some(crop_height) = self.state.validated_crop() else {
            let max = self.state.intrinsic_height().unwrap_or(0);
            self.state.upload_done = None;
            self.state.upload_error =
                Some(format!("crop height must be between 1 and {max} pixels"));
            return;
        };

        let req = UploadRequest {
            id:          video.id,
            video_path:  video.path.clone(),
            video_name:  video.name.clone(),
            crop_height,
            audio_mode:  self.state.audio.mode,
            audio_file:  self.state.audio.file.clone(),
        };

        self.state.upload_job   = Some(video.id);
        self.state.upload_done  = None;
        self.state.upload_error = None;
        self.context.gateway.submit(req, ctx.clone());
    }

    /// `A` flips crop mode, except while the crop-height input owns focus
    /// (typing "a" into a number field must not flip modes under the user).
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let typing = self
            .context
            .crop_input_id
            .is_some_and(|id| ctx.memory(|m| m.focused()) == Some(id));
        if !typing && ctx.input(|i| i.key_pressed(egui::Key::A)) {
            self.pending_cmds.push(CropCommand::ToggleCropMode);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let files = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(path) = files.into_iter().filter_map(|f| f.path).next() {
            self.pending_cmds.push(CropCommand::SelectVideo(path));
        }
    }

    /// Advance the playhead while playing; auto-stop at the end.
    fn tick_playback(&mut self, ctx: &egui::Context) {
        if !self.state.is_playing {
            return;
        }
        let dt = ctx.input(|i| i.stable_dt as f64);
        self.state.current_time += dt;
        let total = self.state.video.as_ref().map(|v| v.duration).unwrap_or(0.0);
        if total > 0.0 && self.state.current_time >= total {
            self.state.current_time = total;
            self.state.is_playing   = false;
        }
        ctx.request_repaint();
    }

    /// Request a preview frame for the current playhead bucket, deduped so
    /// the latest-wins decode slot only ever sees fresh positions.
    fn tick_preview_frame(&mut self) {
        let Some(video) = &self.state.video else {
            self.context.last_frame_req = None;
            return;
        };
        if video.metrics.is_none() {
            return;
        }
        let bucket = (self.state.current_time * FRAME_BUCKETS_PER_SEC) as u32;
        let key = (video.id, bucket);
        if self.context.last_frame_req == Some(key) {
            return;
        }
        self.context.last_frame_req = Some(key);
        self.context.media_worker.request_frame(
            video.id,
            video.path.clone(),
            bucket as f64 / FRAME_BUCKETS_PER_SEC,
        );
    }
}

// ── eframe::App ───────────────────────────────────────────────────────────────

impl eframe::App for CroplineApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.context.media_worker.shutdown();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.handle_shortcuts(ctx);
        self.context.ingest_media_results(&mut self.state, ctx);
        self.context.ingest_gateway_results(&mut self.state, ctx);

        egui::TopBottomPanel::top("top_panel")
            .exact_height(36.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new("✂ Cropline")
                            .strong()
                            .size(15.0)
                            .color(crate::theme::ACCENT),
                    );
                    ui.separator();
                    ui.label(
                        egui::RichText::new("Pick a video, set the crop line, send it for processing")
                            .size(12.0)
                            .weak(),
                    );
                });
            });

        egui::SidePanel::right("controls_panel")
            .resizable(true)
            .default_width(260.0)
            .min_width(220.0)
            .show(ctx, |ui| {
                self.controls
                    .ui(ui, &self.state, &mut self.context, &mut self.pending_cmds);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.preview
                .ui(ui, &self.state, &mut self.context, &mut self.pending_cmds);
        });

        // ── Process commands emitted by panels this frame ─────────────────────
        let cmds: Vec<CropCommand> = self.pending_cmds.drain(..).collect();
        for cmd in cmds {
            self.process_command(ctx, cmd);
        }

        self.tick_playback(ctx);
        self.tick_preview_frame();
    }
}
