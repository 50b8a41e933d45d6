// crates/cropline-ui/src/modules/controls.rs
//
// Right panel: file selection, crop-mode toggle, crop-height input, audio
// replacement, submit button, and the result/error banners.

use super::PanelModule;
use cropline_core::commands::CropCommand;
use cropline_core::helpers::time::format_time;
use cropline_core::state::{AudioMode, InteractionMode, SessionState};
use egui::{Color32, Margin, RichText, Stroke, Ui, Vec2};
use rfd::FileDialog;

use crate::context::AppContext;
use crate::theme::{
    ACCENT, ACCENT_DIM, DARK_BG_2, DARK_BG_3, DARK_BORDER, DARK_TEXT, DARK_TEXT_DIM,
};

/// Muted green for the success banner.
const GREEN_DIM: Color32 = Color32::from_rgb(80, 190, 120);
/// Muted red for error banners and input annotations.
const RED_DIM: Color32 = Color32::from_rgb(210, 90, 90);

pub struct ControlsModule;

impl PanelModule for ControlsModule {
    fn name(&self) -> &str {
        "Crop & Upload"
    }

    fn ui(
        &mut self,
        ui:    &mut Ui,
        state: &SessionState,
        rt:    &mut AppContext,
        cmd:   &mut Vec<CropCommand>,
    ) {
        ui.vertical(|ui| {
            egui::Frame::new()
                .fill(DARK_BG_2)
                .inner_margin(Margin { left: 8, right: 8, top: 6, bottom: 6 })
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("✂ Crop & Upload").size(12.0).strong());
                    });
                });

            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add_space(4.0);
                    self.show_sections(ui, state, rt, cmd);
                });
        });
    }
}

impl ControlsModule {
    fn show_sections(
        &mut self,
        ui:    &mut Ui,
        state: &SessionState,
        rt:    &mut AppContext,
        cmd:   &mut Vec<CropCommand>,
    ) {
        let in_flight = state.upload_in_flight();

        // ── Video ─────────────────────────────────────────────────────────────
        ui.label(RichText::new("Video").size(11.0).color(DARK_TEXT_DIM));
        ui.add_space(2.0);
        let open_btn = egui::Button::new(RichText::new("📂 Open Video…").size(12.0))
            .min_size(Vec2::new(ui.available_width(), 28.0));
        if ui.add_enabled(!in_flight, open_btn).clicked() {
            if let Some(path) = FileDialog::new()
                .add_filter("Video", &["mp4", "mov", "mkv", "avi", "webm", "m4v"])
                .pick_file()
            {
                cmd.push(CropCommand::SelectVideo(path));
            }
        }
        if let Some(video) = &state.video {
            ui.add_space(2.0);
            ui.label(RichText::new(&video.name).size(11.0));
            if let Some(m) = video.metrics {
                ui.label(
                    RichText::new(format!(
                        "{}×{} px · {}",
                        m.width,
                        m.height,
                        format_time(video.duration)
                    ))
                    .size(10.0)
                    .color(DARK_TEXT_DIM),
                );
            } else if state.media_error.is_none() {
                ui.label(
                    RichText::new("reading metadata…")
                        .size(10.0)
                        .color(DARK_TEXT_DIM),
                );
            }
            if let Some(err) = &state.media_error {
                ui.label(RichText::new(err).size(10.0).color(RED_DIM));
            }
        }

        ui.add_space(10.0);

        // ── Crop mode ─────────────────────────────────────────────────────────
        ui.label(RichText::new("Crop line").size(11.0).color(DARK_TEXT_DIM));
        ui.add_space(2.0);
        let active = state.mode == InteractionMode::CropAdjust;
        let mode_btn = egui::Button::new(
            RichText::new(if active { "Exit crop mode" } else { "Adjust crop line" })
                .size(12.0)
                .color(if active { Color32::WHITE } else { DARK_TEXT }),
        )
        .fill(if active { ACCENT_DIM } else { DARK_BG_3 })
        .stroke(Stroke::new(1.0, if active { ACCENT } else { DARK_BORDER }))
        .min_size(Vec2::new(ui.available_width(), 26.0));

        if ui
            .add_enabled(!in_flight, mode_btn)
            .on_hover_text("Shortcut: A")
            .clicked()
        {
            cmd.push(CropCommand::ToggleCropMode);
        }

        ui.add_space(10.0);

        // ── Crop height ───────────────────────────────────────────────────────
        ui.label(
            RichText::new("Crop height (px)")
                .size(11.0)
                .color(DARK_TEXT_DIM),
        );
        ui.add_space(2.0);
        let mut text = state.crop_input.clone();
        let has_metrics = state.intrinsic_height().is_some();
        let resp = ui.add_enabled(
            has_metrics && !in_flight,
            egui::TextEdit::singleline(&mut text)
                .desired_width(f32::INFINITY)
                .hint_text("height in video pixels"),
        );
        // The keyboard shortcut in app.rs checks this id before toggling on A.
        rt.crop_input_id = Some(resp.id);
        if resp.changed() {
            cmd.push(CropCommand::CropInputChanged(text));
        }
        if let Some(err) = state.crop_input_error {
            ui.label(RichText::new(err.message()).size(10.0).color(RED_DIM));
        } else if let Some(h) = state.intrinsic_height() {
            ui.label(
                RichText::new(format!("valid range: 1 to {h}"))
                    .size(10.0)
                    .color(DARK_TEXT_DIM),
            );
        }

        ui.add_space(10.0);

        // ── Audio ─────────────────────────────────────────────────────────────
        ui.label(RichText::new("Audio").size(11.0).color(DARK_TEXT_DIM));
        ui.add_space(2.0);
        for mode in [AudioMode::Keep, AudioMode::Mute, AudioMode::Replace] {
            let radio = egui::RadioButton::new(state.audio.mode == mode, mode.label());
            if ui.add_enabled(!in_flight, radio).clicked() {
                cmd.push(CropCommand::SetAudioMode(mode));
            }
        }
        if state.audio.mode == AudioMode::Replace {
            ui.add_space(2.0);
            let pick_btn = egui::Button::new(RichText::new("🎵 Choose audio…").size(11.0));
            if ui.add_enabled(!in_flight, pick_btn).clicked() {
                if let Some(path) = FileDialog::new()
                    .add_filter("Audio", &["mp3", "wav", "aac", "ogg"])
                    .pick_file()
                {
                    cmd.push(CropCommand::SelectAudioFile(path));
                }
            }
            match &state.audio.file {
                Some(path) => {
                    let name = path
                        .file_name()
                        .unwrap_or_default()
                        .to_string_lossy()
                        .to_string();
                    ui.label(RichText::new(name).size(10.0).color(DARK_TEXT_DIM));
                }
                None => {
                    ui.label(
                        RichText::new("no replacement chosen yet")
                            .size(10.0)
                            .color(DARK_TEXT_DIM),
                    );
                }
            }
        }

        ui.add_space(14.0);

        // ── Submit ────────────────────────────────────────────────────────────
        if in_flight {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new().size(16.0));
                ui.label(
                    RichText::new("Processing video…")
                        .size(12.0)
                        .color(DARK_TEXT_DIM),
                );
            });
        } else {
            let ready = state.can_submit();
            let submit_btn = egui::Button::new(
                RichText::new("⬆ Process Video")
                    .size(13.0)
                    .strong()
                    .color(if ready { Color32::BLACK } else { Color32::DARK_GRAY }),
            )
            .fill(if ready { ACCENT } else { DARK_BG_3 })
            .stroke(Stroke::NONE)
            .min_size(Vec2::new(ui.available_width(), 32.0));

            let resp = ui.add_enabled(ready, submit_btn);
            if resp.clicked() {
                cmd.push(CropCommand::Submit);
            }
            if !ready {
                let hint = if state.video.is_none() {
                    "Select a video first"
                } else if state.intrinsic_height().is_none() {
                    "Waiting for video metadata"
                } else {
                    "Fix the crop height first"
                };
                resp.on_hover_text(hint);
            }
        }

        ui.add_space(8.0);

        // ── Outcome banners (replace-in-place) ────────────────────────────────
        if let Some(ok) = &state.upload_done {
            egui::Frame::new()
                .fill(Color32::from_rgb(28, 58, 40))
                .stroke(Stroke::new(1.0, GREEN_DIM))
                .corner_radius(egui::CornerRadius::same(4))
                .inner_margin(Margin::same(8))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(
                        RichText::new(format!("✓ {}", ok.message))
                            .size(11.0)
                            .color(GREEN_DIM),
                    );
                    ui.label(
                        RichText::new(format!("Output: {}", ok.output_path))
                            .size(10.0)
                            .color(DARK_TEXT_DIM),
                    );
                });
            self.dismiss_button(ui, cmd);
        } else if let Some(err) = &state.upload_error {
            egui::Frame::new()
                .fill(Color32::from_rgb(58, 26, 26))
                .stroke(Stroke::new(1.0, RED_DIM))
                .corner_radius(egui::CornerRadius::same(4))
                .inner_margin(Margin::same(8))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(
                        RichText::new(format!("✗ {err}"))
                            .size(11.0)
                            .color(RED_DIM),
                    );
                });
            self.dismiss_button(ui, cmd);
        }
    }

    fn dismiss_button(&self, ui: &mut Ui, cmd: &mut Vec<CropCommand>) {
        ui.add_space(4.0);
        let btn = egui::Button::new(RichText::new("Dismiss").size(11.0).color(DARK_TEXT_DIM))
            .stroke(Stroke::new(1.0, DARK_BORDER))
            .fill(DARK_BG_2)
            .min_size(Vec2::new(ui.available_width(), 24.0));
        if ui.add(btn).clicked() {
            cmd.push(CropCommand::ClearUploadStatus);
        }
    }
}
