// crates/cropline-ui/src/modules/preview.rs
//
// The preview canvas: letterboxed frame, crop-line overlay, transport bar.
//
// Coordinate model: the allocated canvas rect is the "container". The frame
// is aspect-fit into it via compute_display_rect, and every pointer event is
// converted to a canvas-relative Y before the geometry helpers map it into
// video-native pixels. The overlay is the inverse projection of the stored
// position, recomputed each frame, so the line and the numeric input can
// never disagree.

use super::PanelModule;
use cropline_core::commands::CropCommand;
use cropline_core::helpers::geometry::{
    compute_display_rect, screen_y_to_video_y, video_y_to_screen_y, DisplayRect,
};
use cropline_core::helpers::time::format_time;
use cropline_core::state::{InteractionMode, SessionState, VideoMetrics};
use egui::{
    Align2, Color32, CursorIcon, FontId, Pos2, Rect, RichText, Sense, Stroke, StrokeKind, Ui, Vec2,
};

use crate::context::AppContext;
use crate::theme::{
    ACCENT, CROP_LINE, CROP_LINE_HOVER, DARK_BG_2, DARK_BORDER, DARK_TEXT_DIM,
};

const BAR_H: f32 = 34.0;
/// Half-height of the invisible grab band around the crop line.
const GRAB_HALF: f32 = 10.0;

pub struct PreviewModule;

impl PanelModule for PreviewModule {
    fn name(&self) -> &str {
        "Preview"
    }

    fn ui(
        &mut self,
        ui:    &mut Ui,
        state: &SessionState,
        rt:    &mut AppContext,
        cmd:   &mut Vec<CropCommand>,
    ) {
        ui.vertical(|ui| {
            // ── Header ───────────────────────────────────────────────────────
            egui::Frame::new()
                .fill(DARK_BG_2)
                .inner_margin(egui::Margin { left: 8, right: 8, top: 5, bottom: 5 })
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("🎬 Preview").size(12.0).strong());
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if state.mode == InteractionMode::CropAdjust {
                                ui.label(
                                    RichText::new("crop mode: click or drag to set the line (A to exit)")
                                        .size(11.0)
                                        .color(ACCENT),
                                );
                            } else if state.video.is_some() {
                                ui.label(
                                    RichText::new("A toggles crop mode")
                                        .size(11.0)
                                        .color(DARK_TEXT_DIM),
                                );
                            }
                        });
                    });
                });

            ui.add_space(4.0);

            // ── Canvas ───────────────────────────────────────────────────────
            let panel_w = ui.available_width();
            let panel_h = (ui.available_height() - BAR_H - 12.0).max(80.0);
            let (container, _) = ui.allocate_exact_size(Vec2::new(panel_w, panel_h), Sense::hover());

            let painter = ui.painter();
            painter.rect_filled(container, 3.0, Color32::BLACK);
            if state.mode == InteractionMode::CropAdjust {
                painter.rect_stroke(
                    container.expand(1.0), 3.0,
                    Stroke::new(1.5, ACCENT.gamma_multiply(0.7)),
                    StrokeKind::Outside,
                );
            } else {
                painter.rect_stroke(
                    container.expand(1.0), 3.0,
                    Stroke::new(1.0, DARK_BORDER),
                    StrokeKind::Outside,
                );
            }

            match &state.video {
                None => {
                    painter.text(
                        container.center(),
                        Align2::CENTER_CENTER,
                        "NO VIDEO",
                        FontId::monospace(14.0),
                        Color32::from_gray(45),
                    );
                    painter.text(
                        container.center() + egui::vec2(0.0, 22.0),
                        Align2::CENTER_CENTER,
                        "open or drop a video file to begin",
                        FontId::proportional(11.0),
                        Color32::from_gray(70),
                    );
                }
                Some(video) => match video.metrics {
                    None => self.paint_loading(ui, container, &video.name),
                    Some(metrics) => {
                        self.canvas_ui(ui, state, rt, cmd, container, metrics);
                    }
                },
            }

            ui.add_space(6.0);
            self.transport_ui(ui, state, cmd);
        });
    }
}

impl PreviewModule {
    /// Name + spinner while the probe (or the poster decode) is running.
    fn paint_loading(&self, ui: &Ui, container: Rect, name: &str) {
        let painter = ui.painter();
        painter.text(
            container.center() - egui::vec2(0.0, 20.0),
            Align2::CENTER_CENTER,
            name,
            FontId::proportional(13.0),
            Color32::from_gray(70),
        );
        let t  = ui.input(|i| i.time) as f32;
        let cx = container.center() + egui::vec2(0.0, 20.0);
        let r  = 12.0_f32;
        painter.circle_stroke(cx, r, Stroke::new(1.5, Color32::from_gray(35)));
        let a = t * 3.5;
        painter.line_segment(
            [cx, cx + egui::vec2(a.cos() * r, a.sin() * r)],
            Stroke::new(2.0, ACCENT),
        );
        ui.ctx().request_repaint();
    }

    /// Frame, click-to-set, crop line with drag band and label.
    fn canvas_ui(
        &self,
        ui:        &Ui,
        state:     &SessionState,
        rt:        &AppContext,
        cmd:       &mut Vec<CropCommand>,
        container: Rect,
        metrics:   VideoMetrics,
    ) {
        let rect = compute_display_rect(metrics, container.width(), container.height());
        let display = Rect::from_min_size(
            container.min + egui::vec2(rect.left_offset, rect.top_offset),
            Vec2::new(rect.width, rect.height),
        );

        let painter = ui.painter();
        if let Some(tex) = &rt.frame_tex {
            painter.image(
                tex.id(),
                display,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        } else {
            self.paint_loading(ui, container, &state.video.as_ref().map(|v| v.name.clone()).unwrap_or_default());
        }

        // Click-to-set. Registered before the line band so that presses on
        // the band go to the drag handle, not here. Clicks in the letterbox
        // bars are ignored (drags clamp to the band edge instead).
        let canvas_resp = ui.interact(container, ui.id().with("crop_canvas"), Sense::click());
        if state.mode == InteractionMode::CropAdjust && !state.dragging && canvas_resp.clicked() {
            if let Some(p) = canvas_resp.interact_pointer_pos() {
                let y = p.y - container.min.y;
                if y >= rect.top_offset && y <= rect.top_offset + rect.height {
                    cmd.push(CropCommand::SetCropPosition(screen_y_to_video_y(
                        y, &rect, metrics.height,
                    )));
                }
            }
        }

        if let Some(pos) = state.crop_pos {
            self.crop_line_ui(ui, state, cmd, container, display, &rect, metrics, pos);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn crop_line_ui(
        &self,
        ui:        &Ui,
        state:     &SessionState,
        cmd:       &mut Vec<CropCommand>,
        container: Rect,
        display:   Rect,
        rect:      &DisplayRect,
        metrics:   VideoMetrics,
        pos:       u32,
    ) {
        let line_y = container.min.y + video_y_to_screen_y(pos, rect, metrics.height);
        let mut line_color = CROP_LINE;

        if state.mode == InteractionMode::CropAdjust {
            let band = Rect::from_min_max(
                Pos2::new(display.min.x, line_y - GRAB_HALF),
                Pos2::new(display.max.x, line_y + GRAB_HALF),
            );
            let resp = ui
                .interact(band, ui.id().with("crop_line"), Sense::drag())
                .on_hover_cursor(CursorIcon::ResizeVertical);

            if resp.hovered() || resp.dragged() {
                line_color = CROP_LINE_HOVER;
            }
            if resp.drag_started() {
                cmd.push(CropCommand::BeginDrag);
            }
            if resp.dragged() {
                // egui keeps the drag alive document-wide while the button is
                // held; positions outside the display band clamp to its edges.
                if let Some(p) = resp.interact_pointer_pos() {
                    let y = p.y - container.min.y;
                    cmd.push(CropCommand::SetCropPosition(screen_y_to_video_y(
                        y, rect, metrics.height,
                    )));
                }
            }
            if resp.drag_stopped() {
                cmd.push(CropCommand::EndDrag);
            }
        }

        let painter = ui.painter();
        painter.line_segment(
            [
                Pos2::new(display.min.x, line_y),
                Pos2::new(display.max.x, line_y),
            ],
            Stroke::new(2.0, line_color),
        );

        // Label, above the line unless that would leave the display rect.
        let galley = painter.layout_no_wrap(
            format!("crop position: {pos}px"),
            FontId::monospace(11.0),
            Color32::WHITE,
        );
        let above = line_y - galley.size().y - 8.0;
        let label_y = if above < display.min.y + 2.0 { line_y + 8.0 } else { above };
        let label_pos = Pos2::new(display.min.x + 8.0, label_y);
        painter.rect_filled(
            Rect::from_min_size(label_pos, galley.size()).expand(3.0),
            2.0,
            Color32::from_black_alpha(170),
        );
        painter.galley(label_pos, galley, Color32::WHITE);
    }

    /// Play/pause, timecode, seek. Inert outside Normal mode: CropAdjust
    /// pauses on entry and the canvas owns pointer input there.
    fn transport_ui(&self, ui: &mut Ui, state: &SessionState, cmd: &mut Vec<CropCommand>) {
        let ready = state
            .video
            .as_ref()
            .is_some_and(|v| v.metrics.is_some());
        let transport_live = ready && state.mode == InteractionMode::Normal;
        let duration = state.video.as_ref().map(|v| v.duration).unwrap_or(0.0);

        ui.horizontal(|ui| {
            let icon = if state.is_playing { "⏸" } else { "▶" };
            let play_btn = egui::Button::new(RichText::new(icon).size(14.0))
                .min_size(Vec2::new(30.0, 26.0));
            if ui.add_enabled(transport_live, play_btn).clicked() {
                cmd.push(CropCommand::TogglePlay);
            }

            ui.label(
                RichText::new(format_time(state.current_time))
                    .monospace()
                    .size(12.0)
                    .color(ACCENT),
            );

            let mut t = state.current_time;
            ui.spacing_mut().slider_width = (ui.available_width() - 12.0).max(40.0);
            let slider = egui::Slider::new(&mut t, 0.0..=duration.max(0.001))
                .show_value(false)
                .trailing_fill(true);
            if ui.add_enabled(transport_live, slider).changed() {
                cmd.push(CropCommand::SetPlayhead(t));
            }
        });
    }
}
