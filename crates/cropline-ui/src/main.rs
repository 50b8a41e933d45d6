#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod context;
mod gateway;
mod modules;
mod theme;

fn main() -> eframe::Result {
    cropline_media::init().expect("FFmpeg init failed");

    let native_options = eframe::NativeOptions {
        centered: true,
        viewport: egui::ViewportBuilder::default()
            .with_title("✂ Cropline")
            .with_inner_size([1120.0, 760.0])
            .with_min_inner_size([820.0, 560.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Cropline",
        native_options,
        Box::new(|cc| Ok(Box::new(app::CroplineApp::new(cc)))),
    )
}
