#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use pagecraft_ui::UploaderApp;
use pagecraft_ui::widgets::UploaderState;
use pagecraft_uploader::{UploaderConfig, UploaderSettings};

mod alloc {
    #[global_allocator]
    static MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
}

fn main() -> eframe::Result {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    // Filter out egui_winit clipboard errors, they are noise for this app.
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_module("egui_winit::clipboard", log::LevelFilter::Off)
        .init();

    let settings =
        UploaderSettings::from_env().map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;
    if settings.action.is_empty() {
        log::warn!("PAGECRAFT_UPLOAD_ACTION is not set, uploads will fail");
    }

    // Transfers run here; the UI thread only drains their results.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;
    let _guard = runtime.enter();

    let state = UploaderState::with_http(UploaderConfig::from(settings))
        .map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 360.0])
            .with_min_inner_size([320.0, 240.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Pagecraft Uploader",
        native_options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(UploaderApp::new(state)))
        }),
    )
}
