#![warn(clippy::all, rust_2018_idioms)]

use spin_canvas::{Config, SpinCanvasApp};

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().unwrap_or_else(|err| {
        log::error!("Failed to load configuration, using defaults: {}", err);
        Config::default()
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Spin Canvas"),
        ..Default::default()
    };

    eframe::run_native(
        "spin_canvas",
        native_options,
        Box::new(move |cc| Ok(Box::new(SpinCanvasApp::new(cc, config)))),
    )
}
