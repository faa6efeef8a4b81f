mod app;
mod color;
mod data;
mod state;
mod ui;
mod util;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use app::SalescopeApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional positional argument: extract to load at startup.
    let initial_extract = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Salescope – Sales Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(SalescopeApp::new(cc, initial_extract)))),
    )
}
