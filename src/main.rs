mod analysis;
mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::HrDashboardApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional dataset to open at startup.
    let initial: Option<PathBuf> = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "HR Attrition Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(HrDashboardApp::new(initial.as_deref())))),
    )
}
