mod app;
mod color;
mod config;
mod controller;
mod data;
mod error;
mod render;
mod state;
mod ui;

use std::path::Path;

use app::FossilChartApp;
use config::{ChartConfig, CONFIG_FILE};
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ChartConfig::load_or_default(Path::new(CONFIG_FILE)).unwrap_or_else(|e| {
        log::error!("Ignoring {CONFIG_FILE}: {e:#}");
        ChartConfig::default()
    });

    let mut state = AppState::new(config);
    let data_path = state.config.data_path.clone();
    state.load_path(&data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 520.0])
            .with_min_inner_size([600.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Fossil Fuel Consumption",
        options,
        Box::new(|_cc| Ok(Box::new(FossilChartApp::new(state)))),
    )
}
