mod app;
mod color;
mod config;
mod data;
mod format;
mod state;
mod ui;

use app::CampaignLensApp;
use eframe::egui;
use env_logger::Env;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{e}; using default configuration");
        config::DashboardConfig::default()
    });
    log::info!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Campaign Lens – Advertising Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(CampaignLensApp::new(config)))),
    )
}
