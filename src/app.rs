use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::charts::{self, TrendView};
use crate::ui::{cards, panels, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CampaignLensApp {
    pub state: AppState,
    trend_view: TrendView,
}

impl CampaignLensApp {
    /// Build the app and open the configured dataset if it exists.
    pub fn new(config: DashboardConfig) -> Self {
        let data_path = config.data_path.clone();
        let mut state = AppState::new(config);
        if data_path.exists() {
            // a failed load stays visible in the status line
            let _ = state.open_path(&data_path);
        } else {
            log::info!(
                "{} not found; use File → Open to load a dataset",
                data_path.display()
            );
        }
        Self {
            state,
            trend_view: TrendView::default(),
        }
    }

    fn dashboard(&mut self, ui: &mut egui::Ui) {
        let Some(report) = &self.state.report else {
            ui.label("Adjust the filters to show results.");
            return;
        };

        ui.heading("Key Metrics");
        cards::metric_cards(ui, &report.metrics);
        ui.separator();

        ui.heading("Performance Trends");
        charts::daily_trends(ui, &report.daily, &mut self.trend_view);
        ui.separator();

        ui.columns(2, |cols| {
            cols[0].heading("Day of Week Performance");
            charts::weekday_heatmap(&mut cols[0], &report.by_weekday);
            cols[1].heading("Device Performance");
            charts::device_bars(&mut cols[1], &report.by_device);
        });
        ui.separator();

        ui.heading(format!("Top {} Performing Ads", self.state.config.top_ads_limit));
        tables::top_ads_table(ui, &report.top_ads);
        ui.separator();

        ui.columns(2, |cols| {
            cols[0].heading("Geographic Performance");
            charts::city_map(&mut cols[0], &report.by_city);
            cols[1].heading("Channel Performance");
            charts::channel_bars(&mut cols[1], &report.by_channel);
        });
        ui.separator();

        ui.heading("Campaign Performance");
        charts::campaign_scatter(ui, &report.by_campaign, &self.state.campaign_colors);
        ui.separator();

        egui::CollapsingHeader::new("Raw Data")
            .default_open(false)
            .show(ui, |ui| {
                tables::records_table(ui, &self.state.visible_records());
            });
    }
}

impl eframe::App for CampaignLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a campaign data file (File → Open…)");
                });
                return;
            }
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| self.dashboard(ui));
        });
    }
}
