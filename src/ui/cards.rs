use eframe::egui::{self, RichText, Ui};

use crate::data::metrics::SummaryMetrics;
use crate::format;

/// Two cards per column, five columns.
fn card_texts(m: &SummaryMetrics) -> [[(&'static str, String); 2]; 5] {
    [
        [
            ("Total Spend", format::currency(m.total_spend)),
            ("Total Impressions", format::count(m.impressions)),
        ],
        [
            ("Total Clicks", format::count(m.clicks)),
            ("Total Conversions", format::count(m.conversions)),
        ],
        [
            ("Conversion Value", format::currency(m.conversion_value)),
            ("Average CTR", format::percent(m.avg_ctr_pct)),
        ],
        [
            ("Average CPC", format::currency(m.avg_cpc)),
            ("ROAS", format::multiple(m.roas)),
        ],
        [
            ("Cost per Conversion", format::currency(m.cost_per_conversion)),
            ("Conversion Rate", format::percent(m.conversion_rate_pct)),
        ],
    ]
}

fn card(ui: &mut Ui, label: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(150.0);
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label).small().weak());
            ui.label(RichText::new(value).size(20.0).strong());
        });
    });
}

/// The key-metrics strip at the top of the dashboard.
pub fn metric_cards(ui: &mut Ui, metrics: &SummaryMetrics) {
    let columns = card_texts(metrics);
    egui::Grid::new("metric_cards")
        .spacing([12.0, 12.0])
        .show(ui, |ui: &mut Ui| {
            for row in 0..2 {
                for column in &columns {
                    let (label, value) = &column[row];
                    card(ui, label, value);
                }
                ui.end_row();
            }
        });
    ui.label(
        RichText::new(format!("{} records in selection", metrics.record_count)).weak(),
    );
}
