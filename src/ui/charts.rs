use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, Points};

use crate::color::{self, CategoryColors};
use crate::data::aggregate::{
    CampaignRow, ChannelRow, CityRow, DailyRow, DeviceRow, WeekdayRow,
};
use crate::format;

const PLOT_HEIGHT: f32 = 260.0;

/// Which daily series the trend chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendView {
    #[default]
    SpendVsValue,
    ImpressionsVsClicks,
    Ctr,
}

impl TrendView {
    const ALL: [TrendView; 3] = [
        TrendView::SpendVsValue,
        TrendView::ImpressionsVsClicks,
        TrendView::Ctr,
    ];

    fn label(self) -> &'static str {
        match self {
            TrendView::SpendVsValue => "Spend vs Conversion Value",
            TrendView::ImpressionsVsClicks => "Impressions vs Clicks",
            TrendView::Ctr => "CTR Over Time",
        }
    }
}

fn base_plot(id: &str) -> Plot {
    Plot::new(id)
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
}

/// Labels integer x positions with `names`, blank elsewhere.
fn category_axis(names: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        names.get(rounded as usize).cloned().unwrap_or_default()
    }
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

// ---------------------------------------------------------------------------
// Performance trends
// ---------------------------------------------------------------------------

pub fn daily_trends(ui: &mut Ui, daily: &[DailyRow], view: &mut TrendView) {
    ui.horizontal(|ui: &mut Ui| {
        for v in TrendView::ALL {
            ui.selectable_value(view, v, v.label());
        }
    });

    let series = |f: fn(&DailyRow) -> f64| -> Vec<[f64; 2]> {
        daily.iter().map(|d| [day_number(d.date), f(d)]).collect()
    };

    base_plot("daily_trends")
        .x_axis_label("Date")
        .x_axis_formatter(|mark, _range| {
            NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                .map(|d| d.format("%d %b").to_string())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| match *view {
            TrendView::SpendVsValue => {
                plot_ui.line(
                    Line::new(series(|d| d.spend))
                        .name("Spend (£)")
                        .color(color::SPEND),
                );
                plot_ui.line(
                    Line::new(series(|d| d.conversion_value))
                        .name("Conversion Value (£)")
                        .color(color::CONVERSION_VALUE),
                );
            }
            TrendView::ImpressionsVsClicks => {
                plot_ui.line(
                    Line::new(series(|d| d.impressions))
                        .name("Impressions")
                        .color(color::IMPRESSIONS),
                );
                plot_ui.line(
                    Line::new(series(|d| d.clicks))
                        .name("Clicks")
                        .color(color::CLICKS),
                );
            }
            TrendView::Ctr => {
                plot_ui.line(
                    Line::new(series(|d| d.avg_ctr_pct))
                        .name("Average CTR (%)")
                        .color(color::CTR),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Day-of-week heat table
// ---------------------------------------------------------------------------

pub fn weekday_heatmap(ui: &mut Ui, rows: &[WeekdayRow]) {
    let metrics: [(&str, fn(&WeekdayRow) -> f64); 3] = [
        ("Impressions", |r| r.impressions),
        ("Clicks", |r| r.clicks),
        ("Conversions", |r| r.conversions),
    ];

    egui::Grid::new("weekday_heatmap")
        .spacing([6.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for row in rows {
                ui.strong(row.day);
            }
            ui.end_row();

            for (name, get) in metrics {
                ui.label(name);
                let max = rows.iter().map(get).fold(0.0, f64::max);
                for row in rows {
                    let value = get(row);
                    ui.label(
                        RichText::new(format!(" {} ", format::count(value)))
                            .monospace()
                            .color(egui::Color32::BLACK)
                            .background_color(color::heat(value, max)),
                    );
                }
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Grouped bar charts
// ---------------------------------------------------------------------------

/// One coloured bar series per metric, grouped around each category.
fn grouped_bars(
    ui: &mut Ui,
    id: &str,
    categories: Vec<String>,
    series: Vec<(&str, egui::Color32, Vec<f64>)>,
) {
    let n_series = series.len().max(1) as f64;
    let width = 0.8 / n_series;

    base_plot(id)
        .x_axis_formatter(category_axis(categories))
        .show(ui, |plot_ui| {
            for (s, (name, colour, values)) in series.into_iter().enumerate() {
                let offset = (s as f64 - (n_series - 1.0) / 2.0) * width;
                let bars: Vec<Bar> = values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| Bar::new(i as f64 + offset, v).width(width * 0.95))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(name).color(colour));
            }
        });
}

pub fn device_bars(ui: &mut Ui, rows: &[DeviceRow]) {
    grouped_bars(
        ui,
        "device_bars",
        rows.iter().map(|r| r.device.clone()).collect(),
        vec![
            ("Spend (£)", color::SPEND, rows.iter().map(|r| r.spend).collect()),
            (
                "Conversion Value (£)",
                color::CONVERSION_VALUE,
                rows.iter().map(|r| r.conversion_value).collect(),
            ),
            ("Clicks", color::CLICKS, rows.iter().map(|r| r.clicks).collect()),
        ],
    );
}

pub fn channel_bars(ui: &mut Ui, rows: &[ChannelRow]) {
    grouped_bars(
        ui,
        "channel_bars",
        rows.iter().map(|r| r.channel.clone()).collect(),
        vec![
            ("Spend (£)", color::SPEND, rows.iter().map(|r| r.spend).collect()),
            (
                "Conversion Value (£)",
                color::CONVERSION_VALUE,
                rows.iter().map(|r| r.conversion_value).collect(),
            ),
        ],
    );
}

// ---------------------------------------------------------------------------
// Scatter plots
// ---------------------------------------------------------------------------

/// Marker radius proportional to the square root of `value / max`.
fn marker_radius(value: f64, max: f64) -> f32 {
    let t = if max > 0.0 { (value / max).max(0.0) } else { 0.0 };
    (3.0 + 14.0 * t.sqrt()) as f32
}

/// Cities on a longitude × latitude plane: size = conversion value,
/// colour = conversions.
pub fn city_map(ui: &mut Ui, rows: &[CityRow]) {
    let max_value = rows.iter().map(|r| r.conversion_value).fold(0.0, f64::max);
    let max_conv = rows.iter().map(|r| r.conversions).fold(0.0, f64::max);

    base_plot("city_map")
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .show(ui, |plot_ui| {
            for row in rows {
                plot_ui.points(
                    Points::new(vec![[row.longitude, row.latitude]])
                        .radius(marker_radius(row.conversion_value, max_value))
                        .color(color::heat(row.conversions, max_conv))
                        .name(format!(
                            "{}: {} / {} conv.",
                            row.city,
                            format::currency(row.conversion_value),
                            format::count(row.conversions)
                        )),
                );
            }
        });
}

/// Spend against conversion value per campaign; size = conversions.
pub fn campaign_scatter(ui: &mut Ui, rows: &[CampaignRow], colors: &CategoryColors) {
    let max_conv = rows.iter().map(|r| r.conversions).fold(0.0, f64::max);

    base_plot("campaign_scatter")
        .x_axis_label("Spend (£)")
        .y_axis_label("Conversion Value (£)")
        .show(ui, |plot_ui| {
            for row in rows {
                plot_ui.points(
                    Points::new(vec![[row.spend, row.conversion_value]])
                        .radius(marker_radius(row.conversions, max_conv))
                        .color(colors.color_for(&row.campaign))
                        .name(&row.campaign),
                );
            }
        });
}
