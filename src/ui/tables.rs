use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder, TableRow};

use crate::data::aggregate::AdRow;
use crate::data::model::CampaignRecord;
use crate::format;

const ROW_HEIGHT: f32 = 18.0;

fn header_row(header: &mut TableRow<'_, '_>, names: &[&str]) {
    for name in names {
        header.col(|ui: &mut Ui| {
            ui.strong(*name);
        });
    }
}

pub fn top_ads_table(ui: &mut Ui, ads: &[AdRow]) {
    if ads.is_empty() {
        ui.label("No ads in the current selection.");
        return;
    }
    const HEADERS: [&str; 7] = [
        "Campaign",
        "Ad",
        "Channel",
        "Conversion Value",
        "Spend",
        "Conversions",
        "ROAS",
    ];

    ui.push_id("top_ads_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(80.0), HEADERS.len())
            .header(20.0, |mut header| header_row(&mut header, &HEADERS))
            .body(|body| {
                body.rows(ROW_HEIGHT, ads.len(), |mut row| {
                    let ad = &ads[row.index()];
                    let cells = [
                        ad.campaign.clone(),
                        ad.ad.clone(),
                        ad.channel.clone(),
                        format::currency(ad.conversion_value),
                        format::currency(ad.spend),
                        format::count(ad.conversions),
                        format::multiple(ad.roas),
                    ];
                    for text in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(text);
                        });
                    }
                });
            });
    });
}

const RECORD_HEADERS: [&str; 16] = [
    "Date",
    "Day",
    "Campaign",
    "Channel",
    "Ad",
    "City",
    "Device",
    "Latitude",
    "Longitude",
    "Spend",
    "Impressions",
    "Clicks",
    "Conversions",
    "Conv. Value",
    "CTR",
    "Daily Avg CPC",
];

/// Display text of one record, in `RECORD_HEADERS` order.
fn record_cells(r: &CampaignRecord) -> [String; 16] {
    [
        r.date.format("%Y-%m-%d").to_string(),
        r.day_name().to_string(),
        r.campaign.clone(),
        r.channel.clone(),
        r.ad.clone(),
        r.city.clone(),
        r.device.clone(),
        format!("{:.4}", r.latitude),
        format!("{:.4}", r.longitude),
        format::currency(r.spend),
        format::count(r.impressions),
        format::count(r.clicks),
        format::count(r.conversions),
        format::currency(r.conversion_value),
        format::percent(r.ctr * 100.0),
        format::currency(r.daily_avg_cpc),
    ]
}

/// Every record in the current selection, one row each.
pub fn records_table(ui: &mut Ui, records: &[&CampaignRecord]) {
    ui.push_id("records_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(60.0), RECORD_HEADERS.len())
            .max_scroll_height(400.0)
            .header(20.0, |mut header| header_row(&mut header, &RECORD_HEADERS))
            .body(|body| {
                body.rows(ROW_HEIGHT, records.len(), |mut row| {
                    for text in record_cells(records[row.index()]) {
                        row.col(|ui: &mut Ui| {
                            ui.label(text);
                        });
                    }
                });
            });
    });
}
