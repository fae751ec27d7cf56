use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::model::Dimension;
use crate::state::AppState;

/// A filter edit collected while drawing, applied once the panel is done.
enum FilterAction {
    Toggle(Dimension, String),
    All(Dimension),
    None(Dimension),
    Dates(chrono::NaiveDate, chrono::NaiveDate),
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => Arc::clone(ds),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    let mut actions: Vec<FilterAction> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            ui.strong("Date range");
            match (state.filters.date_range, dataset.date_span) {
                (range, Some((first, last))) => {
                    let (mut start, mut end) =
                        range.map(|r| (r.start, r.end)).unwrap_or((first, last));
                    let before = (start, end);
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("From");
                        ui.add(DatePickerButton::new(&mut start).id_salt("date_from"));
                    });
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("To");
                        ui.add(DatePickerButton::new(&mut end).id_salt("date_to"));
                    });
                    if ui.small_button("Full range").clicked() {
                        (start, end) = (first, last);
                    }
                    if (start, end) != before {
                        actions.push(FilterAction::Dates(start, end));
                    }
                }
                (_, None) => {
                    ui.label("No dates in dataset.");
                }
            }
            ui.separator();

            // ---- Per-dimension filter widgets (collapsible) ----
            for dim in Dimension::ALL {
                let n_total = dataset.values(dim).count();
                let n_selected = dataset
                    .values(dim)
                    .filter(|v| state.filters.is_selected(dim, v))
                    .count();
                let header_text = format!("{dim}  ({n_selected}/{n_total})");

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.label())
                    .default_open(dim == Dimension::Campaign)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                actions.push(FilterAction::All(dim));
                            }
                            if ui.small_button("None").clicked() {
                                actions.push(FilterAction::None(dim));
                            }
                        });

                        for value in dataset.values(dim) {
                            let mut checked = state.filters.is_selected(dim, value);
                            let mut text = RichText::new(value);
                            if dim == Dimension::Campaign {
                                text = text.color(state.campaign_colors.color_for(value));
                            }
                            if ui.checkbox(&mut checked, text).changed() {
                                actions.push(FilterAction::Toggle(dim, value.to_string()));
                            }
                        }
                    });
            }
        });

    // Each action recomputes the report from scratch.
    for action in actions {
        match action {
            FilterAction::Toggle(dim, value) => state.toggle_filter_value(dim, &value),
            FilterAction::All(dim) => state.select_all(dim),
            FilterAction::None(dim) => state.select_none(dim),
            FilterAction::Dates(start, end) => state.set_date_range(start, end),
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source_path.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                // errors already land in the status line
                let _ = state.reload();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.report.is_some(), egui::Button::new("Export report…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} matching",
                ds.len(),
                state.visible_indices.len()
            ));
        }
        if let Some(path) = &state.source_path {
            ui.separator();
            ui.label(RichText::new(path.display().to_string()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open campaign data")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // failures are logged and shown by open_path
        let _ = state.open_path(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export report")
        .set_file_name("campaign_report.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_report(&path) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Export failed: {e:#}"));
        }
    }
}
