use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – country selector and observations
// ---------------------------------------------------------------------------

/// Render the left panel: the category selector and the current series.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Country");
    ui.separator();

    let Some(controller) = &state.controller else {
        ui.label("No dataset loaded.");
        return;
    };

    let current = state.selected().unwrap_or_default().to_string();
    let mut choice = None;
    egui::ComboBox::from_id_salt("category_select")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for category in controller.categories() {
                if ui
                    .selectable_label(current == *category, category)
                    .clicked()
                    && current != *category
                {
                    choice = Some(category.clone());
                }
            }
        });
    if let Some(category) = choice {
        state.select_category(&category);
    }

    ui.separator();
    observations_table(ui, state);
}

/// Year / value rows of the series currently on screen.
fn observations_table(ui: &mut Ui, state: &AppState) {
    let Some(frame) = state.controller.as_ref().and_then(|c| c.current()) else {
        return;
    };
    let records = &frame.view.records;

    ui.strong(format!("{} observations", records.len()));
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(48.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Year");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("TWh");
            });
        })
        .body(|body| {
            body.rows(18.0, records.len(), |mut row| {
                let record = &records[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(record.year.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.3}", record.value));
                });
            });
        });
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
        });

        ui.separator();

        if let Some(controller) = &state.controller {
            let source = state
                .source
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{source}: {} records, {} countries",
                controller.dataset().len(),
                controller.categories().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open energy data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
