use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::FilterUpdate;
use crate::data::loader::{DATASET_URL, LoadRequest};
use crate::data::summary::Summary;
use crate::state::AppState;

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
            if ui.button("Reload from web").clicked() {
                state.begin_load(LoadRequest::Url(DATASET_URL.to_string()));
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("EV Pulse – Electric Vehicle Population Analytics");
        ui.separator();

        if state.loading {
            ui.spinner();
            ui.label("Loading dataset…");
        } else if !state.records().is_empty() {
            ui.label(format!(
                "{} vehicles loaded, {} matching",
                state.records().len(),
                state.filtered.len()
            ));
        }

        if let Some(msg) = &state.error {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the filter panel: one single-select combo per filterable field,
/// fed from the unfiltered dataset's option lists.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.records().is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    // Collect the updates first; applying one mutates derived state.
    let mut updates: Vec<FilterUpdate> = Vec::new();
    let mut clear = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            year_combo(ui, state, &mut updates);

            let options = &state.filter_options;
            text_combo(ui, "Make", "All makes", state.filters.make.as_deref(), &options.makes, &mut updates, FilterUpdate::Make);
            text_combo(ui, "Model", "All models", state.filters.model.as_deref(), &options.models, &mut updates, FilterUpdate::Model);
            text_combo(ui, "Vehicle type", "All types", state.filters.vehicle_type.as_deref(), &options.types, &mut updates, FilterUpdate::VehicleType);
            text_combo(ui, "County", "All counties", state.filters.county.as_deref(), &options.counties, &mut updates, FilterUpdate::County);
            text_combo(ui, "City", "All cities", state.filters.city.as_deref(), &options.cities, &mut updates, FilterUpdate::City);
            text_combo(ui, "State", "All states", state.filters.state.as_deref(), &options.states, &mut updates, FilterUpdate::State);

            ui.add_space(8.0);
            if state.filters.is_active() && ui.button("✖ Clear filters").clicked() {
                clear = true;
            }
        });

    for update in updates {
        state.set_filter(update);
    }
    if clear {
        state.clear_filters();
    }
}

fn year_combo(ui: &mut Ui, state: &AppState, updates: &mut Vec<FilterUpdate>) {
    ui.strong("Year");
    let selected_text = state
        .filters
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "All years".to_string());
    egui::ComboBox::from_id_salt("filter_year")
        .selected_text(selected_text)
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(state.filters.year.is_none(), "All years")
                .clicked()
            {
                updates.push(FilterUpdate::Year(None));
            }
            for &year in &state.filter_options.years {
                if ui
                    .selectable_label(state.filters.year == Some(year), year.to_string())
                    .clicked()
                {
                    updates.push(FilterUpdate::Year(Some(year)));
                }
            }
        });
    ui.add_space(4.0);
}

#[allow(clippy::too_many_arguments)]
fn text_combo(
    ui: &mut Ui,
    label: &str,
    all_label: &str,
    current: Option<&str>,
    options: &[String],
    updates: &mut Vec<FilterUpdate>,
    make_update: fn(Option<String>) -> FilterUpdate,
) {
    ui.strong(label);
    egui::ComboBox::from_id_salt(label)
        .selected_text(current.unwrap_or(all_label).to_string())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), all_label).clicked() {
                updates.push(make_update(None));
            }
            for value in options {
                if ui
                    .selectable_label(current == Some(value.as_str()), value)
                    .clicked()
                {
                    updates.push(make_update(Some(value.clone())));
                }
            }
        });
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// KPI tiles
// ---------------------------------------------------------------------------

/// The five headline numbers above the charts.
pub fn kpi_row(ui: &mut Ui, summary: &Summary, loading: bool) {
    let tiles: [(&str, String); 5] = [
        ("Total vehicles", summary.total.to_string()),
        ("Battery electric (BEV)", summary.bev_count.to_string()),
        ("Plug-in hybrid (PHEV)", summary.phev_count.to_string()),
        (
            "Avg electric range (mi)",
            if summary.avg_electric_range > 0.0 {
                format!("{}", summary.avg_electric_range)
            } else {
                "—".to_string()
            },
        ),
        (
            "Top make",
            summary
                .top_makes
                .first()
                .map(|m| m.make.clone())
                .unwrap_or_else(|| "—".to_string()),
        ),
    ];

    ui.columns(tiles.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(tiles) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(label).small().weak());
                if loading {
                    ui.spinner();
                } else {
                    ui.label(RichText::new(value).heading());
                }
            });
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open EV registration data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.begin_load(LoadRequest::File(path));
    }
}
