use eframe::egui::{self, RichText, TextEdit, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{EvRecord, type_short};

const PAGE_SIZES: [usize; 3] = [10, 25, 50];

// ---------------------------------------------------------------------------
// Table view state (presentation concern, separate from filters)
// ---------------------------------------------------------------------------

/// Pagination and free-text search state for the vehicle table.
pub struct TableState {
    pub search: String,
    pub page: usize,
    pub rows_per_page: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 0,
            rows_per_page: PAGE_SIZES[0],
        }
    }
}

/// Case-insensitive substring match across the displayed columns.
fn row_matches_search(r: &EvRecord, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    [
        r.county.as_str(),
        r.city.as_str(),
        r.state.as_str(),
        &r.model_year.to_string(),
        r.make.as_str(),
        r.model.as_str(),
        r.electric_vehicle_type.as_str(),
        &r.electric_range.to_string(),
    ]
    .iter()
    .any(|v| v.to_lowercase().contains(&needle))
}

// ---------------------------------------------------------------------------
// Vehicle table (bottom of the central panel)
// ---------------------------------------------------------------------------

/// Render the paginated, searchable vehicle list.
pub fn vehicle_table(ui: &mut Ui, table: &mut TableState, records: &[EvRecord]) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("Vehicle list").strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            let response = ui.add(
                TextEdit::singleline(&mut table.search)
                    .hint_text("Search all columns…")
                    .desired_width(240.0),
            );
            if response.changed() {
                table.page = 0;
            }
        });
    });

    let needle = table.search.trim().to_string();
    let visible: Vec<&EvRecord> = if needle.is_empty() {
        records.iter().collect()
    } else {
        records
            .iter()
            .filter(|r| row_matches_search(r, &needle))
            .collect()
    };

    // Clamp in case the underlying data shrank since the page was set.
    let max_page = visible.len().saturating_sub(1) / table.rows_per_page;
    table.page = table.page.min(max_page);

    let start = table.page * table.rows_per_page;
    let end = (start + table.rows_per_page).min(visible.len());
    let page_rows = &visible[start..end];

    if page_rows.is_empty() {
        ui.add_space(12.0);
        ui.vertical_centered(|ui: &mut Ui| {
            ui.weak("No data");
        });
        ui.add_space(12.0);
    } else {
        TableBuilder::new(ui)
            .striped(true)
            // Paginated, and already inside the central scroll area.
            .vscroll(false)
            .column(Column::auto().at_least(90.0)) // County
            .column(Column::auto().at_least(90.0)) // City
            .column(Column::auto().at_least(48.0)) // State
            .column(Column::auto().at_least(48.0)) // Year
            .column(Column::auto().at_least(90.0)) // Make
            .column(Column::auto().at_least(110.0)) // Model
            .column(Column::remainder()) // Type
            .column(Column::auto().at_least(72.0)) // Range
            .header(20.0, |mut header| {
                for label in [
                    "County", "City", "State", "Year", "Make", "Model", "Type", "Range (mi)",
                ] {
                    header.col(|ui| {
                        ui.strong(label);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, page_rows.len(), |mut row| {
                    let r = page_rows[row.index()];
                    row.col(|ui| {
                        ui.label(&r.county);
                    });
                    row.col(|ui| {
                        ui.label(&r.city);
                    });
                    row.col(|ui| {
                        ui.label(&r.state);
                    });
                    row.col(|ui| {
                        ui.label(r.model_year.to_string());
                    });
                    row.col(|ui| {
                        ui.label(&r.make);
                    });
                    row.col(|ui| {
                        ui.label(&r.model);
                    });
                    row.col(|ui| {
                        ui.label(type_short(&r.electric_vehicle_type));
                    });
                    row.col(|ui| {
                        if r.electric_range > 0 {
                            ui.label(r.electric_range.to_string());
                        } else {
                            ui.weak("—");
                        }
                    });
                });
            });
    }

    ui.add_space(6.0);
    ui.horizontal(|ui: &mut Ui| {
        if visible.is_empty() {
            ui.weak("Total: 0 rows");
        } else {
            ui.weak(format!(
                "Total: {} rows (showing {}–{})",
                visible.len(),
                start + 1,
                end
            ));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            let next_enabled = end < visible.len();
            if ui
                .add_enabled(next_enabled, egui::Button::new("Next"))
                .clicked()
            {
                table.page += 1;
            }
            if ui
                .add_enabled(table.page > 0, egui::Button::new("Previous"))
                .clicked()
            {
                table.page -= 1;
            }

            egui::ComboBox::from_id_salt("rows_per_page")
                .selected_text(table.rows_per_page.to_string())
                .width(64.0)
                .show_ui(ui, |ui: &mut Ui| {
                    for n in PAGE_SIZES {
                        if ui
                            .selectable_label(table.rows_per_page == n, n.to_string())
                            .clicked()
                        {
                            table.rows_per_page = n;
                            table.page = 0;
                        }
                    }
                });
            ui.weak("Rows per page:");
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str, make: &str, type_str: &str, range: i32) -> EvRecord {
        EvRecord {
            vin: "JTMAB3FV".to_string(),
            city: city.to_string(),
            make: make.to_string(),
            electric_vehicle_type: type_str.to_string(),
            electric_range: range,
            ..EvRecord::default()
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let r = record("Seattle", "TESLA", "Battery Electric Vehicle (BEV)", 250);
        assert!(row_matches_search(&r, "tesla"));
        assert!(row_matches_search(&r, "EATT"));
        assert!(row_matches_search(&r, "battery"));
        assert!(!row_matches_search(&r, "tacoma"));
    }

    #[test]
    fn search_covers_numeric_columns_as_text() {
        let r = record("Seattle", "TESLA", "Battery Electric Vehicle (BEV)", 250);
        assert!(row_matches_search(&r, "250"));
    }
}
