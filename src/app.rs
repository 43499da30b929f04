use eframe::egui;

use crate::data::loader::{DATASET_URL, LoadRequest};
use crate::state::AppState;
use crate::ui::table::TableState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EvPulseApp {
    pub state: AppState,
    table: TableState,
}

impl Default for EvPulseApp {
    fn default() -> Self {
        let mut state = AppState::default();
        // Kick off the dataset download immediately; the UI renders the
        // loading skeleton until the worker thread reports back.
        state.begin_load(LoadRequest::Url(DATASET_URL.to_string()));
        Self {
            state,
            table: TableState::default(),
        }
    }
}

impl eframe::App for EvPulseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_load();
        if self.state.loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::kpi_row(ui, &self.state.summary, self.state.loading);
                    ui.add_space(8.0);
                    charts::charts_grid(ui, &self.state);
                    ui.add_space(8.0);
                    table::vehicle_table(ui, &mut self.table, &self.state.filtered);
                });
        });
    }
}
