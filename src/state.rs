use std::sync::mpsc::{Receiver, TryRecvError};

use crate::color::TypeColorMap;
use crate::data::filter::{
    FilterOptions, FilterSelection, FilterUpdate, filter_options, filter_records,
};
use crate::data::loader::{LoadRequest, spawn_load};
use crate::data::model::EvRecord;
use crate::data::summary::{Summary, compute_summary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// `records` is written once per successful load and read-only afterwards.
/// `filtered`, `summary`, and `filter_options` are derived views: every
/// mutation path ends in exactly one re-derivation, so the UI never observes
/// a stale combination.
pub struct AppState {
    /// The unfiltered dataset (empty until a load succeeds).
    records: Vec<EvRecord>,

    /// Current per-field filter selection.
    pub filters: FilterSelection,

    /// Records passing the current selection, in original order.
    pub filtered: Vec<EvRecord>,

    /// Aggregation of `filtered`.
    pub summary: Summary,

    /// Choice lists for the filter widgets, from the unfiltered dataset.
    pub filter_options: FilterOptions,

    /// Stable chart colours per distinct vehicle type string.
    pub type_colors: TypeColorMap,

    /// Whether a fetch-and-parse is in flight.
    pub loading: bool,

    /// Error message from the last failed load.
    pub error: Option<String>,

    // Only the newest receiver is kept: replacing or dropping it closes the
    // old channel, so a superseded load's result is discarded unseen.
    pending: Option<Receiver<Result<Vec<EvRecord>, String>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            filters: FilterSelection::default(),
            filtered: Vec::new(),
            summary: Summary::default(),
            filter_options: FilterOptions::default(),
            type_colors: TypeColorMap::default(),
            loading: false,
            error: None,
            pending: None,
        }
    }
}

impl AppState {
    /// The unfiltered dataset.
    pub fn records(&self) -> &[EvRecord] {
        &self.records
    }

    /// Start a background load, superseding any load still in flight.
    /// The previous dataset is dropped up front: a failed load leaves the
    /// record list empty rather than silently showing outdated data.
    pub fn begin_load(&mut self, request: LoadRequest) {
        log::info!("Loading dataset: {request:?}");
        self.records.clear();
        self.filters.clear();
        self.rederive();
        self.error = None;
        self.loading = true;
        self.pending = Some(spawn_load(request));
    }

    /// Poll the in-flight load, if any. Call once per frame.
    pub fn poll_load(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(records)) => {
                log::info!("Loaded {} vehicle records", records.len());
                self.pending = None;
                self.set_records(records);
            }
            Ok(Err(msg)) => {
                log::error!("Failed to load dataset: {msg}");
                self.pending = None;
                self.loading = false;
                self.error = Some(msg);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.loading = false;
                self.error = Some("dataset load was interrupted".to_string());
            }
        }
    }

    /// Ingest a loaded dataset and re-derive every view.
    pub fn set_records(&mut self, records: Vec<EvRecord>) {
        self.records = records;
        self.filters.clear();
        // Options and colours depend on the dataset alone, never on the
        // filter selection.
        self.filter_options = filter_options(&self.records);
        self.type_colors = TypeColorMap::new(&self.filter_options.types);
        self.rederive();
        self.loading = false;
        self.error = None;
    }

    /// Set or clear one filter field and re-derive.
    pub fn set_filter(&mut self, update: FilterUpdate) {
        self.filters.apply(update);
        self.rederive();
    }

    /// Reset the selection and re-derive.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.rederive();
    }

    /// Recompute `filtered` and `summary` from their inputs.
    fn rederive(&mut self) {
        self.filtered = filter_records(&self.records, &self.filters);
        self.summary = compute_summary(&self.filtered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, make: &str, type_str: &str, range: i32) -> EvRecord {
        EvRecord {
            vin: "KNDC3DLC".to_string(),
            county: "King".to_string(),
            city: "Seattle".to_string(),
            state: "WA".to_string(),
            model_year: year,
            make: make.to_string(),
            model: format!("{make}-M"),
            electric_vehicle_type: type_str.to_string(),
            electric_range: range,
            ..EvRecord::default()
        }
    }

    const BEV: &str = "Battery Electric Vehicle (BEV)";
    const PHEV: &str = "Plug-in Hybrid Electric Vehicle (PHEV)";

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.set_records(vec![
            record(2022, "TESLA", BEV, 250),
            record(2021, "BMW", PHEV, 30),
            record(2022, "NISSAN", BEV, 150),
        ]);
        state
    }

    #[test]
    fn set_records_derives_everything_once() {
        let state = loaded_state();
        assert!(!state.loading);
        assert_eq!(state.filtered.len(), 3);
        assert_eq!(state.summary.total, 3);
        assert_eq!(state.filter_options.years, vec![2022, 2021]);
    }

    #[test]
    fn set_filter_rederives_filtered_and_summary_together() {
        let mut state = loaded_state();
        state.set_filter(FilterUpdate::Make(Some("TESLA".to_string())));
        assert_eq!(state.filtered.len(), 1);
        assert_eq!(state.summary.total, 1);
        assert_eq!(state.summary.bev_count, 1);
    }

    #[test]
    fn filter_options_survive_filtering() {
        let mut state = loaded_state();
        let before = state.filter_options.clone();
        state.set_filter(FilterUpdate::Make(Some("TESLA".to_string())));
        assert_eq!(state.filter_options, before);
        assert!(state.filter_options.makes.contains(&"BMW".to_string()));
    }

    #[test]
    fn clear_filters_restores_the_unfiltered_views() {
        let mut state = loaded_state();
        let filtered_before = state.filtered.clone();
        let summary_before = state.summary.clone();
        state.set_filter(FilterUpdate::Year(Some(2022)));
        state.set_filter(FilterUpdate::State(Some("WA".to_string())));
        state.clear_filters();
        assert_eq!(state.filtered, filtered_before);
        assert_eq!(state.summary, summary_before);
        assert!(!state.filters.is_active());
    }

    #[test]
    fn begin_load_empties_the_previous_dataset() {
        let mut state = loaded_state();
        state.begin_load(LoadRequest::File("does-not-exist.csv".into()));
        assert!(state.loading);
        assert!(state.records().is_empty());
        assert_eq!(state.summary.total, 0);
        assert!(state.filtered.is_empty());
    }
}
