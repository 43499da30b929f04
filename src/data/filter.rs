use std::collections::BTreeSet;

use super::model::EvRecord;

// ---------------------------------------------------------------------------
// FilterSelection – current user-chosen constraints
// ---------------------------------------------------------------------------

/// Per-field filter selection. `None` means "no constraint"; a set field is
/// an exact-match predicate, never substring or case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub vehicle_type: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// A single-field update. `None` (or an empty string, normalized in
/// [`FilterSelection::apply`]) clears the field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterUpdate {
    Year(Option<i32>),
    Make(Option<String>),
    Model(Option<String>),
    VehicleType(Option<String>),
    County(Option<String>),
    City(Option<String>),
    State(Option<String>),
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl FilterSelection {
    /// Set or clear one field, leaving the others untouched.
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Year(v) => self.year = v,
            FilterUpdate::Make(v) => self.make = normalize(v),
            FilterUpdate::Model(v) => self.model = normalize(v),
            FilterUpdate::VehicleType(v) => self.vehicle_type = normalize(v),
            FilterUpdate::County(v) => self.county = normalize(v),
            FilterUpdate::City(v) => self.city = normalize(v),
            FilterUpdate::State(v) => self.state = normalize(v),
        }
    }

    /// Reset every field to unset.
    pub fn clear(&mut self) {
        *self = FilterSelection::default();
    }

    /// Whether any field is currently set.
    pub fn is_active(&self) -> bool {
        self.year.is_some()
            || self.make.is_some()
            || self.model.is_some()
            || self.vehicle_type.is_some()
            || self.county.is_some()
            || self.city.is_some()
            || self.state.is_some()
    }

    /// Conjunction of all set predicates. An unset field always passes.
    pub fn matches(&self, r: &EvRecord) -> bool {
        if let Some(year) = self.year {
            if r.model_year != year {
                return false;
            }
        }
        if let Some(make) = &self.make {
            if r.make != *make {
                return false;
            }
        }
        if let Some(model) = &self.model {
            if r.model != *model {
                return false;
            }
        }
        if let Some(vt) = &self.vehicle_type {
            if r.electric_vehicle_type != *vt {
                return false;
            }
        }
        if let Some(county) = &self.county {
            if r.county != *county {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if r.city != *city {
                return false;
            }
        }
        if let Some(state) = &self.state {
            if r.state != *state {
                return false;
            }
        }
        true
    }
}

/// Apply the selection to the full list, preserving original record order.
pub fn filter_records(records: &[EvRecord], filters: &FilterSelection) -> Vec<EvRecord> {
    records
        .iter()
        .filter(|r| filters.matches(r))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// FilterOptions – distinct values available per filterable field
// ---------------------------------------------------------------------------

/// The choice lists for the filter widgets. Always derived from the full
/// unfiltered dataset so that picking one filter never removes options from
/// the others; re-derived only when the dataset itself changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    /// Descending, year 0 (unparseable) excluded.
    pub years: Vec<i32>,
    pub makes: Vec<String>,
    pub models: Vec<String>,
    pub types: Vec<String>,
    pub counties: Vec<String>,
    pub cities: Vec<String>,
    pub states: Vec<String>,
}

fn distinct_strings<'a>(records: &'a [EvRecord], field: impl Fn(&'a EvRecord) -> &'a str) -> Vec<String> {
    let set: BTreeSet<&str> = records
        .iter()
        .map(field)
        .filter(|v| !v.is_empty())
        .collect();
    set.into_iter().map(String::from).collect()
}

/// Build the option lists from the (unfiltered) dataset.
pub fn filter_options(records: &[EvRecord]) -> FilterOptions {
    let year_set: BTreeSet<i32> = records
        .iter()
        .map(|r| r.model_year)
        .filter(|&y| y != 0)
        .collect();

    FilterOptions {
        years: year_set.into_iter().rev().collect(),
        makes: distinct_strings(records, |r| r.make.as_str()),
        models: distinct_strings(records, |r| r.model.as_str()),
        types: distinct_strings(records, |r| r.electric_vehicle_type.as_str()),
        counties: distinct_strings(records, |r| r.county.as_str()),
        cities: distinct_strings(records, |r| r.city.as_str()),
        states: distinct_strings(records, |r| r.state.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, make: &str, model: &str, state: &str) -> EvRecord {
        EvRecord {
            vin: "WAUTPBFF".to_string(),
            model_year: year,
            make: make.to_string(),
            model: model.to_string(),
            state: state.to_string(),
            ..EvRecord::default()
        }
    }

    fn sample() -> Vec<EvRecord> {
        vec![
            record(2022, "TESLA", "MODEL 3", "WA"),
            record(2021, "TESLA", "MODEL Y", "OR"),
            record(2022, "NISSAN", "LEAF", "WA"),
            record(2020, "CHEVROLET", "BOLT EV", "WA"),
        ]
    }

    #[test]
    fn no_filters_returns_full_list_in_order() {
        let records = sample();
        let filters = FilterSelection::default();
        assert_eq!(filter_records(&records, &filters), records);
    }

    #[test]
    fn set_filters_combine_as_conjunction() {
        let records = sample();
        let mut filters = FilterSelection::default();
        filters.apply(FilterUpdate::Make(Some("TESLA".to_string())));
        filters.apply(FilterUpdate::State(Some("WA".to_string())));
        let filtered = filter_records(&records, &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].model, "MODEL 3");
    }

    #[test]
    fn matching_is_exact_not_substring() {
        let records = sample();
        let mut filters = FilterSelection::default();
        filters.apply(FilterUpdate::Model(Some("MODEL".to_string())));
        assert!(filter_records(&records, &filters).is_empty());
    }

    #[test]
    fn empty_string_clears_a_field() {
        let mut filters = FilterSelection::default();
        filters.apply(FilterUpdate::Make(Some("TESLA".to_string())));
        assert!(filters.is_active());
        filters.apply(FilterUpdate::Make(Some(String::new())));
        assert!(!filters.is_active());
    }

    #[test]
    fn clear_restores_the_unfiltered_view() {
        let records = sample();
        let mut filters = FilterSelection::default();
        filters.apply(FilterUpdate::Year(Some(2022)));
        filters.apply(FilterUpdate::County(Some("King".to_string())));
        filters.clear();
        assert_eq!(filters, FilterSelection::default());
        assert_eq!(filter_records(&records, &filters), records);
        // Options come from the dataset alone, so they are unchanged too.
        assert_eq!(filter_options(&records), filter_options(&sample()));
    }

    #[test]
    fn unmatched_conjunction_yields_empty_not_error() {
        let records = sample();
        let mut filters = FilterSelection::default();
        filters.apply(FilterUpdate::Make(Some("TESLA".to_string())));
        filters.apply(FilterUpdate::Model(Some("LEAF".to_string())));
        assert!(filter_records(&records, &filters).is_empty());
    }

    #[test]
    fn options_come_from_the_unfiltered_dataset() {
        let records = sample();
        let mut filters = FilterSelection::default();
        filters.apply(FilterUpdate::Make(Some("TESLA".to_string())));
        // Options are a function of the dataset, not the selection: other
        // makes' models must still be offered.
        let options = filter_options(&records);
        assert!(options.models.contains(&"LEAF".to_string()));
        assert!(options.models.contains(&"BOLT EV".to_string()));
    }

    #[test]
    fn options_are_sorted_and_deduplicated() {
        let records = sample();
        let options = filter_options(&records);
        assert_eq!(options.years, vec![2022, 2021, 2020]);
        assert_eq!(options.makes, vec!["CHEVROLET", "NISSAN", "TESLA"]);
        assert_eq!(options.states, vec!["OR", "WA"]);
    }

    #[test]
    fn options_exclude_blank_values_and_year_zero() {
        let mut records = sample();
        records.push(record(0, "", "", ""));
        let options = filter_options(&records);
        assert!(!options.years.contains(&0));
        assert!(!options.makes.iter().any(String::is_empty));
        assert!(!options.states.iter().any(String::is_empty));
    }
}
