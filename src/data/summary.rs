use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::model::{EvRecord, TypeKind};

// ---------------------------------------------------------------------------
// Summary – aggregation output consumed by the KPI tiles and charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MakeCount {
    pub make: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeCount {
    pub type_name: String,
    pub count: usize,
}

/// One histogram bucket covering `min <= electric_range < max`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBucket {
    pub label: String,
    pub min: i32,
    pub max: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountyCount {
    pub county: String,
    pub state: String,
    pub count: usize,
}

/// Aggregated view of a record list. Recomputed from scratch whenever the
/// filtered record list changes; plain value with no identity of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub bev_count: usize,
    pub phev_count: usize,
    pub other_count: usize,
    /// Mean electric range over records with a reported (non-zero) range,
    /// rounded to one decimal. 0.0 when no record has a reported range.
    pub avg_electric_range: f64,
    /// One entry per distinct model year, ascending by year.
    pub by_year: Vec<YearCount>,
    /// Top makes by count, descending, ties keep first-seen order.
    pub top_makes: Vec<MakeCount>,
    /// One entry per distinct raw vehicle type string, first-seen order.
    pub by_type: Vec<TypeCount>,
    pub range_buckets: Vec<RangeBucket>,
    /// Top (county, state) pairs by count, descending, first-seen tie-break.
    pub top_counties: Vec<CountyCount>,
}

const RANGE_BUCKET_SIZE: i32 = 50;
const TOP_MAKES_N: usize = 10;
const TOP_COUNTIES_N: usize = 8;

fn round_to_1(n: f64) -> f64 {
    (n * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// compute_summary – the aggregation engine
// ---------------------------------------------------------------------------

/// Aggregate a record list into a [`Summary`]. Pure and total: the empty
/// list yields the all-zero summary, never an error.
pub fn compute_summary(records: &[EvRecord]) -> Summary {
    if records.is_empty() {
        return Summary::default();
    }

    // Year counts sort ascending anyway; makes / types / counties need
    // first-insertion order preserved for stable top-N tie-breaks.
    let mut year_map: BTreeMap<i32, usize> = BTreeMap::new();
    let mut make_map: IndexMap<String, usize> = IndexMap::new();
    let mut type_map: IndexMap<String, usize> = IndexMap::new();
    let mut county_map: IndexMap<(String, String), usize> = IndexMap::new();

    let mut range_sum: i64 = 0;
    let mut range_count: usize = 0;
    let mut bev_count = 0;
    let mut phev_count = 0;

    for r in records {
        *year_map.entry(r.model_year).or_insert(0) += 1;
        *make_map.entry(r.make.clone()).or_insert(0) += 1;
        *type_map
            .entry(r.electric_vehicle_type.clone())
            .or_insert(0) += 1;
        *county_map
            .entry((r.county.clone(), r.state.clone()))
            .or_insert(0) += 1;

        // Range 0 means "not reported": excluded from the average but
        // counted everywhere else.
        if r.electric_range > 0 {
            range_sum += i64::from(r.electric_range);
            range_count += 1;
        }

        match r.type_kind() {
            TypeKind::Bev => bev_count += 1,
            TypeKind::Phev => phev_count += 1,
            TypeKind::Other => {}
        }
    }

    let by_year: Vec<YearCount> = year_map
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect();

    let mut make_entries: Vec<MakeCount> = make_map
        .into_iter()
        .map(|(make, count)| MakeCount { make, count })
        .collect();
    // Stable sort: equal counts keep first-seen order.
    make_entries.sort_by(|a, b| b.count.cmp(&a.count));
    make_entries.truncate(TOP_MAKES_N);

    let by_type: Vec<TypeCount> = type_map
        .into_iter()
        .map(|(type_name, count)| TypeCount { type_name, count })
        .collect();

    let mut county_entries: Vec<CountyCount> = county_map
        .into_iter()
        .map(|((county, state), count)| CountyCount {
            county,
            state,
            count,
        })
        .collect();
    county_entries.sort_by(|a, b| b.count.cmp(&a.count));
    county_entries.truncate(TOP_COUNTIES_N);

    let max_range = records
        .iter()
        .map(|r| r.electric_range)
        .max()
        .unwrap_or(0)
        .max(0);
    let range_buckets = build_range_buckets(records, max_range);

    let avg_electric_range = if range_count > 0 {
        round_to_1(range_sum as f64 / range_count as f64)
    } else {
        0.0
    };

    Summary {
        total: records.len(),
        bev_count,
        phev_count,
        other_count: records.len() - bev_count - phev_count,
        avg_electric_range,
        by_year,
        top_makes: make_entries,
        by_type,
        range_buckets,
        top_counties: county_entries,
    }
}

/// Fixed-width histogram buckets from 0 up past `max_range`, guaranteeing at
/// least one trailing bucket beyond the observed maximum. The first bucket is
/// labelled `"0"`, later ones `"{min}-{max}"`.
fn build_range_buckets(records: &[EvRecord], max_range: i32) -> Vec<RangeBucket> {
    let mut buckets = Vec::new();
    let mut bucket_max = 0;
    while bucket_max < max_range + RANGE_BUCKET_SIZE {
        let min = bucket_max;
        bucket_max += RANGE_BUCKET_SIZE;
        let label = if min == 0 {
            "0".to_string()
        } else {
            format!("{min}-{bucket_max}")
        };
        let count = records
            .iter()
            .filter(|r| r.electric_range >= min && r.electric_range < bucket_max)
            .count();
        buckets.push(RangeBucket {
            label,
            min,
            max: bucket_max,
            count,
        });
    }
    // Unreachable for max_range >= 0; kept so a bad caller still gets one
    // bucket holding everything instead of an empty histogram.
    if buckets.is_empty() {
        buckets.push(RangeBucket {
            label: "0".to_string(),
            min: 0,
            max: RANGE_BUCKET_SIZE,
            count: records.len(),
        });
    }
    buckets
}
