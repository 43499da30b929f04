/// Data layer: core types, ingestion, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  HTTP GET / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → Vec<EvRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  conjunction of exact-match predicates
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary   │  compute_summary → counts, groupings, histogram
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
