use std::fmt;

// ---------------------------------------------------------------------------
// EvRecord – one registered vehicle (one CSV row)
// ---------------------------------------------------------------------------

/// A single electric-vehicle registration, mapped positionally from the
/// 17-column source CSV. Numeric fields are 0 when the source cell was
/// missing or not a number; string fields are empty, never null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvRecord {
    pub vin: String,
    pub county: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub model_year: i32,
    pub make: String,
    pub model: String,
    pub electric_vehicle_type: String,
    pub cafv_eligibility: String,
    /// Electric range in miles. 0 means "unknown / not reported".
    pub electric_range: i32,
    pub base_msrp: i32,
    pub legislative_district: String,
    pub dol_vehicle_id: String,
    pub vehicle_location: String,
    pub electric_utility: String,
    pub census_tract: String,
}

impl EvRecord {
    /// Classification of this record's free-text vehicle type.
    pub fn type_kind(&self) -> TypeKind {
        TypeKind::of(&self.electric_vehicle_type)
    }
}

// ---------------------------------------------------------------------------
// TypeKind – three-way classification of the vehicle type string
// ---------------------------------------------------------------------------

/// Derived classification of the raw `electric_vehicle_type` string.
/// Anything that is neither battery-electric nor plug-in hybrid (including
/// a blank string) is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Bev,
    Phev,
    Other,
}

impl TypeKind {
    pub fn of(type_str: &str) -> Self {
        if type_str.contains("Battery Electric") {
            TypeKind::Bev
        } else if type_str.contains("Plug-in Hybrid") {
            TypeKind::Phev
        } else {
            TypeKind::Other
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Bev => write!(f, "BEV"),
            TypeKind::Phev => write!(f, "PHEV"),
            TypeKind::Other => write!(f, "Other"),
        }
    }
}

/// Short label for table cells: classified kinds collapse to their acronym,
/// anything else is truncated to 15 characters.
pub fn type_short(type_str: &str) -> String {
    match TypeKind::of(type_str) {
        TypeKind::Bev => "BEV".to_string(),
        TypeKind::Phev => "PHEV".to_string(),
        TypeKind::Other => type_str.chars().take(15).collect(),
    }
}
