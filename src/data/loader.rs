use std::path::Path;
use std::sync::mpsc;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use thiserror::Error;

use super::model::EvRecord;

/// Washington State open-data portal export of the EV population dataset.
pub const DATASET_URL: &str =
    "https://data.wa.gov/api/views/f6w7-q2d2/rows.csv?accessType=DOWNLOAD";

/// Fixed column count of the source CSV; shorter rows are dropped.
const EXPECTED_COLUMNS: usize = 17;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Failures fetching the dataset over HTTP. These are the only errors shown
/// to the user; malformed rows merely degrade the parse (see `parse_csv`).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Download the dataset CSV and parse it.
pub fn fetch_records(url: &str) -> Result<Vec<EvRecord>> {
    let response = reqwest::blocking::get(url).map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        }
        .into());
    }
    let text = response.text().map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })?;
    parse_csv(&text)
}

/// Load the dataset from a local file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – the portal export (positional columns, header row discarded)
/// * `.json` – records-oriented array of objects keyed by field name
pub fn load_file(path: &Path) -> Result<Vec<EvRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let text = std::fs::read_to_string(path).context("reading CSV file")?;
            parse_csv(&text)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse the portal CSV into records.
///
/// The header line is discarded positionally, never mapped by name. Rows
/// with fewer than 17 columns or an empty VIN are silently skipped; rows the
/// csv crate cannot tokenize are logged as warnings and skipped. Numeric
/// cells that fail to parse default to 0, so a partially damaged file still
/// loads with whatever rows survive.
pub fn parse_csv(text: &str) -> Result<Vec<EvRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        if row_no == 0 {
            continue; // header
        }
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                log::warn!("CSV row {row_no}: {e}");
                continue;
            }
        };
        if row.len() < EXPECTED_COLUMNS || str_cell(row.get(0)).is_empty() {
            continue;
        }
        records.push(row_to_record(&row));
    }
    Ok(records)
}

fn row_to_record(row: &csv::StringRecord) -> EvRecord {
    EvRecord {
        vin: str_cell(row.get(0)),
        county: str_cell(row.get(1)),
        city: str_cell(row.get(2)),
        state: str_cell(row.get(3)),
        postal_code: str_cell(row.get(4)),
        model_year: num_cell(row.get(5)),
        make: str_cell(row.get(6)),
        model: str_cell(row.get(7)),
        electric_vehicle_type: str_cell(row.get(8)),
        cafv_eligibility: str_cell(row.get(9)),
        electric_range: num_cell(row.get(10)),
        base_msrp: num_cell(row.get(11)),
        legislative_district: str_cell(row.get(12)),
        dol_vehicle_id: str_cell(row.get(13)),
        vehicle_location: str_cell(row.get(14)),
        electric_utility: str_cell(row.get(15)),
        census_tract: str_cell(row.get(16)),
    }
}

fn str_cell(cell: Option<&str>) -> String {
    cell.unwrap_or("").trim().to_string()
}

fn num_cell(cell: Option<&str>) -> i32 {
    match cell.unwrap_or("").trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n as i32,
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// JSON parsing
// ---------------------------------------------------------------------------

/// Mirror of [`EvRecord`] for the records-oriented JSON export. Every field
/// is optional; absent or null values fall back to the same defaults as the
/// CSV path.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonRecord {
    vin: String,
    county: String,
    city: String,
    state: String,
    postal_code: String,
    model_year: i32,
    make: String,
    model: String,
    electric_vehicle_type: String,
    cafv_eligibility: String,
    electric_range: i32,
    base_msrp: i32,
    legislative_district: String,
    dol_vehicle_id: String,
    vehicle_location: String,
    electric_utility: String,
    census_tract: String,
}

impl From<JsonRecord> for EvRecord {
    fn from(r: JsonRecord) -> Self {
        EvRecord {
            vin: r.vin,
            county: r.county,
            city: r.city,
            state: r.state,
            postal_code: r.postal_code,
            model_year: r.model_year,
            make: r.make,
            model: r.model,
            electric_vehicle_type: r.electric_vehicle_type,
            cafv_eligibility: r.cafv_eligibility,
            electric_range: r.electric_range,
            base_msrp: r.base_msrp,
            legislative_district: r.legislative_district,
            dol_vehicle_id: r.dol_vehicle_id,
            vehicle_location: r.vehicle_location,
            electric_utility: r.electric_utility,
            census_tract: r.census_tract,
        }
    }
}

fn parse_json(text: &str) -> Result<Vec<EvRecord>> {
    let raw: Vec<JsonRecord> = serde_json::from_str(text).context("parsing JSON")?;
    Ok(raw
        .into_iter()
        .map(EvRecord::from)
        .filter(|r| !r.vin.is_empty())
        .collect())
}

// ---------------------------------------------------------------------------
// Background loading
// ---------------------------------------------------------------------------

/// What to load and from where.
#[derive(Debug, Clone)]
pub enum LoadRequest {
    Url(String),
    File(std::path::PathBuf),
}

/// Run a load on a worker thread, delivering the outcome over a channel.
///
/// At most one load is outstanding at a time: the caller keeps only the
/// newest receiver, so a superseded or torn-down load finds its channel
/// closed and its result is dropped without touching any visible state.
pub fn spawn_load(request: LoadRequest) -> mpsc::Receiver<Result<Vec<EvRecord>, String>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let outcome = match &request {
            LoadRequest::Url(url) => fetch_records(url),
            LoadRequest::File(path) => load_file(path),
        };
        let _ = tx.send(outcome.map_err(|e| format!("{e:#}")));
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::summary::compute_summary;

    const HEADER: &str = "VIN (1-10),County,City,State,Postal Code,Model Year,Make,Model,Electric Vehicle Type,Clean Alternative Fuel Vehicle (CAFV) Eligibility,Electric Range,Base MSRP,Legislative District,DOL Vehicle ID,Vehicle Location,Electric Utility,2020 Census Tract";

    fn csv_with_rows(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn header_row_is_discarded_positionally() {
        let text = csv_with_rows(&[
            "1C4JJXP6,King,Seattle,WA,98101,2022,JEEP,WRANGLER,Plug-in Hybrid Electric Vehicle (PHEV),Not eligible due to low battery range,21,0,36,228053657,POINT (-122.3 47.6),CITY OF SEATTLE,53033008000",
        ]);
        let records = parse_csv(&text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].make, "JEEP");
    }

    #[test]
    fn fields_map_by_column_index() {
        let text = csv_with_rows(&[
            "5YJ3E1EA,King,Seattle,WA,98101,2022,TESLA,MODEL 3,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible,250,0,43,123456789,POINT (-122.3 47.6),CITY OF SEATTLE,53033008000",
        ]);
        let r = &parse_csv(&text).unwrap()[0];
        assert_eq!(r.vin, "5YJ3E1EA");
        assert_eq!(r.county, "King");
        assert_eq!(r.city, "Seattle");
        assert_eq!(r.state, "WA");
        assert_eq!(r.postal_code, "98101");
        assert_eq!(r.model_year, 2022);
        assert_eq!(r.make, "TESLA");
        assert_eq!(r.model, "MODEL 3");
        assert_eq!(r.electric_range, 250);
        assert_eq!(r.base_msrp, 0);
        assert_eq!(r.dol_vehicle_id, "123456789");
        assert_eq!(r.census_tract, "53033008000");
    }

    #[test]
    fn short_rows_and_empty_vin_are_skipped() {
        let text = csv_with_rows(&[
            "5YJ3E1EA,King,Seattle,WA,98101,2022,TESLA,MODEL 3,Battery Electric Vehicle (BEV),Eligible,250,0,43,1,loc,util,tract",
            "TOOSHORT,King,Seattle",
            ",King,Seattle,WA,98101,2022,TESLA,MODEL 3,Battery Electric Vehicle (BEV),Eligible,250,0,43,2,loc,util,tract",
        ]);
        let records = parse_csv(&text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].vin, "5YJ3E1EA");
    }

    #[test]
    fn unparseable_numbers_default_to_zero() {
        let text = csv_with_rows(&[
            "5YJ3E1EA,King,Seattle,WA,98101,n/a,TESLA,MODEL 3,Battery Electric Vehicle (BEV),Eligible,,unknown,43,1,loc,util,tract",
        ]);
        let r = &parse_csv(&text).unwrap()[0];
        assert_eq!(r.model_year, 0);
        assert_eq!(r.electric_range, 0);
        assert_eq!(r.base_msrp, 0);
    }

    #[test]
    fn empty_input_parses_to_no_records() {
        assert!(parse_csv("").unwrap().is_empty());
        assert!(parse_csv(HEADER).unwrap().is_empty());
    }

    #[test]
    fn two_row_end_to_end_summary() {
        let text = csv_with_rows(&[
            "1C4JJXP6,King,Seattle,WA,98101,2022,TESLA,MODEL 3,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible,250,0,36,1,loc,util,tract",
            "5UXTA6C0,King,Bellevue,WA,98004,2021,BMW,X5,Plug-in Hybrid Electric Vehicle (PHEV),Eligibility unknown as battery range has not been researched,0,0,41,2,loc,util,tract",
        ]);
        let records = parse_csv(&text).unwrap();
        let s = compute_summary(&records);
        assert_eq!(s.total, 2);
        assert_eq!(s.bev_count, 1);
        assert_eq!(s.phev_count, 1);
        assert_eq!(s.avg_electric_range, 250.0);
    }

    #[test]
    fn json_records_load_with_defaults_for_missing_fields() {
        let text = r#"[
            {"vin": "5YJ3E1EA", "county": "King", "state": "WA", "model_year": 2022,
             "make": "TESLA", "model": "MODEL 3",
             "electric_vehicle_type": "Battery Electric Vehicle (BEV)",
             "electric_range": 250},
            {"vin": "", "make": "GHOST"}
        ]"#;
        let records = parse_json(text).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.make, "TESLA");
        assert_eq!(r.electric_range, 250);
        assert_eq!(r.city, "");
        assert_eq!(r.base_msrp, 0);
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        assert!(load_file(Path::new("data.parquet")).is_err());
    }
}
