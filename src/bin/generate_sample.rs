//! Writes a deterministic synthetic EV registration CSV so the dashboard can
//! be exercised without downloading the real dataset:
//! `cargo run --bin generate_sample`, then File → Open… `sample_data.csv`.

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `[lo, hi]`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.next_u64() % 100 < percent
    }
}

const BEV: &str = "Battery Electric Vehicle (BEV)";
const PHEV: &str = "Plug-in Hybrid Electric Vehicle (PHEV)";

/// (make, model, type, typical range span)
const LINEUP: &[(&str, &str, &str, (i64, i64))] = &[
    ("TESLA", "MODEL 3", BEV, (220, 330)),
    ("TESLA", "MODEL Y", BEV, (240, 330)),
    ("TESLA", "MODEL S", BEV, (250, 340)),
    ("NISSAN", "LEAF", BEV, (80, 220)),
    ("CHEVROLET", "BOLT EV", BEV, (230, 260)),
    ("CHEVROLET", "VOLT", PHEV, (35, 53)),
    ("BMW", "X5", PHEV, (14, 31)),
    ("BMW", "I3", BEV, (80, 155)),
    ("TOYOTA", "PRIUS PRIME", PHEV, (25, 44)),
    ("TOYOTA", "RAV4 PRIME", PHEV, (42, 42)),
    ("FORD", "MUSTANG MACH-E", BEV, (210, 300)),
    ("JEEP", "WRANGLER", PHEV, (21, 22)),
    ("KIA", "NIRO", BEV, (230, 250)),
    ("KIA", "EV6", BEV, (230, 310)),
];

/// (county, state, cities)
const PLACES: &[(&str, &str, &[&str])] = &[
    ("King", "WA", &["Seattle", "Bellevue", "Kirkland", "Renton"]),
    ("Snohomish", "WA", &["Everett", "Lynnwood", "Bothell"]),
    ("Pierce", "WA", &["Tacoma", "Puyallup"]),
    ("Clark", "WA", &["Vancouver", "Camas"]),
    ("Thurston", "WA", &["Olympia", "Lacey"]),
    ("Spokane", "WA", &["Spokane", "Spokane Valley"]),
    ("Multnomah", "OR", &["Portland"]),
    ("Washington", "OR", &["Beaverton", "Hillsboro"]),
];

const UTILITIES: &[&str] = &[
    "PUGET SOUND ENERGY INC",
    "CITY OF SEATTLE - (WA)",
    "PACIFICORP",
    "BONNEVILLE POWER ADMINISTRATION",
];

const ELIGIBLE: &str = "Clean Alternative Fuel Vehicle Eligible";
const NOT_ELIGIBLE: &str = "Not eligible due to low battery range";
const UNKNOWN: &str = "Eligibility unknown as battery range has not been researched";

const VIN_CHARS: &[u8] = b"0123456789ABCDEFGHJKLMNPRSTUVWXYZ";

fn vin(rng: &mut SimpleRng) -> String {
    (0..10)
        .map(|_| VIN_CHARS[(rng.next_u64() % VIN_CHARS.len() as u64) as usize] as char)
        .collect()
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    writer
        .write_record([
            "VIN (1-10)",
            "County",
            "City",
            "State",
            "Postal Code",
            "Model Year",
            "Make",
            "Model",
            "Electric Vehicle Type",
            "Clean Alternative Fuel Vehicle (CAFV) Eligibility",
            "Electric Range",
            "Base MSRP",
            "Legislative District",
            "DOL Vehicle ID",
            "Vehicle Location",
            "Electric Utility",
            "2020 Census Tract",
        ])
        .expect("Failed to write header");

    let n_rows = 800;
    for _ in 0..n_rows {
        let &(make, model, ev_type, (range_lo, range_hi)) = rng.pick(LINEUP);
        let &(county, state, cities) = rng.pick(PLACES);
        let &city = rng.pick(cities);

        let year = rng.range(2013, 2025);

        // Newer registrations often carry no researched range yet.
        let range = if year >= 2022 && rng.chance(40) {
            0
        } else {
            rng.range(range_lo, range_hi)
        };

        let cafv = if range == 0 {
            UNKNOWN
        } else if range >= 30 {
            ELIGIBLE
        } else {
            NOT_ELIGIBLE
        };

        // MSRP is unreported for most rows in the real dataset.
        let msrp = if rng.chance(10) {
            rng.range(31, 110) * 1000
        } else {
            0
        };

        let lon = -123.0 + rng.range(0, 2000) as f64 / 1000.0;
        let lat = 45.5 + rng.range(0, 2500) as f64 / 1000.0;

        writer
            .write_record([
                vin(&mut rng),
                county.to_string(),
                city.to_string(),
                state.to_string(),
                rng.range(97000, 99499).to_string(),
                year.to_string(),
                make.to_string(),
                model.to_string(),
                ev_type.to_string(),
                cafv.to_string(),
                range.to_string(),
                msrp.to_string(),
                rng.range(1, 49).to_string(),
                rng.range(100_000_000, 999_999_999).to_string(),
                format!("POINT ({lon:.5} {lat:.5})"),
                rng.pick(UTILITIES).to_string(),
                format!("530{}", rng.range(10_000_000, 99_999_999)),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {n_rows} vehicle registrations to {output_path}");
}
