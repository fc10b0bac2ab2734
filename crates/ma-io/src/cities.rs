//! City table loader.
//!
//! # CSV format
//!
//! One row per city, header required, columns in any order:
//!
//! ```csv
//! size,name,longitude,latitude
//! 8305000,Bangkok,100.5018,13.7563
//! 2300000,Kunming,102.8329,24.8801
//! ```
//!
//! Surrounding whitespace in every field is trimmed.  Row order defines the
//! `CityId`s used by matching and the cost matrix.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ma_core::{City, GeoPoint};

use crate::{DataError, DataResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CityRecord {
    size:      i64,
    name:      String,
    longitude: f64,
    latitude:  f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load cities from a CSV file.
pub fn load_cities(path: &Path) -> DataResult<Vec<City>> {
    let file = std::fs::File::open(path)?;
    let cities = read_cities(file)?;
    log::info!("loaded {} cities from {}", cities.len(), path.display());
    Ok(cities)
}

/// Like [`load_cities`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor` or byte slice).
pub fn read_cities<R: Read>(reader: R) -> DataResult<Vec<City>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut cities = Vec::new();
    for result in csv_reader.deserialize::<CityRecord>() {
        let row = result?;
        if !row.longitude.is_finite() || !row.latitude.is_finite() {
            return Err(DataError::Parse(format!(
                "city {:?} has a non-finite coordinate",
                row.name
            )));
        }
        cities.push(City::new(row.name, row.size, GeoPoint::new(row.longitude, row.latitude)));
    }
    Ok(cities)
}
