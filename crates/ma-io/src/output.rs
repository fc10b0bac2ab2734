//! CSV writers for matching and matrix results.
//!
//! - `write_cost_matrix`: wide table, header `origin,<city names…>`, one row
//!   per matched city, costs in metres with millimetre resolution, empty cell
//!   for an unreachable pair.
//! - `write_unmatched`: `name,size,longitude,latitude` for every city that
//!   found no node within the snap radius.

use std::io::Write;
use std::path::Path;

use csv::Writer;

use ma_core::{City, CityId};
use ma_network::CostMatrix;

use crate::{DataError, DataResult};

/// Write `matrix` as a wide CSV file at `path`.
pub fn write_cost_matrix(path: &Path, cities: &[City], matrix: &CostMatrix) -> DataResult<()> {
    let file = std::fs::File::create(path)?;
    write_cost_matrix_to(file, cities, matrix)?;
    log::info!("wrote {}×{} cost matrix to {}", matrix.len(), matrix.len(), path.display());
    Ok(())
}

/// Like [`write_cost_matrix`] but accepts any `Write` sink.
pub fn write_cost_matrix_to<W: Write>(sink: W, cities: &[City], matrix: &CostMatrix) -> DataResult<()> {
    let names = matrix
        .cities()
        .iter()
        .map(|&id| city_name(cities, id))
        .collect::<DataResult<Vec<&str>>>()?;

    let mut w = Writer::from_writer(sink);
    w.write_record(std::iter::once("origin").chain(names.iter().copied()))?;

    for (row, origin) in names.iter().enumerate() {
        let cells = matrix.row(row).iter().map(|&c| format_cost(c));
        w.write_record(std::iter::once(origin.to_string()).chain(cells))?;
    }
    w.flush()?;
    Ok(())
}

/// Write the unmatched cities to `path`.
pub fn write_unmatched(path: &Path, cities: &[City], unmatched: &[CityId]) -> DataResult<()> {
    let file = std::fs::File::create(path)?;
    write_unmatched_to(file, cities, unmatched)?;
    log::info!("wrote {} unmatched cities to {}", unmatched.len(), path.display());
    Ok(())
}

/// Like [`write_unmatched`] but accepts any `Write` sink.
pub fn write_unmatched_to<W: Write>(sink: W, cities: &[City], unmatched: &[CityId]) -> DataResult<()> {
    let mut w = Writer::from_writer(sink);
    w.write_record(["name", "size", "longitude", "latitude"])?;
    for &id in unmatched {
        let city = cities.get(id.index()).ok_or(DataError::UnknownCity(id))?;
        w.write_record(&[
            city.name.clone(),
            city.size.to_string(),
            city.location.lon.to_string(),
            city.location.lat.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn city_name(cities: &[City], id: CityId) -> DataResult<&str> {
    cities
        .get(id.index())
        .map(|c| c.name.as_str())
        .ok_or(DataError::UnknownCity(id))
}

fn format_cost(cost: f64) -> String {
    if cost.is_finite() { format!("{cost:.3}") } else { String::new() }
}
