//! GeoJSON line-string loader.
//!
//! Accepts a `FeatureCollection`, a single `Feature`, or a bare `Geometry`.
//! `LineString` geometries yield one line string; each part of a
//! `MultiLineString` yields one; `GeometryCollection`s are walked
//! recursively.  Every other geometry type, and features without geometry,
//! are ignored.
//!
//! Positions are read as `[lon, lat, …]`; ordinates past the second
//! (elevation, measure) are dropped.

use std::io::{BufReader, Read};
use std::path::Path;

use geojson::{GeoJson, Geometry, Value};

use ma_core::{GeoPoint, LineString};

use crate::{DataError, DataResult};

/// Load all line strings from a GeoJSON file.
pub fn load_line_strings(path: &Path) -> DataResult<Vec<LineString>> {
    let file = std::fs::File::open(path)?;
    let lines = read_line_strings(BufReader::new(file))?;
    log::info!("loaded {} line strings from {}", lines.len(), path.display());
    Ok(lines)
}

/// Like [`load_line_strings`] but accepts any `Read` source.
pub fn read_line_strings<R: Read>(reader: R) -> DataResult<Vec<LineString>> {
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    let geojson = GeoJson::from_json_value(json)?;

    let mut out = Vec::new();
    let mut ignored = 0usize;
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in fc.features {
                match feature.geometry {
                    Some(geometry) => collect_geometry(&geometry, &mut out, &mut ignored)?,
                    None => ignored += 1,
                }
            }
        }
        GeoJson::Feature(feature) => match feature.geometry {
            Some(geometry) => collect_geometry(&geometry, &mut out, &mut ignored)?,
            None => ignored += 1,
        },
        GeoJson::Geometry(geometry) => collect_geometry(&geometry, &mut out, &mut ignored)?,
    }

    if ignored > 0 {
        log::debug!("ignored {ignored} non-line geometries");
    }
    Ok(out)
}

fn collect_geometry(geometry: &Geometry, out: &mut Vec<LineString>, ignored: &mut usize) -> DataResult<()> {
    match &geometry.value {
        Value::LineString(positions) => out.push(to_line_string(positions)?),
        Value::MultiLineString(parts) => {
            for positions in parts {
                out.push(to_line_string(positions)?);
            }
        }
        Value::GeometryCollection(members) => {
            for member in members {
                collect_geometry(member, out, ignored)?;
            }
        }
        _ => *ignored += 1,
    }
    Ok(())
}

fn to_line_string(positions: &[Vec<f64>]) -> DataResult<LineString> {
    positions
        .iter()
        .map(|pos| match pos.as_slice() {
            [lon, lat, ..] => Ok(GeoPoint::new(*lon, *lat)),
            _ => Err(DataError::Parse(format!(
                "position {pos:?} has fewer than two ordinates"
            ))),
        })
        .collect()
}
