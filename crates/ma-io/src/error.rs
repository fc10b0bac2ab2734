//! Error types for ma-io.

use thiserror::Error;

use ma_core::CityId;

/// Errors raised while decoding inputs or writing results.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("{0} is not in the city list")]
    UnknownCity(CityId),
}

/// Alias for `Result<T, DataError>`.
pub type DataResult<T> = Result<T, DataError>;
