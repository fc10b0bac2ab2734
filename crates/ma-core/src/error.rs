//! Core error types.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.  `GeodesicError` is a per-segment outcome and is
//! not wrapped.

use thiserror::Error;

use crate::GeoPoint;

/// Failure of the iterative inverse geodesic solution.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeodesicError {
    /// λ did not settle within the iteration cap; typical for nearly
    /// antipodal points.
    #[error("geodesic between {from} and {to} did not converge after {iterations} iterations")]
    NonConvergent {
        from:       GeoPoint,
        to:         GeoPoint,
        iterations: u32,
    },

    /// An input coordinate was NaN or infinite.
    #[error("non-finite coordinate in geodesic between {from} and {to}")]
    NonFinite { from: GeoPoint, to: GeoPoint },
}

/// The top-level error type for `ma-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ma-core`.
pub type CoreResult<T> = Result<T, CoreError>;
