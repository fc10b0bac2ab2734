//! Engine configuration.

use crate::{CoreError, CoreResult};

/// Tunables shared by network construction and city matching.
///
/// The defaults suit national-scale road/rail/sea networks digitised at
/// metre precision.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    /// Decimal digits kept when coordinates are used as deduplication keys.
    /// 7 digits ≈ 1 cm at the equator.
    pub coord_precision: u8,

    /// Maximum geodesic distance (metres) between a city and the node it is
    /// snapped to.  Cities farther than this from every node are unmatched.
    pub snap_distance_m: f64,
}

impl NetworkConfig {
    /// Largest precision whose scaled coordinates still fit an `i64` key.
    pub const MAX_PRECISION: u8 = 15;

    pub fn validate(&self) -> CoreResult<()> {
        if self.coord_precision > Self::MAX_PRECISION {
            return Err(CoreError::Config(format!(
                "coord_precision {} exceeds maximum {}",
                self.coord_precision,
                Self::MAX_PRECISION
            )));
        }
        if !self.snap_distance_m.is_finite() || self.snap_distance_m < 0.0 {
            return Err(CoreError::Config(format!(
                "snap_distance_m must be finite and non-negative, got {}",
                self.snap_distance_m
            )));
        }
        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            coord_precision: 7,
            snap_distance_m: 5_000.0,
        }
    }
}
