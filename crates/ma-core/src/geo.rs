//! Geographic coordinate type and WGS-84 geodesic distance.
//!
//! `GeoPoint` stores double-precision degrees in (longitude, latitude) order,
//! the axis order of GeoJSON positions.  Distances are solved on the WGS-84
//! ellipsoid with Vincenty's inverse formula; the sphere is only used as a
//! fallback when the iteration fails to converge.

use std::cmp::Ordering;

use crate::GeodesicError;

/// WGS-84 semi-major axis, metres.
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS-84 semi-minor axis, metres.
pub const WGS84_B: f64 = (1.0 - WGS84_F) * WGS84_A;
/// IUGG mean radius R₁ = (2a + b) / 3, used by the great-circle fallback.
pub const MEAN_RADIUS_M: f64 = (2.0 * WGS84_A + WGS84_B) / 3.0;

/// Iteration cap for the λ fixed point.
pub const MAX_ITERATIONS: u32 = 10;
/// Convergence threshold on successive λ values, radians.
const LAMBDA_EPSILON: f64 = 1e-8;

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

/// One continuous transport segment as an ordered polyline.
///
/// Line strings with fewer than two points are tolerated by every consumer
/// and contribute nothing.
pub type LineString = Vec<GeoPoint>;

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Ellipsoidal distance in metres via Vincenty's inverse formula.
    ///
    /// Identical points return exactly `0.0`.  The result is bit-for-bit
    /// symmetric: both argument orders solve the same canonical problem.
    ///
    /// # Errors
    ///
    /// [`GeodesicError::NonConvergent`] when λ has not settled after
    /// [`MAX_ITERATIONS`] (nearly antipodal points), and
    /// [`GeodesicError::NonFinite`] for NaN or infinite input.
    pub fn vincenty_m(self, other: GeoPoint) -> Result<f64, GeodesicError> {
        if !self.is_finite() || !other.is_finite() {
            return Err(GeodesicError::NonFinite { from: self, to: other });
        }

        let (p, q) = canonical_order(self, other);
        if p == q {
            return Ok(0.0);
        }

        let u1 = ((1.0 - WGS84_F) * p.lat.to_radians().tan()).atan();
        let u2 = ((1.0 - WGS84_F) * q.lat.to_radians().tan()).atan();
        let (sin_u1, cos_u1) = u1.sin_cos();
        let (sin_u2, cos_u2) = u2.sin_cos();

        let l = (q.lon - p.lon).to_radians();
        let mut lambda = l;

        for _ in 0..MAX_ITERATIONS {
            let (sin_lambda, cos_lambda) = lambda.sin_cos();

            let cross = cos_u2 * sin_lambda;
            let along = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
            let sin_sigma = (cross * cross + along * along).sqrt();
            let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;

            if sin_sigma == 0.0 {
                // Coincident after reduction (e.g. the same pole at two
                // longitudes), or exactly antipodal.
                if cos_sigma > 0.0 {
                    return Ok(0.0);
                }
                break;
            }

            let sigma = sin_sigma.atan2(cos_sigma);
            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            let cos2_alpha = 1.0 - sin_alpha * sin_alpha;
            // Equatorial line: cos²α = 0 and the midpoint term vanishes.
            let cos_2sigma_m = if cos2_alpha != 0.0 {
                cos_sigma - 2.0 * sin_u1 * sin_u2 / cos2_alpha
            } else {
                0.0
            };

            let c = WGS84_F / 16.0 * cos2_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos2_alpha));
            let previous = lambda;
            lambda = l
                + (1.0 - c)
                    * WGS84_F
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

            if (lambda - previous).abs() < LAMBDA_EPSILON {
                let s = ellipsoid_arc(sigma, sin_sigma, cos_sigma, cos2_alpha, cos_2sigma_m);
                if s.is_finite() {
                    return Ok(s);
                }
                break;
            }
        }

        Err(GeodesicError::NonConvergent {
            from:       self,
            to:         other,
            iterations: MAX_ITERATIONS,
        })
    }

    /// Haversine distance on the mean-radius sphere, metres.
    ///
    /// Within ±0.5 % of the ellipsoidal value; only used where Vincenty
    /// cannot answer.
    pub fn great_circle_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        MEAN_RADIUS_M * c
    }

    /// Geodesic distance in metres that never fails on finite input.
    ///
    /// Uses [`vincenty_m`](Self::vincenty_m) and falls back to
    /// [`great_circle_m`](Self::great_circle_m) when the iteration does not
    /// converge.  Callers that need to know about the fallback should call
    /// `vincenty_m` directly.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        match self.vincenty_m(other) {
            Ok(d) => d,
            Err(e) => {
                log::debug!("{e}; using great-circle distance");
                self.great_circle_m(other)
            }
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lon, self.lat)
    }
}

/// Order the pair by (lat, lon) so `d(p, q)` and `d(q, p)` run the same
/// floating-point operations.
#[inline]
fn canonical_order(a: GeoPoint, b: GeoPoint) -> (GeoPoint, GeoPoint) {
    let swap = match b.lat.total_cmp(&a.lat) {
        Ordering::Less    => true,
        Ordering::Equal   => b.lon.total_cmp(&a.lon) == Ordering::Less,
        Ordering::Greater => false,
    };
    if swap { (b, a) } else { (a, b) }
}

/// Final step of the inverse solution: b·A·(σ − Δσ).
fn ellipsoid_arc(sigma: f64, sin_sigma: f64, cos_sigma: f64, cos2_alpha: f64, cos_2sigma_m: f64) -> f64 {
    let u_sq = cos2_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
    let a = 1.0 + u_sq / 16_384.0 * (4_096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let b = u_sq / 1_024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let cos2 = cos_2sigma_m * cos_2sigma_m;
    let delta_sigma = b
        * sin_sigma
        * (cos_2sigma_m
            + b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos2)
                    - b / 6.0 * cos_2sigma_m * (-3.0 + 4.0 * sin_sigma * sin_sigma) * (-3.0 + 4.0 * cos2)));

    WGS84_B * a * (sigma - delta_sigma)
}
