//! Snapping cities onto network nodes.
//!
//! A city is matched to the node with the smallest geodesic distance, provided
//! that distance does not exceed the snap radius.  Cities with no node in
//! range are reported as unmatched and take no part in the cost matrix.
//!
//! # Search
//!
//! The R-tree is queried with a `[lon, lat]` box that conservatively covers
//! the snap radius (at least 110 km per degree of latitude and
//! `110 km · cos φ` per degree of longitude at the box's most poleward
//! latitude).  Boxes that cross the antimeridian are split in two; boxes that
//! reach a pole cover every longitude.  Candidates are then ranked by
//! [`GeoPoint::distance_m`].

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use ma_core::{City, CityId, CoreError, GeoPoint, NetworkConfig, NodeId};

use crate::NetworkResult;
use crate::network::TransportNetwork;

/// Lower bound on metres per degree, used to size the search box.
const MIN_M_PER_DEG: f64 = 110_000.0;

/// Distances closer than this are ties; the lower `NodeId` wins.
const TIE_TOLERANCE_M: f64 = 1e-6;

/// A city snapped to a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchedCity {
    pub city:            CityId,
    pub node:            NodeId,
    /// Geodesic distance from the city to the node, metres.
    pub snap_distance_m: f64,
}

/// Outcome of [`CityNodeMatcher::match_cities`].  Both lists are in
/// ascending `CityId` order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CityMatches {
    pub matched:   Vec<MatchedCity>,
    pub unmatched: Vec<CityId>,
}

impl CityMatches {
    /// The node `city` was snapped to, if it was matched.
    pub fn node_of(&self, city: CityId) -> Option<NodeId> {
        self.matched
            .binary_search_by_key(&city, |m| m.city)
            .ok()
            .map(|i| self.matched[i].node)
    }

    pub fn is_matched(&self, city: CityId) -> bool {
        self.node_of(city).is_some()
    }

    /// Total number of cities considered.
    pub fn city_count(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }
}

/// Nearest-node snapping within a maximum geodesic distance.
#[derive(Clone, Copy, Debug)]
pub struct CityNodeMatcher {
    snap_distance_m: f64,
}

impl CityNodeMatcher {
    /// # Errors
    ///
    /// [`CoreError::Config`] if `snap_distance_m` is negative or not finite.
    pub fn new(snap_distance_m: f64) -> NetworkResult<Self> {
        if !snap_distance_m.is_finite() || snap_distance_m < 0.0 {
            return Err(CoreError::Config(format!(
                "snap distance must be finite and non-negative, got {snap_distance_m}"
            ))
            .into());
        }
        Ok(Self { snap_distance_m })
    }

    pub fn from_config(config: &NetworkConfig) -> NetworkResult<Self> {
        config.validate()?;
        Self::new(config.snap_distance_m)
    }

    pub fn snap_distance_m(&self) -> f64 {
        self.snap_distance_m
    }

    /// Nearest node to `pos` within the snap radius, with its distance.
    pub fn nearest_node(&self, network: &TransportNetwork, pos: GeoPoint) -> Option<(NodeId, f64)> {
        if !pos.is_finite() {
            return None;
        }

        let mut best: Option<(NodeId, f64)> = None;
        for (min, max) in search_boxes(pos, self.snap_distance_m) {
            for node in network.nodes_in_bbox(min, max) {
                let d = pos.distance_m(network.node_pos[node.index()]);
                if d > self.snap_distance_m {
                    continue;
                }
                best = match best {
                    None => Some((node, d)),
                    Some((b_node, b_d)) => {
                        let closer = d < b_d - TIE_TOLERANCE_M;
                        let tie_wins = (d - b_d).abs() <= TIE_TOLERANCE_M && node < b_node;
                        if closer || tie_wins { Some((node, d)) } else { Some((b_node, b_d)) }
                    }
                };
            }
        }
        best
    }

    /// Snap every city.  `CityId(i)` refers to `cities[i]`.
    ///
    /// With the `parallel` feature each city is searched on the Rayon pool.
    pub fn match_cities(&self, network: &TransportNetwork, cities: &[City]) -> CityMatches {
        #[cfg(feature = "parallel")]
        let nearest: Vec<Option<(NodeId, f64)>> = cities
            .par_iter()
            .map(|c| self.nearest_node(network, c.location))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let nearest: Vec<Option<(NodeId, f64)>> = cities
            .iter()
            .map(|c| self.nearest_node(network, c.location))
            .collect();

        let mut out = CityMatches::default();
        for (i, found) in nearest.into_iter().enumerate() {
            let city = CityId(i as u32);
            match found {
                Some((node, snap_distance_m)) => {
                    out.matched.push(MatchedCity { city, node, snap_distance_m });
                }
                None => {
                    log::debug!(
                        "city {:?} at {} has no node within {} m",
                        cities[i].name,
                        cities[i].location,
                        self.snap_distance_m
                    );
                    out.unmatched.push(city);
                }
            }
        }

        log::info!(
            "matched {} of {} cities to network nodes ({} unmatched, snap radius {} m)",
            out.matched.len(),
            cities.len(),
            out.unmatched.len(),
            self.snap_distance_m,
        );
        out
    }
}

/// `[lon, lat]` boxes (as min/max corners) covering every point within
/// `radius_m` of `pos`.
pub(crate) fn search_boxes(pos: GeoPoint, radius_m: f64) -> Vec<(GeoPoint, GeoPoint)> {
    let lat_pad = radius_m / MIN_M_PER_DEG;
    let min_lat = (pos.lat - lat_pad).max(-90.0);
    let max_lat = (pos.lat + lat_pad).min(90.0);

    let poleward = min_lat.abs().max(max_lat.abs());
    let cos_lat = poleward.to_radians().cos();
    let lon_pad = if poleward >= 90.0 || cos_lat <= 0.0 {
        f64::INFINITY
    } else {
        radius_m / (MIN_M_PER_DEG * cos_lat)
    };

    if lon_pad >= 180.0 {
        return vec![(GeoPoint::new(-180.0, min_lat), GeoPoint::new(180.0, max_lat))];
    }

    let west = pos.lon - lon_pad;
    let east = pos.lon + lon_pad;
    let mut boxes = vec![(GeoPoint::new(west.max(-180.0), min_lat), GeoPoint::new(east.min(180.0), max_lat))];
    if west < -180.0 {
        boxes.push((GeoPoint::new(west + 360.0, min_lat), GeoPoint::new(180.0, max_lat)));
    }
    if east > 180.0 {
        boxes.push((GeoPoint::new(-180.0, min_lat), GeoPoint::new(east - 360.0, max_lat)));
    }
    boxes
}
