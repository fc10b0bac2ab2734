//! Deduplication of line-string vertices into a shared node space.
//!
//! Coordinates from different sources rarely agree to the last bit, so keys
//! are the coordinates scaled by `10^precision` and rounded to integers.
//! Two points that round to the same key are the same node; the first raw
//! point observed is kept as the node's position.
//!
//! Longitudes are not wrapped: `-180.0` and `180.0` are distinct keys.

use rustc_hash::FxHashMap;

use ma_core::{GeoPoint, NetworkConfig, NodeId};

/// Quantised coordinate → `NodeId` map with ids in first-observation order.
pub struct SpatialNodeIndex {
    scale:  f64,
    ids:    FxHashMap<(i64, i64), NodeId>,
    points: Vec<GeoPoint>,
}

impl SpatialNodeIndex {
    /// `precision` is the number of decimal digits kept; values above
    /// [`NetworkConfig::MAX_PRECISION`] are clamped.
    pub fn new(precision: u8) -> Self {
        let precision = precision.min(NetworkConfig::MAX_PRECISION);
        Self {
            scale:  10f64.powi(precision as i32),
            ids:    FxHashMap::default(),
            points: Vec::new(),
        }
    }

    /// Deduplication key of `point`; `None` for a non-finite coordinate.
    #[inline]
    pub fn key(&self, point: GeoPoint) -> Option<(i64, i64)> {
        point.is_finite().then(|| {
            (
                (point.lon * self.scale).round() as i64,
                (point.lat * self.scale).round() as i64,
            )
        })
    }

    /// Return the node for `point`, assigning the next id on first sight.
    ///
    /// `None` if `point` is not finite or the id space is exhausted.
    pub fn get_or_create(&mut self, point: GeoPoint) -> Option<NodeId> {
        let key = self.key(point)?;
        if let Some(&id) = self.ids.get(&key) {
            return Some(id);
        }
        let id = NodeId::try_from(self.points.len()).ok().filter(|id| *id != NodeId::INVALID)?;
        self.ids.insert(key, id);
        self.points.push(point);
        Some(id)
    }

    /// Look up `point` without inserting.
    pub fn get(&self, point: GeoPoint) -> Option<NodeId> {
        self.ids.get(&self.key(point)?).copied()
    }

    /// Position recorded for `id` (the first raw point that mapped to it).
    pub fn position(&self, id: NodeId) -> Option<GeoPoint> {
        self.points.get(id.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consume the index, returning node positions indexed by `NodeId`.
    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }
}

impl Default for SpatialNodeIndex {
    fn default() -> Self {
        Self::new(NetworkConfig::default().coord_precision)
    }
}
