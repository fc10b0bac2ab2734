//! City records to be snapped onto the network.

use crate::GeoPoint;

/// A named market location.
///
/// `size` is whatever integer weight the city table carries (population,
/// GDP bucket, …); the network engine passes it through untouched.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    pub name:     String,
    pub size:     i64,
    pub location: GeoPoint,
}

impl City {
    pub fn new(name: impl Into<String>, size: i64, location: GeoPoint) -> Self {
        Self { name: name.into(), size, location }
    }
}
