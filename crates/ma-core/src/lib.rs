//! `ma-core` — foundational types for the market access network engine.
//!
//! This crate is a dependency of every other `ma-*` crate.  It has no `ma-*`
//! dependencies and minimal external ones (`log` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`, `CityId`                          |
//! | [`geo`]         | `GeoPoint`, `LineString`, Vincenty geodesic distance  |
//! | [`city`]        | `City` record                                         |
//! | [`transport`]   | `TransportMode` enum                                  |
//! | [`config`]      | `NetworkConfig`                                       |
//! | [`error`]       | `CoreError`, `GeodesicError`, `CoreResult`            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod city;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod transport;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use city::City;
pub use config::NetworkConfig;
pub use error::{CoreError, CoreResult, GeodesicError};
pub use geo::{GeoPoint, LineString};
pub use ids::{CityId, EdgeId, NodeId};
pub use transport::TransportMode;
