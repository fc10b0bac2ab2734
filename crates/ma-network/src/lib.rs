//! `ma-network` — multimodal transport graph, city snapping, and cost matrices.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`node_index`] | `SpatialNodeIndex` (quantised coordinate → `NodeId`)       |
//! | [`network`]    | `TransportNetwork` (CSR + R-tree), `NetworkBuilder`        |
//! | [`matcher`]    | `CityNodeMatcher`, `CityMatches`                           |
//! | [`router`]     | `Router` trait, `Route`, `DijkstraRouter`                  |
//! | [`matrix`]     | `CostMatrixEngine`, `CostMatrix`, `UNREACHABLE`            |
//! | [`error`]      | `NetworkError`, `NetworkResult<T>`                         |
//!
//! # Pipeline
//!
//! ```text
//! line strings ──► NetworkBuilder ──► TransportNetwork
//! cities + network ──► CityNodeMatcher ──► CityMatches
//! network + matches ──► CostMatrixEngine ──► CostMatrix
//! ```
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Rayon for geodesic evaluation, snapping, and matrix rows.  |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `ma-core` types.      |

pub mod error;
pub mod matcher;
pub mod matrix;
pub mod network;
pub mod node_index;
pub mod router;

mod search;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use matcher::{CityMatches, CityNodeMatcher, MatchedCity};
pub use matrix::{CostMatrix, CostMatrixEngine, UNREACHABLE};
pub use network::{BuildStats, NetworkBuilder, TransportNetwork};
pub use node_index::SpatialNodeIndex;
pub use router::{DijkstraRouter, Route, Router};
