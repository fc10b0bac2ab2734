//! `ma-io` — decoding of network inputs and encoding of results.
//!
//! The network engine itself performs no I/O; this crate is the boundary.
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`lines`]     | GeoJSON `LineString` / `MultiLineString` → `LineString`s |
//! | [`cities`]    | `size,name,longitude,latitude` CSV → `City`s             |
//! | [`output`]    | cost matrix and unmatched-city CSV writers               |
//! | [`error`]     | `DataError`, `DataResult<T>`                             |

pub mod cities;
pub mod error;
pub mod lines;
pub mod output;


pub use cities::{load_cities, read_cities};
pub use error::{DataError, DataResult};
pub use lines::{load_line_strings, read_line_strings};
pub use output::{write_cost_matrix, write_cost_matrix_to, write_unmatched, write_unmatched_to};
