//! # Geonear Core
//!
//! Core types and coordinate conversion for the geonear library.
//!
//! This crate provides:
//! - `CoordInput`: the accepted coordinate input shapes and normalization
//! - `PointSet`: ordered point sets in Cartesian or geodetic coordinates
//! - Conversion between geodetic and Cartesian representations under a
//!   spherical or WGS84 ellipsoidal Earth model
//! - The shared error type

pub mod convert;
pub mod coords;
pub mod error;
pub mod points;

pub use convert::{ConvertOptions, EarthModel, EARTH_RADIUS_M};
pub use coords::{coord_array, value_array, CoordInput};
pub use error::{Error, Result};
pub use points::{GeodeticCoords, PointSet};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::convert::{ConvertOptions, EarthModel, EARTH_RADIUS_M};
    pub use crate::coords::{coord_array, value_array, CoordInput};
    pub use crate::error::{Error, Result};
    pub use crate::points::{GeodeticCoords, PointSet};
}
