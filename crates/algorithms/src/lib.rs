//! # Geonear Algorithms
//!
//! Nearest-neighbor search and field resampling for geonear.
//!
//! ## Available Categories
//!
//! - **neighbors**: Cartesian and angular nearest-neighbor index adapters
//! - **interpolation**: inverse-distance weighting
//! - **resample**: the combined base/query/values resampling workflow

pub mod interpolation;
pub mod neighbors;
pub mod resample;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::interpolation::{idw, IdwParams};
    pub use crate::neighbors::{AngularIndex, CartesianIndex, Neighborhood};
    pub use crate::resample::{FieldResampler, InterpolateParams, Method};
    pub use geonear_core::prelude::*;
}
