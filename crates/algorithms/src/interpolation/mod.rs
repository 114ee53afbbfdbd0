//! Distance-weighted interpolation
//!
//! Combines neighbor query results with stored field values:
//! - IDW: inverse-distance weighting over a fixed neighbor count

mod idw;

pub use idw::{idw, IdwParams};
