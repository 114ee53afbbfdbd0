//! Nearest-neighbor index adapters
//!
//! Two explicit index handles over the `rstar` R*-tree primitive:
//! - [`CartesianIndex`]: Euclidean metric over (x, y, z) base points
//! - [`AngularIndex`]: great-circle metric directly over (lat, lon) pairs
//!
//! Both are built once from a base point set and queried many times; each
//! query produces a [`Neighborhood`] grid of distances and base-point
//! indices. A handle never observes changes to the point set it was built
//! from, so replacing the base means building a new handle.

pub mod angular;
pub mod cartesian;

pub use angular::AngularIndex;
pub use cartesian::CartesianIndex;

use ndarray::Array2;
use rstar::{PointDistance, RTreeObject, AABB};

/// A base point with its insertion index, as stored in the trees.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexedPoint {
    pub idx: usize,
    pub pos: [f64; 3],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.pos)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.pos[0] - point[0];
        let dy = self.pos[1] - point[1];
        let dz = self.pos[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Per-query neighbor distances and base-point indices.
///
/// Always shaped (query count x k), for every k including 1. Distances are
/// meters, ascending within each row. Slots without a valid neighbor (radius
/// cutoff, or k exceeding the base point count) carry the sentinel pair:
/// infinite distance and an index one past the last base point. Sentinels
/// always trail the valid slots of a row.
#[derive(Debug, Clone)]
pub struct Neighborhood {
    distances: Array2<f64>,
    indices: Array2<usize>,
    base_len: usize,
}

impl Neighborhood {
    /// Create a (query_len x k) grid with every slot set to the sentinel
    /// pair.
    pub(crate) fn sentinel_filled(query_len: usize, k: usize, base_len: usize) -> Self {
        Self {
            distances: Array2::from_elem((query_len, k), f64::INFINITY),
            indices: Array2::from_elem((query_len, k), base_len),
            base_len,
        }
    }

    pub(crate) fn set(&mut self, row: usize, slot: usize, distance: f64, index: usize) {
        self.distances[[row, slot]] = distance;
        self.indices[[row, slot]] = index;
    }

    /// Number of query points.
    pub fn query_len(&self) -> usize {
        self.distances.nrows()
    }

    /// Requested neighbor count per query point.
    pub fn k(&self) -> usize {
        self.distances.ncols()
    }

    /// Base point count recorded when the index was built.
    pub fn base_len(&self) -> usize {
        self.base_len
    }

    /// Distances in meters, ascending per row; sentinel slots are infinite.
    pub fn distances(&self) -> &Array2<f64> {
        &self.distances
    }

    /// Base-point indices; sentinel slots hold `base_len()`.
    pub fn indices(&self) -> &Array2<usize> {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_filled_shape() {
        let hood = Neighborhood::sentinel_filled(3, 4, 10);
        assert_eq!(hood.query_len(), 3);
        assert_eq!(hood.k(), 4);
        assert_eq!(hood.base_len(), 10);

        for row in 0..3 {
            for slot in 0..4 {
                assert!(hood.distances()[[row, slot]].is_infinite());
                assert_eq!(hood.indices()[[row, slot]], 10);
            }
        }
    }

    #[test]
    fn test_set_slot() {
        let mut hood = Neighborhood::sentinel_filled(1, 2, 5);
        hood.set(0, 0, 1.5, 3);
        assert_eq!(hood.distances()[[0, 0]], 1.5);
        assert_eq!(hood.indices()[[0, 0]], 3);
        // Untouched slot keeps the sentinel pair
        assert!(hood.distances()[[0, 1]].is_infinite());
        assert_eq!(hood.indices()[[0, 1]], 5);
    }
}
