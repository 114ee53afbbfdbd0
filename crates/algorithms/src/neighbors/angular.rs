//! Angular-metric nearest-neighbor index
//!
//! Indexes (lat, lon) pairs under great-circle distance without converting
//! the caller's data to Cartesian coordinates: each pair is embedded on the
//! unit sphere, where chord length orders points exactly as arc length does,
//! so the same R*-tree primitive serves as the angular index. Query
//! distances are reported in meters by converting chord to arc:
//!
//! ```text
//! theta  = 2 * asin(chord / 2)
//! meters = theta * EARTH_RADIUS_M
//! ```
//!
//! Depth never participates in this metric.

use geonear_core::{Error, Result, EARTH_RADIUS_M};
use ndarray::Array1;
use rstar::RTree;

use super::{IndexedPoint, Neighborhood};

/// Embed a (lat, lon) pair in degrees on the unit sphere.
fn unit_sphere(lat: f64, lon: f64) -> [f64; 3] {
    let (lat, lon) = (lat.to_radians(), lon.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Nearest-neighbor index over (lat, lon) pairs, great-circle metric.
///
/// An explicit handle like [`CartesianIndex`](super::CartesianIndex), built
/// from parallel latitude/longitude arrays in degrees.
#[derive(Debug, Clone)]
pub struct AngularIndex {
    tree: RTree<IndexedPoint>,
    base_len: usize,
}

impl AngularIndex {
    /// Build the index over parallel latitude/longitude arrays in degrees.
    ///
    /// Fails with [`Error::EmptyBase`] when the arrays are empty.
    pub fn build(lats: &Array1<f64>, lons: &Array1<f64>) -> Result<Self> {
        if lats.len() != lons.len() {
            return Err(Error::DimensionMismatch {
                what: "longitude array",
                expected: lats.len(),
                actual: lons.len(),
            });
        }
        if lats.is_empty() {
            return Err(Error::EmptyBase);
        }

        let points: Vec<IndexedPoint> = lats
            .iter()
            .zip(lons.iter())
            .enumerate()
            .map(|(idx, (&lat, &lon))| IndexedPoint {
                idx,
                pos: unit_sphere(lat, lon),
            })
            .collect();

        Ok(Self {
            tree: RTree::bulk_load(points),
            base_len: lats.len(),
        })
    }

    /// Number of base points the index was built over.
    pub fn base_len(&self) -> usize {
        self.base_len
    }

    /// Query the k nearest base points for each query (lat, lon) pair.
    ///
    /// Distances are great-circle meters on the mean-radius sphere,
    /// ascending per row. Slots beyond the base point count carry the
    /// sentinel pair. This path has no radius cutoff.
    pub fn query(
        &self,
        lats_q: &Array1<f64>,
        lons_q: &Array1<f64>,
        k: usize,
    ) -> Result<Neighborhood> {
        if lats_q.len() != lons_q.len() {
            return Err(Error::DimensionMismatch {
                what: "query longitude array",
                expected: lats_q.len(),
                actual: lons_q.len(),
            });
        }

        let mut result = Neighborhood::sentinel_filled(lats_q.len(), k, self.base_len);

        for row in 0..lats_q.len() {
            let target = unit_sphere(lats_q[row], lons_q[row]);

            for (slot, (point, d2)) in self
                .tree
                .nearest_neighbor_iter_with_distance_2(&target)
                .take(k)
                .enumerate()
            {
                // Chord between unit vectors; clamp shields asin from
                // rounding past 1.
                let half_chord = (d2.sqrt() / 2.0).clamp(0.0, 1.0);
                let theta = 2.0 * half_chord.asin();
                result.set(row, slot, theta * EARTH_RADIUS_M, point.idx);
            }
        }

        Ok(result)
    }
}
