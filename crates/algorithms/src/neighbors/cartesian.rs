//! Cartesian-metric nearest-neighbor index

use geonear_core::{Error, Result};
use ndarray::Array2;
use rstar::RTree;

use super::{IndexedPoint, Neighborhood};

/// Nearest-neighbor index over Cartesian base points, Euclidean metric.
///
/// An explicit handle: built once over a base point set, queried many times,
/// never mutated. The base point count is recorded at build time and carried
/// into every [`Neighborhood`] the handle produces, so interpolation can
/// validate field-value lengths against the points actually indexed.
#[derive(Debug, Clone)]
pub struct CartesianIndex {
    tree: RTree<IndexedPoint>,
    base_len: usize,
}

impl CartesianIndex {
    /// Build the index over a stacked (N x 3) Cartesian array.
    ///
    /// Fails with [`Error::EmptyBase`] when the array has no rows.
    pub fn build(xyz: &Array2<f64>) -> Result<Self> {
        check_columns("base cartesian array columns", xyz)?;
        if xyz.nrows() == 0 {
            return Err(Error::EmptyBase);
        }

        let points: Vec<IndexedPoint> = xyz
            .rows()
            .into_iter()
            .enumerate()
            .map(|(idx, row)| IndexedPoint {
                idx,
                pos: [row[0], row[1], row[2]],
            })
            .collect();

        Ok(Self {
            tree: RTree::bulk_load(points),
            base_len: xyz.nrows(),
        })
    }

    /// Number of base points the index was built over.
    pub fn base_len(&self) -> usize {
        self.base_len
    }

    /// Query the k nearest base points for each row of `xyz_q`.
    ///
    /// Distances are Euclidean meters in ascending order per row; equal
    /// distances fall in the tree's traversal order, which is deterministic
    /// for a given build. Neighbors strictly farther than `max_distance` are
    /// excluded and their slots carry the sentinel pair, as do slots beyond
    /// the base point count when k exceeds it.
    pub fn query(
        &self,
        xyz_q: &Array2<f64>,
        k: usize,
        max_distance: Option<f64>,
    ) -> Result<Neighborhood> {
        check_columns("query cartesian array columns", xyz_q)?;

        let mut result = Neighborhood::sentinel_filled(xyz_q.nrows(), k, self.base_len);

        for (row, q) in xyz_q.rows().into_iter().enumerate() {
            let target = [q[0], q[1], q[2]];
            let mut slot = 0;

            for (point, d2) in self
                .tree
                .nearest_neighbor_iter_with_distance_2(&target)
                .take(k)
            {
                let distance = d2.sqrt();
                if let Some(maxd) = max_distance {
                    // Ascending iteration: past the cutoff, all later
                    // neighbors are too.
                    if distance > maxd {
                        break;
                    }
                }
                result.set(row, slot, distance, point.idx);
                slot += 1;
            }
        }

        Ok(result)
    }
}

fn check_columns(what: &'static str, xyz: &Array2<f64>) -> Result<()> {
    if xyz.ncols() != 3 {
        return Err(Error::DimensionMismatch {
            what,
            expected: 3,
            actual: xyz.ncols(),
        });
    }
    Ok(())
}
