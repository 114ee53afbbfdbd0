//! Field resampling facade
//!
//! [`FieldResampler`] holds a base point set, a query point set, field
//! values and at most one index handle of each kind, and orchestrates the
//! full workflow: convert coordinates, build the selected index if absent,
//! query neighbors, interpolate. Operations are idempotent and re-entrant;
//! calling [`interpolate`](FieldResampler::interpolate) again recomputes
//! from current state.
//!
//! Replacing the base point set drops both index handles, so a query never
//! runs against an index built from point sets that are no longer loaded.

use std::fmt;
use std::str::FromStr;

use geonear_core::{value_array, ConvertOptions, CoordInput, Error, PointSet, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::interpolation::{idw, IdwParams};
use crate::neighbors::{AngularIndex, CartesianIndex, Neighborhood};

/// Interpolation method, selecting which index the facade queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Cartesian index over (x, y, z), Euclidean metric
    #[default]
    KdTree,
    /// Angular index over (lat, lon), great-circle metric
    BallTree,
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "kdtree" => Ok(Method::KdTree),
            "balltree" => Ok(Method::BallTree),
            other => Err(Error::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::KdTree => write!(f, "kdtree"),
            Method::BallTree => write!(f, "balltree"),
        }
    }
}

/// Parameters for the combined query-and-interpolate workflow
#[derive(Debug, Clone)]
pub struct InterpolateParams {
    /// Neighbors per query point (default: 4)
    pub num_neighbors: usize,
    /// Index to query (default: kdtree)
    pub method: Method,
    /// Minimum distance clamp for IDW weights (default: 1e-10)
    pub epsilon: f64,
    /// Exclude neighbors farther than this many meters.
    /// Only the kdtree path supports a cutoff; the balltree path warns and
    /// ignores it.
    pub max_distance: Option<f64>,
}

impl Default for InterpolateParams {
    fn default() -> Self {
        Self {
            num_neighbors: 4,
            method: Method::default(),
            epsilon: 1e-10,
            max_distance: None,
        }
    }
}

/// Resamples a scalar field from a base point set onto a query point set.
///
/// Point sets and values are set once per role and may be overwritten by a
/// later call (last write wins). Indexes are built lazily on first query or
/// explicitly via [`build_index`](Self::build_index).
#[derive(Debug, Default)]
pub struct FieldResampler {
    options: ConvertOptions,
    base: Option<PointSet>,
    query: Option<PointSet>,
    values: Option<Array1<f64>>,
    cartesian: Option<CartesianIndex>,
    angular: Option<AngularIndex>,
}

impl FieldResampler {
    /// Resampler with default conversion options (WGS84 ellipsoid when the
    /// `ellipsoid` feature is enabled, spherical fallback otherwise).
    pub fn new() -> Self {
        Self::default()
    }

    /// Resampler converting under the given options.
    pub fn with_options(options: ConvertOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The conversion options in effect.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// The base point set, if loaded.
    pub fn base(&self) -> Option<&PointSet> {
        self.base.as_ref()
    }

    /// The query point set, if loaded.
    pub fn query(&self) -> Option<&PointSet> {
        self.query.as_ref()
    }

    /// The field values, if loaded.
    pub fn values(&self) -> Option<&Array1<f64>> {
        self.values.as_ref()
    }

    // ─── Loading ────────────────────────────────────────────────────────

    /// Load base points from geodetic arrays, converting to Cartesian now.
    pub fn set_base_geodetic(
        &mut self,
        lons: impl Into<CoordInput>,
        lats: impl Into<CoordInput>,
        depths: Option<CoordInput>,
    ) -> Result<()> {
        let set = PointSet::from_geodetic(lons, lats, depths, &self.options)?;
        self.replace_base(set);
        Ok(())
    }

    /// Load base points from geodetic arrays, deferring Cartesian
    /// conversion until a Cartesian-path query needs it.
    pub fn set_base_geodetic_deferred(
        &mut self,
        lons: impl Into<CoordInput>,
        lats: impl Into<CoordInput>,
        depths: Option<CoordInput>,
    ) -> Result<()> {
        let set = PointSet::from_geodetic_deferred(lons, lats, depths)?;
        self.replace_base(set);
        Ok(())
    }

    /// Load base points from three parallel Cartesian arrays.
    pub fn set_base_cartesian(
        &mut self,
        x: impl Into<CoordInput>,
        y: impl Into<CoordInput>,
        z: impl Into<CoordInput>,
    ) -> Result<()> {
        let set = PointSet::from_cartesian(x, y, z)?;
        self.replace_base(set);
        Ok(())
    }

    /// Load query points from geodetic arrays, converting to Cartesian now.
    pub fn set_query_geodetic(
        &mut self,
        lons: impl Into<CoordInput>,
        lats: impl Into<CoordInput>,
        depths: Option<CoordInput>,
    ) -> Result<()> {
        self.query = Some(PointSet::from_geodetic(lons, lats, depths, &self.options)?);
        Ok(())
    }

    /// Load query points from geodetic arrays without converting yet.
    pub fn set_query_geodetic_deferred(
        &mut self,
        lons: impl Into<CoordInput>,
        lats: impl Into<CoordInput>,
        depths: Option<CoordInput>,
    ) -> Result<()> {
        self.query = Some(PointSet::from_geodetic_deferred(lons, lats, depths)?);
        Ok(())
    }

    /// Load query points from three parallel Cartesian arrays.
    pub fn set_query_cartesian(
        &mut self,
        x: impl Into<CoordInput>,
        y: impl Into<CoordInput>,
        z: impl Into<CoordInput>,
    ) -> Result<()> {
        self.query = Some(PointSet::from_cartesian(x, y, z)?);
        Ok(())
    }

    /// Load one field value per base point.
    ///
    /// NaN values are accepted as no-data markers. Fails with
    /// [`Error::EmptyBase`] when no base is loaded and with
    /// [`Error::DimensionMismatch`] when the length differs from the base
    /// point count.
    pub fn set_values(&mut self, values: impl Into<CoordInput>) -> Result<()> {
        let base_len = match &self.base {
            Some(base) => base.len(),
            None => return Err(Error::EmptyBase),
        };

        let values = value_array(values)?;
        if values.len() != base_len {
            return Err(Error::DimensionMismatch {
                what: "field values",
                expected: base_len,
                actual: values.len(),
            });
        }

        self.values = Some(values);
        Ok(())
    }

    fn replace_base(&mut self, base: PointSet) {
        // A handle built from the old base must not serve the new one
        self.base = Some(base);
        self.cartesian = None;
        self.angular = None;
    }

    // ─── Indexes and queries ────────────────────────────────────────────

    /// Build the index selected by `method` from the current base points,
    /// replacing any existing handle of that kind.
    pub fn build_index(&mut self, method: Method) -> Result<()> {
        match method {
            Method::KdTree => {
                self.cartesian = None;
                self.ensure_cartesian_index()
            }
            Method::BallTree => {
                self.angular = None;
                self.ensure_angular_index()
            }
        }
    }

    fn ensure_cartesian_index(&mut self) -> Result<()> {
        if self.cartesian.is_some() {
            return Ok(());
        }
        let base = self.base.as_mut().ok_or(Error::EmptyBase)?;
        let xyz = base.ensure_cartesian(&self.options)?;
        tracing::debug!(points = xyz.nrows(), "building cartesian index");
        self.cartesian = Some(CartesianIndex::build(xyz)?);
        Ok(())
    }

    fn ensure_angular_index(&mut self) -> Result<()> {
        if self.angular.is_some() {
            return Ok(());
        }
        let base = self.base.as_ref().ok_or(Error::EmptyBase)?;
        let geo = base
            .geodetic()
            .ok_or(Error::MissingCoordinates("base latitude/longitude arrays"))?;
        tracing::debug!(points = geo.lats.len(), "building angular index");
        self.angular = Some(AngularIndex::build(&geo.lats, &geo.lons)?);
        Ok(())
    }

    /// Query the k nearest base points per query point on the Cartesian
    /// index, building it first if absent.
    pub fn query_neighbors(
        &mut self,
        num_neighbors: usize,
        max_distance: Option<f64>,
    ) -> Result<Neighborhood> {
        self.ensure_cartesian_index()?;

        let query = self
            .query
            .as_mut()
            .ok_or(Error::MissingCoordinates("query points"))?;
        let xyz_q = query.ensure_cartesian(&self.options)?;

        let index = self.cartesian.as_ref().ok_or(Error::EmptyBase)?;
        index.query(xyz_q, num_neighbors, max_distance)
    }

    /// Query the k nearest base points per query point on the angular
    /// index, building it first if absent.
    ///
    /// Both point sets must carry geodetic arrays; Cartesian-only sets fail
    /// with [`Error::MissingCoordinates`].
    pub fn query_neighbors_angular(&mut self, num_neighbors: usize) -> Result<Neighborhood> {
        self.ensure_angular_index()?;

        let query = self
            .query
            .as_ref()
            .ok_or(Error::MissingCoordinates("query points"))?;
        let geo = query
            .geodetic()
            .ok_or(Error::MissingCoordinates("query latitude/longitude arrays"))?;

        let index = self.angular.as_ref().ok_or(Error::EmptyBase)?;
        index.query(&geo.lats, &geo.lons, num_neighbors)
    }

    /// Resample the field onto the query points: query the selected index,
    /// then inverse-distance weight the neighbor values.
    ///
    /// Returns one value per query point, aligned with the query set; query
    /// points with no valid neighbor yield NaN.
    pub fn interpolate(&mut self, params: &InterpolateParams) -> Result<Array1<f64>> {
        if self.values.is_none() {
            return Err(Error::MissingValues);
        }

        let neighborhood = match params.method {
            Method::KdTree => self.query_neighbors(params.num_neighbors, params.max_distance)?,
            Method::BallTree => {
                if params.max_distance.is_some() {
                    tracing::warn!("max_distance is not supported by balltree, ignoring");
                }
                self.query_neighbors_angular(params.num_neighbors)?
            }
        };

        let values = self.values.as_ref().ok_or(Error::MissingValues)?;
        idw(
            &neighborhood,
            values,
            &IdwParams {
                epsilon: params.epsilon,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spherical_resampler() -> FieldResampler {
        FieldResampler::with_options(ConvertOptions::spherical())
    }

    fn two_point_base(r: &mut FieldResampler) {
        r.set_base_geodetic(vec![0.0, 0.0], vec![0.0, 10.0], None)
            .unwrap();
        r.set_values(vec![10.0, 20.0]).unwrap();
        r.set_query_geodetic(vec![0.0], vec![5.0], None).unwrap();
    }

    #[test]
    fn test_midpoint_interpolation() {
        let mut r = spherical_resampler();
        two_point_base(&mut r);

        let out = r
            .interpolate(&InterpolateParams {
                num_neighbors: 2,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(out.len(), 1);
        // Equidistant on the sphere: exact midpoint of the two values
        assert!((out[0] - 15.0).abs() < 1e-6, "got {}", out[0]);
    }

    #[test]
    fn test_balltree_midpoint_interpolation() {
        let mut r = spherical_resampler();
        two_point_base(&mut r);

        let out = r
            .interpolate(&InterpolateParams {
                num_neighbors: 2,
                method: Method::BallTree,
                ..Default::default()
            })
            .unwrap();

        assert!((out[0] - 15.0).abs() < 1e-6, "got {}", out[0]);
    }

    #[test]
    fn test_interpolate_without_values_fails() {
        let mut r = spherical_resampler();
        r.set_base_geodetic(vec![0.0], vec![0.0], None).unwrap();
        r.set_query_geodetic(vec![1.0], vec![1.0], None).unwrap();

        let err = r.interpolate(&InterpolateParams::default()).unwrap_err();
        assert!(matches!(err, Error::MissingValues));
    }

    #[test]
    fn test_set_values_without_base_fails() {
        let mut r = spherical_resampler();
        let err = r.set_values(vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::EmptyBase));
    }

    #[test]
    fn test_set_values_length_mismatch_fails() {
        let mut r = spherical_resampler();
        r.set_base_geodetic(vec![0.0, 1.0], vec![0.0, 1.0], None)
            .unwrap();
        let err = r.set_values(vec![1.0]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn test_replacing_base_drops_index_handles() {
        let mut r = spherical_resampler();
        two_point_base(&mut r);

        r.build_index(Method::KdTree).unwrap();
        r.build_index(Method::BallTree).unwrap();
        assert!(r.cartesian.is_some());
        assert!(r.angular.is_some());

        r.set_base_geodetic(vec![0.0, 0.0], vec![0.0, 20.0], None)
            .unwrap();
        assert!(r.cartesian.is_none());
        assert!(r.angular.is_none());
    }

    #[test]
    fn test_replaced_base_serves_next_interpolation() {
        let mut r = spherical_resampler();
        two_point_base(&mut r);

        let params = InterpolateParams {
            num_neighbors: 1,
            ..Default::default()
        };
        let before = r.interpolate(&params).unwrap();
        // Nearest of (0,0)/(0,10) to the query at lat 5 is ambiguous only
        // by ties; value is one of the two
        assert!(before[0] == 10.0 || before[0] == 20.0);

        // Move the first base point onto the query location
        r.set_base_geodetic(vec![0.0, 0.0], vec![5.0, 10.0], None)
            .unwrap();
        r.set_values(vec![77.0, 20.0]).unwrap();

        let after = r.interpolate(&params).unwrap();
        assert!((after[0] - 77.0).abs() < 1e-6, "got {}", after[0]);
    }

    #[test]
    fn test_deferred_base_converts_on_first_query() {
        let mut r = spherical_resampler();
        r.set_base_geodetic_deferred(vec![0.0, 0.0], vec![0.0, 10.0], None)
            .unwrap();
        r.set_values(vec![10.0, 20.0]).unwrap();
        r.set_query_geodetic_deferred(vec![0.0], vec![5.0], None)
            .unwrap();

        assert!(r.base().unwrap().cartesian().is_none());

        let out = r
            .interpolate(&InterpolateParams {
                num_neighbors: 2,
                ..Default::default()
            })
            .unwrap();
        assert!((out[0] - 15.0).abs() < 1e-6);

        assert!(r.base().unwrap().cartesian().is_some());
    }

    #[test]
    fn test_cartesian_roles() {
        let mut r = FieldResampler::new();
        r.set_base_cartesian(vec![0.0, 10.0], vec![0.0, 0.0], vec![0.0, 0.0])
            .unwrap();
        r.set_values(vec![1.0, 3.0]).unwrap();
        r.set_query_cartesian(vec![5.0], vec![0.0], vec![0.0])
            .unwrap();

        let out = r
            .interpolate(&InterpolateParams {
                num_neighbors: 2,
                ..Default::default()
            })
            .unwrap();
        assert!((out[0] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_angular_path_requires_geodetic_arrays() {
        let mut r = FieldResampler::new();
        r.set_base_cartesian(vec![0.0], vec![0.0], vec![0.0])
            .unwrap();
        r.set_query_cartesian(vec![1.0], vec![0.0], vec![0.0])
            .unwrap();

        let err = r.query_neighbors_angular(1).unwrap_err();
        assert!(matches!(err, Error::MissingCoordinates(_)));
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("kdtree".parse::<Method>().unwrap(), Method::KdTree);
        assert_eq!("balltree".parse::<Method>().unwrap(), Method::BallTree);
        assert_eq!(Method::KdTree.to_string(), "kdtree");
        assert_eq!(Method::BallTree.to_string(), "balltree");

        let err = "voronoi".parse::<Method>().unwrap_err();
        match err {
            Error::UnsupportedMethod(name) => assert_eq!(name, "voronoi"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
