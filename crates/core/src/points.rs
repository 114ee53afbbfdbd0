//! Point set container
//!
//! A [`PointSet`] is an ordered set of N points holding a Cartesian block,
//! geodetic coordinate arrays, or both. Geodetic sets may defer Cartesian
//! conversion until a consumer needs it ([`PointSet::ensure_cartesian`]),
//! keeping the original degree arrays available for angular-metric queries.

use ndarray::{Array1, Array2};

use crate::convert::{self, ConvertOptions};
use crate::coords::{check_len, coord_array, CoordInput};
use crate::error::{Error, Result};

/// Geodetic coordinate arrays of a point set, all of equal length.
#[derive(Debug, Clone)]
pub struct GeodeticCoords {
    /// Longitudes in degrees
    pub lons: Array1<f64>,
    /// Latitudes in degrees
    pub lats: Array1<f64>,
    /// Depths in meters below the reference surface, if given
    pub depths: Option<Array1<f64>>,
}

/// An ordered set of N points in one coordinate system.
///
/// All coordinate arrays in a set have equal length; the length is fixed at
/// construction. Replacing a set means constructing a new one.
#[derive(Debug, Clone)]
pub struct PointSet {
    xyz: Option<Array2<f64>>,
    geodetic: Option<GeodeticCoords>,
}

impl PointSet {
    /// Build a point set from three parallel Cartesian arrays.
    pub fn from_cartesian(
        x: impl Into<CoordInput>,
        y: impl Into<CoordInput>,
        z: impl Into<CoordInput>,
    ) -> Result<Self> {
        let x = coord_array(x)?;
        let y = coord_array(y)?;
        let z = coord_array(z)?;
        check_len("y array", x.len(), y.len())?;
        check_len("z array", x.len(), z.len())?;

        let mut xyz = Array2::zeros((x.len(), 3));
        for i in 0..x.len() {
            xyz[[i, 0]] = x[i];
            xyz[[i, 1]] = y[i];
            xyz[[i, 2]] = z[i];
        }

        Ok(Self {
            xyz: Some(xyz),
            geodetic: None,
        })
    }

    /// Build a point set from geodetic arrays, converting to Cartesian
    /// immediately under `options`.
    ///
    /// The geodetic arrays are retained alongside the Cartesian block so the
    /// set can still serve angular-metric queries.
    pub fn from_geodetic(
        lons: impl Into<CoordInput>,
        lats: impl Into<CoordInput>,
        depths: Option<CoordInput>,
        options: &ConvertOptions,
    ) -> Result<Self> {
        let mut set = Self::from_geodetic_deferred(lons, lats, depths)?;
        set.ensure_cartesian(options)?;
        Ok(set)
    }

    /// Build a point set from geodetic arrays without converting.
    ///
    /// Cartesian coordinates are produced lazily by
    /// [`ensure_cartesian`](Self::ensure_cartesian) when first needed.
    pub fn from_geodetic_deferred(
        lons: impl Into<CoordInput>,
        lats: impl Into<CoordInput>,
        depths: Option<CoordInput>,
    ) -> Result<Self> {
        let lons = coord_array(lons)?;
        let lats = coord_array(lats)?;
        check_len("latitude array", lons.len(), lats.len())?;

        let depths = match depths {
            Some(d) => {
                let d = coord_array(d)?;
                check_len("depth array", lons.len(), d.len())?;
                Some(d)
            }
            None => None,
        };

        Ok(Self {
            xyz: None,
            geodetic: Some(GeodeticCoords { lons, lats, depths }),
        })
    }

    /// Number of points in the set.
    pub fn len(&self) -> usize {
        if let Some(xyz) = &self.xyz {
            return xyz.nrows();
        }
        if let Some(geo) = &self.geodetic {
            return geo.lons.len();
        }
        0
    }

    /// Whether the set contains no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The Cartesian block, if already present.
    pub fn cartesian(&self) -> Option<&Array2<f64>> {
        self.xyz.as_ref()
    }

    /// The geodetic coordinate arrays, if this set was built from them.
    pub fn geodetic(&self) -> Option<&GeodeticCoords> {
        self.geodetic.as_ref()
    }

    /// Return the Cartesian block, converting from geodetic first if needed.
    ///
    /// The deferred conversion is observable at debug level.
    pub fn ensure_cartesian(&mut self, options: &ConvertOptions) -> Result<&Array2<f64>> {
        if self.xyz.is_none() {
            self.xyz = Some(self.convert_geodetic(options)?);
        }
        self.xyz
            .as_ref()
            .ok_or(Error::MissingCoordinates("point set has no coordinates"))
    }

    fn convert_geodetic(&self, options: &ConvertOptions) -> Result<Array2<f64>> {
        let geo = self
            .geodetic
            .as_ref()
            .ok_or(Error::MissingCoordinates("point set has no coordinates"))?;

        tracing::debug!(
            points = geo.lons.len(),
            model = ?options.model,
            "converting deferred geodetic coordinates to cartesian"
        );

        convert::geodetic_to_cartesian(
            &geo.lons,
            &geo.lats,
            geo.depths.as_ref().map(CoordInput::from),
            options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::EARTH_RADIUS_M;

    #[test]
    fn test_from_cartesian() {
        let set = PointSet::from_cartesian(vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]).unwrap();
        assert_eq!(set.len(), 2);
        let xyz = set.cartesian().unwrap();
        assert_eq!(xyz[[1, 2]], 6.0);
        assert!(set.geodetic().is_none());
    }

    #[test]
    fn test_from_cartesian_length_mismatch() {
        let res = PointSet::from_cartesian(vec![1.0, 2.0], vec![1.0], vec![1.0, 2.0]);
        assert!(res.is_err());
    }

    #[test]
    fn test_deferred_conversion() {
        let mut set =
            PointSet::from_geodetic_deferred(vec![0.0, 10.0], vec![0.0, 0.0], None).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.cartesian().is_none());

        let opts = ConvertOptions::spherical();
        let xyz = set.ensure_cartesian(&opts).unwrap();
        assert_eq!(xyz.nrows(), 2);
        assert!((xyz[[0, 0]] - EARTH_RADIUS_M).abs() < 1e-6);

        // Geodetic arrays survive the conversion
        assert!(set.geodetic().is_some());
    }

    #[test]
    fn test_eager_conversion() {
        let opts = ConvertOptions::spherical();
        let set = PointSet::from_geodetic(0.0, 90.0, None, &opts).unwrap();
        let xyz = set.cartesian().unwrap();
        assert!((xyz[[0, 2]] - EARTH_RADIUS_M).abs() < 1e-6);
    }

    #[test]
    fn test_ensure_cartesian_is_idempotent() {
        let opts = ConvertOptions::spherical();
        let mut set = PointSet::from_geodetic_deferred(vec![5.0], vec![5.0], None).unwrap();
        let first = set.ensure_cartesian(&opts).unwrap().clone();
        let second = set.ensure_cartesian(&opts).unwrap().clone();
        assert_eq!(first, second);
    }
}
