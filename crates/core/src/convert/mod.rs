//! Geodetic / Cartesian coordinate conversion
//!
//! Two Earth models are supported: a spherical approximation (always
//! available) and the WGS84 ellipsoid (behind the default-on `ellipsoid`
//! feature, delegating to `nav-types`). When the ellipsoidal model is
//! requested but compiled out, conversion falls back to the spherical model
//! with a warning unless [`ConvertOptions::require_ellipsoid`] is set.

#[cfg(feature = "ellipsoid")]
pub mod ellipsoid;
pub mod spherical;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::coords::{check_len, coord_array, CoordInput};
use crate::error::Result;

#[cfg(not(feature = "ellipsoid"))]
use crate::error::Error;

/// Mean Earth radius in meters, used by the spherical model and for scaling
/// angular distances to meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Earth model used for geodetic to Cartesian conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EarthModel {
    /// WGS84 ellipsoid via the geodesy primitive (`ellipsoid` feature).
    #[default]
    Ellipsoidal,
    /// Sphere of mean radius.
    Spherical,
}

/// Options controlling coordinate conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Earth model to convert under.
    pub model: EarthModel,
    /// Fail with [`Error::EllipsoidUnavailable`] instead of falling back to
    /// the spherical model when the ellipsoidal path is compiled out.
    ///
    /// [`Error::EllipsoidUnavailable`]: crate::error::Error
    pub require_ellipsoid: bool,
    /// Sphere radius in meters for the spherical model.
    pub earth_radius_m: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            model: EarthModel::default(),
            require_ellipsoid: false,
            earth_radius_m: EARTH_RADIUS_M,
        }
    }
}

impl ConvertOptions {
    /// Options for the spherical model with the mean Earth radius.
    pub fn spherical() -> Self {
        Self {
            model: EarthModel::Spherical,
            ..Self::default()
        }
    }
}

/// Convert geodetic coordinates to a stacked (N x 3) Cartesian array.
///
/// Inputs accept any [`CoordInput`] shape (scalars become length-1 arrays)
/// and must all have equal length. `depths` is meters below the reference
/// surface; when absent the spherical model places points on the surface
/// while the ellipsoidal model places them 1 m below it (a model-specific
/// default, documented on each model module).
pub fn geodetic_to_cartesian(
    lons: impl Into<CoordInput>,
    lats: impl Into<CoordInput>,
    depths: Option<CoordInput>,
    options: &ConvertOptions,
) -> Result<Array2<f64>> {
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

    match options.model {
        EarthModel::Spherical => Ok(spherical::to_cartesian(
            &lons,
            &lats,
            depths.as_ref(),
            options.earth_radius_m,
        )),
        EarthModel::Ellipsoidal => ellipsoidal_to_cartesian(&lons, &lats, depths.as_ref(), options),
    }
}

#[cfg(feature = "ellipsoid")]
fn ellipsoidal_to_cartesian(
    lons: &Array1<f64>,
    lats: &Array1<f64>,
    depths: Option<&Array1<f64>>,
    _options: &ConvertOptions,
) -> Result<Array2<f64>> {
    Ok(ellipsoid::to_cartesian(lons, lats, depths))
}

#[cfg(not(feature = "ellipsoid"))]
fn ellipsoidal_to_cartesian(
    lons: &Array1<f64>,
    lats: &Array1<f64>,
    depths: Option<&Array1<f64>>,
    options: &ConvertOptions,
) -> Result<Array2<f64>> {
    if options.require_ellipsoid {
        return Err(Error::EllipsoidUnavailable);
    }
    tracing::warn!("ellipsoid feature not enabled, falling back to spherical model");
    Ok(spherical::to_cartesian(
        lons,
        lats,
        depths,
        options.earth_radius_m,
    ))
}

/// Convert Cartesian coordinates to geodetic `(lons, lats, depths)`.
///
/// The inverse transform is defined for the spherical model only; the
/// returned coordinates are spherical-model geodetic coordinates using
/// [`ConvertOptions::earth_radius_m`] regardless of the configured model.
pub fn cartesian_to_geodetic(
    x: impl Into<CoordInput>,
    y: impl Into<CoordInput>,
    z: impl Into<CoordInput>,
    options: &ConvertOptions,
) -> Result<(Array1<f64>, Array1<f64>, Array1<f64>)> {
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

    Ok(spherical::to_geodetic(&xyz, options.earth_radius_m))
}

/// Split a stacked (N x 3) Cartesian array into three parallel arrays.
pub fn split_xyz(xyz: &Array2<f64>) -> Result<(Array1<f64>, Array1<f64>, Array1<f64>)> {
    check_len("cartesian array columns", 3, xyz.ncols())?;
    Ok((
        xyz.column(0).to_owned(),
        xyz.column(1).to_owned(),
        xyz.column(2).to_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_spherical_dispatch() {
        let opts = ConvertOptions::spherical();
        let xyz = geodetic_to_cartesian(0.0, 0.0, None, &opts).unwrap();
        assert_eq!(xyz.nrows(), 1);
        assert!((xyz[[0, 0]] - EARTH_RADIUS_M).abs() < 1e-6);
    }

    #[test]
    fn test_scalar_inputs_become_single_point() {
        let opts = ConvertOptions::spherical();
        let xyz = geodetic_to_cartesian(12.5, 41.9, Some(100.0.into()), &opts).unwrap();
        assert_eq!(xyz.dim(), (1, 3));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let opts = ConvertOptions::spherical();
        let res = geodetic_to_cartesian(vec![0.0, 1.0], vec![0.0], None, &opts);
        assert!(res.is_err());

        let res = geodetic_to_cartesian(
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            Some(vec![5.0].into()),
            &opts,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_split_xyz() {
        let xyz = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let (x, y, z) = split_xyz(&xyz).unwrap();
        assert_eq!(x, array![1.0, 4.0]);
        assert_eq!(y, array![2.0, 5.0]);
        assert_eq!(z, array![3.0, 6.0]);

        let bad = Array2::<f64>::zeros((2, 2));
        assert!(split_xyz(&bad).is_err());
    }

    #[test]
    fn test_cartesian_to_geodetic_round_trip() {
        let opts = ConvertOptions::spherical();
        let lons = vec![10.0, -75.0];
        let lats = vec![45.0, -20.0];
        let deps = vec![0.0, 2_000.0];

        let xyz = geodetic_to_cartesian(
            lons.clone(),
            lats.clone(),
            Some(deps.clone().into()),
            &opts,
        )
        .unwrap();
        let (x, y, z) = split_xyz(&xyz).unwrap();
        let (lons2, lats2, deps2) = cartesian_to_geodetic(&x, &y, &z, &opts).unwrap();

        for i in 0..lons.len() {
            assert!((lons[i] - lons2[i]).abs() < 1e-6);
            assert!((lats[i] - lats2[i]).abs() < 1e-6);
            assert!((deps[i] - deps2[i]).abs() < 1e-6);
        }
    }

    #[cfg(feature = "ellipsoid")]
    #[test]
    fn test_ellipsoidal_dispatch() {
        let opts = ConvertOptions::default();
        let xyz = geodetic_to_cartesian(0.0, 0.0, Some(0.0.into()), &opts).unwrap();
        // WGS84 semi-major axis
        assert!((xyz[[0, 0]] - 6_378_137.0).abs() < 1e-3);
    }

    #[cfg(not(feature = "ellipsoid"))]
    #[test]
    fn test_ellipsoidal_falls_back_to_spherical() {
        let opts = ConvertOptions::default();
        let xyz = geodetic_to_cartesian(0.0, 0.0, None, &opts).unwrap();
        assert!((xyz[[0, 0]] - EARTH_RADIUS_M).abs() < 1e-6);
    }

    #[cfg(not(feature = "ellipsoid"))]
    #[test]
    fn test_require_ellipsoid_fails_without_feature() {
        let opts = ConvertOptions {
            require_ellipsoid: true,
            ..ConvertOptions::default()
        };
        let res = geodetic_to_cartesian(0.0, 0.0, None, &opts);
        assert!(matches!(res, Err(Error::EllipsoidUnavailable)));
    }
}
