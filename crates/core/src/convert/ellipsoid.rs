//! WGS84 ellipsoidal Earth model conversion
//!
//! Delegates to the `nav-types` geodesy primitive: geodetic positions become
//! [`WGS84`] values and convert into Earth-centered Earth-fixed ([`ECEF`])
//! Cartesian coordinates. Positive depth means below the reference surface,
//! so altitude is the negated depth.

use nav_types::{ECEF, WGS84};
use ndarray::{Array1, Array2};

/// Convert geodetic coordinates to ECEF Cartesian on the WGS84 ellipsoid.
///
/// `depths` is meters below the ellipsoid surface. Absent depths default to
/// 1 m below the surface, not 0: this differs from the spherical path (see
/// `convert::spherical`), and callers picking the Earth model should know it.
///
/// # Arguments
/// * `lons` - Longitudes in degrees
/// * `lats` - Latitudes in degrees
/// * `depths` - Optional depths in meters below the ellipsoid surface
///
/// # Returns
/// Stacked (N x 3) array of ECEF x, y, z in meters.
pub fn to_cartesian(
    lons: &Array1<f64>,
    lats: &Array1<f64>,
    depths: Option<&Array1<f64>>,
) -> Array2<f64> {
    let n = lons.len();
    let mut xyz = Array2::zeros((n, 3));

    for i in 0..n {
        let depth = depths.map_or(1.0, |d| d[i]);
        let pos = WGS84::from_degrees_and_meters(lats[i], lons[i], -depth);
        let ecef = ECEF::from(pos);

        xyz[[i, 0]] = ecef.x();
        xyz[[i, 1]] = ecef.y();
        xyz[[i, 2]] = ecef.z();
    }

    xyz
}
