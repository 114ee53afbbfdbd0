//! Spherical Earth model conversion
//!
//! Models the Earth as a sphere of configurable radius. Geodetic
//! coordinates map to Cartesian through the polar parametrization with
//! colatitude measured from the north pole:
//!
//! ```text
//! colat = 90° - lat
//! r     = radius - depth
//! x     = r * sin(colat) * cos(lon)
//! y     = r * sin(colat) * sin(lon)
//! z     = r * cos(colat)
//! ```
//!
//! Angles are degrees on the geodetic side and radians internally. This is
//! the only model with a defined inverse ([`to_geodetic`]).

use ndarray::{Array1, Array2};

/// Convert geodetic coordinates to Cartesian on a sphere.
///
/// `depths` is meters below the surface; absent depths place every point on
/// the surface (depth 0). Note the ellipsoidal path defaults absent depths
/// to 1 m instead (see `convert::ellipsoid`).
///
/// # Arguments
/// * `lons` - Longitudes in degrees
/// * `lats` - Latitudes in degrees
/// * `depths` - Optional depths in meters below the surface
/// * `radius` - Sphere radius in meters
///
/// # Returns
/// Stacked (N x 3) array of x, y, z in meters.
pub fn to_cartesian(
    lons: &Array1<f64>,
    lats: &Array1<f64>,
    depths: Option<&Array1<f64>>,
    radius: f64,
) -> Array2<f64> {
    let n = lons.len();
    let mut xyz = Array2::zeros((n, 3));

    for i in 0..n {
        let lon = lons[i].to_radians();
        let colat = (90.0 - lats[i]).to_radians();
        let depth = depths.map_or(0.0, |d| d[i]);
        let r = radius - depth;

        xyz[[i, 0]] = r * colat.sin() * lon.cos();
        xyz[[i, 1]] = r * colat.sin() * lon.sin();
        xyz[[i, 2]] = r * colat.cos();
    }

    xyz
}

/// Convert Cartesian coordinates back to geodetic on a sphere.
///
/// Inverse of [`to_cartesian`]:
///
/// ```text
/// lon   = atan2(y, x)
/// lat   = atan2(z, sqrt(x² + y²))
/// depth = radius - sqrt(x² + y² + z²)
/// ```
///
/// # Returns
/// `(lons, lats, depths)` in degrees, degrees and meters.
pub fn to_geodetic(xyz: &Array2<f64>, radius: f64) -> (Array1<f64>, Array1<f64>, Array1<f64>) {
    let n = xyz.nrows();
    let mut lons = Array1::zeros(n);
    let mut lats = Array1::zeros(n);
    let mut depths = Array1::zeros(n);

    for i in 0..n {
        let (x, y, z) = (xyz[[i, 0]], xyz[[i, 1]], xyz[[i, 2]]);

        lons[i] = y.atan2(x).to_degrees();
        lats[i] = z.atan2(x.hypot(y)).to_degrees();
        depths[i] = radius - (x * x + y * y + z * z).sqrt();
    }

    (lons, lats, depths)
}
