//! Inverse Distance Weighting (IDW) interpolation
//!
//! Estimates the field value at each query point as a weighted average of
//! its nearest base points, with weights inversely proportional to distance.
//!
//! Reference:
//! Shepard, D. (1968). A two-dimensional interpolation function for
//! irregularly-spaced data. ACM National Conference.

use geonear_core::{Error, Result};
use ndarray::Array1;

use crate::neighbors::Neighborhood;

/// Parameters for IDW interpolation
#[derive(Debug, Clone)]
pub struct IdwParams {
    /// Minimum distance in meters (default: 1e-10). Shorter distances are
    /// clamped up to this before weighting (avoids division by zero at
    /// coincident points).
    pub epsilon: f64,
}

impl Default for IdwParams {
    fn default() -> Self {
        Self { epsilon: 1e-10 }
    }
}

/// Interpolate field values at each query point by inverse-distance
/// weighting over its neighborhood.
///
/// # Algorithm
///
/// For each query row:
///
/// ```text
/// w_i = 1 / max(d_i, epsilon)
/// out = Σ(w_i * values[idx_i]) / Σ(w_i)
/// ```
///
/// Sentinel slots (infinite distance: no neighbor within the cutoff, or k
/// beyond the base count) are excluded from both sums, never clamped to a
/// finite weight. A row with no valid neighbor at all yields NaN.
///
/// # Arguments
/// * `neighborhood` - Per-query distances and base-point indices
/// * `values` - One field value per base point
/// * `params` - Epsilon clamp
///
/// # Returns
/// One interpolated value per query point.
pub fn idw(
    neighborhood: &Neighborhood,
    values: &Array1<f64>,
    params: &IdwParams,
) -> Result<Array1<f64>> {
    if values.len() != neighborhood.base_len() {
        return Err(Error::DimensionMismatch {
            what: "field values",
            expected: neighborhood.base_len(),
            actual: values.len(),
        });
    }

    let distances = neighborhood.distances();
    let indices = neighborhood.indices();
    let mut output = Array1::from_elem(neighborhood.query_len(), f64::NAN);

    for row in 0..neighborhood.query_len() {
        let mut sum_w = 0.0;
        let mut sum_wv = 0.0;

        for slot in 0..neighborhood.k() {
            let d = distances[[row, slot]];
            // Sentinels trail the valid slots of a row
            if !d.is_finite() {
                break;
            }
            let w = 1.0 / d.max(params.epsilon);
            sum_w += w;
            sum_wv += w * values[indices[[row, slot]]];
        }

        if sum_w > 0.0 {
            output[row] = sum_wv / sum_w;
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // A hand-built neighborhood over 4 base points and 2 query rows:
    // row 0 has two neighbors at 1 m and 3 m, row 1 sits on base point 2.
    fn sample_neighborhood() -> Neighborhood {
        let mut hood = Neighborhood::sentinel_filled(2, 2, 4);
        hood.set(0, 0, 1.0, 0);
        hood.set(0, 1, 3.0, 1);
        hood.set(1, 0, 0.0, 2);
        hood.set(1, 1, 500.0, 3);
        hood
    }

    #[test]
    fn test_weighted_average() {
        let hood = sample_neighborhood();
        let values = array![10.0, 20.0, 30.0, 40.0];

        let out = idw(&hood, &values, &IdwParams::default()).unwrap();

        // Row 0: w = [1, 1/3] -> (10 + 20/3) / (4/3) = 12.5
        assert!((out[0] - 12.5).abs() < 1e-10, "got {}", out[0]);
    }

    #[test]
    fn test_coincident_point_takes_base_value() {
        let hood = sample_neighborhood();
        let values = array![10.0, 20.0, 30.0, 40.0];

        let out = idw(&hood, &values, &IdwParams::default()).unwrap();

        // Row 1 sits on base point 2: the clamped zero distance dominates
        assert!((out[1] - 30.0).abs() < 1e-6, "got {}", out[1]);
    }

    #[test]
    fn test_output_length_equals_query_count() {
        let hood = sample_neighborhood();
        let values = array![1.0, 2.0, 3.0, 4.0];
        let out = idw(&hood, &values, &IdwParams::default()).unwrap();
        assert_eq!(out.len(), hood.query_len());
    }

    #[test]
    fn test_sentinel_slots_excluded() {
        let mut hood = Neighborhood::sentinel_filled(1, 4, 3);
        hood.set(0, 0, 2.0, 0);
        hood.set(0, 1, 2.0, 1);
        // Slots 2 and 3 stay sentinels

        let values = array![10.0, 30.0, 1_000_000.0];
        let out = idw(&hood, &values, &IdwParams::default()).unwrap();

        // Equidistant valid neighbors average; sentinels contribute nothing
        assert!((out[0] - 20.0).abs() < 1e-10, "got {}", out[0]);
    }

    #[test]
    fn test_all_sentinel_row_yields_nan() {
        let hood = Neighborhood::sentinel_filled(2, 3, 5);
        let values = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let out = idw(&hood, &values, &IdwParams::default()).unwrap();
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
    }

    #[test]
    fn test_uniform_field_is_preserved() {
        let hood = sample_neighborhood();
        let values = array![7.0, 7.0, 7.0, 7.0];
        let out = idw(&hood, &values, &IdwParams::default()).unwrap();
        for row in 0..out.len() {
            assert!((out[row] - 7.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_values_length_mismatch_rejected() {
        let hood = sample_neighborhood();
        let values = array![1.0, 2.0];
        let err = idw(&hood, &values, &IdwParams::default()).unwrap_err();
        match err {
            Error::DimensionMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
