//! Coordinate input normalization
//!
//! Public entry points accept coordinates as scalars, vectors, slices or
//! ndarray arrays. [`coord_array`] normalizes any of these to an
//! `Array1<f64>` (a scalar becomes a length-1 array) and rejects non-finite
//! values, so every downstream shape is uniform and every stored coordinate
//! is usable.

use ndarray::Array1;

use crate::error::{Error, Result};

/// The closed set of accepted coordinate input shapes.
///
/// Constructed through `From`/`Into`, so callers can pass `f64`, `i32`,
/// `Vec<f64>`, `&[f64]` or `Array1<f64>` directly to any function taking
/// `impl Into<CoordInput>`.
#[derive(Debug, Clone)]
pub enum CoordInput {
    /// A single coordinate, treated as a point set of length 1.
    Scalar(f64),
    /// A list of coordinates.
    List(Vec<f64>),
    /// An already-shaped coordinate array.
    Array(Array1<f64>),
}

impl From<f64> for CoordInput {
    fn from(v: f64) -> Self {
        CoordInput::Scalar(v)
    }
}

impl From<i32> for CoordInput {
    fn from(v: i32) -> Self {
        CoordInput::Scalar(f64::from(v))
    }
}

impl From<Vec<f64>> for CoordInput {
    fn from(v: Vec<f64>) -> Self {
        CoordInput::List(v)
    }
}

impl From<&[f64]> for CoordInput {
    fn from(v: &[f64]) -> Self {
        CoordInput::List(v.to_vec())
    }
}

impl From<&Vec<f64>> for CoordInput {
    fn from(v: &Vec<f64>) -> Self {
        CoordInput::List(v.clone())
    }
}

impl From<Array1<f64>> for CoordInput {
    fn from(v: Array1<f64>) -> Self {
        CoordInput::Array(v)
    }
}

impl From<&Array1<f64>> for CoordInput {
    fn from(v: &Array1<f64>) -> Self {
        CoordInput::Array(v.clone())
    }
}

fn normalize(input: CoordInput) -> Array1<f64> {
    match input {
        CoordInput::Scalar(v) => Array1::from_vec(vec![v]),
        CoordInput::List(v) => Array1::from_vec(v),
        CoordInput::Array(a) => a,
    }
}

/// Normalize a coordinate input to a 1-D array, rejecting non-finite values.
///
/// NaN or infinite coordinates would silently poison distance computations
/// and index construction, so they fail here with
/// [`Error::InvalidCoordinate`].
pub fn coord_array(input: impl Into<CoordInput>) -> Result<Array1<f64>> {
    let arr = normalize(input.into());
    for (index, &value) in arr.iter().enumerate() {
        if !value.is_finite() {
            return Err(Error::InvalidCoordinate { index, value });
        }
    }
    Ok(arr)
}

/// Normalize a field-value input to a 1-D array.
///
/// Unlike [`coord_array`] this permits NaN: a NaN field value is a legitimate
/// no-data marker and propagates through interpolation as such.
pub fn value_array(input: impl Into<CoordInput>) -> Result<Array1<f64>> {
    Ok(normalize(input.into()))
}

/// Check that two related arrays have equal length.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::DimensionMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
