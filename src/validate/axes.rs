//! Validation of 3D coordinate axes.

use std::fmt;

use ndarray::Array2;

use crate::array::NumericArray;
use crate::check::check_finite;
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::geometry::Vector3;
use crate::input::ArrayLike;
use crate::shape::{ShapePattern, ShapeSpec};

use super::{validate_array, validate_array3, Array3Options, ArrayValidation, Constraints};

/// Orientation of a set of axes, given by the sign of their triple product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Handedness {
    /// `(x × y) · z > 0`.
    Right,
    /// `(x × y) · z < 0`.
    Left,
}

impl Handedness {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Right => "right",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options of [`validate_axes`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxesOptions {
    name: Option<String>,
    normalize: bool,
    must_be_orthogonal: bool,
    must_have_orientation: Option<Handedness>,
}

impl Default for AxesOptions {
    fn default() -> Self {
        Self {
            name: None,
            normalize: true,
            must_be_orthogonal: true,
            must_have_orientation: Some(Handedness::Right),
        }
    }
}

impl AxesOptions {
    /// Orthonormal right-handed axes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name used in error messages (default `"Axes"`).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Return unit vectors instead of the input vectors.
    #[must_use]
    pub fn normalize(mut self, enabled: bool) -> Self {
        self.normalize = enabled;
        self
    }

    /// Require mutually orthogonal axes.
    #[must_use]
    pub fn must_be_orthogonal(mut self, enabled: bool) -> Self {
        self.must_be_orthogonal = enabled;
        self
    }

    /// Require an orientation. With `None`, any orientation is accepted but
    /// three vectors must be given.
    #[must_use]
    pub fn must_have_orientation(mut self, orientation: Option<Handedness>) -> Self {
        self.must_have_orientation = orientation;
        self
    }
}

/// Validate 3D axes and return them as the rows of a 3×3 array.
///
/// `axes` holds either one packed array of shape `(2, 3)` or `(3, 3)`, or
/// two or three separate vectors. When only two vectors are given the third
/// is their cross product, ordered to match the required orientation.
///
/// ```rust
/// use viz_validate::prelude::*;
///
/// let axes = validate_axes([[1, 0, 0], [0, 1, 0]], &AxesOptions::default()).unwrap();
/// assert_eq!(axes.row(2).to_vec(), vec![0.0, 0.0, 1.0]);
/// ```
///
/// # Errors
///
/// - [`Error::AxesCount`] unless one, two or three arguments are given.
/// - [`Error::AxesOrientationMissing`] for two vectors without orientation.
/// - [`Error::NonFinite`], [`Error::ParallelAxes`], [`Error::ZeroAxes`],
///   [`Error::NotOrthogonal`] and [`Error::Orientation`] for degenerate axes.
/// - Shape and type errors of the individual vectors.
pub fn validate_axes<T: Into<ArrayLike>>(
    axes: impl IntoIterator<Item = T>,
    options: &AxesOptions,
) -> Result<Array2<f64>> {
    let name = options.name.as_deref().unwrap_or("Axes");
    let result = run(axes.into_iter().map(Into::into).collect(), options, name);
    if let Err(err) = &result {
        tracing::debug!(input = name, error = %err, "axes validation failed");
    }
    result
}

fn run(axes: Vec<ArrayLike>, options: &AxesOptions, name: &str) -> Result<Array2<f64>> {
    let mut vectors = match axes.len() {
        1 => packed_rows(axes, name)?,
        2 | 3 => axes
            .into_iter()
            .enumerate()
            .map(|(i, axis)| {
                let constraints = Constraints::new().name(format!("{name} Vector[{i}]"));
                let array = validate_array3(axis, &Array3Options::new().constraints(constraints))?;
                Ok(rows(&array)[0])
            })
            .collect::<Result<Vec<_>>>()?,
        count => return Err(Error::AxesCount { name: name.to_string(), count }),
    };

    if vectors.len() == 2 {
        let third = match options.must_have_orientation {
            None => return Err(Error::AxesOrientationMissing { name: name.to_string() }),
            Some(Handedness::Right) => vectors[0].cross(vectors[1]),
            Some(Handedness::Left) => vectors[1].cross(vectors[0]),
        };
        vectors.push(third);
    }
    let [v0, v1, v2] = [vectors[0], vectors[1], vectors[2]];

    let stacked = NumericArray::from_vec(vectors.iter().flat_map(|v| v.to_array()).collect());
    check_finite(&stacked, name)?;

    for (a, b) in [(v0, v1), (v0, v2), (v1, v2)] {
        if are_parallel(a, b) {
            return Err(Error::ParallelAxes { name: name.to_string() });
        }
    }
    if vectors.iter().any(|v| v.is_zero()) {
        return Err(Error::ZeroAxes { name: name.to_string() });
    }

    let [n0, n1, n2] = [v0.normalized(), v1.normalized(), v2.normalized()];
    let cross_01 = n0.cross(n1);
    let cross_12 = n1.cross(n2);

    if options.must_be_orthogonal {
        let parallel_to = |c: Vector3, n: Vector3| c.is_close(n) || c.is_close(-n);
        if !(parallel_to(cross_01, n2) && parallel_to(cross_12, n0)) {
            return Err(Error::NotOrthogonal { name: name.to_string() });
        }
    }

    if let Some(expected) = options.must_have_orientation {
        let triple = cross_01.dot(n2);
        let mismatch = match expected {
            Handedness::Right => triple < 0.0,
            Handedness::Left => triple > 0.0,
        };
        if mismatch {
            return Err(Error::Orientation { name: name.to_string(), expected: expected.as_str() });
        }
    }

    let out = if options.normalize { [n0, n1, n2] } else { [v0, v1, v2] };
    Ok(Array2::from_shape_fn((3, 3), |(i, j)| out[i].to_array()[j]))
}

fn packed_rows(mut axes: Vec<ArrayLike>, name: &str) -> Result<Vec<Vector3>> {
    let config = ArrayValidation::new()
        .name(name)
        .must_have_shape(ShapeSpec::any_of([ShapePattern::from([2, 3]), ShapePattern::from([3, 3])]))
        .dtype_out(DType::Float);
    Ok(rows(&validate_array(axes.swap_remove(0), &config)?))
}

/// Split a validated `(N, 3)` or `(3,)` real array into vectors.
fn rows(array: &NumericArray) -> Vec<Vector3> {
    let values: Vec<f64> = array.to_f64_array().iter().copied().collect();
    values.chunks_exact(3).map(|c| Vector3::new(c[0], c[1], c[2])).collect()
}

/// Non-zero vectors pointing along the same line.
fn are_parallel(a: Vector3, b: Vector3) -> bool {
    if a.is_zero() || b.is_zero() {
        return false;
    }
    let dot = a.normalized().dot(b.normalized());
    crate::geometry::is_close(dot.abs(), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr2;

    #[test]
    fn test_right_handed_completion() {
        let axes = validate_axes([[1, 0, 0], [0, 1, 0]], &AxesOptions::default()).unwrap();
        assert_eq!(axes, arr2(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]));
    }

    #[test]
    fn test_left_handed_completion() {
        let options = AxesOptions::new().must_have_orientation(Some(Handedness::Left));
        let axes = validate_axes([[1, 0, 0], [0, 1, 0]], &options).unwrap();
        assert_eq!(axes.row(2).to_vec(), vec![0.0, 0.0, -1.0]);
    }

    #[test]
    fn test_packed_array() {
        let eye = arr2(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let axes = validate_axes([eye.clone()], &AxesOptions::default()).unwrap();
        assert_eq!(axes, eye);

        let err = validate_axes([arr2(&[[1.0, 0.0], [0.0, 1.0]])], &AxesOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_normalize() {
        let axes = validate_axes([[2, 0, 0], [0, 3, 0], [0, 0, 4]], &AxesOptions::default()).unwrap();
        assert_relative_eq!(axes[[1, 1]], 1.0);

        let raw = AxesOptions::new().normalize(false);
        let axes = validate_axes([[2, 0, 0], [0, 3, 0], [0, 0, 4]], &raw).unwrap();
        assert_relative_eq!(axes[[2, 2]], 4.0);
    }

    #[test]
    fn test_wrong_count() {
        let err = validate_axes(Vec::<ArrayLike>::new(), &AxesOptions::default()).unwrap_err();
        assert!(matches!(err, Error::AxesCount { count: 0, .. }));
        let four = vec![[1, 0, 0]; 4];
        assert!(matches!(validate_axes(four, &AxesOptions::default()), Err(Error::AxesCount { .. })));
    }

    #[test]
    fn test_two_vectors_need_orientation() {
        let options = AxesOptions::new().must_have_orientation(None);
        let err = validate_axes([[1, 0, 0], [0, 1, 0]], &options).unwrap_err();
        assert!(matches!(err, Error::AxesOrientationMissing { .. }));
    }

    #[test]
    fn test_parallel_rejected() {
        let err = validate_axes([[1, 0, 0], [2, 0, 0]], &AxesOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ParallelAxes { .. }));
        let err = validate_axes([[1, 0, 0], [0, 1, 0], [-1, 0, 0]], &AxesOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ParallelAxes { .. }));
    }

    #[test]
    fn test_zero_rejected() {
        let err = validate_axes([[1, 0, 0], [0, 1, 0], [0, 0, 0]], &AxesOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ZeroAxes { .. }));
    }

    #[test]
    fn test_not_orthogonal() {
        let err = validate_axes([[1, 0, 0], [1, 1, 0]], &AxesOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NotOrthogonal { .. }));

        let loose = AxesOptions::new().must_be_orthogonal(false);
        assert!(validate_axes([[1, 0, 0], [1, 1, 0]], &loose).is_ok());
    }

    #[test]
    fn test_orientation_mismatch() {
        let err = validate_axes([[1, 0, 0], [0, 1, 0], [0, 0, -1]], &AxesOptions::default()).unwrap_err();
        assert_eq!(err, Error::Orientation { name: "Axes".into(), expected: "right" });

        let any = AxesOptions::new().must_have_orientation(None);
        assert!(validate_axes([[1, 0, 0], [0, 1, 0], [0, 0, -1]], &any).is_ok());
    }

    #[test]
    fn test_non_finite() {
        let err = validate_axes([[f64::NAN, 0.0, 0.0], [0.0, 1.0, 0.0]], &AxesOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NonFinite { .. }));
    }

    #[test]
    fn test_vector_name_in_error() {
        let err = validate_axes(vec![vec![1, 0], vec![0, 1]], &AxesOptions::new().name("Frame")).unwrap_err();
        assert!(err.to_string().starts_with("Frame Vector[0]"));
    }
}
