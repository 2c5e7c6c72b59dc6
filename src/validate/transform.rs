//! Validation of 3×3 and 4×4 transformation matrices.

use ndarray::{s, Array2, Ix2};

use crate::array::NumericArray;
use crate::error::{Error, Result};
use crate::input::ArrayLike;
use crate::shape::{ShapePattern, ShapeSpec};

use super::{validate_array, ArrayValidation};

const EXPECTED_4X4: &str = "a 4x4 or 3x3 matrix, a transform, or a finite 4x4 or 3x3 array";
const EXPECTED_3X3: &str = "a 3x3 matrix or a 3x3 array";

/// A square matrix read element by element.
pub trait MatrixElements {
    /// Number of rows and columns.
    fn order(&self) -> usize;

    /// Element at `(row, col)`.
    fn element(&self, row: usize, col: usize) -> f64;
}

/// An object that exposes its 4×4 homogeneous matrix.
pub trait TransformSource {
    /// Current 4×4 matrix.
    fn matrix(&self) -> Matrix4x4;
}

/// Row-major 3×3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix3x3(pub [[f64; 3]; 3]);

/// Row-major 4×4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix4x4(pub [[f64; 4]; 4]);

impl Matrix3x3 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
}

impl Matrix4x4 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    /// Matrix product `self * rhs`.
    #[must_use]
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (0..4).map(|k| self.0[i][k] * rhs.0[k][j]).sum();
            }
        }
        Self(out)
    }
}

impl Default for Matrix3x3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl MatrixElements for Matrix3x3 {
    fn order(&self) -> usize {
        3
    }

    fn element(&self, row: usize, col: usize) -> f64 {
        self.0[row][col]
    }
}

impl MatrixElements for Matrix4x4 {
    fn order(&self) -> usize {
        4
    }

    fn element(&self, row: usize, col: usize) -> f64 {
        self.0[row][col]
    }
}

/// A homogeneous transform built from translations and scalings.
///
/// Operations are concatenated on the right, so the last one added is
/// applied to points first.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    matrix: Matrix4x4,
}

impl Transform {
    /// Identity transform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform with the given matrix.
    #[must_use]
    pub const fn from_matrix(matrix: Matrix4x4) -> Self {
        Self { matrix }
    }

    /// Concatenate a translation.
    #[must_use]
    pub fn translate(self, x: f64, y: f64, z: f64) -> Self {
        let mut m = Matrix4x4::IDENTITY;
        m.0[0][3] = x;
        m.0[1][3] = y;
        m.0[2][3] = z;
        self.concatenate(&m)
    }

    /// Concatenate a scaling.
    #[must_use]
    pub fn scale(self, x: f64, y: f64, z: f64) -> Self {
        let mut m = Matrix4x4::IDENTITY;
        m.0[0][0] = x;
        m.0[1][1] = y;
        m.0[2][2] = z;
        self.concatenate(&m)
    }

    /// Concatenate an arbitrary matrix.
    #[must_use]
    pub fn concatenate(self, matrix: &Matrix4x4) -> Self {
        Self { matrix: self.matrix.multiply(matrix) }
    }
}

impl TransformSource for Transform {
    fn matrix(&self) -> Matrix4x4 {
        self.matrix
    }
}

/// Input accepted by the transform validators.
pub enum TransformInput<'a> {
    /// A matrix read element by element.
    Matrix(&'a dyn MatrixElements),
    /// A transform object.
    Transform(&'a dyn TransformSource),
    /// Any array-like value.
    Array(ArrayLike),
}

impl TransformInput<'_> {
    /// Wrap an array-like value.
    pub fn array(input: impl Into<ArrayLike>) -> Self {
        Self::Array(input.into())
    }
}

impl<'a> From<&'a Matrix3x3> for TransformInput<'a> {
    fn from(m: &'a Matrix3x3) -> Self {
        Self::Matrix(m)
    }
}

impl<'a> From<&'a Matrix4x4> for TransformInput<'a> {
    fn from(m: &'a Matrix4x4) -> Self {
        Self::Matrix(m)
    }
}

impl<'a> From<&'a Transform> for TransformInput<'a> {
    fn from(t: &'a Transform) -> Self {
        Self::Transform(t)
    }
}

impl From<ArrayLike> for TransformInput<'_> {
    fn from(input: ArrayLike) -> Self {
        Self::Array(input)
    }
}

impl From<NumericArray> for TransformInput<'_> {
    fn from(array: NumericArray) -> Self {
        Self::Array(array.into())
    }
}

impl From<Array2<f64>> for TransformInput<'_> {
    fn from(array: Array2<f64>) -> Self {
        Self::Array(array.into())
    }
}

/// Validate a transform as a 4×4 matrix.
///
/// A 3×3 matrix or array is embedded in the upper-left block of the
/// identity. Array input must be finite.
///
/// ```rust
/// use viz_validate::prelude::*;
///
/// let t = Transform::new().translate(1.0, 2.0, 3.0);
/// let m = validate_transform4x4(&t, "Transform").unwrap();
/// assert_eq!(m[[1, 3]], 2.0);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidTransform`] if the input is not a 3×3 or 4×4
/// matrix, or if array input fails validation with a value error.
pub fn validate_transform4x4<'a>(
    transform: impl Into<TransformInput<'a>>,
    name: &str,
) -> Result<Array2<f64>> {
    let invalid = || Error::InvalidTransform { name: name.to_string(), expected: EXPECTED_4X4 };
    let matrix = match transform.into() {
        TransformInput::Matrix(m) => match m.order() {
            3 | 4 => read_matrix(m),
            _ => return Err(invalid()),
        },
        TransformInput::Transform(t) => read_matrix(&t.matrix()),
        TransformInput::Array(input) => {
            let config = ArrayValidation::new()
                .name(name)
                .must_have_shape(ShapeSpec::any_of([ShapePattern::from([3, 3]), ShapePattern::from([4, 4])]))
                .must_be_finite(true);
            array_matrix(input, &config, invalid)?
        }
    };
    Ok(embed(&matrix))
}

/// Validate a transform as a 3×3 matrix.
///
/// # Errors
///
/// Returns [`Error::InvalidTransform`] unless the input is a 3×3 matrix or
/// a 3×3 array.
pub fn validate_transform3x3<'a>(
    transform: impl Into<TransformInput<'a>>,
    name: &str,
) -> Result<Array2<f64>> {
    let invalid = || Error::InvalidTransform { name: name.to_string(), expected: EXPECTED_3X3 };
    match transform.into() {
        TransformInput::Matrix(m) if m.order() == 3 => Ok(read_matrix(m)),
        TransformInput::Matrix(_) | TransformInput::Transform(_) => Err(invalid()),
        TransformInput::Array(input) => {
            let config = ArrayValidation::new().name(name).must_have_shape([3, 3]);
            array_matrix(input, &config, invalid)
        }
    }
}

fn read_matrix(m: &dyn MatrixElements) -> Array2<f64> {
    let n = m.order();
    Array2::from_shape_fn((n, n), |(i, j)| m.element(i, j))
}

fn array_matrix(
    input: ArrayLike,
    config: &ArrayValidation,
    invalid: impl Fn() -> Error,
) -> Result<Array2<f64>> {
    let array = validate_array(input, config).map_err(|err| if err.is_value_error() { invalid() } else { err })?;
    array.to_f64_array().into_dimensionality::<Ix2>().map_err(|_| invalid())
}

/// Place a 3×3 matrix in the upper-left block of a 4×4 identity.
fn embed(matrix: &Array2<f64>) -> Array2<f64> {
    if matrix.dim() == (4, 4) {
        return matrix.clone();
    }
    let mut out = Array2::eye(4);
    out.slice_mut(s![..3, ..3]).assign(matrix);
    out
}
