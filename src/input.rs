//! Loosely-typed numeric input and its coercion to a canonical array.

use ndarray::{Array, Dimension};
use num_complex::Complex64;

use crate::array::{Element, NumericArray};
use crate::dtype::{CastScalar, DType, Scalar};
use crate::error::{format_shape, Error, Result};

/// Input accepted by the validators.
///
/// Scalars, arbitrarily nested sequences and canonical arrays can be mixed
/// freely as long as the nesting is rectangular. `Text` models a
/// non-numeric leaf and is always rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayLike {
    /// A single number.
    Scalar(Scalar),
    /// A nested sequence.
    Sequence(Vec<ArrayLike>),
    /// An existing canonical array.
    Array(NumericArray),
    /// A non-numeric value.
    Text(String),
}

impl ArrayLike {
    /// Build a sequence from any iterable of convertible items.
    pub fn sequence<T: Into<ArrayLike>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! array_like_from_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for ArrayLike {
                fn from(v: $t) -> Self {
                    ArrayLike::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

array_like_from_scalar!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, Complex64);

impl From<Scalar> for ArrayLike {
    fn from(v: Scalar) -> Self {
        Self::Scalar(v)
    }
}

impl From<NumericArray> for ArrayLike {
    fn from(a: NumericArray) -> Self {
        Self::Array(a)
    }
}

impl From<&NumericArray> for ArrayLike {
    fn from(a: &NumericArray) -> Self {
        Self::Array(a.clone())
    }
}

impl<T: Element, D: Dimension> From<Array<T, D>> for ArrayLike {
    fn from(a: Array<T, D>) -> Self {
        Self::Array(NumericArray::from_array(a))
    }
}

impl From<&str> for ArrayLike {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ArrayLike {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<ArrayLike>> From<Vec<T>> for ArrayLike {
    fn from(items: Vec<T>) -> Self {
        Self::sequence(items)
    }
}

impl<T: Into<ArrayLike>, const N: usize> From<[T; N]> for ArrayLike {
    fn from(items: [T; N]) -> Self {
        Self::sequence(items)
    }
}

impl<T: Clone + Into<ArrayLike>> From<&[T]> for ArrayLike {
    fn from(items: &[T]) -> Self {
        Self::sequence(items.iter().cloned())
    }
}

impl<A: Into<ArrayLike>> From<(A,)> for ArrayLike {
    fn from((a,): (A,)) -> Self {
        Self::Sequence(vec![a.into()])
    }
}

impl<A: Into<ArrayLike>, B: Into<ArrayLike>> From<(A, B)> for ArrayLike {
    fn from((a, b): (A, B)) -> Self {
        Self::Sequence(vec![a.into(), b.into()])
    }
}

impl<A: Into<ArrayLike>, B: Into<ArrayLike>, C: Into<ArrayLike>> From<(A, B, C)> for ArrayLike {
    fn from((a, b, c): (A, B, C)) -> Self {
        Self::Sequence(vec![a.into(), b.into(), c.into()])
    }
}

/// Options for [`to_numeric_array`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoerceOptions {
    /// Reject complex data.
    pub must_be_real: bool,
    /// Always return fresh storage.
    pub copy: bool,
    /// Pass existing arrays through by reference even when they are
    /// read-only broadcast results or not in row-major layout.
    pub as_any: bool,
}

impl Default for CoerceOptions {
    fn default() -> Self {
        Self { must_be_real: true, copy: false, as_any: true }
    }
}

/// Convert arbitrary input to a canonical array.
///
/// Nested sequences are copied into new storage with the common dtype of
/// their leaves (an empty sequence is floating). An existing array is passed
/// through without copying unless `copy` is set, or `as_any` is unset and
/// the array is not plain.
///
/// # Errors
///
/// - [`Error::NotNumeric`] for text leaves.
/// - [`Error::NotReal`] for complex data when `must_be_real` is set.
/// - [`Error::Ragged`] for non-rectangular nesting.
pub fn to_numeric_array(
    input: impl Into<ArrayLike>,
    options: &CoerceOptions,
    name: &str,
) -> Result<NumericArray> {
    let array = match input.into() {
        ArrayLike::Array(array) => {
            if options.copy || (!options.as_any && !array.is_plain()) {
                array.deep_copy()
            } else {
                array
            }
        }
        other => {
            let mut leaves = Vec::new();
            let shape = collect_leaves(&other, &mut leaves, name)?;
            let dtype = if leaves.is_empty() {
                DType::Float
            } else {
                leaves.iter().map(Scalar::dtype).fold(DType::Bool, DType::promote)
            };
            build(&shape, dtype, &leaves).ok_or_else(|| Error::Ragged {
                name: name.to_string(),
                detail: format!("{} values do not fill shape {}", leaves.len(), format_shape(&shape)),
            })?
        }
    };

    if options.must_be_real && !array.dtype().is_real() {
        return Err(Error::NotReal { name: name.to_string() });
    }
    Ok(array)
}

/// Append the leaves of `node` in row-major order and return its shape.
fn collect_leaves(node: &ArrayLike, leaves: &mut Vec<Scalar>, name: &str) -> Result<Vec<usize>> {
    match node {
        ArrayLike::Scalar(s) => {
            leaves.push(*s);
            Ok(Vec::new())
        }
        ArrayLike::Text(t) => Err(Error::NotNumeric {
            name: name.to_string(),
            found: format!("text {t:?}"),
        }),
        ArrayLike::Array(a) => {
            leaves.extend(a.to_scalars());
            Ok(a.shape().to_vec())
        }
        ArrayLike::Sequence(items) => {
            let mut child_shape: Option<Vec<usize>> = None;
            for (i, item) in items.iter().enumerate() {
                let shape = collect_leaves(item, leaves, name)?;
                match &child_shape {
                    None => child_shape = Some(shape),
                    Some(expected) if *expected != shape => {
                        return Err(Error::Ragged {
                            name: name.to_string(),
                            detail: format!(
                                "element {i} has shape {} but element 0 has shape {}",
                                format_shape(&shape),
                                format_shape(expected)
                            ),
                        });
                    }
                    Some(_) => {}
                }
            }
            let mut shape = vec![items.len()];
            shape.extend(child_shape.unwrap_or_default());
            Ok(shape)
        }
    }
}

fn build(shape: &[usize], dtype: DType, leaves: &[Scalar]) -> Option<NumericArray> {
    match dtype {
        DType::Bool => NumericArray::from_shape_vec(shape, leaves.iter().map(|s| s.to_bool()).collect()),
        DType::Int => NumericArray::from_shape_vec(shape, leaves.iter().map(|s| s.to_i64()).collect()),
        DType::Float => NumericArray::from_shape_vec(shape, leaves.iter().map(|s| s.to_f64()).collect()),
        DType::Complex => {
            NumericArray::from_shape_vec(shape, leaves.iter().map(|s| s.to_complex()).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerce(input: impl Into<ArrayLike>) -> Result<NumericArray> {
        to_numeric_array(input, &CoerceOptions::default(), "Array")
    }

    #[test]
    fn test_scalar_is_zero_dimensional() {
        let a = coerce(5.0).unwrap();
        assert_eq!(a.shape(), &[] as &[usize]);
        assert_eq!(a.dtype(), DType::Float);
    }

    #[test]
    fn test_nested_sequence_shape() {
        let a = coerce(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(a.shape(), &[2, 3]);
        assert_eq!(a.dtype(), DType::Int);
        assert_eq!(a.get(&[1, 2]), Some(Scalar::Int(6)));
    }

    #[test]
    fn test_mixed_leaves_promote() {
        let input = ArrayLike::sequence([Scalar::Bool(true), Scalar::Int(2), Scalar::Float(0.5)]);
        let a = coerce(input).unwrap();
        assert_eq!(a.dtype(), DType::Float);
        assert_eq!(a.to_scalars()[0], Scalar::Float(1.0));
    }

    #[test]
    fn test_empty_sequence_is_float() {
        let a = coerce(Vec::<f64>::new()).unwrap();
        assert_eq!(a.shape(), &[0]);
        assert_eq!(a.dtype(), DType::Float);
    }

    #[test]
    fn test_ragged_rejected() {
        let err = coerce(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, Error::Ragged { .. }));
        assert!(err.is_value_error());
    }

    #[test]
    fn test_text_rejected_as_type_error() {
        let input = ArrayLike::Sequence(vec![1.into(), "two".into()]);
        let err = coerce(input).unwrap_err();
        assert!(matches!(err, Error::NotNumeric { .. }));
        assert!(err.is_type_error());
    }

    #[test]
    fn test_complex_requires_opt_out() {
        let c = Complex64::new(1.0, 2.0);
        assert!(matches!(coerce(vec![c]), Err(Error::NotReal { .. })));
        let options = CoerceOptions { must_be_real: false, ..CoerceOptions::default() };
        let a = to_numeric_array(vec![c], &options, "Array").unwrap();
        assert_eq!(a.dtype(), DType::Complex);
    }

    #[test]
    fn test_array_passes_through_without_copy() {
        let original = NumericArray::from_vec(vec![1.0, 2.0]);
        let out = coerce(&original).unwrap();
        assert!(out.shares_storage_with(&original));

        let options = CoerceOptions { copy: true, ..CoerceOptions::default() };
        let copied = to_numeric_array(&original, &options, "Array").unwrap();
        assert!(!copied.shares_storage_with(&original));
        assert_eq!(copied, original);
    }

    #[test]
    fn test_read_only_array_copied_without_as_any() {
        let view = NumericArray::from_scalar(Scalar::Int(1)).broadcast(&[3]).unwrap();
        let options = CoerceOptions { as_any: false, ..CoerceOptions::default() };
        let out = to_numeric_array(&view, &options, "Array").unwrap();
        assert!(!out.is_read_only());
        assert!(coerce(&view).unwrap().is_read_only());
    }

    #[test]
    fn test_sequence_of_arrays() {
        let row = NumericArray::from_vec(vec![1_i64, 2, 3]);
        let a = coerce(vec![row.clone(), row]).unwrap();
        assert_eq!(a.shape(), &[2, 3]);
    }

    #[test]
    fn test_tuple_input() {
        let a = coerce((-5, 5.0)).unwrap();
        assert_eq!(a.to_scalars(), vec![Scalar::Float(-5.0), Scalar::Float(5.0)]);
    }
}
