//! Constraint checkers.
//!
//! Each checker tests one property of a canonical array and reports a
//! violation as an [`Error`] carrying the caller-supplied name. Checkers are
//! independent of each other; [`validate_array`](crate::validate_array)
//! fixes the order in which it runs them.

use ndarray::Axis;

use crate::array::NumericArray;
use crate::dtype::{DType, DTypeClass};
use crate::error::{format_shape, Error, Result};
use crate::shape::ShapeSpec;

/// Length requirement along the first axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LengthSpec {
    /// Allowed exact lengths. Empty means any length.
    pub exact: Vec<usize>,
    /// Minimum length (inclusive).
    pub min: Option<usize>,
    /// Maximum length (inclusive).
    pub max: Option<usize>,
}

impl LengthSpec {
    /// Whether any requirement is set.
    #[must_use]
    pub fn is_constrained(&self) -> bool {
        !self.exact.is_empty() || self.min.is_some() || self.max.is_some()
    }
}

/// Sortedness requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortSpec {
    /// Ascending (`true`) or descending order.
    pub ascending: bool,
    /// Forbid equal neighbours.
    pub strict: bool,
    /// Axis to check along; negative values count from the end and `None`
    /// checks the flattened array.
    pub axis: Option<isize>,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self { ascending: true, strict: false, axis: Some(-1) }
    }
}

impl SortSpec {
    /// Non-strict ascending order along the last axis.
    #[must_use]
    pub fn ascending() -> Self {
        Self::default()
    }

    /// Non-strict descending order along the last axis.
    #[must_use]
    pub fn descending() -> Self {
        Self { ascending: false, ..Self::default() }
    }

    /// Forbid equal neighbours.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Check along `axis`.
    #[must_use]
    pub fn axis(mut self, axis: isize) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Check the flattened array.
    #[must_use]
    pub fn flattened(mut self) -> Self {
        self.axis = None;
        self
    }

    fn describe(self) -> String {
        let dir = if self.ascending { "ascending" } else { "descending" };
        if self.strict {
            format!("strict {dir}")
        } else {
            dir.to_string()
        }
    }

    fn in_order(self, a: f64, b: f64) -> bool {
        match (self.ascending, self.strict) {
            (true, false) => a <= b,
            (true, true) => a < b,
            (false, false) => a >= b,
            (false, true) => a > b,
        }
    }
}

fn unordered(array: &NumericArray, check: &'static str, name: &str) -> Error {
    Error::UnorderedDType { name: name.to_string(), dtype: array.dtype().to_string(), check }
}

/// Check that `dtype` is a subtype of at least one of `allowed`.
pub fn check_subdtype(dtype: DType, allowed: &[DTypeClass], name: &str) -> Result<()> {
    if allowed.iter().any(|class| class.contains(dtype)) {
        return Ok(());
    }
    let allowed: Vec<String> = allowed.iter().map(ToString::to_string).collect();
    Err(Error::DTypeMismatch {
        name: name.to_string(),
        dtype: dtype.to_string(),
        allowed: allowed.join(" or "),
    })
}

/// Check that the array holds real numbers.
pub fn check_real(array: &NumericArray, name: &str) -> Result<()> {
    if array.dtype().is_real() {
        Ok(())
    } else {
        Err(Error::NotReal { name: name.to_string() })
    }
}

/// Check that the array's shape matches one of the patterns in `spec`.
pub fn check_shape(array: &NumericArray, spec: &ShapeSpec, name: &str) -> Result<()> {
    if spec.matches(array.shape()) {
        return Ok(());
    }
    Err(Error::ShapeMismatch {
        name: name.to_string(),
        shape: format_shape(array.shape()),
        allowed: spec.to_string(),
    })
}

/// Check the array's length along its first axis.
///
/// With `allow_scalar`, 0-dimensional arrays have length 1; otherwise they
/// fail.
pub fn check_length(
    array: &NumericArray,
    spec: &LengthSpec,
    allow_scalar: bool,
    name: &str,
) -> Result<()> {
    if let (Some(min), Some(max)) = (spec.min, spec.max) {
        if min > max {
            return Err(Error::InvalidConfig {
                name: name.to_string(),
                parameter: "must_have_min_length",
                reason: format!("minimum length {min} exceeds maximum length {max}"),
            });
        }
    }

    let length = match array.shape().first() {
        Some(&n) => n,
        None if allow_scalar => 1,
        None => {
            return Err(Error::Length {
                name: name.to_string(),
                length: 0,
                requirement: "at least one dimension (scalars have no length)".to_string(),
            })
        }
    };

    let fail = |requirement: String| Error::Length { name: name.to_string(), length, requirement };

    if !spec.exact.is_empty() && !spec.exact.contains(&length) {
        let requirement = match spec.exact.as_slice() {
            [one] => format!("length {one}"),
            many => {
                let parts: Vec<String> = many.iter().map(ToString::to_string).collect();
                format!("one of lengths [{}]", parts.join(", "))
            }
        };
        return Err(fail(requirement));
    }
    if let Some(min) = spec.min {
        if length < min {
            return Err(fail(format!("a minimum length of {min}")));
        }
    }
    if let Some(max) = spec.max {
        if length > max {
            return Err(fail(format!("a maximum length of {max}")));
        }
    }
    Ok(())
}

/// Check that every element is `>= 0`.
pub fn check_nonnegative(array: &NumericArray, name: &str) -> Result<()> {
    let values = array.real_view().ok_or_else(|| unordered(array, "non-negative values", name))?;
    if values.iter().all(|&x| x >= 0.0) {
        Ok(())
    } else {
        Err(Error::Negative { name: name.to_string() })
    }
}

/// Check that no element is infinite or NaN.
pub fn check_finite(array: &NumericArray, name: &str) -> Result<()> {
    let finite = match array.dtype() {
        DType::Bool | DType::Int => true,
        DType::Float => array.as_array::<f64>().is_some_and(|a| a.iter().all(|x| x.is_finite())),
        DType::Complex => array.complex_view().is_some_and(|a| a.iter().all(|c| c.is_finite())),
    };
    if finite {
        Ok(())
    } else {
        Err(Error::NonFinite { name: name.to_string() })
    }
}

/// Check that every element equals its own floor.
///
/// Integer and boolean arrays always pass. Float arrays pass when every
/// element is a finite whole number.
pub fn check_integer(array: &NumericArray, name: &str) -> Result<()> {
    let integer_like = match array.dtype() {
        DType::Bool | DType::Int => true,
        DType::Float => array
            .as_array::<f64>()
            .is_some_and(|a| a.iter().all(|x| x.is_finite() && *x == x.floor())),
        DType::Complex => return Err(unordered(array, "integer-like values", name)),
    };
    if integer_like {
        Ok(())
    } else {
        Err(Error::NotIntegerLike { name: name.to_string() })
    }
}

/// Check that a cast to [`DType::Int`] keeps every value.
///
/// Float and complex values must be finite with a real part inside the
/// `i64` range; `as` casts would otherwise saturate.
pub(crate) fn check_int_representable(array: &NumericArray, name: &str) -> Result<()> {
    // 2^63 is exactly representable, i64::MAX is not.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let fits = |x: f64| x.is_finite() && (-LIMIT..LIMIT).contains(&x);
    let representable = match array.dtype() {
        DType::Bool | DType::Int => true,
        DType::Float => array.as_array::<f64>().is_some_and(|a| a.iter().all(|&x| fits(x))),
        DType::Complex => array.complex_view().is_some_and(|a| a.iter().all(|c| fits(c.re))),
    };
    if representable {
        Ok(())
    } else {
        Err(Error::CastOverflow { name: name.to_string(), dtype: DType::Int.to_string() })
    }
}

/// Check that every element lies within `[min, max]`.
///
/// `strict_lower` and `strict_upper` exclude the respective bound. Use
/// infinite bounds for half-open ranges.
pub fn check_range(
    array: &NumericArray,
    range: [f64; 2],
    strict_lower: bool,
    strict_upper: bool,
    name: &str,
) -> Result<()> {
    let [min, max] = range;
    if min.is_nan() || max.is_nan() || min > max {
        return Err(Error::InvalidConfig {
            name: name.to_string(),
            parameter: "must_be_in_range",
            reason: format!("range [{min}, {max}] must be an ordered pair of numbers"),
        });
    }

    let values = array.real_view().ok_or_else(|| unordered(array, "range", name))?;
    let above_min = |x: f64| if strict_lower { x > min } else { x >= min };
    let below_max = |x: f64| if strict_upper { x < max } else { x <= max };
    if values.iter().all(|&x| above_min(x) && below_max(x)) {
        return Ok(());
    }

    let requirement = match (strict_lower, strict_upper) {
        (false, false) => format!("in range [{min}, {max}]"),
        (true, false) => format!("in range ({min}, {max}]"),
        (false, true) => format!("in range [{min}, {max})"),
        (true, true) => format!("in range ({min}, {max})"),
    };
    Err(Error::OutOfRange { name: name.to_string(), requirement })
}

/// Check that elements are monotonic along the axis given by `spec`.
///
/// Arrays with fewer than two elements are always sorted.
pub fn check_sorted(array: &NumericArray, spec: &SortSpec, name: &str) -> Result<()> {
    let values = array.real_view().ok_or_else(|| unordered(array, "sortedness", name))?;
    if values.len() < 2 {
        return Ok(());
    }

    let sorted = match spec.axis {
        None => {
            let flat: Vec<f64> = values.iter().copied().collect();
            flat.windows(2).all(|w| spec.in_order(w[0], w[1]))
        }
        Some(axis) => {
            let ndim = values.ndim() as isize;
            let resolved = if axis < 0 { axis + ndim } else { axis };
            if resolved < 0 || resolved >= ndim {
                return Err(Error::InvalidConfig {
                    name: name.to_string(),
                    parameter: "must_be_sorted",
                    reason: format!("axis {axis} is out of bounds for array of dimension {ndim}"),
                });
            }
            values.lanes(Axis(resolved as usize)).into_iter().all(|lane| {
                lane.iter().zip(lane.iter().skip(1)).all(|(&a, &b)| spec.in_order(a, b))
            })
        }
    };

    if sorted {
        Ok(())
    } else {
        Err(Error::NotSorted { name: name.to_string(), order: spec.describe() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::Scalar;
    use crate::shape::{Dim, ShapePattern};
    use ndarray::arr2;
    use num_complex::Complex64;

    fn floats(v: &[f64]) -> NumericArray {
        NumericArray::from_vec(v.to_vec())
    }

    #[test]
    fn test_check_subdtype() {
        assert!(check_subdtype(DType::Int, &[DTypeClass::Integer], "a").is_ok());
        assert!(check_subdtype(DType::Int, &[DTypeClass::Floating, DTypeClass::Number], "a").is_ok());
        let err = check_subdtype(DType::Float, &[DTypeClass::Integer, DTypeClass::Bool], "a")
            .unwrap_err();
        assert!(err.is_type_error());
        assert!(err.to_string().contains("integer or bool"));
    }

    #[test]
    fn test_check_shape() {
        let a = NumericArray::from(arr2(&[[1.0, 2.0, 3.0]]));
        assert!(check_shape(&a, &ShapeSpec::from([Dim::Any, Dim::Fixed(3)]), "a").is_ok());
        let err = check_shape(&a, &ShapeSpec::from(3), "Vector").unwrap_err();
        assert!(err.to_string().contains("(1, 3)"));
        assert!(err.to_string().contains("(3,)"));
        assert!(check_shape(&a, &ShapeSpec::from(ShapePattern::scalar()), "a").is_err());
    }

    #[test]
    fn test_check_length() {
        let a = floats(&[1.0, 2.0, 3.0]);
        let exact = LengthSpec { exact: vec![2, 3], ..LengthSpec::default() };
        assert!(check_length(&a, &exact, false, "a").is_ok());
        let min = LengthSpec { min: Some(4), ..LengthSpec::default() };
        assert!(matches!(check_length(&a, &min, false, "a"), Err(Error::Length { length: 3, .. })));
        let max = LengthSpec { max: Some(2), ..LengthSpec::default() };
        assert!(check_length(&a, &max, false, "a").is_err());
    }

    #[test]
    fn test_check_length_scalar() {
        let s = NumericArray::from_scalar(Scalar::Float(1.0));
        let one = LengthSpec { exact: vec![1], ..LengthSpec::default() };
        assert!(check_length(&s, &one, true, "a").is_ok());
        assert!(check_length(&s, &one, false, "a").is_err());
    }

    #[test]
    fn test_check_length_inverted_bounds() {
        let spec = LengthSpec { min: Some(3), max: Some(1), ..LengthSpec::default() };
        let err = check_length(&floats(&[1.0]), &spec, true, "a").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_check_nonnegative() {
        assert!(check_nonnegative(&floats(&[0.0, 1.0]), "a").is_ok());
        assert!(check_nonnegative(&floats(&[0.0, -1e-9]), "a").is_err());
        assert!(check_nonnegative(&floats(&[f64::NAN]), "a").is_err());
        assert!(check_nonnegative(&NumericArray::from_vec(vec![true]), "a").is_ok());
    }

    #[test]
    fn test_check_finite() {
        assert!(check_finite(&floats(&[1.0, 2.0]), "a").is_ok());
        assert!(check_finite(&floats(&[1.0, f64::INFINITY]), "a").is_err());
        assert!(check_finite(&floats(&[f64::NAN]), "a").is_err());
        assert!(check_finite(&NumericArray::from_vec(vec![i64::MAX]), "a").is_ok());
        let c = NumericArray::from_vec(vec![Complex64::new(1.0, f64::NAN)]);
        assert!(check_finite(&c, "a").is_err());
    }

    #[test]
    fn test_check_integer() {
        assert!(check_integer(&floats(&[1.0, -2.0, 0.0]), "a").is_ok());
        assert!(check_integer(&floats(&[1.5]), "a").is_err());
        assert!(check_integer(&floats(&[f64::INFINITY]), "a").is_err());
        assert!(check_integer(&NumericArray::from_vec(vec![3_i64]), "a").is_ok());
    }

    #[test]
    fn test_check_range_bounds() {
        let a = floats(&[0.0, 5.0, 10.0]);
        assert!(check_range(&a, [0.0, 10.0], false, false, "a").is_ok());
        assert!(check_range(&a, [0.0, 10.0], true, false, "a").is_err());
        assert!(check_range(&a, [0.0, 10.0], false, true, "a").is_err());
        assert!(check_range(&a, [f64::NEG_INFINITY, f64::INFINITY], true, true, "a").is_ok());
    }

    #[test]
    fn test_check_range_message() {
        let err = check_range(&floats(&[11.0]), [0.0, 10.0], true, false, "Opacity").unwrap_err();
        assert_eq!(err.to_string(), "Opacity values must all be in range (0, 10]");
    }

    #[test]
    fn test_check_range_inverted() {
        let err = check_range(&floats(&[1.0]), [2.0, 1.0], false, false, "a").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { parameter: "must_be_in_range", .. }));
    }

    #[test]
    fn test_check_sorted_default() {
        assert!(check_sorted(&floats(&[1.0, 1.0, 2.0]), &SortSpec::default(), "a").is_ok());
        assert!(check_sorted(&floats(&[2.0, 1.0]), &SortSpec::default(), "a").is_err());
        let strict = SortSpec::ascending().strict();
        assert!(check_sorted(&floats(&[1.0, 1.0]), &strict, "a").is_err());
    }

    #[test]
    fn test_check_sorted_descending() {
        let spec = SortSpec::descending();
        assert!(check_sorted(&floats(&[3.0, 2.0, 2.0]), &spec, "a").is_ok());
        let err = check_sorted(&floats(&[3.0, 2.0, 2.0]), &spec.strict(), "a").unwrap_err();
        assert!(err.to_string().contains("strict descending"));
    }

    #[test]
    fn test_check_sorted_axes() {
        // Rows ascending, columns not.
        let a = NumericArray::from(arr2(&[[1.0, 2.0], [0.0, 5.0]]));
        assert!(check_sorted(&a, &SortSpec::default(), "a").is_ok());
        assert!(check_sorted(&a, &SortSpec::default().axis(0), "a").is_err());
        assert!(check_sorted(&a, &SortSpec::default().flattened(), "a").is_err());
        let err = check_sorted(&a, &SortSpec::default().axis(2), "a").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_check_sorted_trivial() {
        let s = NumericArray::from_scalar(Scalar::Float(1.0));
        assert!(check_sorted(&s, &SortSpec::default(), "a").is_ok());
    }

    #[test]
    fn test_order_checks_reject_complex() {
        let c = NumericArray::from_vec(vec![Complex64::new(1.0, 1.0)]);
        assert!(check_nonnegative(&c, "a").unwrap_err().is_type_error());
        assert!(check_range(&c, [0.0, 1.0], false, false, "a").unwrap_err().is_type_error());
        assert!(check_sorted(&c, &SortSpec::default(), "a").unwrap_err().is_type_error());
        assert!(check_real(&c, "a").is_err());
    }
}
