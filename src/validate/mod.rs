//! The `validate_array` orchestrator and its configuration.
//!
//! Validation runs in a fixed order:
//!
//! 1. coerce the input to a canonical array
//! 2. dtype family check
//! 3. shape check against the input shape
//! 4. reshape
//! 5. broadcast (read-only result)
//! 6. length check against the final shape
//! 7. nonnegative, finite, integer-like, range, sorted
//! 8. dtype cast
//!
//! Shape is checked before any transformation so that a malformed input is
//! never masked by a reshape; length is checked after, so it refers to the
//! shape the caller gets back.

mod axes;
mod presets;
mod transform;

pub use axes::{validate_axes, AxesOptions, Handedness};
pub use presets::{
    validate_array3, validate_arrayN, validate_arrayN_uintlike, validate_arrayNx3,
    validate_data_range, validate_number, Array3Options, DataRangeOptions, NumberOptions,
    UintLikeOptions, VectorOptions,
};
pub use transform::{
    validate_transform3x3, validate_transform4x4, Matrix3x3, Matrix4x4, MatrixElements,
    Transform, TransformInput, TransformSource,
};

use crate::array::NumericArray;
use crate::check::{
    check_finite, check_int_representable, check_integer, check_length, check_nonnegative,
    check_range, check_shape, check_sorted, check_subdtype, LengthSpec, SortSpec,
};
use crate::dtype::{DType, DTypeClass};
use crate::error::{format_shape, Error, Result};
use crate::input::{to_numeric_array, ArrayLike, CoerceOptions};
use crate::output::{OutputForm, Validated};
use crate::shape::{ResolveError, ShapePattern, ShapeSpec};

/// Name used in error messages when none is given.
pub const DEFAULT_NAME: &str = "Array";

/// Constraints that every validator forwards to [`validate_array`].
///
/// Defaults: real numbers required, no copy, existing arrays passed
/// through, no other checks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct Constraints {
    name: Option<String>,
    must_have_dtype: Vec<DTypeClass>,
    length: LengthSpec,
    must_be_nonnegative: Option<bool>,
    must_be_finite: bool,
    must_be_real: bool,
    must_be_integer: Option<bool>,
    must_be_in_range: Option<[f64; 2]>,
    strict_lower_bound: bool,
    strict_upper_bound: bool,
    copy: bool,
    as_any: bool,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            name: None,
            must_have_dtype: Vec::new(),
            length: LengthSpec::default(),
            must_be_nonnegative: None,
            must_be_finite: false,
            must_be_real: true,
            must_be_integer: None,
            must_be_in_range: None,
            strict_lower_bound: false,
            strict_upper_bound: false,
            copy: false,
            as_any: true,
        }
    }
}

impl Constraints {
    /// Create default constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name used in error messages.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Require the dtype to be a subtype of one of `classes`.
    #[must_use]
    pub fn must_have_dtype(mut self, classes: impl IntoIterator<Item = DTypeClass>) -> Self {
        self.must_have_dtype = classes.into_iter().collect();
        self
    }

    /// Require an exact length.
    #[must_use]
    pub fn must_have_length(mut self, length: usize) -> Self {
        self.length.exact = vec![length];
        self
    }

    /// Require the length to be one of `lengths`.
    #[must_use]
    pub fn must_have_length_in(mut self, lengths: impl IntoIterator<Item = usize>) -> Self {
        self.length.exact = lengths.into_iter().collect();
        self
    }

    /// Require a minimum length.
    #[must_use]
    pub fn must_have_min_length(mut self, length: usize) -> Self {
        self.length.min = Some(length);
        self
    }

    /// Require a maximum length.
    #[must_use]
    pub fn must_have_max_length(mut self, length: usize) -> Self {
        self.length.max = Some(length);
        self
    }

    /// Require all values to be `>= 0`.
    #[must_use]
    pub fn must_be_nonnegative(mut self, enabled: bool) -> Self {
        self.must_be_nonnegative = Some(enabled);
        self
    }

    /// Require all values to be finite.
    #[must_use]
    pub fn must_be_finite(mut self, enabled: bool) -> Self {
        self.must_be_finite = enabled;
        self
    }

    /// Require real numbers (default `true`).
    #[must_use]
    pub fn must_be_real(mut self, enabled: bool) -> Self {
        self.must_be_real = enabled;
        self
    }

    /// Require integer-like values.
    #[must_use]
    pub fn must_be_integer(mut self, enabled: bool) -> Self {
        self.must_be_integer = Some(enabled);
        self
    }

    /// Require all values to lie in `[min, max]`.
    #[must_use]
    pub fn must_be_in_range(mut self, min: f64, max: f64) -> Self {
        self.must_be_in_range = Some([min, max]);
        self
    }

    /// Exclude the lower bound of the range.
    #[must_use]
    pub fn strict_lower_bound(mut self, enabled: bool) -> Self {
        self.strict_lower_bound = enabled;
        self
    }

    /// Exclude the upper bound of the range.
    #[must_use]
    pub fn strict_upper_bound(mut self, enabled: bool) -> Self {
        self.strict_upper_bound = enabled;
        self
    }

    /// Always return fresh storage.
    #[must_use]
    pub fn copy(mut self, enabled: bool) -> Self {
        self.copy = enabled;
        self
    }

    /// Pass existing arrays through by reference (default `true`).
    #[must_use]
    pub fn as_any(mut self, enabled: bool) -> Self {
        self.as_any = enabled;
        self
    }

    /// Name used in error messages.
    #[must_use]
    pub fn get_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Use `name` unless a name was already set.
    pub(crate) fn named_or(mut self, name: &str) -> Self {
        if self.name.is_none() {
            self.name = Some(name.to_string());
        }
        self
    }

    /// Force a flag a preset locks on, rejecting an explicit `false`.
    pub(crate) fn lock_integer_nonnegative(mut self) -> Result<Self> {
        let name = self.get_name().to_string();
        for (parameter, value) in [
            ("must_be_integer", &mut self.must_be_integer),
            ("must_be_nonnegative", &mut self.must_be_nonnegative),
        ] {
            if *value == Some(false) {
                return Err(Error::InvalidConfig {
                    name,
                    parameter,
                    reason: "this validator always requires it".to_string(),
                });
            }
            *value = Some(true);
        }
        Ok(self)
    }

    fn coerce_options(&self) -> CoerceOptions {
        CoerceOptions { must_be_real: self.must_be_real, copy: self.copy, as_any: self.as_any }
    }

    /// Value checks in their fixed order, up to but excluding sortedness.
    fn check_values(&self, array: &NumericArray, name: &str) -> Result<()> {
        if self.must_be_nonnegative == Some(true) {
            check_nonnegative(array, name)?;
        }
        if self.must_be_finite {
            check_finite(array, name)?;
        }
        if self.must_be_integer == Some(true) {
            check_integer(array, name)?;
        }
        if let Some(range) = self.must_be_in_range {
            check_range(array, range, self.strict_lower_bound, self.strict_upper_bound, name)?;
        }
        Ok(())
    }
}

/// Full configuration of [`validate_array`].
///
/// ```rust
/// use viz_validate::prelude::*;
///
/// let config = ArrayValidation::new()
///     .must_have_shape(Dim::Any)
///     .must_have_min_length(2)
///     .must_be_sorted(SortSpec::ascending().strict())
///     .must_be_in_range(0.0, 20.0);
/// let array = validate_array(vec![1, 2, 3, 5, 8, 13], &config).unwrap();
/// assert_eq!(array.shape(), &[6]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayValidation {
    constraints: Constraints,
    must_have_shape: Option<ShapeSpec>,
    reshape_to: Option<ShapePattern>,
    broadcast_to: Option<Vec<usize>>,
    must_be_sorted: Option<SortSpec>,
    dtype_out: Option<DType>,
    output: OutputForm,
}

macro_rules! forward_constraints {
    ($($(#[$doc:meta])* $method:ident($($arg:ident: $ty:ty),*);)*) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $method(mut self, $($arg: $ty),*) -> Self {
                self.constraints = self.constraints.$method($($arg),*);
                self
            }
        )*
    };
}

impl ArrayValidation {
    /// Create a configuration with no constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all forwarded constraints.
    #[must_use]
    pub fn constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    forward_constraints! {
        /// Set the name used in error messages.
        name(name: impl Into<String>);
        /// Require the dtype to be a subtype of one of `classes`.
        must_have_dtype(classes: impl IntoIterator<Item = DTypeClass>);
        /// Require an exact length.
        must_have_length(length: usize);
        /// Require the length to be one of `lengths`.
        must_have_length_in(lengths: impl IntoIterator<Item = usize>);
        /// Require a minimum length.
        must_have_min_length(length: usize);
        /// Require a maximum length.
        must_have_max_length(length: usize);
        /// Require all values to be `>= 0`.
        must_be_nonnegative(enabled: bool);
        /// Require all values to be finite.
        must_be_finite(enabled: bool);
        /// Require real numbers.
        must_be_real(enabled: bool);
        /// Require integer-like values.
        must_be_integer(enabled: bool);
        /// Require all values to lie in `[min, max]`.
        must_be_in_range(min: f64, max: f64);
        /// Exclude the lower bound of the range.
        strict_lower_bound(enabled: bool);
        /// Exclude the upper bound of the range.
        strict_upper_bound(enabled: bool);
        /// Always return fresh storage.
        copy(enabled: bool);
        /// Pass existing arrays through by reference.
        as_any(enabled: bool);
    }

    /// Require the input shape to match `spec`.
    #[must_use]
    pub fn must_have_shape(mut self, spec: impl Into<ShapeSpec>) -> Self {
        self.must_have_shape = Some(spec.into());
        self
    }

    /// Reshape to `target` after the shape check. One dimension may be
    /// [`Dim::Any`](crate::shape::Dim::Any).
    #[must_use]
    pub fn reshape_to(mut self, target: impl Into<ShapePattern>) -> Self {
        self.reshape_to = Some(target.into());
        self
    }

    /// Broadcast to `shape` after reshaping.
    ///
    /// The result is materialized: it holds one element per position of
    /// `shape` rather than a strided view of the input, and is read-only.
    #[must_use]
    pub fn broadcast_to(mut self, shape: impl IntoIterator<Item = usize>) -> Self {
        self.broadcast_to = Some(shape.into_iter().collect());
        self
    }

    /// Require sorted values.
    #[must_use]
    pub fn must_be_sorted(mut self, spec: SortSpec) -> Self {
        self.must_be_sorted = Some(spec);
        self
    }

    /// Cast the result to `dtype`.
    #[must_use]
    pub fn dtype_out(mut self, dtype: DType) -> Self {
        self.dtype_out = Some(dtype);
        self
    }

    /// Set the output form used by [`validate_array_output`].
    #[must_use]
    pub fn output(mut self, form: OutputForm) -> Self {
        self.output = form;
        self
    }

    /// Request list output. Has no effect if tuple output was requested.
    #[must_use]
    pub fn to_list(mut self) -> Self {
        if self.output != OutputForm::Tuple {
            self.output = OutputForm::List;
        }
        self
    }

    /// Request tuple output. Takes precedence over list output.
    #[must_use]
    pub fn to_tuple(mut self) -> Self {
        self.output = OutputForm::Tuple;
        self
    }

    /// Name used in error messages.
    #[must_use]
    pub fn get_name(&self) -> &str {
        self.constraints.get_name()
    }

    /// Requested output form.
    #[must_use]
    pub fn output_form(&self) -> OutputForm {
        self.output
    }
}

/// Validate `input` against `config` and return the canonical array.
///
/// The output form in `config` is ignored; use [`validate_array_output`] or
/// the conversions on [`NumericArray`] for other representations.
///
/// # Errors
///
/// Returns the first violated constraint, in the order documented on this
/// module.
pub fn validate_array(input: impl Into<ArrayLike>, config: &ArrayValidation) -> Result<NumericArray> {
    let name = config.get_name();
    let result = run(input.into(), config, name);
    if let Err(err) = &result {
        tracing::debug!(input = name, kind = ?err.kind(), error = %err, "array validation failed");
    }
    result
}

/// Validate `input` and convert the result to the configured output form.
///
/// # Errors
///
/// Same as [`validate_array`].
pub fn validate_array_output(
    input: impl Into<ArrayLike>,
    config: &ArrayValidation,
) -> Result<Validated> {
    let array = validate_array(input, config)?;
    Ok(Validated::from_array(array, config.output))
}

fn run(input: ArrayLike, config: &ArrayValidation, name: &str) -> Result<NumericArray> {
    let c = &config.constraints;

    let mut array = to_numeric_array(input, &c.coerce_options(), name)?;
    tracing::trace!(input = name, shape = ?array.shape(), dtype = %array.dtype(), "coerced");

    if !c.must_have_dtype.is_empty() {
        check_subdtype(array.dtype(), &c.must_have_dtype, name)?;
    }

    if let Some(spec) = &config.must_have_shape {
        check_shape(&array, spec, name)?;
    }

    if let Some(target) = &config.reshape_to {
        array = reshape(array, target, name)?;
    }

    if let Some(target) = &config.broadcast_to {
        if array.shape() != target.as_slice() {
            array = array.broadcast(target).ok_or_else(|| Error::Broadcast {
                name: name.to_string(),
                from: format_shape(array.shape()),
                to: format_shape(target),
            })?;
            tracing::trace!(input = name, shape = ?target, "broadcast");
        }
    }

    if c.length.is_constrained() {
        check_length(&array, &c.length, true, name)?;
    }

    c.check_values(&array, name)?;
    if let Some(spec) = &config.must_be_sorted {
        check_sorted(&array, spec, name)?;
    }

    if let Some(dtype) = config.dtype_out {
        if dtype != array.dtype() {
            tracing::trace!(input = name, from = %array.dtype(), to = %dtype, "cast");
            if dtype == DType::Int {
                check_int_representable(&array, name)?;
            }
            array = array.astype(dtype);
        }
    }
    Ok(array)
}

fn reshape(array: NumericArray, target: &ShapePattern, name: &str) -> Result<NumericArray> {
    let shape = target.resolve(array.len()).map_err(|e| match e {
        ResolveError::MultipleWildcards => Error::InvalidConfig {
            name: name.to_string(),
            parameter: "reshape_to",
            reason: format!("{target} has more than one wildcard dimension"),
        },
        ResolveError::Incompatible => Error::Reshape {
            name: name.to_string(),
            from: format_shape(array.shape()),
            to: target.to_string(),
        },
    })?;
    if shape == array.shape() {
        return Ok(array);
    }
    let reshaped = array.reshape(&shape).ok_or_else(|| Error::Reshape {
        name: name.to_string(),
        from: format_shape(array.shape()),
        to: target.to_string(),
    })?;
    tracing::trace!(input = name, from = ?array.shape(), to = ?shape, "reshaped");
    Ok(reshaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::Scalar;
    use crate::output::Nested;
    use crate::shape::Dim;
    use ndarray::arr2;

    #[test]
    fn test_default_passes_anything_real() {
        let a = validate_array(vec![vec![1.0, 2.0], vec![3.0, 4.0]], &ArrayValidation::new()).unwrap();
        assert_eq!(a.shape(), &[2, 2]);
    }

    #[test]
    fn test_shape_checked_before_reshape() {
        let config = ArrayValidation::new().must_have_shape([1, 3]).reshape_to([1, 3]);
        let err = validate_array([1.0, 2.0, 3.0], &config).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_reshape_with_wildcard() {
        let config = ArrayValidation::new().reshape_to([Dim::Any, Dim::Fixed(3)]);
        let a = validate_array(vec![1, 2, 3, 4, 5, 6], &config).unwrap();
        assert_eq!(a.shape(), &[2, 3]);
    }

    #[test]
    fn test_reshape_incompatible() {
        let config = ArrayValidation::new().reshape_to([Dim::Any, Dim::Fixed(4)]);
        let err = validate_array(vec![1, 2, 3], &config).unwrap_err();
        assert!(matches!(err, Error::Reshape { .. }));
        assert!(err.is_value_error());
    }

    #[test]
    fn test_reshape_two_wildcards_is_config_error() {
        let config = ArrayValidation::new().reshape_to([Dim::Any, Dim::Any]);
        let err = validate_array(vec![1, 2], &config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { parameter: "reshape_to", .. }));
    }

    #[test]
    fn test_broadcast_read_only() {
        let config = ArrayValidation::new().broadcast_to([2, 3]);
        let a = validate_array([1, 2, 3], &config).unwrap();
        assert_eq!(a.shape(), &[2, 3]);
        assert!(a.is_read_only());
        let err = validate_array([1, 2], &config).unwrap_err();
        assert!(matches!(err, Error::Broadcast { .. }));
    }

    #[test]
    fn test_length_uses_final_shape() {
        let config = ArrayValidation::new().reshape_to([Dim::Any, Dim::Fixed(2)]).must_have_length(2);
        assert!(validate_array([1, 2, 3, 4], &config).is_ok());
        let config = ArrayValidation::new().must_have_length(1);
        assert!(validate_array(5, &config).is_ok());
    }

    #[test]
    fn test_value_check_order() {
        // Negative and non-finite: nonnegative runs first.
        let config = ArrayValidation::new().must_be_nonnegative(true).must_be_finite(true);
        let err = validate_array([-1.0, f64::INFINITY], &config).unwrap_err();
        assert!(matches!(err, Error::Negative { .. }));

        // Out of range and unsorted: range runs before sorted.
        let config = ArrayValidation::new()
            .must_be_in_range(0.0, 1.0)
            .must_be_sorted(SortSpec::ascending());
        let err = validate_array([5.0, 2.0], &config).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
    }

    #[test]
    fn test_dtype_check_and_cast() {
        let config = ArrayValidation::new().must_have_dtype([DTypeClass::Integer]);
        assert!(validate_array([1.0], &config).unwrap_err().is_type_error());

        let config = ArrayValidation::new().dtype_out(DType::Int);
        let a = validate_array([1.9, 2.0], &config).unwrap();
        assert_eq!(a.to_scalars(), vec![Scalar::Int(1), Scalar::Int(2)]);
    }

    #[test]
    fn test_int_cast_rejects_unrepresentable_values() {
        let config = ArrayValidation::new().name("Counts").dtype_out(DType::Int);
        let err = validate_array([1e30], &config).unwrap_err();
        assert!(matches!(err, Error::CastOverflow { .. }));
        assert!(err.to_string().starts_with("Counts"));
        assert!(matches!(validate_array([f64::NAN], &config), Err(Error::CastOverflow { .. })));
        assert!(matches!(validate_array([-9.3e18], &config), Err(Error::CastOverflow { .. })));

        let edge = validate_array([-9_223_372_036_854_775_808.0], &config).unwrap();
        assert_eq!(edge.to_scalars(), vec![Scalar::Int(i64::MIN)]);
    }

    #[test]
    fn test_name_in_error() {
        let config = ArrayValidation::new().name("Opacity").must_be_in_range(0.0, 1.0);
        let err = validate_array(2.0, &config).unwrap_err();
        assert!(err.to_string().starts_with("Opacity"));
    }

    #[test]
    fn test_output_forms() {
        let list = ArrayValidation::new().to_list();
        let out = validate_array_output(arr2(&[[1_i64, 2]]), &list).unwrap();
        assert_eq!(
            out,
            Validated::List(vec![Nested::List(vec![
                Nested::Scalar(Scalar::Int(1)),
                Nested::Scalar(Scalar::Int(2))
            ])])
        );

        let scalar = validate_array_output(3.5, &list).unwrap();
        assert_eq!(scalar, Validated::Scalar(Scalar::Float(3.5)));

        let array = validate_array_output(3.5, &ArrayValidation::new()).unwrap();
        assert!(matches!(array, Validated::Array(_)));
    }

    #[test]
    fn test_tuple_takes_precedence() {
        assert_eq!(ArrayValidation::new().to_tuple().to_list().output_form(), OutputForm::Tuple);
        assert_eq!(ArrayValidation::new().to_list().to_tuple().output_form(), OutputForm::Tuple);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_roundtrips_through_json() {
        let config = ArrayValidation::new()
            .name("Points")
            .must_have_shape([Dim::Any, Dim::Fixed(3)])
            .must_be_in_range(-1.0, 1.0)
            .must_be_sorted(SortSpec::descending().flattened())
            .to_tuple();
        let json = serde_json::to_string(&config).unwrap();
        let back: ArrayValidation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_no_copy_fast_path() {
        let original = NumericArray::from_vec(vec![1.0, 2.0, 3.0]);
        let out = validate_array(&original, &ArrayValidation::new()).unwrap();
        assert!(out.shares_storage_with(&original));
        let out = validate_array(&original, &ArrayValidation::new().copy(true)).unwrap();
        assert!(!out.shares_storage_with(&original));
    }
}
