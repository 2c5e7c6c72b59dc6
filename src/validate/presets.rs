//! Validators for common shape classes.
//!
//! Each preset locks the shape, reshape and broadcast settings of
//! [`validate_array`] for its class and forwards everything else through an
//! embedded [`Constraints`]. Locked settings have no setter.

use crate::array::NumericArray;
use crate::check::SortSpec;
use crate::dtype::{DType, Scalar};
use crate::error::Result;
use crate::input::ArrayLike;
use crate::shape::{Dim, ShapePattern, ShapeSpec};

use super::{validate_array, ArrayValidation, Constraints};

macro_rules! option_setters {
    (reshape) => {
        /// Accept shapes that can be reshaped into this validator's class.
        #[must_use]
        pub fn reshape(mut self, enabled: bool) -> Self {
            self.reshape = enabled;
            self
        }
    };
    (constraints) => {
        /// Constraints forwarded to [`validate_array`].
        #[must_use]
        pub fn constraints(mut self, constraints: Constraints) -> Self {
            self.constraints = constraints;
            self
        }
    };
    (sorted) => {
        /// Require sorted values.
        #[must_use]
        pub fn must_be_sorted(mut self, spec: SortSpec) -> Self {
            self.must_be_sorted = Some(spec);
            self
        }
    };
    (dtype_out) => {
        /// Cast the result to `dtype`.
        #[must_use]
        pub fn dtype_out(mut self, dtype: DType) -> Self {
            self.dtype_out = Some(dtype);
            self
        }
    };
    ($($which:tt),+) => {
        $(option_setters!($which);)+
    };
}

/// Options of [`validate_number`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumberOptions {
    reshape: bool,
    constraints: Constraints,
    dtype_out: Option<DType>,
}

impl Default for NumberOptions {
    fn default() -> Self {
        Self { reshape: true, constraints: Constraints::new().must_be_finite(true), dtype_out: None }
    }
}

impl NumberOptions {
    /// Options accepting a finite real number or a one-element vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    option_setters!(reshape, constraints, dtype_out);
}

/// Validate a single real number.
///
/// Accepts a 0-d value, or also a one-element vector when reshaping. Finite
/// values are required unless the constraints say otherwise.
///
/// ```rust
/// use viz_validate::prelude::*;
///
/// let n = validate_number(vec![42.0], &NumberOptions::default()).unwrap();
/// assert_eq!(n, Scalar::Float(42.0));
/// ```
///
/// # Errors
///
/// Returns a shape error for anything with more than one element, or the
/// first failing forwarded constraint.
pub fn validate_number(input: impl Into<ArrayLike>, options: &NumberOptions) -> Result<Scalar> {
    let shape: ShapeSpec = if options.reshape {
        ShapeSpec::any_of([ShapePattern::scalar(), ShapePattern::vector(1)])
    } else {
        ShapePattern::scalar().into()
    };
    let mut config = ArrayValidation::new()
        .constraints(options.constraints.clone().named_or("Number"))
        .must_have_shape(shape);
    if options.reshape {
        config = config.reshape_to(ShapePattern::scalar());
    }
    if let Some(dtype) = options.dtype_out {
        config = config.dtype_out(dtype);
    }
    validate_array(input, &config)?.to_scalar()
}

/// Options of [`validate_array3`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Array3Options {
    reshape: bool,
    broadcast: bool,
    constraints: Constraints,
    must_be_sorted: Option<SortSpec>,
    dtype_out: Option<DType>,
}

impl Default for Array3Options {
    fn default() -> Self {
        Self {
            reshape: true,
            broadcast: false,
            constraints: Constraints::default(),
            must_be_sorted: None,
            dtype_out: None,
        }
    }
}

impl Array3Options {
    /// Options accepting `(3,)`, `(1, 3)` and `(3, 1)`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a single value and repeat it three times.
    #[must_use]
    pub fn broadcast(mut self, enabled: bool) -> Self {
        self.broadcast = enabled;
        self
    }

    option_setters!(reshape, constraints, sorted, dtype_out);
}

/// Validate a vector of three values, returned with shape `(3,)`.
///
/// # Errors
///
/// Returns a shape error for inputs outside the accepted shapes, or the
/// first failing forwarded constraint.
pub fn validate_array3(input: impl Into<ArrayLike>, options: &Array3Options) -> Result<NumericArray> {
    let mut shapes = vec![ShapePattern::vector(3)];
    let mut config = ArrayValidation::new().constraints(options.constraints.clone());
    if options.reshape {
        shapes.push(ShapePattern::from([1, 3]));
        shapes.push(ShapePattern::from([3, 1]));
        config = config.reshape_to(Dim::Any);
    }
    if options.broadcast {
        shapes.push(ShapePattern::scalar());
        shapes.push(ShapePattern::vector(1));
        config = config.broadcast_to([3]);
    }
    let config = finish(config.must_have_shape(shapes), options.must_be_sorted, options.dtype_out);
    validate_array(input, &config)
}

/// Options of [`validate_arrayN`] and [`validate_arrayNx3`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VectorOptions {
    reshape: bool,
    constraints: Constraints,
    must_be_sorted: Option<SortSpec>,
    dtype_out: Option<DType>,
}

impl Default for VectorOptions {
    fn default() -> Self {
        Self { reshape: true, constraints: Constraints::default(), must_be_sorted: None, dtype_out: None }
    }
}

impl VectorOptions {
    /// Options with reshaping enabled and no other constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    option_setters!(reshape, constraints, sorted, dtype_out);
}

/// Validate a one-dimensional array, returned with shape `(N,)`.
///
/// When reshaping, `()`, `(1, N)` and `(N, 1)` are accepted as well.
///
/// # Errors
///
/// Returns a shape error for inputs outside the accepted shapes, or the
/// first failing forwarded constraint.
#[allow(non_snake_case)]
pub fn validate_arrayN(input: impl Into<ArrayLike>, options: &VectorOptions) -> Result<NumericArray> {
    let config = vector_config(options.reshape, options.constraints.clone());
    let config = finish(config, options.must_be_sorted, options.dtype_out);
    validate_array(input, &config)
}

/// Options of [`validate_arrayN_uintlike`].
///
/// Integer-like and nonnegative values are always required and the output is
/// always [`DType::Int`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UintLikeOptions {
    reshape: bool,
    constraints: Constraints,
    must_be_sorted: Option<SortSpec>,
}

impl Default for UintLikeOptions {
    fn default() -> Self {
        Self { reshape: true, constraints: Constraints::default(), must_be_sorted: None }
    }
}

impl UintLikeOptions {
    /// Options with reshaping enabled and no other constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    option_setters!(reshape, constraints, sorted);
}

/// Validate a one-dimensional array of nonnegative integer-like values.
///
/// Floats such as `2.0` are accepted and the result is cast to
/// [`DType::Int`].
///
/// ```rust
/// use viz_validate::prelude::*;
///
/// let ids = validate_arrayN_uintlike((1.0, 2.0, 3.0), &UintLikeOptions::default()).unwrap();
/// assert_eq!(ids.dtype(), DType::Int);
/// assert!(validate_arrayN_uintlike(vec![1.5], &UintLikeOptions::default()).is_err());
/// ```
///
/// # Errors
///
/// Same as [`validate_arrayN`], plus [`Error::Negative`](crate::Error::Negative),
/// [`Error::NotIntegerLike`](crate::Error::NotIntegerLike) and
/// [`Error::CastOverflow`](crate::Error::CastOverflow). Constraints that
/// explicitly disable the integer or nonnegative check fail with
/// [`Error::InvalidConfig`](crate::Error::InvalidConfig).
#[allow(non_snake_case)]
pub fn validate_arrayN_uintlike(
    input: impl Into<ArrayLike>,
    options: &UintLikeOptions,
) -> Result<NumericArray> {
    let constraints = options.constraints.clone().lock_integer_nonnegative()?;
    let config = vector_config(options.reshape, constraints);
    let config = finish(config, options.must_be_sorted, Some(DType::Int));
    validate_array(input, &config)
}

/// Validate an array of 3D points, returned with shape `(N, 3)`.
///
/// When reshaping, a single `(3,)` vector is accepted and returned as
/// `(1, 3)`.
///
/// # Errors
///
/// Returns a shape error for inputs outside the accepted shapes, or the
/// first failing forwarded constraint.
#[allow(non_snake_case)]
pub fn validate_arrayNx3(input: impl Into<ArrayLike>, options: &VectorOptions) -> Result<NumericArray> {
    let rows = ShapePattern::from([Dim::Any, Dim::Fixed(3)]);
    let mut config = ArrayValidation::new().constraints(options.constraints.clone());
    config = if options.reshape {
        config
            .must_have_shape(vec![ShapePattern::vector(3), rows.clone()])
            .reshape_to(rows)
    } else {
        config.must_have_shape(rows)
    };
    let config = finish(config, options.must_be_sorted, options.dtype_out);
    validate_array(input, &config)
}

/// Options of [`validate_data_range`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataRangeOptions {
    constraints: Constraints,
    dtype_out: Option<DType>,
}

impl DataRangeOptions {
    /// Options requiring only an ascending pair.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    option_setters!(constraints, dtype_out);
}

/// Validate a `(lower, upper)` range with `lower <= upper`.
///
/// ```rust
/// use viz_validate::prelude::*;
///
/// let (lo, hi) = validate_data_range([-5, 5], &DataRangeOptions::default()).unwrap();
/// assert_eq!((lo, hi), (Scalar::Int(-5), Scalar::Int(5)));
/// assert!(validate_data_range([5, -5], &DataRangeOptions::default()).is_err());
/// ```
///
/// # Errors
///
/// Returns a shape error unless the input has exactly two values,
/// [`Error::NotSorted`](crate::Error::NotSorted) if they are descending, or
/// the first failing forwarded constraint.
pub fn validate_data_range(
    input: impl Into<ArrayLike>,
    options: &DataRangeOptions,
) -> Result<(Scalar, Scalar)> {
    let config = ArrayValidation::new()
        .constraints(options.constraints.clone().named_or("Data Range"))
        .must_have_shape(2);
    let config = finish(config, Some(SortSpec::ascending()), options.dtype_out);
    let scalars = validate_array(input, &config)?.to_scalars();
    Ok((scalars[0], scalars[1]))
}

fn vector_config(reshape: bool, constraints: Constraints) -> ArrayValidation {
    let config = ArrayValidation::new().constraints(constraints);
    if reshape {
        config
            .must_have_shape(vec![
                ShapePattern::scalar(),
                ShapePattern::any_vector(),
                ShapePattern::from([Dim::Fixed(1), Dim::Any]),
                ShapePattern::from([Dim::Any, Dim::Fixed(1)]),
            ])
            .reshape_to(Dim::Any)
    } else {
        config.must_have_shape(Dim::Any)
    }
}

fn finish(mut config: ArrayValidation, sorted: Option<SortSpec>, dtype_out: Option<DType>) -> ArrayValidation {
    if let Some(spec) = sorted {
        config = config.must_be_sorted(spec);
    }
    if let Some(dtype) = dtype_out {
        config = config.dtype_out(dtype);
    }
    config
}
