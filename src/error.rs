//! Error types for array validation.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of a validation failure.
///
/// `Type` covers inputs of the wrong kind (non-numeric elements, complex data
/// where real data is required, unrecognized transform objects). `Value`
/// covers inputs of the right kind that violate a declared constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong element kind or argument class.
    Type,
    /// Constraint violation.
    Value,
}

/// Errors that can occur while validating an array.
///
/// Every variant carries the caller-supplied name of the value being
/// validated, and its message starts with that name.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An element is not a number.
    #[error("{name} must be numeric, got {found}")]
    NotNumeric {
        /// Name of the validated value.
        name: String,
        /// Description of the offending element.
        found: String,
    },

    /// Complex data where real data is required.
    #[error("{name} must have real numbers")]
    NotReal {
        /// Name of the validated value.
        name: String,
    },

    /// Nested sequences do not form a rectangular array.
    #[error("{name} has an inhomogeneous shape: {detail}")]
    Ragged {
        /// Name of the validated value.
        name: String,
        /// Where the nesting diverged.
        detail: String,
    },

    /// Array dtype is not a subtype of any allowed family.
    #[error("{name} has incorrect dtype of {dtype}. The dtype must be a subtype of {allowed}")]
    DTypeMismatch {
        /// Name of the validated value.
        name: String,
        /// Actual dtype.
        dtype: String,
        /// Allowed dtype families.
        allowed: String,
    },

    /// An order-based check was requested on data without a total order.
    #[error("{name} has dtype {dtype} which cannot be checked for {check}")]
    UnorderedDType {
        /// Name of the validated value.
        name: String,
        /// Actual dtype.
        dtype: String,
        /// The check that could not run.
        check: &'static str,
    },

    /// Array shape matches none of the allowed patterns.
    #[error("{name} has shape {shape} which is not allowed. Shape must be one of {allowed}")]
    ShapeMismatch {
        /// Name of the validated value.
        name: String,
        /// Actual shape.
        shape: String,
        /// Allowed patterns.
        allowed: String,
    },

    /// Element count is incompatible with the reshape target.
    #[error("{name} with shape {from} cannot be reshaped to {to}")]
    Reshape {
        /// Name of the validated value.
        name: String,
        /// Shape before reshaping.
        from: String,
        /// Requested shape.
        to: String,
    },

    /// Shapes are incompatible under broadcasting rules.
    #[error("{name} with shape {from} cannot be broadcast to {to}")]
    Broadcast {
        /// Name of the validated value.
        name: String,
        /// Shape before broadcasting.
        from: String,
        /// Requested shape.
        to: String,
    },

    /// Length requirement not met.
    #[error("{name} must have {requirement}, got length {length}")]
    Length {
        /// Name of the validated value.
        name: String,
        /// Actual length.
        length: usize,
        /// Human-readable requirement.
        requirement: String,
    },

    /// Negative element where non-negative values are required.
    #[error("{name} must have non-negative values")]
    Negative {
        /// Name of the validated value.
        name: String,
    },

    /// Infinite or NaN element where finite values are required.
    #[error("{name} must have finite values")]
    NonFinite {
        /// Name of the validated value.
        name: String,
    },

    /// Element is not a whole number.
    #[error("{name} must have integer-like values")]
    NotIntegerLike {
        /// Name of the validated value.
        name: String,
    },

    /// Element lies outside the allowed range.
    #[error("{name} values must all be {requirement}")]
    OutOfRange {
        /// Name of the validated value.
        name: String,
        /// Human-readable bounds.
        requirement: String,
    },

    /// Elements are not monotonic along the checked axis.
    #[error("{name} must be sorted in {order} order")]
    NotSorted {
        /// Name of the validated value.
        name: String,
        /// Required order, e.g. "strict ascending".
        order: String,
    },

    /// A configuration parameter is invalid for this input.
    #[error("{name}: invalid parameter `{parameter}`: {reason}")]
    InvalidConfig {
        /// Name of the validated value.
        name: String,
        /// Offending parameter.
        parameter: &'static str,
        /// Why it is invalid.
        reason: String,
    },

    /// Wrong number of axes arguments.
    #[error(
        "{name}: incorrect number of axes arguments ({count}). Pass one array, two vectors, or three vectors"
    )]
    AxesCount {
        /// Name of the validated value.
        name: String,
        /// Number of arguments given.
        count: usize,
    },

    /// Two axes vectors were given without an orientation to derive the third.
    #[error("{name} orientation must be specified when only two vectors are given")]
    AxesOrientationMissing {
        /// Name of the validated value.
        name: String,
    },

    /// Two axes vectors are parallel.
    #[error("{name} cannot be parallel")]
    ParallelAxes {
        /// Name of the validated value.
        name: String,
    },

    /// An axes vector is the zero vector.
    #[error("{name} cannot be zeros")]
    ZeroAxes {
        /// Name of the validated value.
        name: String,
    },

    /// Axes vectors are not mutually orthogonal.
    #[error("{name} are not orthogonal")]
    NotOrthogonal {
        /// Name of the validated value.
        name: String,
    },

    /// Axes have the wrong handedness.
    #[error("{name} do not have a {expected}-handed orientation")]
    Orientation {
        /// Name of the validated value.
        name: String,
        /// Required handedness.
        expected: &'static str,
    },

    /// Input is not a recognized transform.
    #[error("{name} must be one of: {expected}")]
    InvalidTransform {
        /// Name of the validated value.
        name: String,
        /// Accepted transform inputs.
        expected: &'static str,
    },

    /// Values cannot be represented in the target dtype of a cast.
    #[error("{name} has values that cannot be represented as {dtype}")]
    CastOverflow {
        /// Name of the validated value.
        name: String,
        /// Target dtype.
        dtype: String,
    },

    /// Write access requested on a read-only (broadcast) array.
    #[error("{name} is a read-only broadcast array")]
    ReadOnly {
        /// Name of the validated value.
        name: String,
    },

    /// Scalar requested from an array with more than one element.
    #[error("{name} with shape {shape} cannot be converted to a scalar")]
    NotScalar {
        /// Name of the validated value.
        name: String,
        /// Actual shape.
        shape: String,
    },
}

impl Error {
    /// Classify the error as a type error or a value error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotNumeric { .. }
            | Self::NotReal { .. }
            | Self::DTypeMismatch { .. }
            | Self::UnorderedDType { .. }
            | Self::InvalidTransform { .. } => ErrorKind::Type,
            _ => ErrorKind::Value,
        }
    }

    /// Returns `true` for type errors.
    #[must_use]
    pub fn is_type_error(&self) -> bool {
        self.kind() == ErrorKind::Type
    }

    /// Returns `true` for value errors.
    #[must_use]
    pub fn is_value_error(&self) -> bool {
        self.kind() == ErrorKind::Value
    }
}

/// Format a shape as a Python-style tuple, e.g. `(3,)` or `(2, 3)`.
pub(crate) fn format_shape(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [n] => format!("({n},)"),
        dims => {
            let parts: Vec<String> = dims.iter().map(ToString::to_string).collect();
            format!("({})", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_starts_with_name() {
        let err = Error::NonFinite { name: "Position".to_string() };
        assert!(err.to_string().starts_with("Position"));
    }

    #[test]
    fn test_length_message() {
        let err = Error::Length {
            name: "Array".to_string(),
            length: 2,
            requirement: "length 3".to_string(),
        };
        assert!(err.to_string().contains("length 3"));
        assert!(err.to_string().contains('2'));
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::NotReal { name: "x".into() }.kind(), ErrorKind::Type);
        assert!(Error::Negative { name: "x".into() }.is_value_error());
        assert!(Error::InvalidTransform { name: "T".into(), expected: "3x3 array" }
            .is_type_error());
    }

    #[test]
    fn test_format_shape() {
        assert_eq!(format_shape(&[]), "()");
        assert_eq!(format_shape(&[3]), "(3,)");
        assert_eq!(format_shape(&[2, 3]), "(2, 3)");
    }
}
