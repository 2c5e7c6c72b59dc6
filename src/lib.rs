//! # Viz-Validate
//!
//! Array validation for visualization inputs.
//!
//! Plotting and mesh APIs accept loosely-typed numbers: scalars, nested
//! sequences and existing arrays. viz-validate coerces such input into one
//! canonical [`NumericArray`], checks it against a declared set of
//! constraints, optionally reshapes, broadcasts or casts it, and returns it
//! in the form the caller asked for. Every failure names the offending
//! argument.
//!
//! ## Features
//!
//! - **One orchestrator**: [`validate_array`] runs coercion, shape, length
//!   and value checks in a fixed, documented order
//! - **Presets**: [`validate_number`], [`validate_array3`],
//!   [`validate_arrayN`], [`validate_arrayNx3`], [`validate_data_range`] and
//!   more lock the settings for common shape classes
//! - **Geometry**: [`validate_axes`] and [`validate_transform4x4`] add
//!   orthogonality, orientation and matrix extraction
//! - **Standalone checkers**: every constraint is also a public `check_*`
//!   function
//!
//! ## Quick Start
//!
//! ```rust
//! use viz_validate::prelude::*;
//!
//! let config = ArrayValidation::new()
//!     .name("Points")
//!     .must_have_shape([Dim::Any, Dim::Fixed(3)])
//!     .must_be_finite(true);
//! let points = validate_array(vec![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]], &config)?;
//! assert_eq!(points.shape(), &[2, 3]);
//!
//! let err = validate_array(vec![[0.0, 1.0]], &config).unwrap_err();
//! assert!(err.to_string().starts_with("Points"));
//! # Ok::<(), viz_validate::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for every configuration type

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Element kinds, dtype families and scalar values.
pub mod dtype;

/// The canonical array type.
pub mod array;

/// Shape patterns with wildcard dimensions.
pub mod shape;

/// Loosely-typed input and coercion.
pub mod input;

/// List, tuple and scalar output forms.
pub mod output;

/// Geometric primitives (3D vectors).
pub mod geometry;

// ============================================================================
// Validation Modules
// ============================================================================

/// Standalone constraint checkers.
pub mod check;

/// The validation orchestrator and its presets.
pub mod validate;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for validation failures.
pub mod error;

pub use array::NumericArray;
pub use dtype::{DType, DTypeClass, Scalar};
pub use error::{Error, ErrorKind, Result};
pub use input::ArrayLike;
pub use output::{Nested, OutputForm, Validated};
pub use shape::{Dim, ShapePattern, ShapeSpec};
pub use validate::{
    validate_array, validate_array3, validate_arrayN, validate_arrayN_uintlike, validate_arrayNx3,
    validate_array_output, validate_axes, validate_data_range, validate_number,
    validate_transform3x3, validate_transform4x4, ArrayValidation, Constraints,
};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and functions for convenient imports.
///
/// ```rust
/// use viz_validate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::array::NumericArray;
    pub use crate::check::{LengthSpec, SortSpec};
    pub use crate::dtype::{DType, DTypeClass, Scalar};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::input::ArrayLike;
    pub use crate::output::{Nested, OutputForm, Validated};
    pub use crate::shape::{Dim, ShapePattern, ShapeSpec};
    pub use crate::validate::{
        validate_array, validate_array3, validate_arrayN, validate_arrayN_uintlike,
        validate_arrayNx3, validate_array_output, validate_axes, validate_data_range,
        validate_number, validate_transform3x3, validate_transform4x4, Array3Options,
        ArrayValidation, AxesOptions, Constraints, DataRangeOptions, Handedness, Matrix3x3,
        Matrix4x4, MatrixElements, NumberOptions, Transform, TransformInput, TransformSource,
        UintLikeOptions, VectorOptions,
    };
}
