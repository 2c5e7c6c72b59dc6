//! Element kinds, dtype families and scalar values.

use std::fmt;

use num_complex::Complex64;

/// Concrete element kind of a [`NumericArray`](crate::array::NumericArray).
///
/// Variants are ordered by promotion rank: mixing kinds in one input
/// promotes every element to the highest kind present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DType {
    /// Boolean.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit float.
    Float,
    /// 128-bit complex (two 64-bit floats).
    Complex,
}

impl DType {
    /// Common dtype of two kinds.
    #[must_use]
    pub fn promote(self, other: Self) -> Self {
        self.max(other)
    }

    /// Whether values of this kind are real-valued.
    #[must_use]
    pub const fn is_real(self) -> bool {
        !matches!(self, Self::Complex)
    }

    /// Whether this kind is a subtype of `class`.
    #[must_use]
    pub fn is_subdtype(self, class: DTypeClass) -> bool {
        class.contains(self)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bool => "bool",
            Self::Int => "int64",
            Self::Float => "float64",
            Self::Complex => "complex128",
        };
        f.write_str(s)
    }
}

/// Abstract dtype family used by subtype checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DTypeClass {
    /// Booleans only.
    Bool,
    /// Integers.
    Integer,
    /// Real floats.
    Floating,
    /// Complex floats.
    ComplexFloating,
    /// Real or complex floats.
    Inexact,
    /// Integers, floats and complex numbers (not booleans).
    Number,
    /// Every dtype.
    Generic,
}

impl DTypeClass {
    /// Whether `dtype` belongs to this family.
    #[must_use]
    pub fn contains(self, dtype: DType) -> bool {
        match self {
            Self::Bool => dtype == DType::Bool,
            Self::Integer => dtype == DType::Int,
            Self::Floating => dtype == DType::Float,
            Self::ComplexFloating => dtype == DType::Complex,
            Self::Inexact => matches!(dtype, DType::Float | DType::Complex),
            Self::Number => dtype != DType::Bool,
            Self::Generic => true,
        }
    }
}

impl From<DType> for DTypeClass {
    fn from(dtype: DType) -> Self {
        match dtype {
            DType::Bool => Self::Bool,
            DType::Int => Self::Integer,
            DType::Float => Self::Floating,
            DType::Complex => Self::ComplexFloating,
        }
    }
}

impl fmt::Display for DTypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Floating => "floating",
            Self::ComplexFloating => "complexfloating",
            Self::Inexact => "inexact",
            Self::Number => "number",
            Self::Generic => "generic",
        };
        f.write_str(s)
    }
}

/// A single numeric value of any element kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Complex value.
    Complex(Complex64),
}

impl Scalar {
    /// Element kind of this value.
    #[must_use]
    pub const fn dtype(&self) -> DType {
        match self {
            Self::Bool(_) => DType::Bool,
            Self::Int(_) => DType::Int,
            Self::Float(_) => DType::Float,
            Self::Complex(_) => DType::Complex,
        }
    }

    /// Convert to another element kind with `astype` semantics.
    ///
    /// Floats truncate toward zero when cast to integers, complex values
    /// drop their imaginary part when cast to a real kind.
    #[must_use]
    pub fn cast(self, dtype: DType) -> Self {
        match self {
            Self::Bool(b) => b.cast_scalar(dtype),
            Self::Int(i) => i.cast_scalar(dtype),
            Self::Float(x) => x.cast_scalar(dtype),
            Self::Complex(c) => c.cast_scalar(dtype),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Complex(c) => write!(f, "({}{:+}j)", c.re, c.im),
        }
    }
}

macro_rules! scalar_from {
    ($($t:ty => $variant:ident via $conv:expr),* $(,)?) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Scalar::$variant($conv(v))
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool via std::convert::identity,
    i8 => Int via i64::from,
    i16 => Int via i64::from,
    i32 => Int via i64::from,
    i64 => Int via std::convert::identity,
    u8 => Int via i64::from,
    u16 => Int via i64::from,
    u32 => Int via i64::from,
    f32 => Float via f64::from,
    f64 => Float via std::convert::identity,
    Complex64 => Complex via std::convert::identity,
}

/// Conversions between element kinds.
pub(crate) trait CastScalar: Copy {
    fn to_bool(self) -> bool;
    fn to_i64(self) -> i64;
    fn to_f64(self) -> f64;
    fn to_complex(self) -> Complex64;

    fn cast_scalar(self, dtype: DType) -> Scalar {
        match dtype {
            DType::Bool => Scalar::Bool(self.to_bool()),
            DType::Int => Scalar::Int(self.to_i64()),
            DType::Float => Scalar::Float(self.to_f64()),
            DType::Complex => Scalar::Complex(self.to_complex()),
        }
    }
}

impl CastScalar for bool {
    fn to_bool(self) -> bool {
        self
    }
    fn to_i64(self) -> i64 {
        i64::from(self)
    }
    fn to_f64(self) -> f64 {
        f64::from(u8::from(self))
    }
    fn to_complex(self) -> Complex64 {
        Complex64::new(self.to_f64(), 0.0)
    }
}

impl CastScalar for i64 {
    fn to_bool(self) -> bool {
        self != 0
    }
    fn to_i64(self) -> i64 {
        self
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn to_complex(self) -> Complex64 {
        Complex64::new(self as f64, 0.0)
    }
}

impl CastScalar for f64 {
    fn to_bool(self) -> bool {
        self != 0.0
    }
    fn to_i64(self) -> i64 {
        self as i64
    }
    fn to_f64(self) -> f64 {
        self
    }
    fn to_complex(self) -> Complex64 {
        Complex64::new(self, 0.0)
    }
}

impl CastScalar for Complex64 {
    fn to_bool(self) -> bool {
        self.re != 0.0 || self.im != 0.0
    }
    fn to_i64(self) -> i64 {
        self.re as i64
    }
    fn to_f64(self) -> f64 {
        self.re
    }
    fn to_complex(self) -> Complex64 {
        self
    }
}

impl CastScalar for Scalar {
    fn to_bool(self) -> bool {
        match self {
            Self::Bool(v) => v,
            Self::Int(v) => v.to_bool(),
            Self::Float(v) => v.to_bool(),
            Self::Complex(v) => v.to_bool(),
        }
    }
    fn to_i64(self) -> i64 {
        match self {
            Self::Bool(v) => v.to_i64(),
            Self::Int(v) => v,
            Self::Float(v) => v.to_i64(),
            Self::Complex(v) => v.to_i64(),
        }
    }
    fn to_f64(self) -> f64 {
        match self {
            Self::Bool(v) => v.to_f64(),
            Self::Int(v) => v.to_f64(),
            Self::Float(v) => v,
            Self::Complex(v) => v.to_f64(),
        }
    }
    fn to_complex(self) -> Complex64 {
        match self {
            Self::Bool(v) => v.to_complex(),
            Self::Int(v) => v.to_complex(),
            Self::Float(v) => v.to_complex(),
            Self::Complex(v) => v,
        }
    }
}
