//! Output representations of a validated array.

use std::fmt;

use crate::array::NumericArray;
use crate::dtype::Scalar;

/// Container kind requested for a validation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputForm {
    /// The canonical array itself.
    #[default]
    Array,
    /// Nested ordered sequences.
    List,
    /// Nested fixed sequences.
    Tuple,
}

/// A nested container of scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested {
    /// A leaf value.
    Scalar(Scalar),
    /// An ordered sequence.
    List(Vec<Nested>),
    /// A fixed sequence.
    Tuple(Vec<Nested>),
}

impl Nested {
    /// Leaf value, if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Self::Scalar(s) => Some(*s),
            _ => None,
        }
    }

    /// Child items, if this is a container.
    #[must_use]
    pub fn items(&self) -> Option<&[Nested]> {
        match self {
            Self::Scalar(_) => None,
            Self::List(items) | Self::Tuple(items) => Some(items),
        }
    }

    /// All leaves in depth-first order.
    #[must_use]
    pub fn flatten(&self) -> Vec<Scalar> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<Scalar>) {
        match self {
            Self::Scalar(s) => out.push(*s),
            Self::List(items) | Self::Tuple(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

impl fmt::Display for Nested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close, items) = match self {
            Self::Scalar(s) => return write!(f, "{s}"),
            Self::List(items) => ("[", "]", items),
            Self::Tuple(items) => ("(", ")", items),
        };
        f.write_str(open)?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        if matches!(self, Self::Tuple(_)) && items.len() == 1 {
            f.write_str(",")?;
        }
        f.write_str(close)
    }
}

/// Result of a validation in the requested output form.
///
/// 0-dimensional results requested as a list or tuple are unwrapped to
/// [`Validated::Scalar`].
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    /// Canonical array.
    Array(NumericArray),
    /// Nested list.
    List(Vec<Nested>),
    /// Nested tuple.
    Tuple(Vec<Nested>),
    /// Bare scalar.
    Scalar(Scalar),
}

impl Validated {
    /// Wrap `array` in the requested form.
    #[must_use]
    pub fn from_array(array: NumericArray, form: OutputForm) -> Self {
        let nested = match form {
            OutputForm::Array => return Self::Array(array),
            OutputForm::List => array.to_list(),
            OutputForm::Tuple => array.to_tuple(),
        };
        match nested {
            Nested::Scalar(s) => Self::Scalar(s),
            Nested::List(items) => Self::List(items),
            Nested::Tuple(items) => Self::Tuple(items),
        }
    }

    /// The canonical array, if this result is one.
    #[must_use]
    pub fn into_array(self) -> Option<NumericArray> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The scalar, if this result is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Self::Scalar(s) => Some(*s),
            _ => None,
        }
    }

    /// Top-level items of a list or tuple result.
    #[must_use]
    pub fn items(&self) -> Option<&[Nested]> {
        match self {
            Self::List(items) | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }
}

impl NumericArray {
    /// Convert to nested lists. 0-dimensional arrays become a bare scalar.
    #[must_use]
    pub fn to_list(&self) -> Nested {
        nest(&self.to_scalars(), self.shape(), OutputForm::List)
    }

    /// Convert to nested tuples. 0-dimensional arrays become a bare scalar.
    #[must_use]
    pub fn to_tuple(&self) -> Nested {
        nest(&self.to_scalars(), self.shape(), OutputForm::Tuple)
    }
}

fn nest(scalars: &[Scalar], shape: &[usize], form: OutputForm) -> Nested {
    let Some((&n, rest)) = shape.split_first() else {
        return Nested::Scalar(scalars[0]);
    };
    let stride: usize = rest.iter().product();
    let items = (0..n).map(|i| nest(&scalars[i * stride..(i + 1) * stride], rest, form)).collect();
    match form {
        OutputForm::Tuple => Nested::Tuple(items),
        OutputForm::List | OutputForm::Array => Nested::List(items),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_to_list_nested() {
        let a = NumericArray::from(arr2(&[[1_i64, 2], [3, 4]]));
        let list = a.to_list();
        assert_eq!(list.to_string(), "[[1, 2], [3, 4]]");
        assert_eq!(list.items().unwrap().len(), 2);
    }

    #[test]
    fn test_to_tuple_single_element() {
        let a = NumericArray::from_vec(vec![1.5]);
        assert_eq!(a.to_tuple().to_string(), "(1.5,)");
    }

    #[test]
    fn test_zero_dim_unwraps_to_scalar() {
        let a = NumericArray::from_scalar(Scalar::Int(7));
        assert_eq!(a.to_list(), Nested::Scalar(Scalar::Int(7)));
        assert_eq!(Validated::from_array(a, OutputForm::Tuple), Validated::Scalar(Scalar::Int(7)));
    }

    #[test]
    fn test_empty_dimension() {
        let a = NumericArray::from_shape_vec::<f64>(&[2, 0], vec![]).unwrap();
        assert_eq!(a.to_list().to_string(), "[[], []]");
    }

    #[test]
    fn test_array_form_keeps_array() {
        let a = NumericArray::from_vec(vec![true, false]);
        let out = Validated::from_array(a.clone(), OutputForm::Array);
        assert_eq!(out.into_array(), Some(a));
    }

    #[test]
    fn test_flatten() {
        let a = NumericArray::from(arr2(&[[1.0, 2.0], [3.0, 4.0]]));
        assert_eq!(a.to_tuple().flatten(), a.to_scalars());
    }
}
