//! Shape patterns.
//!
//! A [`ShapePattern`] is a tuple of dimension constraints, each either a
//! fixed size or a wildcard. A [`ShapeSpec`] is a set of alternative
//! patterns; an array shape satisfies the spec when it matches any of them.
//! Patterns display with `-1` for wildcards, e.g. `(-1, 3)`.

use std::fmt;

/// One dimension constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dim {
    /// Exactly this size.
    Fixed(usize),
    /// Any size.
    Any,
}

impl Dim {
    /// Whether a concrete size satisfies this constraint.
    #[must_use]
    pub fn matches(self, size: usize) -> bool {
        match self {
            Self::Fixed(n) => n == size,
            Self::Any => true,
        }
    }
}

impl From<usize> for Dim {
    fn from(n: usize) -> Self {
        Self::Fixed(n)
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Any => f.write_str("-1"),
        }
    }
}

/// A tuple of dimension constraints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapePattern(Vec<Dim>);

/// Why a reshape target could not be resolved to a concrete shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolveError {
    /// More than one wildcard dimension.
    MultipleWildcards,
    /// Element count does not fit the target.
    Incompatible,
}

impl ShapePattern {
    /// Create a pattern from dimension constraints.
    #[must_use]
    pub fn new(dims: impl IntoIterator<Item = Dim>) -> Self {
        Self(dims.into_iter().collect())
    }

    /// The 0-dimensional pattern `()`.
    #[must_use]
    pub fn scalar() -> Self {
        Self(Vec::new())
    }

    /// The one-dimensional pattern `(n,)`.
    #[must_use]
    pub fn vector(n: usize) -> Self {
        Self(vec![Dim::Fixed(n)])
    }

    /// The one-dimensional pattern `(-1,)`.
    #[must_use]
    pub fn any_vector() -> Self {
        Self(vec![Dim::Any])
    }

    /// Whether `shape` satisfies every dimension constraint.
    #[must_use]
    pub fn matches(&self, shape: &[usize]) -> bool {
        self.0.len() == shape.len() && self.0.iter().zip(shape).all(|(d, &s)| d.matches(s))
    }

    /// Concrete shape if the pattern has no wildcards.
    #[must_use]
    pub fn as_fixed(&self) -> Option<Vec<usize>> {
        self.0
            .iter()
            .map(|d| match d {
                Dim::Fixed(n) => Some(*n),
                Dim::Any => None,
            })
            .collect()
    }

    /// Resolve a reshape target for an array of `len` elements.
    ///
    /// At most one wildcard is allowed; it absorbs the remaining elements.
    pub(crate) fn resolve(&self, len: usize) -> Result<Vec<usize>, ResolveError> {
        let wildcards = self.0.iter().filter(|d| **d == Dim::Any).count();
        if wildcards > 1 {
            return Err(ResolveError::MultipleWildcards);
        }
        let known: usize = self
            .0
            .iter()
            .filter_map(|d| match d {
                Dim::Fixed(n) => Some(*n),
                Dim::Any => None,
            })
            .product();

        if wildcards == 0 {
            return if known == len {
                Ok(self.as_fixed().unwrap_or_default())
            } else {
                Err(ResolveError::Incompatible)
            };
        }
        if known == 0 || len % known != 0 {
            return Err(ResolveError::Incompatible);
        }
        let inferred = len / known;
        Ok(self
            .0
            .iter()
            .map(|d| match d {
                Dim::Fixed(n) => *n,
                Dim::Any => inferred,
            })
            .collect())
    }
}

impl From<usize> for ShapePattern {
    fn from(n: usize) -> Self {
        Self::vector(n)
    }
}

impl From<Dim> for ShapePattern {
    fn from(d: Dim) -> Self {
        Self(vec![d])
    }
}

impl<const N: usize> From<[usize; N]> for ShapePattern {
    fn from(dims: [usize; N]) -> Self {
        Self(dims.into_iter().map(Dim::Fixed).collect())
    }
}

impl<const N: usize> From<[Dim; N]> for ShapePattern {
    fn from(dims: [Dim; N]) -> Self {
        Self(dims.to_vec())
    }
}

impl From<&[usize]> for ShapePattern {
    fn from(dims: &[usize]) -> Self {
        Self(dims.iter().copied().map(Dim::Fixed).collect())
    }
}

impl fmt::Display for ShapePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => f.write_str("()"),
            [d] => write!(f, "({d},)"),
            dims => {
                f.write_str("(")?;
                for (i, d) in dims.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{d}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A set of alternative shape patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeSpec(Vec<ShapePattern>);

impl ShapeSpec {
    /// A spec satisfied by any of `patterns`.
    #[must_use]
    pub fn any_of(patterns: impl IntoIterator<Item = ShapePattern>) -> Self {
        Self(patterns.into_iter().collect())
    }

    /// Alternative patterns.
    #[must_use]
    pub fn patterns(&self) -> &[ShapePattern] {
        &self.0
    }

    /// Whether `shape` matches at least one pattern.
    #[must_use]
    pub fn matches(&self, shape: &[usize]) -> bool {
        self.0.iter().any(|p| p.matches(shape))
    }
}

impl From<ShapePattern> for ShapeSpec {
    fn from(pattern: ShapePattern) -> Self {
        Self(vec![pattern])
    }
}

impl From<Vec<ShapePattern>> for ShapeSpec {
    fn from(patterns: Vec<ShapePattern>) -> Self {
        Self(patterns)
    }
}

impl From<usize> for ShapeSpec {
    fn from(n: usize) -> Self {
        ShapePattern::vector(n).into()
    }
}

impl From<Dim> for ShapeSpec {
    fn from(d: Dim) -> Self {
        ShapePattern::from(d).into()
    }
}

impl<const N: usize> From<[usize; N]> for ShapeSpec {
    fn from(dims: [usize; N]) -> Self {
        ShapePattern::from(dims).into()
    }
}

impl<const N: usize> From<[Dim; N]> for ShapeSpec {
    fn from(dims: [Dim; N]) -> Self {
        ShapePattern::from(dims).into()
    }
}

impl fmt::Display for ShapeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [single] = self.0.as_slice() {
            return write!(f, "{single}");
        }
        f.write_str("[")?;
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        f.write_str("]")
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A wildcard dimension matches every size.
        #[test]
        fn prop_wildcard_matches_any_size(
            fixed in prop::collection::vec(0usize..8, 0..4),
            slot in 0usize..4,
            size in 0usize..1000
        ) {
            let slot = slot.min(fixed.len());
            let mut dims: Vec<Dim> = fixed.iter().copied().map(Dim::Fixed).collect();
            dims.insert(slot, Dim::Any);
            let mut shape = fixed.clone();
            shape.insert(slot, size);
            prop_assert!(ShapePattern::new(dims).matches(&shape));
        }
    }
}
