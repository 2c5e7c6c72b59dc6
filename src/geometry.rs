//! Geometric primitives used by the axes and transform validators.

use std::ops::{Mul, Neg};

/// Default relative tolerance of [`Vector3::is_close`].
pub const RTOL: f64 = 1e-5;

/// Default absolute tolerance of [`Vector3::is_close`].
pub const ATOL: f64 = 1e-8;

/// A 3D vector with double-precision components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vector3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Components as an array.
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Euclidean length.
    #[must_use]
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction. The zero vector is returned
    /// unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        let n = self.norm();
        if n == 0.0 {
            self
        } else {
            self * (1.0 / n)
        }
    }

    /// Component-wise closeness: `|a - b| <= ATOL + RTOL * |b|`.
    #[must_use]
    pub fn is_close(self, other: Self) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array())
            .all(|(&a, b)| is_close(a, b))
    }

    /// Whether every component is close to zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.is_close(Self::ZERO)
    }
}

/// Scalar closeness with the default tolerances.
#[must_use]
pub fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= ATOL + RTOL * b.abs()
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_right_handed() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(x), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_norm_and_normalize() {
        let v = Vector3::new(3.0, 4.0, 0.0);
        assert!((v.norm() - 5.0).abs() < 1e-12);
        assert!((v.normalized().norm() - 1.0).abs() < 1e-12);
        assert_eq!(Vector3::ZERO.normalized(), Vector3::ZERO);
    }

    #[test]
    fn test_is_close() {
        let v = Vector3::new(1.0, 0.0, 0.0);
        assert!(v.is_close(Vector3::new(1.0 + 1e-9, 1e-9, 0.0)));
        assert!(!v.is_close(Vector3::new(1.01, 0.0, 0.0)));
        assert!(Vector3::new(1e-9, 0.0, -1e-9).is_zero());
    }
}
