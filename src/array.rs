//! Canonical numeric array.
//!
//! [`NumericArray`] is the dense, rectangular, homogeneously-typed container
//! every validator normalizes its input to. Storage is reference counted:
//! cloning an array never copies elements, and writing through a shared
//! buffer copies it first, so a caller's array is never mutated by
//! validation.

use ndarray::{ArcArray, Array, ArrayD, ArrayViewD, ArrayViewMutD, CowArray, Dimension, IxDyn};
use num_complex::Complex64;

use crate::dtype::{CastScalar, DType, Scalar};
use crate::error::{format_shape, Error, Result};

/// Shared-storage dynamic-dimension array.
pub type ArcArrayD<A> = ArcArray<A, IxDyn>;

#[derive(Debug, Clone, PartialEq)]
enum ArrayData {
    Bool(ArcArrayD<bool>),
    Int(ArcArrayD<i64>),
    Float(ArcArrayD<f64>),
    Complex(ArcArrayD<Complex64>),
}

/// Apply the same expression to whichever typed array is stored.
macro_rules! dispatch {
    ($data:expr, $a:ident => $body:expr) => {
        match $data {
            ArrayData::Bool($a) => $body,
            ArrayData::Int($a) => $body,
            ArrayData::Float($a) => $body,
            ArrayData::Complex($a) => $body,
        }
    };
}

/// Apply an array-to-array expression, keeping the element kind.
macro_rules! dispatch_map {
    ($data:expr, $a:ident => $body:expr) => {
        match $data {
            ArrayData::Bool($a) => ArrayData::Bool($body),
            ArrayData::Int($a) => ArrayData::Int($body),
            ArrayData::Float($a) => ArrayData::Float($body),
            ArrayData::Complex($a) => ArrayData::Complex($body),
        }
    };
}

/// Element types that can be stored in a [`NumericArray`].
///
/// Implemented for `bool`, `i64`, `f64` and [`Complex64`].
pub trait Element: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static + sealed::Sealed {
    /// Element kind of this type.
    const DTYPE: DType;

    /// Wrap a typed array.
    fn wrap(data: ArcArrayD<Self>) -> NumericArray;

    /// Borrow the typed storage if `array` holds this element type.
    fn extract(array: &NumericArray) -> Option<&ArcArrayD<Self>>;

    /// Mutably borrow the typed storage if `array` holds this element type.
    fn extract_mut(array: &mut NumericArray) -> Option<&mut ArcArrayD<Self>>;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for bool {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
    impl Sealed for num_complex::Complex64 {}
}

macro_rules! impl_element {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;

            fn wrap(data: ArcArrayD<Self>) -> NumericArray {
                NumericArray::from_data(ArrayData::$variant(data))
            }

            fn extract(array: &NumericArray) -> Option<&ArcArrayD<Self>> {
                match &array.data {
                    ArrayData::$variant(a) => Some(a),
                    _ => None,
                }
            }

            fn extract_mut(array: &mut NumericArray) -> Option<&mut ArcArrayD<Self>> {
                match &mut array.data {
                    ArrayData::$variant(a) => Some(a),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(bool, Bool);
impl_element!(i64, Int);
impl_element!(f64, Float);
impl_element!(Complex64, Complex);

/// Dense, rectangular, homogeneously-typed numeric array.
#[derive(Debug, Clone)]
pub struct NumericArray {
    data: ArrayData,
    read_only: bool,
}

impl PartialEq for NumericArray {
    /// Arrays are equal when dtype, shape and elements match. The read-only
    /// flag does not take part in the comparison.
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl NumericArray {
    fn from_data(data: ArrayData) -> Self {
        Self { data, read_only: false }
    }

    /// Create an array from any owned `ndarray` array.
    #[must_use]
    pub fn from_array<T: Element, D: Dimension>(array: Array<T, D>) -> Self {
        T::wrap(array.into_dyn().into_shared())
    }

    /// Create a one-dimensional array.
    #[must_use]
    pub fn from_vec<T: Element>(values: Vec<T>) -> Self {
        Self::from_array(Array::from_vec(values))
    }

    /// Create an array with the given shape from row-major values.
    ///
    /// Returns `None` if the number of values does not match the shape.
    #[must_use]
    pub fn from_shape_vec<T: Element>(shape: &[usize], values: Vec<T>) -> Option<Self> {
        ArrayD::from_shape_vec(IxDyn(shape), values).ok().map(Self::from_array)
    }

    /// Create a 0-dimensional array holding one value.
    #[must_use]
    pub fn from_scalar(value: Scalar) -> Self {
        fn zero_d<T: Element>(v: T) -> NumericArray {
            NumericArray::from_array(ndarray::arr0(v))
        }
        match value {
            Scalar::Bool(v) => zero_d(v),
            Scalar::Int(v) => zero_d(v),
            Scalar::Float(v) => zero_d(v),
            Scalar::Complex(v) => zero_d(v),
        }
    }

    /// Element kind.
    #[must_use]
    pub fn dtype(&self) -> DType {
        match self.data {
            ArrayData::Bool(_) => DType::Bool,
            ArrayData::Int(_) => DType::Int,
            ArrayData::Float(_) => DType::Float,
            ArrayData::Complex(_) => DType::Complex,
        }
    }

    /// Shape of the array.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        dispatch!(&self.data, a => a.shape())
    }

    /// Number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        dispatch!(&self.data, a => a.len())
    }

    /// Whether the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the array is a read-only broadcast result.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether both arrays point at the same element storage.
    #[must_use]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        match (&self.data, &other.data) {
            (ArrayData::Bool(a), ArrayData::Bool(b)) => std::ptr::eq(a.as_ptr(), b.as_ptr()),
            (ArrayData::Int(a), ArrayData::Int(b)) => std::ptr::eq(a.as_ptr(), b.as_ptr()),
            (ArrayData::Float(a), ArrayData::Float(b)) => std::ptr::eq(a.as_ptr(), b.as_ptr()),
            (ArrayData::Complex(a), ArrayData::Complex(b)) => std::ptr::eq(a.as_ptr(), b.as_ptr()),
            _ => false,
        }
    }

    /// Whether the array is writable and laid out in row-major order.
    pub(crate) fn is_plain(&self) -> bool {
        !self.read_only && dispatch!(&self.data, a => a.is_standard_layout())
    }

    /// Borrow the elements as a typed view.
    #[must_use]
    pub fn as_array<T: Element>(&self) -> Option<ArrayViewD<'_, T>> {
        T::extract(self).map(|a| a.view())
    }

    /// Mutably borrow the elements as a typed view.
    ///
    /// Storage shared with other arrays is copied before the view is handed
    /// out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadOnly`] for broadcast arrays and
    /// [`Error::DTypeMismatch`] if `T` is not the stored element type.
    pub fn try_view_mut<T: Element>(&mut self) -> Result<ArrayViewMutD<'_, T>> {
        if self.read_only {
            return Err(Error::ReadOnly { name: "Array".to_string() });
        }
        let dtype = self.dtype();
        T::extract_mut(self).map(|a| a.view_mut()).ok_or_else(|| Error::DTypeMismatch {
            name: "Array".to_string(),
            dtype: dtype.to_string(),
            allowed: T::DTYPE.to_string(),
        })
    }

    /// Element at a multi-dimensional index.
    #[must_use]
    pub fn get(&self, index: &[usize]) -> Option<Scalar> {
        dispatch!(&self.data, a => a.get(index).map(|&v| Scalar::from(v)))
    }

    /// All elements in row-major order.
    #[must_use]
    pub fn to_scalars(&self) -> Vec<Scalar> {
        dispatch!(&self.data, a => a.iter().map(|&v| Scalar::from(v)).collect())
    }

    /// All elements converted to `f64`. Complex values keep their real part.
    #[must_use]
    pub fn to_f64_array(&self) -> ArrayD<f64> {
        dispatch!(&self.data, a => a.mapv(CastScalar::to_f64))
    }

    /// Real elements as `f64`, borrowed when already floating.
    ///
    /// Returns `None` for complex arrays, which have no total order.
    pub(crate) fn real_view(&self) -> Option<CowArray<'_, f64, IxDyn>> {
        match &self.data {
            ArrayData::Bool(a) => Some(CowArray::from(a.mapv(CastScalar::to_f64))),
            ArrayData::Int(a) => Some(CowArray::from(a.mapv(CastScalar::to_f64))),
            ArrayData::Float(a) => Some(CowArray::from(a.view())),
            ArrayData::Complex(_) => None,
        }
    }

    /// Complex elements, if the array is complex.
    pub(crate) fn complex_view(&self) -> Option<ArrayViewD<'_, Complex64>> {
        self.as_array::<Complex64>()
    }

    /// Copy the elements into fresh, writable storage.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self::from_data(dispatch_map!(&self.data, a => a.to_owned().into_shared()))
    }

    /// Reshape in row-major order.
    ///
    /// Storage is shared when the layout allows it. Returns `None` if the
    /// element count differs from the product of `shape`.
    #[must_use]
    pub fn reshape(&self, shape: &[usize]) -> Option<Self> {
        if shape.iter().product::<usize>() != self.len() {
            return None;
        }
        let data = match &self.data {
            ArrayData::Bool(a) => ArrayData::Bool(reshape_shared(a, shape)?),
            ArrayData::Int(a) => ArrayData::Int(reshape_shared(a, shape)?),
            ArrayData::Float(a) => ArrayData::Float(reshape_shared(a, shape)?),
            ArrayData::Complex(a) => ArrayData::Complex(reshape_shared(a, shape)?),
        };
        Some(Self { data, read_only: self.read_only })
    }

    /// Broadcast to `shape` under standard broadcasting rules.
    ///
    /// The result is read-only. It is copied into new storage sized by
    /// `shape`, since `ndarray` broadcasts only into borrowed views. Returns
    /// `None` if the shapes are incompatible.
    #[must_use]
    pub fn broadcast(&self, shape: &[usize]) -> Option<Self> {
        let data = match &self.data {
            ArrayData::Bool(a) => ArrayData::Bool(broadcast_shared(a, shape)?),
            ArrayData::Int(a) => ArrayData::Int(broadcast_shared(a, shape)?),
            ArrayData::Float(a) => ArrayData::Float(broadcast_shared(a, shape)?),
            ArrayData::Complex(a) => ArrayData::Complex(broadcast_shared(a, shape)?),
        };
        Some(Self { data, read_only: true })
    }

    /// Convert to another element kind. Returns a cheap clone when the kind
    /// already matches.
    #[must_use]
    pub fn astype(&self, dtype: DType) -> Self {
        if dtype == self.dtype() {
            return self.clone();
        }
        let data = match dtype {
            DType::Bool => ArrayData::Bool(dispatch!(&self.data, a => cast_all(a, CastScalar::to_bool))),
            DType::Int => ArrayData::Int(dispatch!(&self.data, a => cast_all(a, CastScalar::to_i64))),
            DType::Float => ArrayData::Float(dispatch!(&self.data, a => cast_all(a, CastScalar::to_f64))),
            DType::Complex => {
                ArrayData::Complex(dispatch!(&self.data, a => cast_all(a, CastScalar::to_complex)))
            }
        };
        Self { data, read_only: self.read_only }
    }

    /// The single element of a 0-dimensional or one-element array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotScalar`] if the array holds more than one element.
    pub fn to_scalar(&self) -> Result<Scalar> {
        match self.to_scalars().as_slice() {
            [single] => Ok(*single),
            _ => Err(Error::NotScalar {
                name: "Array".to_string(),
                shape: format_shape(self.shape()),
            }),
        }
    }
}

fn cast_all<S: CastScalar, T: Clone>(a: &ArcArrayD<S>, f: impl Fn(S) -> T) -> ArcArrayD<T> {
    a.mapv(f).into_shared()
}

fn reshape_shared<A: Clone>(a: &ArcArrayD<A>, shape: &[usize]) -> Option<ArcArrayD<A>> {
    if a.is_standard_layout() {
        return a.clone().into_shape_with_order(IxDyn(shape)).ok();
    }
    a.as_standard_layout()
        .into_owned()
        .into_shape_with_order(IxDyn(shape))
        .ok()
        .map(|a| a.into_shared())
}

fn broadcast_shared<A: Clone>(a: &ArcArrayD<A>, shape: &[usize]) -> Option<ArcArrayD<A>> {
    a.broadcast(IxDyn(shape)).map(|view| view.to_owned().into_shared())
}

impl<T: Element, D: Dimension> From<Array<T, D>> for NumericArray {
    fn from(array: Array<T, D>) -> Self {
        Self::from_array(array)
    }
}

impl From<Scalar> for NumericArray {
    fn from(value: Scalar) -> Self {
        Self::from_scalar(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_shape_and_dtype() {
        let a = NumericArray::from(arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]));
        assert_eq!(a.shape(), &[2, 3]);
        assert_eq!(a.dtype(), DType::Float);
        assert_eq!(a.len(), 6);
        assert_eq!(a.ndim(), 2);
    }

    #[test]
    fn test_clone_shares_storage() {
        let a = NumericArray::from_vec(vec![1_i64, 2, 3]);
        let b = a.clone();
        assert!(a.shares_storage_with(&b));
        assert!(!a.shares_storage_with(&a.deep_copy()));
    }

    #[test]
    fn test_write_does_not_touch_clone() {
        let a = NumericArray::from_vec(vec![1_i64, 2, 3]);
        let mut b = a.clone();
        b.try_view_mut::<i64>().unwrap()[[0]] = 10;
        assert_eq!(a.get(&[0]), Some(Scalar::Int(1)));
        assert_eq!(b.get(&[0]), Some(Scalar::Int(10)));
    }

    #[test]
    fn test_reshape() {
        let a = NumericArray::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let r = a.reshape(&[2, 3]).unwrap();
        assert_eq!(r.shape(), &[2, 3]);
        assert_eq!(r.get(&[1, 0]), Some(Scalar::Float(4.0)));
        assert!(a.reshape(&[4, 2]).is_none());
    }

    #[test]
    fn test_broadcast_is_read_only() {
        let a = NumericArray::from_scalar(Scalar::Float(5.0));
        let mut b = a.broadcast(&[3]).unwrap();
        assert!(b.is_read_only());
        assert_eq!(b.to_scalars(), vec![Scalar::Float(5.0); 3]);
        assert!(matches!(b.try_view_mut::<f64>(), Err(Error::ReadOnly { .. })));
    }

    #[test]
    fn test_broadcast_incompatible() {
        let a = NumericArray::from(arr1(&[1_i64, 2]));
        assert!(a.broadcast(&[3]).is_none());
        assert!(a.broadcast(&[4, 2]).is_some());
    }

    #[test]
    fn test_astype() {
        let a = NumericArray::from_vec(vec![1.7, -2.2]);
        let i = a.astype(DType::Int);
        assert_eq!(i.to_scalars(), vec![Scalar::Int(1), Scalar::Int(-2)]);
        let same = a.astype(DType::Float);
        assert!(same.shares_storage_with(&a));
    }

    #[test]
    fn test_astype_across_kinds() {
        let c = NumericArray::from_vec(vec![Complex64::new(2.5, 1.0), Complex64::new(0.0, 0.0)]);
        assert_eq!(c.astype(DType::Float).to_scalars(), vec![Scalar::Float(2.5), Scalar::Float(0.0)]);
        assert_eq!(c.astype(DType::Bool).to_scalars(), vec![Scalar::Bool(true), Scalar::Bool(false)]);

        let b = NumericArray::from(arr2(&[[true], [false]]));
        let i = b.astype(DType::Int);
        assert_eq!(i.shape(), &[2, 1]);
        assert_eq!(i.to_scalars(), vec![Scalar::Int(1), Scalar::Int(0)]);
    }

    #[test]
    fn test_to_scalar() {
        assert_eq!(
            NumericArray::from_scalar(Scalar::Int(4)).to_scalar().unwrap(),
            Scalar::Int(4)
        );
        assert!(NumericArray::from_vec(vec![1.0, 2.0]).to_scalar().is_err());
    }

    #[test]
    fn test_wrong_dtype_view() {
        let mut a = NumericArray::from_vec(vec![true, false]);
        assert!(a.as_array::<f64>().is_none());
        assert!(matches!(a.try_view_mut::<f64>(), Err(Error::DTypeMismatch { .. })));
    }
}
