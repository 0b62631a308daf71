//! The numeric scalar types an image may store.
use core::fmt;
use core::ops::{Add, Mul, Sub};

use num_traits::{NumCast, ToPrimitive};

/// A plain numeric pixel scalar.
///
/// Holding an implementation certifies that the type is plain old data
/// (via [`bytemuck::Pod`]) and supports the widening and narrowing
/// conversions used by the floating-point pixel transforms. The trait is
/// implemented for the supported storage types: `f64`, `f32`, `i32` and
/// `i16`.
pub trait Element:
    bytemuck::Pod
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + fmt::Debug
    + 'static
{
    /// Widen to `f64` for transforms carried out in floating point.
    fn as_f64(self) -> f64;

    /// Narrow from `f64`.
    ///
    /// Fractions truncate toward zero for the integral types; a value with
    /// no representation in `Self` (overflow, NaN) narrows to zero.
    fn from_f64(value: f64) -> Self;
}

macro_rules! numeric_element {
    ($($scalar:ty),* $(,)?) => {
        $(impl Element for $scalar {
            fn as_f64(self) -> f64 {
                self.to_f64().unwrap_or(f64::NAN)
            }

            fn from_f64(value: f64) -> Self {
                NumCast::from(value).unwrap_or_else(<$scalar as bytemuck::Zeroable>::zeroed)
            }
        })*
    };
}

numeric_element!(f64, f32, i32, i16);
