// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Numeric element types a [`crate::Tensor`] can be parameterized over.
//!
//! [`Element`] is the closed set of scalar operations the tensor engine
//! needs: arithmetic, transcendentals, comparisons, rounding, and random
//! generation. It is implemented for `f32` and `f64`; the concrete type is
//! selected at compile time through generics, so no per-type dispatch table
//! exists at runtime.

use rand::Rng;

/// Scalar operations required of a tensor element type.
///
/// Division by zero and `ln(0)` follow the IEEE 754 semantics of the
/// element type (infinities/NaN) rather than raising an error.
pub trait Element:
    Copy + PartialOrd + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    fn pos_infinity() -> Self;
    fn neg_infinity() -> Self;

    /// Converts from `f64`, truncating precision as needed.
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;

    /// Draws a uniformly distributed value in `[min, max)`.
    fn rand_uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> Self;

    /// Draws a normally distributed value via the Box–Muller transform:
    /// `z = sqrt(-2 ln u1) * sin(2 pi u2)` with `u1, u2` uniform in `(0, 1]`.
    fn rand_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std: f64) -> Self {
        let u1 = 1.0 - rng.gen::<f64>();
        let u2 = 1.0 - rng.gen::<f64>();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).sin();
        Self::from_f64(mean + std * z)
    }

    fn add(self, other: Self) -> Self;
    fn sub(self, other: Self) -> Self;
    fn mul(self, other: Self) -> Self;
    fn div(self, other: Self) -> Self;

    /// Divides by an integer count (used by `mean` reductions).
    fn div_by(self, count: usize) -> Self {
        self.div(Self::from_f64(count as f64))
    }

    fn exp(self) -> Self;
    fn neg(self) -> Self;
    fn recip(self) -> Self;
    fn abs(self) -> Self;

    fn is_greater(self, other: Self) -> bool {
        self > other
    }
    fn is_less(self, other: Self) -> bool {
        self < other
    }

    fn floor(self) -> Self;
    fn ceil(self) -> Self;
    fn round(self) -> Self;

    fn floor_int(self) -> i64 {
        self.floor().to_f64() as i64
    }
    fn ceil_int(self) -> i64 {
        self.ceil().to_f64() as i64
    }
    fn round_int(self) -> i64 {
        self.round().to_f64() as i64
    }

    fn modulo(self, other: Self) -> Self;
}

macro_rules! impl_element {
    ($ty:ty) => {
        impl Element for $ty {
            fn zero() -> Self {
                0.0
            }
            fn one() -> Self {
                1.0
            }
            fn pos_infinity() -> Self {
                <$ty>::INFINITY
            }
            fn neg_infinity() -> Self {
                <$ty>::NEG_INFINITY
            }
            fn from_f64(v: f64) -> Self {
                v as $ty
            }
            fn to_f64(self) -> f64 {
                self as f64
            }
            fn rand_uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> Self {
                (min + rng.gen::<f64>() * (max - min)) as $ty
            }
            fn add(self, other: Self) -> Self {
                self + other
            }
            fn sub(self, other: Self) -> Self {
                self - other
            }
            fn mul(self, other: Self) -> Self {
                self * other
            }
            fn div(self, other: Self) -> Self {
                self / other
            }
            fn exp(self) -> Self {
                self.exp()
            }
            fn neg(self) -> Self {
                -self
            }
            fn recip(self) -> Self {
                1.0 / self
            }
            fn abs(self) -> Self {
                self.abs()
            }
            fn floor(self) -> Self {
                self.floor()
            }
            fn ceil(self) -> Self {
                self.ceil()
            }
            fn round(self) -> Self {
                self.round()
            }
            fn modulo(self, other: Self) -> Self {
                self % other
            }
        }
    };
}

impl_element!(f32);
impl_element!(f64);
