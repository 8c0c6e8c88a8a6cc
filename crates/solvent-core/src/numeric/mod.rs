//! Numeric contexts.
//!
//! A [`NumericContext`] is the arithmetic backend every solver and equation
//! receives explicitly. It fixes the number type ([`NumericContext::Num`])
//! and supplies the operations that cannot be expressed with the standard
//! operator traits alone: literal construction, checked arithmetic,
//! `exp`, `ln` and the size of one unit in the last place.
//!
//! Two backends are provided:
//!
//! | Context | Number | Precision | Non-finite values |
//! |---------|--------|-----------|-------------------|
//! | [`F64Context`] | `f64` | ~16 digits | NaN / infinity possible |
//! | [`DecimalContext`] | `rust_decimal::Decimal` | 28 digits | never |

mod decimal;
mod float;

pub use decimal::DecimalContext;
pub use float::F64Context;

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Sign of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    /// Strictly below zero.
    Negative,
    /// Exactly zero.
    Zero,
    /// Strictly above zero.
    Positive,
}

impl Sign {
    /// Returns the sign as `-1`, `0` or `1`.
    #[must_use]
    pub fn signum(self) -> i8 {
        match self {
            Sign::Negative => -1,
            Sign::Zero => 0,
            Sign::Positive => 1,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signum())
    }
}

/// Scalar types a [`NumericContext`] can operate on.
///
/// Blanket-implemented for every type with the required operators.
pub trait Number:
    Copy
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
}

impl<T> Number for T where
    T: Copy
        + PartialEq
        + PartialOrd
        + fmt::Debug
        + fmt::Display
        + Send
        + Sync
        + 'static
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Div<Output = T>
        + Neg<Output = T>
{
}

/// Arithmetic backend for solvers and equations.
///
/// Implementors supply the primitive operations; the sign, absolute value,
/// checked arithmetic and `ln(1 + x)` helpers are provided on top of them.
///
/// Equations and solvers combine numbers through [`add`](Self::add),
/// [`sub`](Self::sub), [`mul`](Self::mul) and [`div`](Self::div) so that a
/// result outside the range of the type becomes [`CoreError::Overflow`]
/// instead of a panic.
pub trait NumericContext: Clone + fmt::Debug + Send + Sync + 'static {
    /// The number type of this context.
    type Num: Number;

    /// Short name of the backend, used in logs.
    fn name(&self) -> &'static str;

    /// Converts an integer.
    fn from_i64(&self, value: i64) -> Self::Num;

    /// Converts a binary floating point value.
    fn from_f64(&self, value: f64) -> CoreResult<Self::Num>;

    /// Parses a decimal literal such as `"-55.45975978539105"` or `"5E-4"`.
    fn parse(&self, input: &str) -> CoreResult<Self::Num>;

    /// Lossy conversion to `f64` for reporting.
    fn to_f64(&self, value: Self::Num) -> f64;

    /// Natural exponential.
    fn exp(&self, x: Self::Num) -> CoreResult<Self::Num>;

    /// Natural logarithm.
    fn ln(&self, x: Self::Num) -> CoreResult<Self::Num>;

    /// Size of one unit in the last place at the magnitude of `x`.
    fn ulp(&self, x: Self::Num) -> Self::Num;

    /// `10^exponent`, saturating at the limits of the type.
    fn pow10(&self, exponent: i32) -> Self::Num;

    /// Returns false for NaN and infinities.
    fn is_finite(&self, x: Self::Num) -> bool;

    /// Zero.
    fn zero(&self) -> Self::Num {
        self.from_i64(0)
    }

    /// One.
    fn one(&self) -> Self::Num {
        self.from_i64(1)
    }

    /// Builds `numerator / denominator`.
    fn rational(&self, numerator: i64, denominator: i64) -> CoreResult<Self::Num> {
        self.div(self.from_i64(numerator), self.from_i64(denominator))
    }

    /// Sign of `x`. NaN reports [`Sign::Zero`].
    fn sign(&self, x: Self::Num) -> Sign {
        let zero = self.zero();
        if x > zero {
            Sign::Positive
        } else if x < zero {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    /// Absolute value.
    fn abs(&self, x: Self::Num) -> Self::Num {
        if x < self.zero() {
            -x
        } else {
            x
        }
    }

    /// Larger of two values.
    fn max(&self, a: Self::Num, b: Self::Num) -> Self::Num {
        if b > a {
            b
        } else {
            a
        }
    }

    /// Checked addition.
    ///
    /// The provided version reports an overflow when finite operands give a
    /// non-finite sum. Non-finite operands pass through unchanged.
    fn add(&self, a: Self::Num, b: Self::Num) -> CoreResult<Self::Num> {
        finite_or_overflow(self, "add", a, b, a + b)
    }

    /// Checked subtraction.
    fn sub(&self, a: Self::Num, b: Self::Num) -> CoreResult<Self::Num> {
        finite_or_overflow(self, "sub", a, b, a - b)
    }

    /// Checked multiplication.
    fn mul(&self, a: Self::Num, b: Self::Num) -> CoreResult<Self::Num> {
        finite_or_overflow(self, "mul", a, b, a * b)
    }

    /// Division that rejects an exact zero divisor.
    fn div(&self, numerator: Self::Num, denominator: Self::Num) -> CoreResult<Self::Num> {
        if denominator == self.zero() {
            return Err(CoreError::division_by_zero(numerator));
        }
        Ok(numerator / denominator)
    }

    /// `ln(1 + x)` without losing the small-`x` digits.
    ///
    /// When `1 + x` rounds to exactly one the result is `x` itself;
    /// otherwise the rounding error of `1 + x` is compensated with
    /// `x * ln(1 + x) / ((1 + x) - 1)`.
    fn ln_1p(&self, x: Self::Num) -> CoreResult<Self::Num> {
        let one = self.one();
        let v = self.add(x, one)?;
        if v == one {
            return Ok(x);
        }
        self.div(self.mul(x, self.ln(v)?)?, self.sub(v, one)?)
    }
}

fn finite_or_overflow<C: NumericContext + ?Sized>(
    ctx: &C,
    operation: &str,
    a: C::Num,
    b: C::Num,
    result: C::Num,
) -> CoreResult<C::Num> {
    if !ctx.is_finite(result) && ctx.is_finite(a) && ctx.is_finite(b) {
        return Err(CoreError::overflow(operation));
    }
    Ok(result)
}
