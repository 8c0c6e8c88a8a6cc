//! Tolerance predicates for zero and equality tests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::numeric::NumericContext;

/// Numerical tolerance.
///
/// Absolute kinds compare against a fixed threshold; relative kinds scale
/// the threshold by the larger magnitude of the operands. Testing a single
/// value for zero has no reference magnitude, so relative kinds use their
/// base value as an absolute threshold there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Tolerance {
    /// Fixed absolute threshold.
    Absolute(f64),
    /// Threshold relative to the operands' magnitude.
    Relative(f64),
    /// Absolute threshold of half a unit in the n-th decimal place.
    Decimals(u32),
    /// Relative threshold of half a unit in the n-th significant digit.
    SignificantDigits(u32),
    /// A number of units in the last place of the numeric type.
    Ulps(u32),
}

impl Tolerance {
    /// The minimal tolerance of the numeric type, independent of any
    /// user-requested accuracy.
    pub const MACHINE: Tolerance = Tolerance::Ulps(1);

    /// Returns true if the threshold scales with the operands.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        matches!(
            self,
            Tolerance::Relative(_) | Tolerance::SignificantDigits(_) | Tolerance::Ulps(_)
        )
    }

    /// Base value of the tolerance in the context's number type.
    ///
    /// A base value the backend cannot represent degrades to zero, which
    /// turns every test into an exact comparison.
    fn base<C: NumericContext>(&self, ctx: &C) -> C::Num {
        match *self {
            Tolerance::Absolute(v) | Tolerance::Relative(v) => {
                ctx.from_f64(v.abs()).unwrap_or_else(|_| ctx.zero())
            }
            Tolerance::Decimals(n) | Tolerance::SignificantDigits(n) => {
                let half = ctx.rational(1, 2).unwrap_or_else(|_| ctx.zero());
                let exponent = i32::try_from(n).unwrap_or(i32::MAX).saturating_neg();
                half * ctx.pow10(exponent)
            }
            Tolerance::Ulps(n) => ctx.from_i64(i64::from(n)),
        }
    }

    /// Absolute threshold in effect at the magnitude of `reference`.
    ///
    /// Fails with [`CoreError::Overflow`] when a relative threshold exceeds
    /// the range of the number type.
    pub fn value<C: NumericContext>(&self, ctx: &C, reference: C::Num) -> CoreResult<C::Num> {
        let base = self.base(ctx);
        match self {
            Tolerance::Absolute(_) | Tolerance::Decimals(_) => Ok(base),
            Tolerance::Relative(_) | Tolerance::SignificantDigits(_) => {
                ctx.mul(base, ctx.abs(reference))
            }
            Tolerance::Ulps(_) => ctx.mul(base, ctx.ulp(reference)),
        }
    }

    /// Returns true if `x` is indistinguishable from zero.
    pub fn zero<C: NumericContext>(&self, ctx: &C, x: C::Num) -> bool {
        let threshold = match self {
            Tolerance::Ulps(_) => self.value(ctx, ctx.zero()),
            _ => Ok(self.base(ctx)),
        };
        // an unrepresentable threshold covers every value
        threshold.map_or(true, |t| ctx.abs(x) <= t)
    }

    /// Returns true if `x` and `y` are indistinguishable.
    ///
    /// A difference too large for the number type is never within
    /// tolerance; a threshold too large for it always is.
    pub fn eq<C: NumericContext>(&self, ctx: &C, x: C::Num, y: C::Num) -> bool {
        let Ok(diff) = ctx.sub(x, y) else {
            return false;
        };
        let magnitude = ctx.max(ctx.abs(x), ctx.abs(y));
        self.value(ctx, magnitude).map_or(true, |t| ctx.abs(diff) <= t)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::Decimals(6)
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tolerance::Absolute(v) => write!(f, "{v:e} absolute"),
            Tolerance::Relative(v) => write!(f, "{v:e} relative"),
            Tolerance::Decimals(n) => write!(f, "{n} decimals"),
            Tolerance::SignificantDigits(n) => write!(f, "{n} digits"),
            Tolerance::Ulps(n) => write!(f, "{n} ulps"),
        }
    }
}

impl FromStr for Tolerance {
    type Err = CoreError;

    /// Parses `"<value> <kind>"`, e.g. `"3 decimals"`, `"1e-9 absolute"`,
    /// `"1e-6 relative"`, `"12 digits"` or `"2 ulps"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(value), Some(kind), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CoreError::parse(s, "expected '<value> <kind>'"));
        };

        let float = || {
            value
                .parse::<f64>()
                .map_err(|e| CoreError::parse(s, e.to_string()))
        };
        let count = || {
            value
                .parse::<u32>()
                .map_err(|e| CoreError::parse(s, e.to_string()))
        };

        match kind.to_ascii_lowercase().as_str() {
            "abs" | "absolute" => Ok(Tolerance::Absolute(float()?)),
            "rel" | "relative" => Ok(Tolerance::Relative(float()?)),
            "decimal" | "decimals" => Ok(Tolerance::Decimals(count()?)),
            "digit" | "digits" | "sig_decimals" => Ok(Tolerance::SignificantDigits(count()?)),
            "ulp" | "ulps" => Ok(Tolerance::Ulps(count()?)),
            other => Err(CoreError::parse(s, format!("unknown tolerance kind '{other}'"))),
        }
    }
}
