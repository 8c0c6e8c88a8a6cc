//! 28-digit decimal backend built on `rust_decimal`.

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};

use crate::error::{CoreError, CoreResult};
use crate::numeric::NumericContext;

/// Below this argument `exp` is smaller than the finest representable step.
const EXP_UNDERFLOW: Decimal = Decimal::from_parts(65, 0, 0, true, 0);

/// Largest supported scale (28 fractional digits).
const MAX_SCALE: u32 = 28;

/// Numeric context over `rust_decimal::Decimal`.
///
/// The operator traits follow `Decimal` itself and panic on overflow of
/// the 96-bit mantissa. The context methods `add`, `sub`, `mul`, `div`,
/// `exp` and `ln` are checked and report errors instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecimalContext;

impl NumericContext for DecimalContext {
    type Num = Decimal;

    fn name(&self) -> &'static str {
        "decimal"
    }

    fn from_i64(&self, value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn from_f64(&self, value: f64) -> CoreResult<Decimal> {
        Decimal::from_f64(value).ok_or_else(|| CoreError::domain("from_f64", value))
    }

    fn parse(&self, input: &str) -> CoreResult<Decimal> {
        let trimmed = input.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|e| CoreError::parse(input, e.to_string()))
    }

    fn to_f64(&self, value: Decimal) -> f64 {
        value.to_f64().unwrap_or(f64::NAN)
    }

    fn exp(&self, x: Decimal) -> CoreResult<Decimal> {
        if x < EXP_UNDERFLOW {
            return Ok(Decimal::ZERO);
        }
        x.checked_exp().ok_or_else(|| CoreError::overflow("exp"))
    }

    fn ln(&self, x: Decimal) -> CoreResult<Decimal> {
        if x <= Decimal::ZERO {
            return Err(CoreError::domain("ln", x));
        }
        x.checked_ln().ok_or_else(|| CoreError::domain("ln", x))
    }

    fn ulp(&self, x: Decimal) -> Decimal {
        let floor = Decimal::new(1, MAX_SCALE);
        let scaled = x.abs() * Decimal::new(1, MAX_SCALE - 1);
        scaled.max(floor)
    }

    fn pow10(&self, exponent: i32) -> Decimal {
        let clamped = exponent.clamp(-(MAX_SCALE as i32), MAX_SCALE as i32);
        if clamped < 0 {
            Decimal::new(1, clamped.unsigned_abs())
        } else {
            Decimal::from_i128_with_scale(10i128.pow(clamped as u32), 0)
        }
    }

    fn is_finite(&self, _x: Decimal) -> bool {
        true
    }

    fn add(&self, a: Decimal, b: Decimal) -> CoreResult<Decimal> {
        a.checked_add(b).ok_or_else(|| CoreError::overflow("add"))
    }

    fn sub(&self, a: Decimal, b: Decimal) -> CoreResult<Decimal> {
        a.checked_sub(b).ok_or_else(|| CoreError::overflow("sub"))
    }

    fn mul(&self, a: Decimal, b: Decimal) -> CoreResult<Decimal> {
        a.checked_mul(b).ok_or_else(|| CoreError::overflow("mul"))
    }

    fn div(&self, numerator: Decimal, denominator: Decimal) -> CoreResult<Decimal> {
        if denominator.is_zero() {
            return Err(CoreError::division_by_zero(numerator));
        }
        numerator
            .checked_div(denominator)
            .ok_or_else(|| CoreError::overflow("div"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain_and_scientific() {
        let ctx = DecimalContext;
        assert_eq!(ctx.parse("-55.45975978539105").unwrap(), dec!(-55.45975978539105));
        assert_eq!(ctx.parse("5E-4").unwrap(), dec!(0.0005));
        assert!(ctx.parse("abc").is_err());
    }

    #[test]
    fn test_pow10() {
        let ctx = DecimalContext;
        assert_eq!(ctx.pow10(0), dec!(1));
        assert_eq!(ctx.pow10(3), dec!(1000));
        assert_eq!(ctx.pow10(-3), dec!(0.001));
        assert_eq!(ctx.pow10(-40), Decimal::new(1, 28));
    }

    #[test]
    fn test_exp_underflow_and_overflow() {
        let ctx = DecimalContext;
        assert_eq!(ctx.exp(dec!(-100)).unwrap(), Decimal::ZERO);
        assert!(matches!(ctx.exp(dec!(100)), Err(CoreError::Overflow { .. })));
        let e = ctx.to_f64(ctx.exp(dec!(1)).unwrap());
        assert_relative_eq!(e, std::f64::consts::E, epsilon = 1e-10);
    }

    #[test]
    fn test_ln_domain() {
        let ctx = DecimalContext;
        assert!(matches!(ctx.ln(dec!(0)), Err(CoreError::Domain { .. })));
        assert!(ctx.ln(dec!(-1)).is_err());
        assert_relative_eq!(ctx.to_f64(ctx.ln(dec!(5)).unwrap()), 5f64.ln(), epsilon = 1e-10);
    }

    #[test]
    fn test_ulp_is_relative() {
        let ctx = DecimalContext;
        assert_eq!(ctx.ulp(dec!(0)), Decimal::new(1, 28));
        assert_eq!(ctx.ulp(dec!(1000)), dec!(0.000000000000000000000001));
    }
}
