//! IEEE-754 double precision backend.

use crate::error::{CoreError, CoreResult};
use crate::numeric::NumericContext;

/// Numeric context over `f64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct F64Context;

impl NumericContext for F64Context {
    type Num = f64;

    fn name(&self) -> &'static str {
        "f64"
    }

    fn from_i64(&self, value: i64) -> f64 {
        value as f64
    }

    fn from_f64(&self, value: f64) -> CoreResult<f64> {
        Ok(value)
    }

    fn parse(&self, input: &str) -> CoreResult<f64> {
        input
            .trim()
            .parse::<f64>()
            .map_err(|e| CoreError::parse(input, e.to_string()))
    }

    fn to_f64(&self, value: f64) -> f64 {
        value
    }

    fn exp(&self, x: f64) -> CoreResult<f64> {
        Ok(x.exp())
    }

    fn ln(&self, x: f64) -> CoreResult<f64> {
        if x <= 0.0 {
            return Err(CoreError::domain("ln", x));
        }
        Ok(x.ln())
    }

    fn ulp(&self, x: f64) -> f64 {
        let a = x.abs();
        if !a.is_finite() {
            return f64::NAN;
        }
        f64::from_bits(a.to_bits() + 1) - a
    }

    fn pow10(&self, exponent: i32) -> f64 {
        10f64.powi(exponent)
    }

    fn is_finite(&self, x: f64) -> bool {
        x.is_finite()
    }

    fn div(&self, numerator: f64, denominator: f64) -> CoreResult<f64> {
        if denominator == 0.0 {
            return Err(CoreError::division_by_zero(numerator));
        }
        Ok(numerator / denominator)
    }
}
