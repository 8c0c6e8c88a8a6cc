//! Reference TVM problems on both numeric backends.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use solvent_core::{CoreError, CoreResult, DecimalContext, F64Context, NumericContext, Tolerance};
use solvent_math::config::{Method, SolverOptions};
use solvent_math::MathError;
use solvent_math::solvers::{ParamValue, Reason};
use solvent_tvm::{Tvm, TvmError, TvmParameter, TvmValues};

fn loan<N: Copy>(t: N, m0: N, m: N, i: N, p: N) -> TvmValues<N> {
    TvmValues::new()
        .with(TvmParameter::T, t)
        .with(TvmParameter::M0, m0)
        .with(TvmParameter::M, m)
        .with(TvmParameter::I, i)
        .with(TvmParameter::P, p)
}

// =============================================================================
// F64
// =============================================================================

#[test]
fn f64_solves_payment() {
    let mut tvm = Tvm::new(F64Context, Tolerance::Decimals(2)).unwrap();
    let solution = tvm.solve(&loan(240.0, 10000.0, 0.0, 3.0, 12.0)).unwrap();

    assert_eq!(solution.parameter, TvmParameter::Pmt);
    assert_abs_diff_eq!(solution.value, -55.45975978539105, epsilon = 5e-3);
    assert_eq!(tvm.reason(), Reason::ZeroFound);
}

#[test]
fn f64_solves_time() {
    let mut tvm = Tvm::new(F64Context, Tolerance::Decimals(2)).unwrap();
    let values = TvmValues::new()
        .with(TvmParameter::Pmt, -55.45975978539105)
        .with(TvmParameter::M0, 10000.0)
        .with(TvmParameter::M, 0.0)
        .with(TvmParameter::I, 3.0)
        .with(TvmParameter::P, 12.0);

    let solution = tvm.solve(&values).unwrap();
    assert_eq!(solution.parameter, TvmParameter::T);
    assert_abs_diff_eq!(solution.value, 240.0, epsilon = 5e-3);
}

#[test]
fn f64_solves_final_value() {
    let mut tvm = Tvm::new(F64Context, Tolerance::Decimals(2)).unwrap();

    let values = TvmValues::new()
        .with(TvmParameter::T, 63.0)
        .with(TvmParameter::M0, 0.0)
        .with(TvmParameter::Pmt, -1_000_000.0)
        .with(TvmParameter::I, 0.00000161 * 12.0)
        .with(TvmParameter::P, 12.0);
    let solution = tvm.solve(&values).unwrap();
    assert_eq!(solution.parameter, TvmParameter::M);
    assert_abs_diff_eq!(solution.value, 63000031.4433, epsilon = 5e-3);

    let n = 31_536_000.0;
    let values = TvmValues::new()
        .with(TvmParameter::T, n)
        .with(TvmParameter::M0, 0.0)
        .with(TvmParameter::Pmt, -0.01)
        .with(TvmParameter::I, 10.0 / n)
        .with(TvmParameter::P, 1.0);
    let solution = tvm.solve(&values).unwrap();
    assert_abs_diff_eq!(solution.value, 331667.006691, epsilon = 5e-3);
}

#[test]
fn f64_solve_map() {
    let mut tvm = Tvm::new(F64Context, Tolerance::Decimals(2)).unwrap();
    let values = HashMap::from([
        ("t".to_string(), Some(240.0)),
        ("m0".to_string(), Some(10000.0)),
        ("m".to_string(), Some(0.0)),
        ("i".to_string(), Some(3.0)),
        ("p".to_string(), Some(12.0)),
        ("pmt".to_string(), None),
    ]);

    let solution = tvm.solve_map(&values).unwrap();
    assert_eq!(solution.keys().collect::<Vec<_>>(), vec!["pmt"]);
    assert_abs_diff_eq!(solution["pmt"], -55.45975978539105, epsilon = 5e-3);
}

#[test]
fn interest_rate_from_an_interval() {
    let mut tvm = Tvm::new(F64Context, Tolerance::Decimals(6)).unwrap();
    let values = TvmValues::new()
        .with(TvmParameter::T, 240.0)
        .with(TvmParameter::M0, 10000.0)
        .with(TvmParameter::M, 0.0)
        .with(TvmParameter::Pmt, -55.45975978539105)
        .with(TvmParameter::P, 12.0);

    let solution = tvm
        .solve_with_guess(&values, Some(ParamValue::Interval(1.0, 10.0)))
        .unwrap();
    assert_eq!(solution.parameter, TvmParameter::I);
    assert_abs_diff_eq!(solution.value, 3.0, epsilon = 1e-4);
}

#[test]
fn secant_method_from_options() {
    let options = SolverOptions::new(Tolerance::Decimals(2)).with_method(Method::Secant);
    let mut tvm = Tvm::with_options(F64Context, &options).unwrap();

    let solution = tvm.solve(&loan(240.0, 10000.0, 0.0, 3.0, 12.0)).unwrap();
    assert_abs_diff_eq!(solution.value, -55.45975978539105, epsilon = 5e-3);

    let bad = SolverOptions::new(Tolerance::Decimals(2)).with_max_iterations(0);
    assert!(matches!(
        Tvm::with_options(F64Context, &bad),
        Err(TvmError::InvalidOptions(_))
    ));
}

/// F64 backend that counts residual evaluations through its `div` calls.
#[derive(Debug, Clone, Default)]
struct CountingContext {
    divisions: Arc<AtomicUsize>,
}

impl CountingContext {
    fn divisions(&self) -> usize {
        self.divisions.load(Ordering::SeqCst)
    }
}

impl NumericContext for CountingContext {
    type Num = f64;

    fn name(&self) -> &'static str {
        "counting"
    }

    fn from_i64(&self, value: i64) -> f64 {
        F64Context.from_i64(value)
    }

    fn from_f64(&self, value: f64) -> CoreResult<f64> {
        F64Context.from_f64(value)
    }

    fn parse(&self, input: &str) -> CoreResult<f64> {
        F64Context.parse(input)
    }

    fn to_f64(&self, value: f64) -> f64 {
        value
    }

    fn exp(&self, x: f64) -> CoreResult<f64> {
        F64Context.exp(x)
    }

    fn ln(&self, x: f64) -> CoreResult<f64> {
        F64Context.ln(x)
    }

    fn ulp(&self, x: f64) -> f64 {
        F64Context.ulp(x)
    }

    fn pow10(&self, exponent: i32) -> f64 {
        F64Context.pow10(exponent)
    }

    fn is_finite(&self, x: f64) -> bool {
        x.is_finite()
    }

    fn div(&self, numerator: f64, denominator: f64) -> CoreResult<f64> {
        self.divisions.fetch_add(1, Ordering::SeqCst);
        F64Context.div(numerator, denominator)
    }
}

#[test]
fn parameter_count_is_checked_before_evaluation() {
    let ctx = CountingContext::default();
    let mut tvm = Tvm::new(ctx.clone(), Tolerance::Decimals(2)).unwrap();

    let complete = loan(240.0, 10000.0, 0.0, 3.0, 12.0).with(TvmParameter::Pmt, -55.0);
    let err = tvm.solve(&complete).unwrap_err();
    assert_eq!(err, TvmError::ParameterCount { unknowns: 0 });
    assert_eq!(err.to_string(), "Nothing to solve");

    let sparse = TvmValues::new().with(TvmParameter::T, 240.0);
    let err = tvm.solve(&sparse).unwrap_err();
    assert_eq!(err.to_string(), "Too many unknowns");
    assert_eq!(tvm.value(&sparse), Err(TvmError::parameter_count(5)));

    assert_eq!(ctx.divisions(), 0);
    assert!(tvm.report().is_none());
    assert_eq!(tvm.reason(), Reason::Unset);

    // the counter does see real evaluations
    tvm.solve(&loan(240.0, 10000.0, 0.0, 3.0, 12.0)).unwrap();
    assert!(ctx.divisions() > 0);
}

// =============================================================================
// DECIMAL
// =============================================================================

#[test]
fn decimal_solves_payment_and_time() {
    let mut tvm = Tvm::new(DecimalContext, Tolerance::Decimals(3)).unwrap();

    let solution = tvm
        .solve(&loan(dec!(240), dec!(10000), dec!(0), dec!(3), dec!(12)))
        .unwrap();
    assert_eq!(solution.parameter, TvmParameter::Pmt);
    assert!((solution.value - dec!(-55.45975978539105)).abs() < dec!(0.0005));

    let values = TvmValues::new()
        .with(TvmParameter::Pmt, dec!(-55.45975978539105))
        .with(TvmParameter::M0, dec!(10000))
        .with(TvmParameter::M, dec!(0))
        .with(TvmParameter::I, dec!(3))
        .with(TvmParameter::P, dec!(12));
    let solution = tvm.solve(&values).unwrap();
    assert!((solution.value - dec!(240)).abs() < dec!(0.0005));
}

#[test]
fn decimal_solves_final_value() {
    let ctx = DecimalContext;
    let mut tvm = Tvm::new(ctx, Tolerance::Decimals(3)).unwrap();

    let values = TvmValues::new()
        .with(TvmParameter::T, dec!(63))
        .with(TvmParameter::M0, dec!(0))
        .with(TvmParameter::Pmt, dec!(-1000000))
        .with(TvmParameter::I, dec!(0.00000161) * dec!(12))
        .with(TvmParameter::P, dec!(12));
    let solution = tvm.solve(&values).unwrap();
    assert!((solution.value - dec!(63000031.4433)).abs() < dec!(0.005));

    let n = dec!(31536000);
    let values = TvmValues::new()
        .with(TvmParameter::T, n)
        .with(TvmParameter::M0, dec!(0))
        .with(TvmParameter::Pmt, dec!(-0.01))
        .with(TvmParameter::I, ctx.div(dec!(10), n).unwrap())
        .with(TvmParameter::P, dec!(1));
    let solution = tvm.solve(&values).unwrap();
    assert!((solution.value - dec!(331667.006691)).abs() < dec!(0.005));
}

#[test]
fn decimal_value_of_complete_set() {
    let tvm = Tvm::new(DecimalContext, Tolerance::Decimals(3)).unwrap();
    let values: TvmValues<Decimal> = loan(dec!(240), dec!(10000), dec!(0), dec!(3), dec!(12))
        .with(TvmParameter::Pmt, dec!(-55.45975978539105));

    let residual = tvm.value(&values).unwrap();
    assert!(residual.abs() < dec!(0.000001));
}

fn overflowing_loan() -> TvmValues<Decimal> {
    TvmValues::new()
        .with(TvmParameter::M0, dec!(0))
        .with(TvmParameter::Pmt, dec!(100))
        .with(TvmParameter::I, dec!(3))
        .with(TvmParameter::P, dec!(12))
}

#[test]
fn decimal_value_overflow_is_an_error() {
    let tvm = Tvm::new(DecimalContext, Tolerance::Decimals(3)).unwrap();
    let values = overflowing_loan()
        .with(TvmParameter::M, dec!(1))
        .with(TvmParameter::T, dec!(-26000));

    assert!(matches!(
        tvm.value(&values),
        Err(TvmError::Math(MathError::Numeric(CoreError::Overflow { .. })))
    ));
}

#[test]
fn decimal_search_into_overflow_is_an_error() {
    let mut tvm = Tvm::new(DecimalContext, Tolerance::Decimals(3)).unwrap();
    let values = TvmValues::new()
        .with(TvmParameter::M, dec!(0))
        .with(TvmParameter::M0, dec!(10000))
        .with(TvmParameter::Pmt, dec!(-55.45975978539105))
        .with(TvmParameter::I, dec!(3))
        .with(TvmParameter::P, dec!(12));

    let result = tvm.solve_with_guess(
        &values,
        Some(ParamValue::Interval(dec!(-26000), dec!(-25990))),
    );
    assert!(matches!(
        result,
        Err(TvmError::Math(MathError::Numeric(CoreError::Overflow { .. })))
    ));

    // the solver stays usable afterwards
    let solution = tvm.solve(&values).unwrap();
    assert!((solution.value - dec!(240)).abs() < dec!(0.0005));
}
