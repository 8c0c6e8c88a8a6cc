//! End-to-end root searches on both numeric backends.

use std::collections::HashMap;

use approx::assert_abs_diff_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use solvent_core::{DecimalContext, F64Context, NumericContext, Tolerance};
use solvent_math::prelude::*;

const LN_5: f64 = 1.6094379124341003;

// =============================================================================
// F64
// =============================================================================

#[test]
fn linear_converges_from_any_start() {
    for method in [Method::Secant, Method::RegulaFalsiSecant] {
        let mut engine = SolverOptions::new(Tolerance::Decimals(3))
            .with_method(method)
            .with_default_guesses([0.0, 100.0])
            .engine(F64Context)
            .unwrap();

        for guesses in [&[][..], &[5.0], &[6.0]] {
            let x = engine.root(|x: f64| Ok(2.0 * x + 11.0), guesses).unwrap();
            assert_abs_diff_eq!(x, -5.5, epsilon = 5e-4);
            assert!(engine.is_converged(), "{method} from {guesses:?}");
        }
    }
}

#[test]
fn exponential_converges_from_any_start() {
    for method in [Method::Secant, Method::RegulaFalsiSecant] {
        let mut engine = SolverOptions::new(Tolerance::Decimals(3))
            .with_method(method)
            .with_default_guesses([0.0, 10.0])
            .engine(F64Context)
            .unwrap();

        for guesses in [&[][..], &[1.0], &[2.0]] {
            let x = engine.root(|x: f64| Ok(2.0 * x.exp() - 10.0), guesses).unwrap();
            assert_abs_diff_eq!(x, 1.6094389956808506, epsilon = 5e-4);
            assert_eq!(engine.reason(), Reason::ZeroFound);
        }
    }
}

#[test]
fn single_guess_matches_explicit_pair() {
    let f = |x: f64| Ok(x * x - 7.0);

    let mut single = SolverEngine::new(F64Context, Tolerance::Decimals(9), Secant::new());
    let mut pair = SolverEngine::new(F64Context, Tolerance::Decimals(9), Secant::new());

    let a = single.root(f, &[3.0]).unwrap();
    let b = pair.root(f, &[3.0, 4.0]).unwrap();

    assert_eq!(a, b);
    assert_eq!(single.report(), pair.report());
    assert_eq!(single.state().unwrap().guesses, vec![3.0, 4.0]);
}

#[test]
fn duplicate_guesses_are_collapsed() {
    let mut engine = SolverEngine::new(F64Context, Tolerance::Decimals(6), Secant::new())
        .with_default_guesses([2.0, 2.0]);
    engine.root(|x: f64| Ok(x - 1.0), &[2.0]).unwrap();

    assert_eq!(engine.state().unwrap().guesses, vec![2.0, 3.0]);
}

#[test]
fn empty_guess_list_is_rejected() {
    let mut engine =
        SolverEngine::new(F64Context, Tolerance::Decimals(6), RegulaFalsiSecant::new());
    assert_eq!(engine.root(|x: f64| Ok(x), &[]), Err(MathError::InvalidGuess));
}

#[test]
fn report_describes_last_search() {
    let mut solver = Solver::regula_falsi_secant(
        F64Context,
        Tolerance::Decimals(6),
        |x: f64| Ok(x * x - 2.0),
    )
    .with_default_guesses([1.0, 2.0]);
    let x = solver.root(&[]).unwrap();

    let report = solver.report().unwrap();
    assert_eq!(report.root, x);
    assert_eq!(report.reason, Reason::ZeroFound);
    assert!(report.ok && report.converged);
    assert!(report.evaluations > report.iterations);
    assert_eq!(Some(report.residual), solver.value());
    assert_abs_diff_eq!(x, 2f64.sqrt(), epsilon = 1e-6);

    let json = serde_json::to_value(report).unwrap();
    assert_eq!(json["reason"], "zero_found");
}

#[test]
fn nan_residual_is_an_error() {
    let mut solver = Solver::secant(F64Context, Tolerance::Decimals(6), |x: f64| Ok(x.sqrt() - 1.0))
        .with_default_guesses([-4.0, -2.0]);

    assert!(matches!(solver.root(&[]), Err(MathError::NonFinite { .. })));
}

#[test]
fn budget_exhaustion_has_its_own_reason() {
    // the root at zero is approached only linearly by the secant
    let mut solver = Solver::secant(F64Context, Tolerance::Absolute(1e-300), |x: f64| Ok(x.powi(8)))
        .with_default_guesses([1.0, 0.9])
        .with_max_iterations(5);

    solver.root(&[]).unwrap();
    assert_eq!(solver.reason(), Reason::MaxIterations);
    assert!(!solver.is_ok());
    assert!(!solver.is_converged());
}

// =============================================================================
// DECIMAL
// =============================================================================

#[test]
fn decimal_linear_is_exact() {
    for method in [Method::Secant, Method::RegulaFalsiSecant] {
        let mut engine = SolverOptions::new(Tolerance::Decimals(5))
            .with_method(method)
            .with_default_guesses([0.0, 100.0])
            .engine(DecimalContext)
            .unwrap();

        for guesses in [&[][..], &[dec!(5)], &[dec!(6)]] {
            let x = engine.root(|x: Decimal| Ok(dec!(2) * x + dec!(11)), guesses).unwrap();
            assert_eq!(x, dec!(-5.5));
        }
    }
}

#[test]
fn decimal_exponential() {
    let ctx = DecimalContext;
    let mut solver = Solver::secant(ctx, Tolerance::Decimals(5), move |x: Decimal| {
        Ok(dec!(2) * ctx.exp(x)? - dec!(10))
    })
    .with_default_guesses([dec!(0), dec!(10)]);

    for guesses in [&[][..], &[dec!(1)], &[dec!(2)]] {
        let x = solver.root(guesses).unwrap();
        assert_abs_diff_eq!(ctx.to_f64(x), LN_5, epsilon = 5e-6);
    }
}

#[test]
fn decimal_backend_errors_propagate() {
    let ctx = DecimalContext;
    let f = move |x: Decimal| -> MathResult<Decimal> { Ok(ctx.ln(x)?) };
    let mut solver =
        Solver::secant(ctx, Tolerance::Decimals(5), f).with_default_guesses([dec!(-1), dec!(1)]);

    assert!(matches!(solver.root(&[]), Err(MathError::Numeric(_))));
}

// =============================================================================
// PARAMETERIZED
// =============================================================================

#[test]
fn parameterized_decimal_solve() {
    // m = p * (1 + r)^n with n fixed at 2
    let eq = EquationDescriptor::new(["m", "p", "r"], |v: &[Decimal]| {
        let growth = (Decimal::ONE + v[2]) * (Decimal::ONE + v[2]);
        Ok(v[1] * growth - v[0])
    })
    .unwrap();

    let mut solver = SolverOptions::new(Tolerance::Decimals(8))
        .with_default_guesses([0.0, 0.5])
        .parameterized(eq, DecimalContext)
        .unwrap();

    let params = HashMap::from([
        ("m".to_string(), ParamValue::Guess(dec!(121))),
        ("p".to_string(), ParamValue::Guess(dec!(100))),
    ]);
    let r = solver.root("r", &params).unwrap();
    assert!((r - dec!(0.1)).abs() < dec!(0.0000001));
    assert!(solver.is_ok());
}
