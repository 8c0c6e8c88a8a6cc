//! Root-finding engine.
//!
//! This module provides an iterative solver for scalar equations `f(x) = 0`:
//!
//! - [`SolverEngine`]: owns the iteration state, seeds the search, tests
//!   for convergence and enforces the iteration budget
//! - [`Secant`]: secant steps with a bisection fallback inside a bracket
//! - [`RegulaFalsiSecant`]: secant steps with a regula-falsi fallback
//! - [`ParameterizedSolver`]: solves an n-ary [`EquationDescriptor`] for
//!   any one of its named parameters
//!
//! # Convergence
//!
//! After every step the engine checks, in this order:
//!
//! | Test | Reason |
//! |------|--------|
//! | residual is zero under the user tolerance | [`Reason::ZeroFound`] |
//! | `x` did not move (one ULP) | [`Reason::CriticalPoint`] |
//! | residual did not change (one ULP) | [`Reason::Flat`] |
//!
//! Only [`Reason::ZeroFound`] guarantees a root; the other two report
//! stagnation at an extremum, asymptote, sign reversal or flat region.
//! A search that cannot continue clears the `ok` flag and records
//! [`Reason::StalledDerivative`] or [`Reason::MaxIterations`].
//!
//! # Example
//!
//! ```rust
//! use solvent_core::{F64Context, Tolerance};
//! use solvent_math::solvers::{Reason, Solver};
//!
//! let mut solver = Solver::secant(F64Context, Tolerance::Decimals(3), |x: f64| Ok(2.0 * x + 11.0))
//!     .with_default_guesses([0.0, 100.0]);
//!
//! let root = solver.root(&[]).unwrap();
//! assert!((root + 5.5).abs() < 5e-4);
//! assert_eq!(solver.reason(), Reason::ZeroFound);
//! ```
//!
//! [`EquationDescriptor`]: crate::equation::EquationDescriptor

mod bracket;
mod parameterized;
mod regula_falsi;
mod secant;

pub use bracket::Bracket;
pub use parameterized::{ParamValue, ParameterizedSolver};
pub use regula_falsi::RegulaFalsiSecant;
pub use secant::Secant;

use std::fmt;

use serde::{Deserialize, Serialize};
use solvent_core::{NumericContext, Tolerance};
use tracing::{debug, trace, warn};

use crate::error::{MathError, MathResult};

/// Default iteration budget.
pub const MAX_ITERATIONS: u32 = 8192;

/// Why a root search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// No search has run, or it stopped before any test applied.
    #[default]
    Unset,
    /// The residual is zero within the user tolerance.
    ZeroFound,
    /// The iterate stopped moving: an extremum, vertical asymptote or sign
    /// reversal rather than necessarily a root.
    CriticalPoint,
    /// The residual stopped changing.
    Flat,
    /// Zero secant slope and no bracket to fall back on.
    StalledDerivative,
    /// The iteration budget ran out.
    MaxIterations,
}

impl Reason {
    /// Returns true for the reasons that end a search successfully.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        matches!(self, Reason::ZeroFound | Reason::CriticalPoint | Reason::Flat)
    }

    /// Returns true only when a genuine root was found.
    #[must_use]
    pub fn is_root(&self) -> bool {
        matches!(self, Reason::ZeroFound)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reason::Unset => "Unset",
            Reason::ZeroFound => "Zero found",
            Reason::CriticalPoint => "Critical point",
            Reason::Flat => "Flat",
            Reason::StalledDerivative => "Stalled derivative",
            Reason::MaxIterations => "Maximum iterations",
        };
        write!(f, "{name}")
    }
}

/// A trial point and its residual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point<N> {
    /// The trial point.
    pub x: N,
    /// The residual at `x`.
    pub fx: N,
}

/// Iteration state of the last root search.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationState<N> {
    /// Last iterate.
    pub current: Point<N>,
    /// Iterate before the last one.
    pub previous: Point<N>,
    /// Completed iterations.
    pub iteration: u32,
    /// Residual evaluations, including bracket endpoints.
    pub evaluations: u32,
    /// False once the engine decided it cannot continue.
    pub ok: bool,
    /// True once a convergence reason was set.
    pub converged: bool,
    /// Why the search stopped.
    pub reason: Reason,
    /// Validated seed points.
    pub guesses: Vec<N>,
}

impl<N: Copy> IterationState<N> {
    fn seeded(seed: Point<N>, guesses: Vec<N>) -> Self {
        Self {
            current: seed,
            previous: seed,
            iteration: 0,
            evaluations: 1,
            ok: true,
            converged: false,
            reason: Reason::Unset,
            guesses,
        }
    }
}

/// Summary of a root search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveReport<N> {
    /// Final iterate.
    pub root: N,
    /// Residual at the final iterate.
    pub residual: N,
    /// Completed iterations.
    pub iterations: u32,
    /// Residual evaluations.
    pub evaluations: u32,
    /// Why the search stopped.
    pub reason: Reason,
    /// False if the engine gave up.
    pub ok: bool,
    /// True if a convergence test passed.
    pub converged: bool,
}

/// Inputs to a single strategy step.
#[derive(Debug)]
pub struct StepContext<'a, C: NumericContext> {
    /// Numeric backend.
    pub context: &'a C,
    /// User tolerance.
    pub tolerance: &'a Tolerance,
    /// Index of the step being computed; `0` is the first step after seeding.
    pub iteration: u32,
    /// Validated seed points.
    pub guesses: &'a [C::Num],
    /// Last iterate.
    pub current: Point<C::Num>,
    /// Iterate before the last one.
    pub previous: Point<C::Num>,
}

/// Outcome of a strategy step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step<N> {
    /// Continue from this point.
    Next(N),
    /// No progress is possible; stop at this point.
    Stalled(N),
}

/// Residual evaluator handed to strategies.
///
/// Counts evaluations and rejects non-finite points and residuals.
pub struct Evaluator<'a, C: NumericContext> {
    context: &'a C,
    f: &'a mut dyn FnMut(C::Num) -> MathResult<C::Num>,
    evaluations: u32,
}

impl<'a, C: NumericContext> Evaluator<'a, C> {
    /// Wraps a residual function.
    pub fn new(context: &'a C, f: &'a mut dyn FnMut(C::Num) -> MathResult<C::Num>) -> Self {
        Self {
            context,
            f,
            evaluations: 0,
        }
    }

    /// Evaluates the residual at `x`.
    pub fn eval(&mut self, x: C::Num) -> MathResult<C::Num> {
        if !self.context.is_finite(x) {
            return Err(MathError::non_finite(x, "not evaluated"));
        }
        self.evaluations += 1;
        let fx = (self.f)(x)?;
        if !self.context.is_finite(fx) {
            return Err(MathError::non_finite(x, fx));
        }
        Ok(fx)
    }

    /// Number of evaluations so far.
    pub fn evaluations(&self) -> u32 {
        self.evaluations
    }
}

/// Per-iteration step rule of a root search.
///
/// The engine owns seeding, convergence and termination; a strategy only
/// validates the seeds and proposes the next iterate.
pub trait Strategy<C: NumericContext>: fmt::Debug {
    /// Name of the strategy, used in logs.
    fn name(&self) -> &'static str;

    /// Clears any state kept from a previous search.
    fn reset(&mut self);

    /// Validates and completes the seed list before the search starts.
    ///
    /// The default deduplicates the seeds, rejects an empty list and adds
    /// `first + 1` when only one seed remains.
    fn validate(&mut self, context: &C, guesses: &mut Vec<C::Num>) -> MathResult<()> {
        seed_pair(context, guesses)
    }

    /// Proposes the next iterate.
    fn step(
        &mut self,
        step: &StepContext<'_, C>,
        eval: &mut Evaluator<'_, C>,
    ) -> MathResult<Step<C::Num>>;

    /// Current bracket, if the strategy keeps one and has found it.
    fn bracket(&self) -> Option<&Bracket<C::Num>> {
        None
    }
}

impl<C: NumericContext, S: Strategy<C> + ?Sized> Strategy<C> for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn validate(&mut self, context: &C, guesses: &mut Vec<C::Num>) -> MathResult<()> {
        (**self).validate(context, guesses)
    }

    fn step(
        &mut self,
        step: &StepContext<'_, C>,
        eval: &mut Evaluator<'_, C>,
    ) -> MathResult<Step<C::Num>> {
        (**self).step(step, eval)
    }

    fn bracket(&self) -> Option<&Bracket<C::Num>> {
        (**self).bracket()
    }
}

/// Deduplicates `guesses` in order and completes a single seed with
/// `first + 1`.
///
/// The `+ 1` offset is a coarse default, not a tuned step.
pub fn seed_pair<C: NumericContext>(context: &C, guesses: &mut Vec<C::Num>) -> MathResult<()> {
    let mut unique: Vec<C::Num> = Vec::with_capacity(guesses.len().max(2));
    for &g in guesses.iter() {
        if !unique.contains(&g) {
            unique.push(g);
        }
    }
    *guesses = unique;

    match guesses.first().copied() {
        None => Err(MathError::InvalidGuess),
        Some(first) => {
            if guesses.len() < 2 {
                guesses.push(context.add(first, context.one())?);
            }
            Ok(())
        }
    }
}

/// Iterative root-finding engine.
///
/// Reusable across calls but not reentrant: every [`root`](Self::root)
/// call overwrites the state of the previous one.
#[derive(Debug)]
pub struct SolverEngine<C: NumericContext, S> {
    context: C,
    tolerance: Tolerance,
    strategy: S,
    default_guesses: Vec<C::Num>,
    max_iterations: u32,
    state: Option<IterationState<C::Num>>,
}

impl<C: NumericContext, S: Strategy<C>> SolverEngine<C, S> {
    /// Creates an engine with no default guesses and the default budget.
    pub fn new(context: C, tolerance: Tolerance, strategy: S) -> Self {
        Self {
            context,
            tolerance,
            strategy,
            default_guesses: Vec::new(),
            max_iterations: MAX_ITERATIONS,
            state: None,
        }
    }

    /// Sets the guesses appended to every call's explicit guesses.
    #[must_use]
    pub fn with_default_guesses(mut self, guesses: impl IntoIterator<Item = C::Num>) -> Self {
        self.default_guesses = guesses.into_iter().collect();
        self
    }

    /// Sets the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Replaces the default guesses.
    pub fn set_default_guesses(&mut self, guesses: impl IntoIterator<Item = C::Num>) {
        self.default_guesses = guesses.into_iter().collect();
    }

    /// Searches for a root of `f`.
    ///
    /// Explicit `guesses` come first, followed by the default guesses.
    /// Returns the last iterate; check [`reason`](Self::reason) or
    /// [`is_ok`](Self::is_ok) before treating it as a root.
    pub fn root<F>(&mut self, mut f: F, guesses: &[C::Num]) -> MathResult<C::Num>
    where
        F: FnMut(C::Num) -> MathResult<C::Num>,
    {
        let mut seeds: Vec<C::Num> = guesses
            .iter()
            .chain(self.default_guesses.iter())
            .copied()
            .collect();

        self.state = None;
        self.strategy.reset();
        self.strategy.validate(&self.context, &mut seeds)?;

        debug!(
            strategy = self.strategy.name(),
            context = self.context.name(),
            guesses = ?seeds,
            "root search started"
        );

        let mut evaluator = Evaluator::new(&self.context, &mut f);
        let x0 = seeds.first().copied().ok_or(MathError::InvalidGuess)?;
        let fx0 = evaluator.eval(x0)?;
        let state = self
            .state
            .insert(IterationState::seeded(Point { x: x0, fx: fx0 }, seeds));

        while state.ok && state.iteration < self.max_iterations {
            let step = StepContext {
                context: &self.context,
                tolerance: &self.tolerance,
                iteration: state.iteration,
                guesses: &state.guesses,
                current: state.current,
                previous: state.previous,
            };
            let next_x = match self.strategy.step(&step, &mut evaluator)? {
                Step::Next(x) => x,
                Step::Stalled(x) => {
                    state.ok = false;
                    state.reason = Reason::StalledDerivative;
                    x
                }
            };

            state.previous = state.current;
            let fx = evaluator.eval(next_x)?;
            state.current = Point { x: next_x, fx };
            state.evaluations = evaluator.evaluations();

            trace!(
                iteration = state.iteration,
                x = %next_x,
                fx = %fx,
                bracketing = self.strategy.bracket().is_some(),
                "step"
            );

            if state.ok {
                if let Some(reason) = convergence(&self.context, &self.tolerance, state) {
                    state.reason = reason;
                    state.converged = true;
                    break;
                }
            }
            state.iteration += 1;
        }

        if !state.converged && state.ok {
            state.ok = false;
            state.reason = Reason::MaxIterations;
        }
        if !state.ok {
            warn!(
                strategy = self.strategy.name(),
                reason = %state.reason,
                iterations = state.iteration,
                x = %state.current.x,
                "root search gave up"
            );
        }

        debug!(
            iterations = state.iteration,
            evaluations = state.evaluations,
            reason = %state.reason,
            root = %state.current.x,
            "root search finished"
        );

        Ok(state.current.x)
    }

    /// Why the last search stopped.
    pub fn reason(&self) -> Reason {
        self.state.as_ref().map_or(Reason::Unset, |s| s.reason)
    }

    /// Iterations used by the last search.
    pub fn iterations(&self) -> u32 {
        self.state.as_ref().map_or(0, |s| s.iteration)
    }

    /// Residual evaluations used by the last search.
    pub fn evaluations(&self) -> u32 {
        self.state.as_ref().map_or(0, |s| s.evaluations)
    }

    /// False if the last search gave up.
    pub fn is_ok(&self) -> bool {
        self.state.as_ref().map_or(true, |s| s.ok)
    }

    /// True if the last search met a convergence test.
    pub fn is_converged(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.converged)
    }

    /// Residual at the last iterate.
    pub fn value(&self) -> Option<C::Num> {
        self.state.as_ref().map(|s| s.current.fx)
    }

    /// Full state of the last search.
    pub fn state(&self) -> Option<&IterationState<C::Num>> {
        self.state.as_ref()
    }

    /// Summary of the last search.
    pub fn report(&self) -> Option<SolveReport<C::Num>> {
        self.state.as_ref().map(|s| SolveReport {
            root: s.current.x,
            residual: s.current.fx,
            iterations: s.iteration,
            evaluations: s.evaluations,
            reason: s.reason,
            ok: s.ok,
            converged: s.converged,
        })
    }

    /// The step strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The numeric backend.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// The user tolerance.
    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// The default guesses.
    pub fn default_guesses(&self) -> &[C::Num] {
        &self.default_guesses
    }

    /// The iteration budget.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

fn convergence<C: NumericContext>(
    ctx: &C,
    tolerance: &Tolerance,
    state: &IterationState<C::Num>,
) -> Option<Reason> {
    let machine = Tolerance::MACHINE;
    if tolerance.zero(ctx, state.current.fx) {
        Some(Reason::ZeroFound)
    } else if machine.eq(ctx, state.current.x, state.previous.x) {
        Some(Reason::CriticalPoint)
    } else if machine.eq(ctx, state.current.fx, state.previous.fx) {
        Some(Reason::Flat)
    } else {
        None
    }
}

/// A root-finding engine bound to one equation.
#[derive(Debug)]
pub struct Solver<C: NumericContext, S, F> {
    engine: SolverEngine<C, S>,
    equation: F,
}

impl<C, F> Solver<C, Secant<C>, F>
where
    C: NumericContext,
    F: FnMut(C::Num) -> MathResult<C::Num>,
{
    /// Secant solver with bisection fallback.
    pub fn secant(context: C, tolerance: Tolerance, equation: F) -> Self {
        Self::new(SolverEngine::new(context, tolerance, Secant::new()), equation)
    }
}

impl<C, F> Solver<C, RegulaFalsiSecant<C>, F>
where
    C: NumericContext,
    F: FnMut(C::Num) -> MathResult<C::Num>,
{
    /// Secant solver with regula-falsi fallback.
    pub fn regula_falsi_secant(context: C, tolerance: Tolerance, equation: F) -> Self {
        Self::new(
            SolverEngine::new(context, tolerance, RegulaFalsiSecant::new()),
            equation,
        )
    }
}

impl<C, S, F> Solver<C, S, F>
where
    C: NumericContext,
    S: Strategy<C>,
    F: FnMut(C::Num) -> MathResult<C::Num>,
{
    /// Binds an engine to an equation.
    pub fn new(engine: SolverEngine<C, S>, equation: F) -> Self {
        Self { engine, equation }
    }

    /// Sets the default guesses.
    #[must_use]
    pub fn with_default_guesses(mut self, guesses: impl IntoIterator<Item = C::Num>) -> Self {
        self.engine.set_default_guesses(guesses);
        self
    }

    /// Sets the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.engine = self.engine.with_max_iterations(max_iterations);
        self
    }

    /// Searches for a root starting from `guesses` and the default guesses.
    pub fn root(&mut self, guesses: &[C::Num]) -> MathResult<C::Num> {
        self.engine.root(&mut self.equation, guesses)
    }

    /// Why the last search stopped.
    pub fn reason(&self) -> Reason {
        self.engine.reason()
    }

    /// Iterations used by the last search.
    pub fn iterations(&self) -> u32 {
        self.engine.iterations()
    }

    /// False if the last search gave up.
    pub fn is_ok(&self) -> bool {
        self.engine.is_ok()
    }

    /// True if the last search met a convergence test.
    pub fn is_converged(&self) -> bool {
        self.engine.is_converged()
    }

    /// Residual at the last iterate.
    pub fn value(&self) -> Option<C::Num> {
        self.engine.value()
    }

    /// Summary of the last search.
    pub fn report(&self) -> Option<SolveReport<C::Num>> {
        self.engine.report()
    }

    /// The underlying engine.
    pub fn engine(&self) -> &SolverEngine<C, S> {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use solvent_core::F64Context;

    #[test]
    fn test_seed_pair_dedup_and_synthesis() {
        let ctx = F64Context;

        let mut g = vec![5.0, 0.0, 5.0, 100.0];
        seed_pair(&ctx, &mut g).unwrap();
        assert_eq!(g, vec![5.0, 0.0, 100.0]);

        let mut g = vec![3.0, 3.0];
        seed_pair(&ctx, &mut g).unwrap();
        assert_eq!(g, vec![3.0, 4.0]);

        let mut g: Vec<f64> = vec![];
        assert_eq!(seed_pair(&ctx, &mut g), Err(MathError::InvalidGuess));
    }

    #[test]
    fn test_no_guesses_fails_before_evaluation() {
        let mut calls = 0;
        let mut solver = Solver::secant(F64Context, Tolerance::Decimals(3), |x: f64| {
            calls += 1;
            Ok(x)
        });

        assert_eq!(solver.root(&[]), Err(MathError::InvalidGuess));
        assert_eq!(solver.reason(), Reason::Unset);
        drop(solver);
        assert_eq!(calls, 0);
    }

    /// Secant steps with a `validate` that accepts anything.
    #[derive(Debug, Default)]
    struct Permissive(Secant<F64Context>);

    impl Strategy<F64Context> for Permissive {
        fn name(&self) -> &'static str {
            "permissive"
        }

        fn reset(&mut self) {
            Strategy::<F64Context>::reset(&mut self.0);
        }

        fn validate(&mut self, _context: &F64Context, _guesses: &mut Vec<f64>) -> MathResult<()> {
            Ok(())
        }

        fn step(
            &mut self,
            step: &StepContext<'_, F64Context>,
            eval: &mut Evaluator<'_, F64Context>,
        ) -> MathResult<Step<f64>> {
            self.0.step(step, eval)
        }

        fn bracket(&self) -> Option<&Bracket<f64>> {
            Strategy::<F64Context>::bracket(&self.0)
        }
    }

    #[test]
    fn test_empty_seeds_after_custom_validation() {
        let mut engine =
            SolverEngine::new(F64Context, Tolerance::Decimals(3), Permissive::default());

        assert_eq!(engine.root(|x: f64| Ok(x), &[]), Err(MathError::InvalidGuess));
        assert_eq!(engine.evaluations(), 0);
        assert_eq!(engine.reason(), Reason::Unset);
    }

    #[test]
    fn test_seed_pair_overflow_is_an_error() {
        use rust_decimal::Decimal;
        use solvent_core::{CoreError, DecimalContext};

        let mut g = vec![Decimal::MAX];
        assert!(matches!(
            seed_pair(&DecimalContext, &mut g),
            Err(MathError::Numeric(CoreError::Overflow { .. }))
        ));
    }

    #[test]
    fn test_idle_engine_accessors() {
        let engine = SolverEngine::new(F64Context, Tolerance::Decimals(3), Secant::new());
        assert_eq!(engine.reason(), Reason::Unset);
        assert_eq!(engine.iterations(), 0);
        assert!(engine.is_ok());
        assert!(!engine.is_converged());
        assert!(engine.report().is_none());
        assert_eq!(engine.max_iterations(), MAX_ITERATIONS);
    }

    #[test]
    fn test_constant_function_is_flat() {
        let mut solver = Solver::secant(F64Context, Tolerance::Decimals(3), |_x: f64| Ok(1.0))
            .with_default_guesses([0.0, 1.0]);

        solver.root(&[]).unwrap();
        assert!(solver.is_converged());
        assert_eq!(solver.reason(), Reason::Flat);
        assert!(!solver.reason().is_root());
    }

    #[test]
    fn test_shallow_slope_without_bracket_stalls() {
        // the slope is below the user tolerance but the residual still moves
        let mut solver = Solver::secant(
            F64Context,
            Tolerance::Decimals(3),
            |x: f64| Ok(1.0 + 1e-6 * x),
        )
        .with_default_guesses([0.0, 1.0]);

        let x = solver.root(&[]).unwrap();
        assert!(!solver.is_ok());
        assert!(!solver.is_converged());
        assert_eq!(solver.reason(), Reason::StalledDerivative);
        assert_abs_diff_eq!(x, 1.0);
    }

    #[test]
    fn test_iteration_budget() {
        // x^2 + 1 has no real root; the secant wanders without a bracket
        let mut solver = Solver::secant(
            F64Context,
            Tolerance::Decimals(3),
            |x: f64| Ok(x * x + 1.0),
        )
        .with_default_guesses([0.3, 0.7])
        .with_max_iterations(3);

        solver.root(&[]).unwrap();
        assert!(!solver.is_ok());
        assert!(!solver.is_converged());
        assert_eq!(solver.reason(), Reason::MaxIterations);
        assert_eq!(solver.iterations(), 3);
    }

    #[test]
    fn test_non_finite_residual_is_an_error() {
        let mut solver = Solver::secant(
            F64Context,
            Tolerance::Decimals(3),
            |x: f64| Ok(1.0 / (x - 2.0)),
        )
        .with_default_guesses([2.0, 3.0]);

        assert!(matches!(solver.root(&[]), Err(MathError::NonFinite { .. })));
    }

    #[test]
    fn test_reason_classification() {
        assert!(Reason::ZeroFound.is_root());
        assert!(Reason::Flat.is_converged());
        assert!(!Reason::Flat.is_root());
        assert!(!Reason::MaxIterations.is_converged());
        assert_eq!(Reason::CriticalPoint.to_string(), "Critical point");
    }
}
