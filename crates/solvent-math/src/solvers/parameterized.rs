//! Solving n-ary equations for one named unknown.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use solvent_core::{NumericContext, Tolerance};
use tracing::debug;

use super::{Reason, SolveReport, SolverEngine, Strategy, MAX_ITERATIONS};
use crate::config::Method;
use crate::equation::EquationDescriptor;
use crate::error::{MathError, MathResult};

/// Value supplied for a parameter.
///
/// Known parameters take a single value. For the unknown, the value (or
/// both ends of an interval) seeds the search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue<N> {
    /// A single value or guess.
    Guess(N),
    /// Two seed points for the unknown.
    Interval(N, N),
}

impl<N> From<N> for ParamValue<N> {
    fn from(value: N) -> Self {
        ParamValue::Guess(value)
    }
}

type DynEngine<C> = SolverEngine<C, Box<dyn Strategy<C> + Send>>;

/// Presents an n-ary equation as a family of single-unknown root problems.
///
/// The underlying engine is built on first use and kept until the default
/// guesses, method or budget change. Choosing a different unknown between
/// calls reuses it.
#[derive(Debug)]
pub struct ParameterizedSolver<C: NumericContext> {
    equation: EquationDescriptor<C::Num>,
    context: C,
    tolerance: Tolerance,
    method: Method,
    default_guesses: Vec<C::Num>,
    max_iterations: u32,
    engine: Option<DynEngine<C>>,
    builds: u32,
    binding: Option<(String, HashMap<String, C::Num>)>,
}

impl<C: NumericContext> ParameterizedSolver<C> {
    /// Creates a solver using the regula-falsi secant method and no default
    /// guesses.
    pub fn new(equation: EquationDescriptor<C::Num>, context: C, tolerance: Tolerance) -> Self {
        Self {
            equation,
            context,
            tolerance,
            method: Method::default(),
            default_guesses: Vec::new(),
            max_iterations: MAX_ITERATIONS,
            engine: None,
            builds: 0,
            binding: None,
        }
    }

    /// Sets the step method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self.engine = None;
        self
    }

    /// Sets the default guesses.
    #[must_use]
    pub fn with_default_guesses(mut self, guesses: impl IntoIterator<Item = C::Num>) -> Self {
        self.set_default_guesses(guesses);
        self
    }

    /// Sets the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self.engine = None;
        self
    }

    /// Replaces the default guesses and drops the cached engine.
    pub fn set_default_guesses(&mut self, guesses: impl IntoIterator<Item = C::Num>) {
        self.default_guesses = guesses.into_iter().collect();
        self.engine = None;
    }

    /// Solves the equation for `unknown`.
    ///
    /// Every other parameter must have a single value in `parameters`. A
    /// value given for `unknown` is used as the starting guess; without one
    /// the default guesses are used.
    pub fn root(
        &mut self,
        unknown: &str,
        parameters: &HashMap<String, ParamValue<C::Num>>,
    ) -> MathResult<C::Num> {
        if self.equation.index_of(unknown).is_none() {
            return Err(MathError::equation(format!("unknown parameter '{unknown}'")));
        }

        let mut known = HashMap::with_capacity(parameters.len());
        for (name, value) in parameters {
            if name == unknown {
                continue;
            }
            match value {
                ParamValue::Guess(v) => {
                    known.insert(name.clone(), *v);
                }
                ParamValue::Interval(..) => {
                    return Err(MathError::invalid_input(format!(
                        "known parameter '{name}' must have a single value"
                    )));
                }
            }
        }

        let guesses = match parameters.get(unknown) {
            Some(ParamValue::Guess(g)) => vec![*g],
            Some(ParamValue::Interval(a, b)) => vec![*a, *b],
            None => Vec::new(),
        };

        let f = self.equation.bind(unknown, &known)?;

        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => {
                self.builds += 1;
                debug!(method = %self.method, builds = self.builds, "building engine");
                SolverEngine::new(self.context.clone(), self.tolerance, self.method.strategy())
                    .with_default_guesses(self.default_guesses.iter().copied())
                    .with_max_iterations(self.max_iterations)
            }
        };
        let engine = self.engine.insert(engine);

        self.binding = Some((unknown.to_string(), known));
        engine.root(f, &guesses)
    }

    /// Residual at `candidate` for the unknown bound by the last
    /// [`root`](Self::root) call.
    pub fn equation_value(&self, candidate: C::Num) -> MathResult<C::Num> {
        let (unknown, known) = self
            .binding
            .as_ref()
            .ok_or_else(|| MathError::equation("no unknown has been bound yet"))?;
        let f = self.equation.bind(unknown, known)?;
        f(candidate)
    }

    /// The equation being solved.
    pub fn equation(&self) -> &EquationDescriptor<C::Num> {
        &self.equation
    }

    /// The numeric backend.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// The step method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The default guesses.
    pub fn default_guesses(&self) -> &[C::Num] {
        &self.default_guesses
    }

    /// Name of the unknown bound by the last call.
    pub fn unknown(&self) -> Option<&str> {
        self.binding.as_ref().map(|(name, _)| name.as_str())
    }

    /// Number of times the underlying engine has been built.
    pub fn engine_builds(&self) -> u32 {
        self.builds
    }

    /// Why the last search stopped.
    pub fn reason(&self) -> Reason {
        self.engine.as_ref().map_or(Reason::Unset, SolverEngine::reason)
    }

    /// Iterations used by the last search.
    pub fn iterations(&self) -> u32 {
        self.engine.as_ref().map_or(0, SolverEngine::iterations)
    }

    /// False if the last search gave up.
    pub fn is_ok(&self) -> bool {
        self.engine.as_ref().map_or(true, SolverEngine::is_ok)
    }

    /// Summary of the last search.
    pub fn report(&self) -> Option<SolveReport<C::Num>> {
        self.engine.as_ref().and_then(SolverEngine::report)
    }
}
