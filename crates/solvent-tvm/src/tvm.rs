//! The TVM equation and its solver.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use solvent_core::{NumericContext, Tolerance};
use solvent_math::config::SolverOptions;
use solvent_math::equation::EquationDescriptor;
use solvent_math::solvers::{ParamValue, ParameterizedSolver, Reason, SolveReport};
use solvent_math::MathResult;
use tracing::debug;

use crate::error::{TvmError, TvmResult};
use crate::parameter::{TvmParameter, TvmValues};

/// Residual of the TVM equation.
///
/// With the periodic rate `r = i / 100 / p` and discount factor
/// `k = (1 + r)^-t`, the residual is `m0 + pmt * (1 - k) / r + m * k`.
/// At `r = 0` the annuity factor `(1 - k) / r` is replaced by its limit `t`.
///
/// Values outside the range of the number type fail with an overflow
/// error rather than panicking.
pub fn residual<C: NumericContext>(
    ctx: &C,
    m: C::Num,
    t: C::Num,
    m0: C::Num,
    pmt: C::Num,
    i: C::Num,
    p: C::Num,
) -> MathResult<C::Num> {
    let rate = ctx.div(ctx.div(i, ctx.from_i64(100))?, p)?;
    if rate == ctx.zero() {
        return Ok(ctx.add(ctx.add(m0, ctx.mul(pmt, t)?)?, m)?);
    }
    let k = ctx.exp(ctx.mul(ctx.ln_1p(rate)?, -t)?)?;
    let annuity = ctx.div(ctx.mul(pmt, ctx.sub(ctx.one(), k)?)?, rate)?;
    Ok(ctx.add(ctx.add(m0, annuity)?, ctx.mul(m, k)?)?)
}

/// The TVM equation as a six-parameter descriptor in `m, t, m0, pmt, i, p`
/// order.
pub fn equation<C: NumericContext>(context: C) -> MathResult<EquationDescriptor<C::Num>> {
    EquationDescriptor::new(TvmParameter::ALL.map(TvmParameter::name), move |v: &[C::Num]| {
        residual(&context, v[0], v[1], v[2], v[3], v[4], v[5])
    })
}

/// A solved TVM quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TvmSolution<N> {
    /// The quantity that was missing.
    pub parameter: TvmParameter,
    /// Its solved value.
    pub value: N,
}

impl<N> TvmSolution<N> {
    /// The solution as a single-entry name map.
    pub fn into_map(self) -> HashMap<String, N> {
        HashMap::from([(self.parameter.name().to_string(), self.value)])
    }
}

/// Time-value-of-money solver.
///
/// Relates an initial value `m0`, a periodic payment `pmt` and a final
/// value `m` over `t` periods at `i` percent per year compounded `p` times
/// a year, and solves for whichever one of the six is missing.
///
/// # Example
///
/// ```rust
/// use solvent_core::{F64Context, Tolerance};
/// use solvent_tvm::{Tvm, TvmParameter, TvmValues};
///
/// let mut tvm = Tvm::new(F64Context, Tolerance::Decimals(2)).unwrap();
/// let values = TvmValues::new()
///     .with(TvmParameter::T, 240.0)
///     .with(TvmParameter::M0, 10000.0)
///     .with(TvmParameter::M, 0.0)
///     .with(TvmParameter::I, 3.0)
///     .with(TvmParameter::P, 12.0);
///
/// let solution = tvm.solve(&values).unwrap();
/// assert_eq!(solution.parameter, TvmParameter::Pmt);
/// assert!((solution.value + 55.45975978539105).abs() < 5e-3);
/// ```
#[derive(Debug)]
pub struct Tvm<C: NumericContext> {
    solver: ParameterizedSolver<C>,
}

impl<C: NumericContext> Tvm<C> {
    /// Default seeds for the unknown.
    pub const DEFAULT_GUESSES: [i64; 2] = [1, 2];

    /// Creates a solver with the regula-falsi secant method.
    pub fn new(context: C, tolerance: Tolerance) -> TvmResult<Self> {
        let guesses = Self::DEFAULT_GUESSES.map(|g| context.from_i64(g));
        let solver = ParameterizedSolver::new(equation(context.clone())?, context, tolerance)
            .with_default_guesses(guesses);
        Ok(Self { solver })
    }

    /// Creates a solver from options; empty default guesses fall back to
    /// `{1, 2}`.
    pub fn with_options(context: C, options: &SolverOptions) -> TvmResult<Self> {
        let mut options = options.clone();
        if options.default_guesses.is_empty() {
            options.default_guesses = Self::DEFAULT_GUESSES.map(|g| g as f64).to_vec();
        }
        let solver = options
            .parameterized(equation(context.clone())?, context)
            .map_err(|e| TvmError::InvalidOptions(e.to_string()))?;
        Ok(Self { solver })
    }

    /// Parameter names and descriptions in equation order.
    pub fn parameter_descriptions() -> Vec<(TvmParameter, &'static str)> {
        TvmParameter::ALL
            .into_iter()
            .map(|p| (p, p.description()))
            .collect()
    }

    /// Solves for the single missing parameter.
    pub fn solve(&mut self, values: &TvmValues<C::Num>) -> TvmResult<TvmSolution<C::Num>> {
        self.solve_with_guess(values, None)
    }

    /// Solves for the single missing parameter, seeding the search with
    /// `guess` instead of the default guesses.
    pub fn solve_with_guess(
        &mut self,
        values: &TvmValues<C::Num>,
        guess: Option<ParamValue<C::Num>>,
    ) -> TvmResult<TvmSolution<C::Num>> {
        let parameter = values.unknown()?;

        let mut parameters: HashMap<String, ParamValue<C::Num>> = values
            .known()
            .into_iter()
            .map(|(name, v)| (name, ParamValue::Guess(v)))
            .collect();
        if let Some(guess) = guess {
            parameters.insert(parameter.name().to_string(), guess);
        }

        let value = self.solver.root(parameter.name(), &parameters)?;
        debug!(
            parameter = parameter.name(),
            value = %value,
            reason = %self.solver.reason(),
            "tvm solved"
        );
        Ok(TvmSolution { parameter, value })
    }

    /// Solves from a name map in which exactly one value is `None`.
    pub fn solve_map(
        &mut self,
        values: &HashMap<String, Option<C::Num>>,
    ) -> TvmResult<HashMap<String, C::Num>> {
        let values = TvmValues::from_map(values)?;
        Ok(self.solve(&values)?.into_map())
    }

    /// Residual of the equation for a complete parameter set.
    pub fn value(&self, values: &TvmValues<C::Num>) -> TvmResult<C::Num> {
        let missing = values.unknowns().len();
        if missing > 0 {
            return Err(TvmError::ParameterCount { unknowns: missing });
        }
        Ok(self.solver.equation().evaluate_named(&values.known())?)
    }

    /// Why the last search stopped.
    pub fn reason(&self) -> Reason {
        self.solver.reason()
    }

    /// False if the last search gave up.
    pub fn is_ok(&self) -> bool {
        self.solver.is_ok()
    }

    /// Summary of the last search.
    pub fn report(&self) -> Option<SolveReport<C::Num>> {
        self.solver.report()
    }

    /// The numeric backend.
    pub fn context(&self) -> &C {
        self.solver.context()
    }
}
