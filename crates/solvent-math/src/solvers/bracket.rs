//! Bracket bookkeeping shared by the secant strategies.

use serde::{Deserialize, Serialize};
use solvent_core::{Number, NumericContext};
use tracing::trace;

use crate::error::{MathError, MathResult};
use crate::solvers::{Evaluator, Point, Step, StepContext};

/// Two points whose residuals have opposite signs.
///
/// Invariant: `a <= b` and `sign(fa) != sign(fb)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bracket<N> {
    /// Lower endpoint.
    pub a: N,
    /// Upper endpoint.
    pub b: N,
    /// Residual at `a`.
    pub fa: N,
    /// Residual at `b`.
    pub fb: N,
}

impl<N: Number> Bracket<N> {
    /// Opens a bracket on two points, sorting them and evaluating both
    /// endpoint residuals.
    pub fn open<C>(x1: N, x2: N, eval: &mut Evaluator<'_, C>) -> MathResult<Self>
    where
        C: NumericContext<Num = N>,
    {
        let (a, b) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let fa = eval.eval(a)?;
        let fb = eval.eval(b)?;
        trace!(a = %a, b = %b, "bracket opened");
        Ok(Self { a, b, fa, fb })
    }

    /// Returns true if `x` lies within `[a, b]`.
    pub fn contains(&self, x: N) -> bool {
        self.a <= x && x <= self.b
    }

    /// Returns true if the endpoint residuals have different signs.
    pub fn is_valid<C>(&self, ctx: &C) -> bool
    where
        C: NumericContext<Num = N>,
    {
        self.a <= self.b && ctx.sign(self.fa) != ctx.sign(self.fb)
    }

    /// Midpoint of the bracket.
    pub fn midpoint<C>(&self, ctx: &C) -> MathResult<N>
    where
        C: NumericContext<Num = N>,
    {
        let half = ctx.rational(1, 2)?;
        Ok(ctx.add(ctx.mul(self.a, half)?, ctx.mul(self.b, half)?)?)
    }

    /// Root of the chord through both endpoints (regula falsi).
    pub fn chord<C>(&self, ctx: &C) -> MathResult<N>
    where
        C: NumericContext<Num = N>,
    {
        let weight = ctx.div(self.fb, ctx.sub(self.fb, self.fa)?)?;
        Ok(ctx.sub(self.b, ctx.mul(ctx.sub(self.b, self.a)?, weight)?)?)
    }

    /// Replaces the endpoint whose residual shares the sign of `fx`.
    pub fn update<C>(&mut self, ctx: &C, x: N, fx: N)
    where
        C: NumericContext<Num = N>,
    {
        if ctx.sign(self.fa) == ctx.sign(fx) {
            self.a = x;
            self.fa = fx;
        } else {
            self.b = x;
            self.fb = fx;
        }
    }
}

/// One step of a secant iteration guarded by a bracket.
///
/// The first step returns the second seed. Afterwards the secant estimate
/// is used unless the secant slope is zero or, once a bracket exists, the
/// estimate leaves it; in those cases `fallback` picks a point inside the
/// bracket. Without a bracket and without a slope the step stalls.
pub(crate) fn bracketed_secant_step<C, F>(
    bracket: &mut Option<Bracket<C::Num>>,
    step: &StepContext<'_, C>,
    eval: &mut Evaluator<'_, C>,
    fallback: F,
) -> MathResult<Step<C::Num>>
where
    C: NumericContext,
    F: Fn(&Bracket<C::Num>, &C) -> MathResult<C::Num>,
{
    if step.iteration == 0 {
        return step
            .guesses
            .get(1)
            .map(|&x| Step::Next(x))
            .ok_or(MathError::InvalidGuess);
    }

    let ctx = step.context;
    let Point { x, fx } = step.current;
    let previous = step.previous;

    let dy = ctx.sub(fx, previous.fx)?;
    let estimate = if step.tolerance.zero(ctx, dy) {
        None
    } else {
        let dx = ctx.sub(x, previous.x)?;
        let candidate = ctx.sub(x, ctx.div(ctx.mul(dx, fx)?, dy)?)?;
        match bracket {
            Some(b) if !b.contains(candidate) => None,
            _ => Some(candidate),
        }
    };

    let next_x = match (estimate, bracket.as_ref()) {
        (Some(candidate), _) => candidate,
        (None, Some(b)) => fallback(b, ctx)?,
        (None, None) => return Ok(Step::Stalled(x)),
    };
    let next_fx = eval.eval(next_x)?;

    match bracket {
        Some(b) => b.update(ctx, next_x, next_fx),
        None if ctx.sign(next_fx) != ctx.sign(fx) => {
            *bracket = Some(Bracket::open(x, next_x, eval)?);
        }
        None => {}
    }

    Ok(Step::Next(next_x))
}
