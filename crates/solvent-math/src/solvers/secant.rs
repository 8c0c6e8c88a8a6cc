//! Secant method with bisection fallback.

use solvent_core::NumericContext;

use super::bracket::{bracketed_secant_step, Bracket};
use super::{Evaluator, Step, StepContext, Strategy};
use crate::error::MathResult;

/// Secant steps, falling back to the bracket midpoint.
///
/// Until the residual changes sign the iteration is a plain secant method.
/// Once a sign change is seen, a bracket is kept and any secant estimate
/// that leaves it, or a secant slope that vanishes, is replaced by
/// bisection. Without a bracket, a vanishing slope stalls the search.
#[derive(Debug, Clone)]
pub struct Secant<C: NumericContext> {
    bracket: Option<Bracket<C::Num>>,
}

impl<C: NumericContext> Secant<C> {
    /// Creates the strategy with no bracket.
    pub fn new() -> Self {
        Self { bracket: None }
    }
}

impl<C: NumericContext> Default for Secant<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: NumericContext> Strategy<C> for Secant<C> {
    fn name(&self) -> &'static str {
        "secant"
    }

    fn reset(&mut self) {
        self.bracket = None;
    }

    fn step(
        &mut self,
        step: &StepContext<'_, C>,
        eval: &mut Evaluator<'_, C>,
    ) -> MathResult<Step<C::Num>> {
        bracketed_secant_step(&mut self.bracket, step, eval, |b, ctx| b.midpoint(ctx))
    }

    fn bracket(&self) -> Option<&Bracket<C::Num>> {
        self.bracket.as_ref()
    }
}
