//! Secant method with regula-falsi fallback.

use solvent_core::NumericContext;

use super::bracket::{bracketed_secant_step, Bracket};
use super::{Evaluator, Step, StepContext, Strategy};
use crate::error::MathResult;

/// Secant steps, falling back to the bracket chord.
///
/// Behaves like [`Secant`](super::Secant) except that the fallback inside a
/// bracket is the regula-falsi point `b - (b - a) * fb / (fb - fa)` rather
/// than the midpoint. This usually converges faster than bisection but can
/// keep one endpoint fixed for many steps on strongly curved residuals.
#[derive(Debug, Clone)]
pub struct RegulaFalsiSecant<C: NumericContext> {
    bracket: Option<Bracket<C::Num>>,
}

impl<C: NumericContext> RegulaFalsiSecant<C> {
    /// Creates the strategy with no bracket.
    pub fn new() -> Self {
        Self { bracket: None }
    }
}

impl<C: NumericContext> Default for RegulaFalsiSecant<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: NumericContext> Strategy<C> for RegulaFalsiSecant<C> {
    fn name(&self) -> &'static str {
        "regula_falsi_secant"
    }

    fn reset(&mut self) {
        self.bracket = None;
    }

    fn step(
        &mut self,
        step: &StepContext<'_, C>,
        eval: &mut Evaluator<'_, C>,
    ) -> MathResult<Step<C::Num>> {
        bracketed_secant_step(&mut self.bracket, step, eval, |b, ctx| b.chord(ctx))
    }

    fn bracket(&self) -> Option<&Bracket<C::Num>> {
        self.bracket.as_ref()
    }
}
