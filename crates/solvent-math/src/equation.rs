//! Equations with named parameters.
//!
//! An [`EquationDescriptor`] pairs an ordered list of parameter names with a
//! residual function taking the values in that order. The names are
//! declared explicitly when the equation is built, so any one of them can
//! later be chosen as the unknown of a root search.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use solvent_math::equation::EquationDescriptor;
//!
//! let eq = EquationDescriptor::new(["x", "y", "z"], |v: &[f64]| Ok(v[0] + 2.0 * v[1] - v[2]))
//!     .unwrap();
//!
//! let known = HashMap::from([("x".to_string(), 1.0), ("z".to_string(), 7.0)]);
//! let f = eq.bind("y", &known).unwrap();
//! assert_eq!(f(3.0).unwrap(), 0.0);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{MathError, MathResult};

type Residual<N> = dyn Fn(&[N]) -> MathResult<N> + Send + Sync;

/// An n-ary equation with declared parameter names.
///
/// Immutable once built; cloning shares the residual function.
pub struct EquationDescriptor<N> {
    parameters: Arc<[String]>,
    residual: Arc<Residual<N>>,
}

impl<N> Clone for EquationDescriptor<N> {
    fn clone(&self) -> Self {
        Self {
            parameters: Arc::clone(&self.parameters),
            residual: Arc::clone(&self.residual),
        }
    }
}

impl<N> fmt::Debug for EquationDescriptor<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EquationDescriptor")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl<N: Copy> EquationDescriptor<N> {
    /// Creates a descriptor from parameter names and a residual function.
    ///
    /// Names must be non-empty and distinct.
    pub fn new<I, S, F>(parameters: I, residual: F) -> MathResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&[N]) -> MathResult<N> + Send + Sync + 'static,
    {
        let parameters: Vec<String> = parameters.into_iter().map(Into::into).collect();

        if parameters.is_empty() {
            return Err(MathError::equation("an equation needs at least one parameter"));
        }
        for (i, name) in parameters.iter().enumerate() {
            if name.is_empty() {
                return Err(MathError::equation(format!("parameter #{i} has an empty name")));
            }
            if parameters[..i].contains(name) {
                return Err(MathError::equation(format!("duplicate parameter '{name}'")));
            }
        }

        Ok(Self {
            parameters: parameters.into(),
            residual: Arc::new(residual),
        })
    }

    /// Parameter names in declared order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Position of a parameter in the declared order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p == name)
    }

    /// Evaluates the residual with values in declared order.
    pub fn evaluate(&self, values: &[N]) -> MathResult<N> {
        if values.len() != self.arity() {
            return Err(MathError::equation(format!(
                "expected {} values, got {}",
                self.arity(),
                values.len()
            )));
        }
        (self.residual)(values)
    }

    /// Evaluates the residual with values looked up by name.
    pub fn evaluate_named(&self, values: &HashMap<String, N>) -> MathResult<N> {
        let ordered = self
            .parameters
            .iter()
            .map(|name| {
                values
                    .get(name)
                    .copied()
                    .ok_or_else(|| MathError::equation(format!("missing value for '{name}'")))
            })
            .collect::<MathResult<Vec<N>>>()?;
        (self.residual)(&ordered)
    }

    /// Fixes every parameter except `unknown`, returning a unary function
    /// of the remaining one.
    ///
    /// Entries of `known` that are not parameters of the equation are
    /// ignored; a value given for `unknown` itself is overwritten.
    pub fn bind(
        &self,
        unknown: &str,
        known: &HashMap<String, N>,
    ) -> MathResult<impl Fn(N) -> MathResult<N>> {
        let slot = self
            .index_of(unknown)
            .ok_or_else(|| MathError::equation(format!("unknown parameter '{unknown}'")))?;

        let mut fixed = Vec::with_capacity(self.arity() - 1);
        for (i, name) in self.parameters.iter().enumerate() {
            if i == slot {
                continue;
            }
            let value = known
                .get(name)
                .ok_or_else(|| MathError::equation(format!("missing value for '{name}'")))?;
            fixed.push(*value);
        }

        let residual = Arc::clone(&self.residual);
        Ok(move |x: N| {
            let mut trial = Vec::with_capacity(fixed.len() + 1);
            trial.extend_from_slice(&fixed[..slot]);
            trial.push(x);
            trial.extend_from_slice(&fixed[slot..]);
            (residual)(&trial)
        })
    }
}
