//! # Solvent Math
//!
//! Root finding for scalar equations and for n-ary equations solved for one
//! named unknown.
//!
//! This crate provides:
//!
//! - **Equations**: [`EquationDescriptor`](equation::EquationDescriptor), an
//!   ordered list of parameter names paired with a residual function
//! - **Solvers**: the iterative [`SolverEngine`](solvers::SolverEngine) with
//!   secant/bisection and secant/regula-falsi step strategies
//! - **Parameterized solving**: [`ParameterizedSolver`](solvers::ParameterizedSolver)
//!   fixes every parameter but one and solves for the rest
//! - **Configuration**: [`SolverOptions`](config::SolverOptions), loadable from TOML
//!
//! Every solver receives its [`NumericContext`](solvent_core::NumericContext)
//! and [`Tolerance`](solvent_core::Tolerance) explicitly, so the same code
//! runs on `f64` and on 28-digit decimals.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::new_without_default)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)]

pub mod config;
pub mod equation;
pub mod error;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{Method, SolverOptions, Validate, ValidationError};
    pub use crate::equation::EquationDescriptor;
    pub use crate::error::{MathError, MathResult};
    pub use crate::solvers::{
        Bracket, ParamValue, ParameterizedSolver, Reason, RegulaFalsiSecant, Secant, SolveReport,
        Solver, SolverEngine, Strategy, MAX_ITERATIONS,
    };
}

pub use error::{MathError, MathResult};
