//! # Solvent Core
//!
//! Numeric foundations for the Solvent root-finding library.
//!
//! This crate provides:
//!
//! - **Numeric contexts**: the [`NumericContext`] trait with `f64` and
//!   `Decimal` backends, supplying construction, checked division and the
//!   transcendental functions the solvers need
//! - **Tolerances**: the [`Tolerance`] predicate used for zero and equality
//!   tests, including the fixed one-ULP machine tolerance
//!
//! ## Example
//!
//! ```rust
//! use solvent_core::prelude::*;
//!
//! let ctx = F64Context;
//! let tol = Tolerance::Decimals(3);
//!
//! assert!(tol.zero(&ctx, 0.0004));
//! assert!(!tol.zero(&ctx, 0.0006));
//! assert!(Tolerance::MACHINE.eq(&ctx, 1.0, 1.0 + f64::EPSILON));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unreadable_literal)]

pub mod error;
pub mod numeric;
pub mod tolerance;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::numeric::{DecimalContext, F64Context, Number, NumericContext, Sign};
    pub use crate::tolerance::Tolerance;
}

pub use error::{CoreError, CoreResult};
pub use numeric::{DecimalContext, F64Context, Number, NumericContext, Sign};
pub use tolerance::Tolerance;
