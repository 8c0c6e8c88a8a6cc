//! # Solvent TVM
//!
//! Time-value-of-money solving on top of the Solvent root finder.
//!
//! The TVM equation relates six quantities:
//!
//! | Name | Meaning |
//! |------|---------|
//! | `m` | money value at time `t` |
//! | `t` | time, in periods |
//! | `m0` | initial money value |
//! | `pmt` | payment per period |
//! | `i` | percent interest per year |
//! | `p` | number of periods per year |
//!
//! Given any five, [`Tvm::solve`] finds the sixth. Cash flows are signed:
//! money received is positive and money paid out is negative, so a loan
//! of `m0 = 10000` is repaid with a negative `pmt`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod parameter;
pub mod tvm;

pub use error::{TvmError, TvmResult};
pub use parameter::{TvmParameter, TvmValues};
pub use tvm::{equation, residual, Tvm, TvmSolution};
