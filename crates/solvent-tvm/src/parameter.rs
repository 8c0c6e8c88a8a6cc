//! TVM parameters and partial parameter sets.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TvmError, TvmResult};

/// One of the six quantities of the TVM equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TvmParameter {
    /// Money value at time `t`.
    M,
    /// Time, in periods.
    T,
    /// Initial money value.
    M0,
    /// Payment per period.
    Pmt,
    /// Percent interest per year.
    I,
    /// Number of periods per year.
    P,
}

impl TvmParameter {
    /// All parameters in equation order.
    pub const ALL: [TvmParameter; 6] = [
        TvmParameter::M,
        TvmParameter::T,
        TvmParameter::M0,
        TvmParameter::Pmt,
        TvmParameter::I,
        TvmParameter::P,
    ];

    /// Short name used as the equation parameter name.
    pub fn name(self) -> &'static str {
        match self {
            TvmParameter::M => "m",
            TvmParameter::T => "t",
            TvmParameter::M0 => "m0",
            TvmParameter::Pmt => "pmt",
            TvmParameter::I => "i",
            TvmParameter::P => "p",
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            TvmParameter::M => "money value at time t",
            TvmParameter::T => "time",
            TvmParameter::M0 => "initial money value",
            TvmParameter::Pmt => "payment per time unit",
            TvmParameter::I => "percent interest per year",
            TvmParameter::P => "number of time units per year",
        }
    }

    /// Position in equation order.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TvmParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TvmParameter {
    type Err = TvmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TvmParameter::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| TvmError::UnknownParameter(s.to_string()))
    }
}

/// A TVM parameter set where any entry may be missing.
///
/// `solve` expects exactly one missing entry; `value` expects none.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TvmValues<N> {
    /// Money value at time `t`.
    pub m: Option<N>,
    /// Time, in periods.
    pub t: Option<N>,
    /// Initial money value.
    pub m0: Option<N>,
    /// Payment per period.
    pub pmt: Option<N>,
    /// Percent interest per year.
    pub i: Option<N>,
    /// Number of periods per year.
    pub p: Option<N>,
}

impl<N: Copy> TvmValues<N> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            m: None,
            t: None,
            m0: None,
            pmt: None,
            i: None,
            p: None,
        }
    }

    /// Returns the set with `parameter` assigned.
    #[must_use]
    pub fn with(mut self, parameter: TvmParameter, value: N) -> Self {
        self.set(parameter, Some(value));
        self
    }

    /// Value of a parameter.
    pub fn get(&self, parameter: TvmParameter) -> Option<N> {
        match parameter {
            TvmParameter::M => self.m,
            TvmParameter::T => self.t,
            TvmParameter::M0 => self.m0,
            TvmParameter::Pmt => self.pmt,
            TvmParameter::I => self.i,
            TvmParameter::P => self.p,
        }
    }

    /// Assigns or clears a parameter.
    pub fn set(&mut self, parameter: TvmParameter, value: Option<N>) {
        let slot = match parameter {
            TvmParameter::M => &mut self.m,
            TvmParameter::T => &mut self.t,
            TvmParameter::M0 => &mut self.m0,
            TvmParameter::Pmt => &mut self.pmt,
            TvmParameter::I => &mut self.i,
            TvmParameter::P => &mut self.p,
        };
        *slot = value;
    }

    /// Parameters without a value, in equation order.
    pub fn unknowns(&self) -> Vec<TvmParameter> {
        TvmParameter::ALL
            .into_iter()
            .filter(|&p| self.get(p).is_none())
            .collect()
    }

    /// The single missing parameter.
    pub fn unknown(&self) -> TvmResult<TvmParameter> {
        match self.unknowns().as_slice() {
            [single] => Ok(*single),
            other => Err(TvmError::parameter_count(other.len())),
        }
    }

    /// Builds a set from a name map; a `None` value leaves the entry unknown.
    pub fn from_map(values: &HashMap<String, Option<N>>) -> TvmResult<Self> {
        let mut set = Self::new();
        for (name, value) in values {
            set.set(name.parse()?, *value);
        }
        Ok(set)
    }

    /// Assigned values keyed by parameter name.
    pub fn known(&self) -> HashMap<String, N> {
        TvmParameter::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|v| (p.name().to_string(), v)))
            .collect()
    }
}
