//! Multiplicity expressions
//!
//! A cardinality such as `0..1`, `1..*` or `5` is kept as a pair of opaque
//! strings. Nothing is validated numerically; `*` is a valid upper bound.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Range separator between the lower and upper bound
pub const RANGE_SEPARATOR: &str = "..";

/// Parsed `(min, max)` cardinality bounds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Multiplicity {
    pub min: String,
    pub max: String,
}

impl Multiplicity {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Parse a multiplicity expression
    ///
    /// Without a `..` separator both bounds are `"1"`, whatever the
    /// expression says. Otherwise the expression is split at the *first*
    /// separator; anything after a second separator stays in `max`
    /// (`"0..1..2"` gives `("0", "1..2")`). Bounds keep their lexical form,
    /// surrounding whitespace included.
    pub fn parse(expr: &str) -> Self {
        match expr.split_once(RANGE_SEPARATOR) {
            Some((min, max)) => Self::new(min, max),
            None => Self::default(),
        }
    }
}

impl Default for Multiplicity {
    fn default() -> Self {
        Self::new("1", "1")
    }
}

impl FromStr for Multiplicity {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.min, RANGE_SEPARATOR, self.max)
    }
}
