//! Engine limits: iteration bounds and the divisor-search tolerance.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::InputError;

/// Immutable per-call bounds on every loop that could otherwise run long.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Limits {
    /// Largest-remainder attempts before `RetryBoundExceeded`.
    pub max_quota_attempts: u32,
    /// Doubling / halving steps while bracketing the divisor.
    pub max_bracket_steps: u32,
    /// False-position steps inside the bracket.
    pub max_search_steps: u32,
    /// Relative bracket width at which the search settles for a near-match.
    pub relative_tolerance: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_quota_attempts: 16,
            max_bracket_steps: 64,
            max_search_steps: 200,
            relative_tolerance: 1e-8,
        }
    }
}

impl Limits {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.max_quota_attempts == 0 {
            return Err(InputError::BadLimits("max_quota_attempts must be at least 1"));
        }
        if self.max_bracket_steps == 0 {
            return Err(InputError::BadLimits("max_bracket_steps must be at least 1"));
        }
        if self.max_search_steps == 0 {
            return Err(InputError::BadLimits("max_search_steps must be at least 1"));
        }
        if !self.relative_tolerance.is_finite() || self.relative_tolerance <= 0.0 {
            return Err(InputError::BadLimits("relative_tolerance must be finite and positive"));
        }
        Ok(())
    }
}
