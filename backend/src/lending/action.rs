//! Continuous lending action

use crate::lending::error::LendingError;
use serde::{Deserialize, Serialize};

/// Number of action components
pub const ACTION_DIM: usize = 3;

/// Lower bounds of `(rate_delta, loan_multiplier, approve_signal)`
pub const ACTION_LOW: [f64; ACTION_DIM] = [-0.05, 0.5, 0.0];

/// Upper bounds of `(rate_delta, loan_multiplier, approve_signal)`
pub const ACTION_HIGH: [f64; ACTION_DIM] = [0.05, 1.5, 1.0];

/// One monthly lending decision
///
/// ```rust
/// use credit_negotiation_core::lending::LendingAction;
///
/// let action = LendingAction::new(0.2, 3.0, 0.7).clipped();
/// assert_eq!(action.rate_delta, 0.05);
/// assert_eq!(action.loan_multiplier, 1.5);
/// assert!(action.approve());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LendingAction {
    /// Change applied to the loan's interest rate
    pub rate_delta: f64,
    /// Factor applied to the outstanding balance
    pub loan_multiplier: f64,
    /// Approval iff strictly above 0.5
    pub approve_signal: f64,
}

impl LendingAction {
    /// Approve without changing terms
    pub const APPROVE: LendingAction = LendingAction {
        rate_delta: 0.0,
        loan_multiplier: 1.0,
        approve_signal: 1.0,
    };

    pub fn new(rate_delta: f64, loan_multiplier: f64, approve_signal: f64) -> Self {
        Self {
            rate_delta,
            loan_multiplier,
            approve_signal,
        }
    }

    /// Same terms, approval withdrawn
    pub fn declined(self) -> Self {
        Self {
            approve_signal: 0.0,
            ..self
        }
    }

    pub fn approve(&self) -> bool {
        self.approve_signal > 0.5
    }

    /// Clip every component into the action bounds
    ///
    /// Non-finite components fall back to the neutral action's value.
    pub fn clipped(&self) -> Self {
        let clip = |value: f64, i: usize, neutral: f64| {
            if value.is_finite() {
                value.clamp(ACTION_LOW[i], ACTION_HIGH[i])
            } else {
                neutral
            }
        };
        Self {
            rate_delta: clip(self.rate_delta, 0, 0.0),
            loan_multiplier: clip(self.loan_multiplier, 1, 1.0),
            approve_signal: clip(self.approve_signal, 2, 0.0),
        }
    }

    /// Parse a raw 3-vector
    pub fn from_slice(values: &[f64]) -> Result<Self, LendingError> {
        match values {
            [rate_delta, loan_multiplier, approve_signal] => {
                Ok(Self::new(*rate_delta, *loan_multiplier, *approve_signal))
            }
            _ => Err(LendingError::InvalidAction {
                expected: ACTION_DIM,
                actual: values.len(),
            }),
        }
    }

    pub fn to_array(&self) -> [f64; ACTION_DIM] {
        [self.rate_delta, self.loan_multiplier, self.approve_signal]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approve_threshold_is_strict() {
        assert!(!LendingAction::new(0.0, 1.0, 0.5).approve());
        assert!(LendingAction::new(0.0, 1.0, 0.500_001).approve());
    }

    #[test]
    fn test_from_slice_length_checked() {
        assert_eq!(
            LendingAction::from_slice(&[0.0, 1.0]),
            Err(LendingError::InvalidAction {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            LendingAction::from_slice(&[0.01, 1.1, 1.0]).map(|a| a.to_array()),
            Ok([0.01, 1.1, 1.0])
        );
    }

    #[test]
    fn test_clipped_handles_nan() {
        let action = LendingAction::new(f64::NAN, f64::INFINITY, f64::NAN).clipped();
        assert_eq!(action.to_array(), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_declined_keeps_terms() {
        let action = LendingAction::new(0.02, 1.2, 0.9).declined();
        assert_eq!(action.to_array(), [0.02, 1.2, 0.0]);
        assert!(!action.approve());
    }
}
