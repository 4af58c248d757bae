//! Baseline lending strategies
//!
//! Both baselines decide from the bank-side PD of the active loan and ignore
//! the rest of the observation.

use crate::lending::action::LendingAction;
use crate::lending::balance_sheet::BankBalanceSheet;
use crate::lending::observation::Observation;

/// Maps a lending observation to a continuous action
pub trait LendingStrategy {
    /// Name used in evaluation reports
    fn name(&self) -> &str;

    fn act(&mut self, observation: &Observation, sheet: &BankBalanceSheet) -> LendingAction;
}

/// Approve below a fixed PD cutoff, otherwise reprice and decline
///
/// ```rust
/// use credit_negotiation_core::lending::{BankBalanceSheet, OBS_DIM};
/// use credit_negotiation_core::policy::{LendingStrategy, RuleBasedStrategy};
///
/// let mut sheet = BankBalanceSheet {
///     capital: 1e6, risk_budget: 1.0, macro_factor: 1.0,
///     outstanding_loan: 1e5, interest_rate: 0.1, pd_score: 0.2,
/// };
/// let action = RuleBasedStrategy::default().act(&[0.0; OBS_DIM], &sheet);
/// assert!(!action.approve());
///
/// sheet.pd_score = 0.05;
/// assert!(RuleBasedStrategy::default().act(&[0.0; OBS_DIM], &sheet).approve());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleBasedStrategy {
    pub pd_cutoff: f64,
}

impl Default for RuleBasedStrategy {
    fn default() -> Self {
        Self { pd_cutoff: 0.15 }
    }
}

impl LendingStrategy for RuleBasedStrategy {
    fn name(&self) -> &str {
        "rule_based"
    }

    fn act(&mut self, _observation: &Observation, sheet: &BankBalanceSheet) -> LendingAction {
        if sheet.pd_score < self.pd_cutoff {
            LendingAction::new(0.0, 1.0, 1.0)
        } else {
            LendingAction::new(0.02, 0.8, 0.0)
        }
    }
}

/// Risk-priced approval below a PD threshold
///
/// Approves with a rate add-on proportional to PD (up to +1%); above the
/// threshold it quotes punitive terms and declines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdThresholdStrategy {
    pub threshold: f64,
}

impl Default for PdThresholdStrategy {
    fn default() -> Self {
        Self { threshold: 0.10 }
    }
}

impl LendingStrategy for PdThresholdStrategy {
    fn name(&self) -> &str {
        "pd_threshold"
    }

    fn act(&mut self, _observation: &Observation, sheet: &BankBalanceSheet) -> LendingAction {
        let pd = sheet.pd_score;
        if pd < self.threshold {
            LendingAction::new(0.01 * pd / self.threshold, 1.0, 1.0)
        } else {
            LendingAction::new(0.05, 0.5, 0.0)
        }
    }
}
