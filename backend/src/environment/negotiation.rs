//! Negotiation environment
//!
//! Owns the running [`EnvironmentState`] of one lender/borrower negotiation
//! and advances it deterministically from a [`CompositeAction`] plus
//! externally supplied [`NegotiationMetrics`].
//!
//! # Transition
//!
//! ```text
//! emi_ratio     ← max(0, emi_ratio + 0.5·rate_delta − 0.005·tenure_delta)
//!                 (× 0.95 when grace_toggle)
//! bank_exposure ← max(0, bank_exposure − 0.8·collateral_adjust + 0.4·rate_delta)
//! pd, compliance, fairness ← metrics when present, else retained
//! ```
//!
//! There are no error paths: every numeric edge case is clamped.

use crate::models::action::CompositeAction;
use crate::models::event::{NegotiationRound, Transcript};
use crate::models::state::{EnvironmentState, EnvironmentStateUpdate, NegotiationMetrics};
use crate::reward::{compute_reward, RewardBreakdown, RewardComponents, RewardWeights};
use tracing::debug;

/// Result of one negotiation step
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// State after the transition
    pub state: EnvironmentState,
    pub reward: f64,
    pub breakdown: RewardBreakdown,
}

/// Single-owner negotiation environment
///
/// # Example
///
/// ```rust
/// use credit_negotiation_core::models::{EnvironmentStateUpdate, NegotiationMetrics, ACTION_MENU};
/// use credit_negotiation_core::NegotiationEnvironment;
///
/// let mut env = NegotiationEnvironment::new();
/// env.reset(&EnvironmentStateUpdate {
///     emi_ratio: Some(0.16),
///     bank_exposure: Some(20_000.0),
///     ..Default::default()
/// });
///
/// let outcome = env.step(&ACTION_MENU[1], &NegotiationMetrics::default());
/// assert!(outcome.state.emi_ratio() < 0.16);
/// assert_eq!(env.transcript().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct NegotiationEnvironment {
    state: EnvironmentState,
    weights: RewardWeights,
    transcript: Transcript<NegotiationRound>,
}

impl Default for NegotiationEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl NegotiationEnvironment {
    /// Environment with default state and default reward weights
    pub fn new() -> Self {
        Self::with_weights(RewardWeights::default())
    }

    pub fn with_weights(weights: RewardWeights) -> Self {
        Self {
            state: EnvironmentState::default(),
            weights,
            transcript: Transcript::new(),
        }
    }

    /// Overwrite the provided fields, clear the transcript, return the state
    ///
    /// Idempotent: resetting twice with the same update yields the same state.
    pub fn reset(&mut self, initial: &EnvironmentStateUpdate) -> &EnvironmentState {
        self.state.apply(initial);
        self.transcript.clear();
        &self.state
    }

    /// Read-only view of the current state
    pub fn observe(&self) -> &EnvironmentState {
        &self.state
    }

    pub fn weights(&self) -> &RewardWeights {
        &self.weights
    }

    /// Transitions since the last reset
    pub fn transcript(&self) -> &Transcript<NegotiationRound> {
        &self.transcript
    }

    /// Apply `action` under `metrics`, score it, and log it
    pub fn step(&mut self, action: &CompositeAction, metrics: &NegotiationMetrics) -> StepOutcome {
        let mut emi_ratio = (self.state.emi_ratio() + action.rate_delta * 0.5
            - action.tenure_delta as f64 * 0.005)
            .max(0.0);
        if action.grace_toggle {
            emi_ratio *= 0.95;
        }
        let bank_exposure = (self.state.bank_exposure() - 0.8 * action.collateral_adjust
            + 0.4 * action.rate_delta)
            .max(0.0);

        self.state.set_emi_ratio(emi_ratio);
        self.state.set_bank_exposure(bank_exposure);
        if let Some(pd) = metrics.default_probability {
            self.state.set_default_probability(pd);
        }
        if let Some(score) = metrics.compliance_score {
            self.state.set_compliance_score(score);
        }
        if let Some(index) = metrics.fairness_index {
            self.state.set_fairness_index(index);
        }

        let components = self.reward_components(action, metrics);
        let (reward, breakdown) = compute_reward(&components, &self.weights);

        let round_index = self.transcript.len();
        debug!(
            round_index,
            reward,
            emi_ratio = self.state.emi_ratio(),
            bank_exposure = self.state.bank_exposure(),
            "negotiation step"
        );

        self.transcript.log(NegotiationRound {
            round_index,
            action: *action,
            reward,
            reward_breakdown: breakdown,
        });

        StepOutcome {
            state: self.state.clone(),
            reward,
            breakdown,
        }
    }

    /// Overwrite the default probability outside of `step`
    ///
    /// Used by the orchestrator to keep the simulated PD consistent with the
    /// EMI burden after each round.
    pub(crate) fn override_default_probability(&mut self, pd: f64) {
        self.state.set_default_probability(pd);
    }

    fn reward_components(
        &self,
        action: &CompositeAction,
        metrics: &NegotiationMetrics,
    ) -> RewardComponents {
        let pd = self.state.default_probability();
        let customer_survival = metrics
            .customer_survival
            .filter(|v| v.is_finite())
            .unwrap_or(1.0 - pd);

        RewardComponents {
            bank_profit: (10.0 * action.rate_delta + 0.1 * self.state.bank_exposure()).max(0.0),
            customer_survival,
            default_probability: pd,
            compliance_violation: (100.0 - self.state.compliance_score()).max(0.0) / 100.0,
            fairness_deviation: (1.0 - self.state.fairness_index()).abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::action::ACTION_MENU;

    fn seeded_env() -> NegotiationEnvironment {
        let mut env = NegotiationEnvironment::new();
        env.reset(&EnvironmentStateUpdate {
            default_probability: Some(0.2),
            emi_ratio: Some(0.16),
            bank_exposure: Some(20_000.0),
            ..Default::default()
        });
        env
    }

    #[test]
    fn test_concession_lowers_emi_with_grace() {
        let mut env = seeded_env();
        let outcome = env.step(&ACTION_MENU[0], &NegotiationMetrics::default());

        // (0.16 - 0.005 - 0.06) * 0.95
        let expected = (0.16 - 0.005 - 0.06) * 0.95;
        assert!((outcome.state.emi_ratio() - expected).abs() < 1e-12);
        // 20000 + 0.016 - 0.004
        assert!((outcome.state.bank_exposure() - 20_000.012).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_overwrite_or_retain() {
        let mut env = seeded_env();
        let metrics = NegotiationMetrics {
            compliance_score: Some(80.0),
            fairness_index: Some(0.9),
            ..Default::default()
        };
        let outcome = env.step(&ACTION_MENU[1], &metrics);

        assert_eq!(outcome.state.compliance_score(), 80.0);
        assert_eq!(outcome.state.fairness_index(), 0.9);
        assert_eq!(outcome.state.default_probability(), 0.2);
    }

    #[test]
    fn test_reward_components_from_state() {
        let mut env = seeded_env();
        let metrics = NegotiationMetrics {
            compliance_score: Some(90.0),
            fairness_index: Some(0.8),
            ..Default::default()
        };
        let outcome = env.step(&ACTION_MENU[1], &metrics);
        let c = outcome.breakdown.components;

        assert!((c[0] - 2_000.0).abs() < 1e-9); // 0.1 * exposure
        assert!((c[1] - 0.8).abs() < 1e-12); // 1 - pd
        assert_eq!(c[2], 0.2);
        assert!((c[3] - 0.1).abs() < 1e-12);
        assert!((c[4] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_survival_used() {
        let mut env = seeded_env();
        let metrics = NegotiationMetrics {
            customer_survival: Some(0.42),
            ..Default::default()
        };
        let outcome = env.step(&ACTION_MENU[1], &metrics);
        assert_eq!(outcome.breakdown.components[1], 0.42);
    }

    #[test]
    fn test_reset_clears_transcript() {
        let mut env = seeded_env();
        env.step(&ACTION_MENU[2], &NegotiationMetrics::default());
        env.step(&ACTION_MENU[2], &NegotiationMetrics::default());
        assert_eq!(env.transcript().len(), 2);
        assert_eq!(env.transcript().entries()[1].round_index, 1);

        env.reset(&EnvironmentStateUpdate::default());
        assert!(env.transcript().is_empty());
    }
}
