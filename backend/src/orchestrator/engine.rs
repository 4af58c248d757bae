//! Orchestrator Engine
//!
//! Runs the negotiation protocol round by round:
//!
//! ```text
//! For each round r = 1..=rounds:
//! 1. Observe the environment state
//! 2. Risk assessment of the cash-flow forecast
//! 3. Lender offer from the heatmap and exposure (collateral 0)
//! 4. Borrower counter-offer from the offer and state
//! 5. Fairness of the counter-offer rate at the current PD
//! 6. Metrics: carried compliance score, fairness index, survival = 1 − PD
//! 7. Policy selects a menu action for the current state
//! 8. Environment step → reward
//! 9. Overwrite PD with sigmoid(3·(emi − 0.6))
//! 10. Policy learns from (s, a, r, s') with s' taken after the overwrite
//! 11. Merge the counter-offer into the running contract
//! 12. Re-validate compliance; the score feeds round r + 1's metrics
//! 13. Record the round
//! ```
//!
//! The loop ends on the round count alone; there is no convergence check.
//!
//! # Example
//!
//! ```rust
//! use credit_negotiation_core::collaborators::Collaborators;
//! use credit_negotiation_core::models::EnvironmentStateUpdate;
//! use credit_negotiation_core::orchestrator::{NegotiationOrchestrator, OrchestratorConfig};
//! use credit_negotiation_core::policy::{LearnerConfig, TabularPolicyLearner};
//! use credit_negotiation_core::NegotiationEnvironment;
//!
//! let mut env = NegotiationEnvironment::new();
//! env.reset(&EnvironmentStateUpdate {
//!     default_probability: Some(0.2),
//!     emi_ratio: Some(0.16),
//!     bank_exposure: Some(20_000.0),
//!     ..Default::default()
//! });
//!
//! let mut learner = TabularPolicyLearner::new(LearnerConfig::default(), 42).unwrap();
//! let mut orchestrator =
//!     NegotiationOrchestrator::new(OrchestratorConfig::default(), Collaborators::heuristic(), 42)
//!         .unwrap();
//!
//! let outcome = orchestrator.negotiate(&mut env, &mut learner);
//! assert_eq!(outcome.reward_curve.len(), 7);
//! assert_eq!(outcome.transcript.len(), 7);
//! ```

use crate::collaborators::{Collaborators, ComplianceReport};
use crate::config::ConfigError;
use crate::core::finance::{apr, emi, irr, npv};
use crate::core::numeric::sigmoid;
use crate::environment::NegotiationEnvironment;
use crate::models::action::{ACTION_MENU, NUM_ACTIONS};
use crate::models::contract::{ContractTerms, LoanOffer};
use crate::models::event::{RoundRecord, Transcript};
use crate::models::state::{EnvironmentState, NegotiationMetrics};
use crate::policy::NegotiationPolicy;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::{Builder, Uuid};

/// Steepness of the EMI → PD sigmoid
pub const SIGMOID_STEEPNESS: f64 = 3.0;

/// EMI ratio at which the simulated PD crosses 0.5
pub const SIGMOID_EMI_CENTER: f64 = 0.6;

// ============================================================================
// Configuration Types
// ============================================================================

/// Negotiation protocol configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Number of rounds to run
    pub rounds: usize,

    /// Opening terms; seeds the final contract when present
    pub initial_offer: Option<LoanOffer>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            rounds: 7,
            initial_offer: None,
        }
    }
}

impl OrchestratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("negotiation.rounds", self.rounds as f64)?;
        if let Some(offer) = &self.initial_offer {
            ConfigError::check_unit("negotiation.initial_offer.interest_rate", offer.interest_rate)?;
            ConfigError::check_unit(
                "negotiation.initial_offer.restructure_pct",
                offer.restructure_pct,
            )?;
        }
        Ok(())
    }
}

/// Negotiation errors
#[derive(Debug, Error, PartialEq)]
pub enum NegotiationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Negotiation needs at least one round")]
    NoRounds,
}

// ============================================================================
// Results
// ============================================================================

/// Result of one negotiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationOutcome {
    /// Drawn from the orchestrator's seeded stream
    pub run_id: Uuid,
    /// Counter-offers merged over the rounds
    pub final_contract: ContractTerms,
    /// Reward per round, in round order
    pub reward_curve: Vec<f64>,
    pub transcript: Transcript<RoundRecord>,
    pub initial_state: EnvironmentState,
    pub final_state: EnvironmentState,
}

/// Headline figures of a negotiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationSummary {
    pub run_id: Uuid,
    pub rounds: usize,
    /// Last reward minus first reward
    pub reward_improvement: f64,
    pub final_default_probability: f64,
    /// Change in `1 − PD` from start to finish
    pub survival_delta: f64,
    pub final_emi_ratio: f64,
    /// Effective annual rate of the agreed rate, compounded monthly
    pub effective_apr: Option<f64>,
    /// Level installment on the final exposure under the agreed rate and tenure
    pub monthly_installment: Option<f64>,
    /// NPV at the agreed monthly rate of the lender's survival-weighted schedule
    pub expected_npv: Option<f64>,
    /// Annualized IRR of the same schedule
    pub risk_adjusted_yield: Option<f64>,
    pub compliance: ComplianceReport,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Runs the fixed-length negotiation protocol
///
/// Owns the collaborators and the RNG handed to the fairness assessor; the
/// environment and the policy are borrowed per negotiation so the policy can
/// keep learning across runs.
#[derive(Debug)]
pub struct NegotiationOrchestrator {
    config: OrchestratorConfig,
    collaborators: Collaborators,
    rng: RngManager,
}

impl NegotiationOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        collaborators: Collaborators,
        seed: u64,
    ) -> Result<Self, NegotiationError> {
        if config.rounds == 0 {
            return Err(NegotiationError::NoRounds);
        }
        config.validate()?;
        Ok(Self {
            config,
            collaborators,
            rng: RngManager::new(seed),
        })
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Run `config.rounds` rounds against `env`, training `policy` online
    pub fn negotiate<P: NegotiationPolicy + ?Sized>(
        &mut self,
        env: &mut NegotiationEnvironment,
        policy: &mut P,
    ) -> NegotiationOutcome {
        let run_id = self.next_run_id();
        let initial_state = env.observe().clone();
        let mut final_contract = self
            .config
            .initial_offer
            .as_ref()
            .map(ContractTerms::from)
            .unwrap_or_default();
        let mut transcript = Transcript::new();
        let mut reward_curve = Vec::with_capacity(self.config.rounds);
        let mut carried_compliance = 100.0;

        for round in 1..=self.config.rounds {
            let state = env.observe().clone();
            let c = &self.collaborators;

            let risk = c.risk.assess(state.cashflow_forecast());
            let lender = c.pricing.offer(&risk.heatmap, state.bank_exposure(), 0.0);
            let proposal = c.counter.counter_offer(&lender.offer, &state);
            let fairness = c.fairness.assess(
                proposal.counter_offer.interest_rate,
                state.default_probability(),
                &mut self.rng,
            );

            let metrics = NegotiationMetrics {
                default_probability: None,
                compliance_score: Some(carried_compliance),
                fairness_index: Some(fairness.fairness_index),
                customer_survival: Some(1.0 - state.default_probability()),
            };

            let action_index = policy.select_action(&state).min(NUM_ACTIONS - 1);
            let step = env.step(&ACTION_MENU[action_index], &metrics);

            // Simulated PD tracks the EMI burden, not the risk scorer
            let emi = env.observe().emi_ratio();
            env.override_default_probability(sigmoid(
                SIGMOID_STEEPNESS * (emi - SIGMOID_EMI_CENTER),
            ));
            policy.observe_transition(&state, action_index, step.reward, env.observe());

            final_contract.merge(&proposal.counter_offer);
            let compliance = c.compliance.validate(&final_contract);
            carried_compliance = compliance.compliance_score;

            debug!(
                round,
                action_index,
                reward = step.reward,
                emi_ratio = emi,
                default_probability = env.observe().default_probability(),
                compliance_score = carried_compliance,
                "negotiation round"
            );

            reward_curve.push(step.reward);
            transcript.log(RoundRecord {
                round,
                reward: step.reward,
                bank_offer: lender.offer,
                customer_counter: proposal.counter_offer,
                action_index,
                compliance_score: carried_compliance,
            });
        }

        NegotiationOutcome {
            run_id,
            final_contract,
            reward_curve,
            transcript,
            initial_state,
            final_state: env.observe().clone(),
        }
    }

    /// Headline figures for `outcome`, logged at info level
    pub fn summarize(&self, outcome: &NegotiationOutcome) -> NegotiationSummary {
        let reward_improvement = match (outcome.reward_curve.first(), outcome.reward_curve.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        };
        let compliance = self.collaborators.compliance.validate(&outcome.final_contract);
        let final_pd = outcome.final_state.default_probability();
        let contract = &outcome.final_contract;
        let exposure = outcome.final_state.bank_exposure();
        let schedule = match (contract.interest_rate, contract.tenure_months) {
            (Some(rate), Some(tenure)) => Some((rate, tenure, emi(exposure, rate, tenure))),
            _ => None,
        };
        let lender_flows = schedule
            .filter(|&(_, tenure, _)| exposure > 0.0 && tenure > 0)
            .map(|(rate, tenure, installment)| {
                (rate, expected_cashflows(exposure, installment * (1.0 - final_pd), tenure))
            });

        let summary = NegotiationSummary {
            run_id: outcome.run_id,
            rounds: outcome.reward_curve.len(),
            reward_improvement,
            final_default_probability: final_pd,
            survival_delta: outcome.initial_state.default_probability() - final_pd,
            final_emi_ratio: outcome.final_state.emi_ratio(),
            effective_apr: contract.interest_rate.map(|rate| apr(rate, 12)),
            monthly_installment: schedule.map(|(_, _, installment)| installment),
            expected_npv: lender_flows
                .as_ref()
                .map(|(rate, flows)| npv(flows, rate / 12.0)),
            risk_adjusted_yield: lender_flows.as_ref().map(|(_, flows)| irr(flows) * 12.0),
            compliance,
        };

        info!(
            run_id = %summary.run_id,
            rounds = summary.rounds,
            reward_improvement = summary.reward_improvement,
            final_default_probability = summary.final_default_probability,
            compliance_score = summary.compliance.compliance_score,
            "negotiation finished"
        );
        summary
    }

    fn next_run_id(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.rng.next().to_le_bytes());
        bytes[8..].copy_from_slice(&self.rng.next().to_le_bytes());
        Builder::from_random_bytes(bytes).into_uuid()
    }
}

/// Disbursement followed by `tenure` equal monthly receipts
fn expected_cashflows(exposure: f64, receipt: f64, tenure: u32) -> Vec<f64> {
    std::iter::once(-exposure)
        .chain(std::iter::repeat(receipt).take(tenure as usize))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::state::EnvironmentStateUpdate;

    /// Always picks the same menu entry, records what it saw
    struct Fixed {
        index: usize,
        transitions: Vec<(f64, f64)>,
    }

    impl NegotiationPolicy for Fixed {
        fn select_action(&mut self, _state: &EnvironmentState) -> usize {
            self.index
        }

        fn observe_transition(
            &mut self,
            _state: &EnvironmentState,
            _action: usize,
            reward: f64,
            next_state: &EnvironmentState,
        ) {
            self.transitions
                .push((reward, next_state.default_probability()));
        }
    }

    fn env() -> NegotiationEnvironment {
        let mut env = NegotiationEnvironment::new();
        env.reset(&EnvironmentStateUpdate {
            default_probability: Some(0.2),
            emi_ratio: Some(0.16),
            bank_exposure: Some(20_000.0),
            ..Default::default()
        });
        env
    }

    fn orchestrator(config: OrchestratorConfig) -> NegotiationOrchestrator {
        NegotiationOrchestrator::new(config, Collaborators::heuristic(), 1).unwrap()
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let config = OrchestratorConfig {
            rounds: 0,
            initial_offer: None,
        };
        assert_eq!(
            NegotiationOrchestrator::new(config, Collaborators::heuristic(), 1).unwrap_err(),
            NegotiationError::NoRounds
        );
    }

    #[test]
    fn test_policy_sees_sigmoid_pd() {
        let mut env = env();
        let mut policy = Fixed {
            index: 1,
            transitions: Vec::new(),
        };
        orchestrator(OrchestratorConfig::default()).negotiate(&mut env, &mut policy);

        // HOLD-like action 1: emi falls by 0.03 per round
        let emi_after_first = 0.16 - 0.03;
        let expected_pd = sigmoid(3.0 * (emi_after_first - 0.6));
        assert!((policy.transitions[0].1 - expected_pd).abs() < 1e-12);
    }

    #[test]
    fn test_compliance_carried_to_next_round() {
        let mut env = env();
        let mut policy = Fixed {
            index: 1,
            transitions: Vec::new(),
        };
        let outcome = orchestrator(OrchestratorConfig::default()).negotiate(&mut env, &mut policy);

        // Round 1 scores against 100, later rounds against the merged contract (90)
        let rounds = env.transcript().entries();
        assert_eq!(rounds[0].reward_breakdown.components[3], 0.0);
        assert!((rounds[1].reward_breakdown.components[3] - 0.1).abs() < 1e-12);
        assert_eq!(outcome.transcript.entries()[0].compliance_score, 90.0);
    }

    #[test]
    fn test_initial_offer_seeds_contract() {
        let config = OrchestratorConfig {
            rounds: 1,
            initial_offer: Some(LoanOffer {
                interest_rate: 0.12,
                tenure_months: 120,
                grace_period: false,
                restructure_pct: 0.0,
                collateral_change: 0.0,
            }),
        };
        let mut env = env();
        let mut policy = Fixed {
            index: 0,
            transitions: Vec::new(),
        };
        let outcome = orchestrator(config).negotiate(&mut env, &mut policy);
        assert_eq!(outcome.final_contract.grace_period, Some(true));
        assert_eq!(
            outcome.final_contract.keys(),
            vec!["interest_rate", "tenure_months", "grace_period", "restructure_pct"]
        );
    }

    #[test]
    fn test_summary_reward_improvement() {
        let mut env = env();
        let mut policy = Fixed {
            index: 2,
            transitions: Vec::new(),
        };
        let mut orch = orchestrator(OrchestratorConfig::default());
        let outcome = orch.negotiate(&mut env, &mut policy);
        let summary = orch.summarize(&outcome);

        let curve = &outcome.reward_curve;
        assert_eq!(summary.reward_improvement, curve[6] - curve[0]);
        assert_eq!(summary.rounds, 7);
        assert_eq!(summary.compliance.compliance_score, 90.0);

        let rate = outcome.final_contract.interest_rate.unwrap();
        assert!((summary.effective_apr.unwrap() - apr(rate, 12)).abs() < 1e-15);
        assert!(summary.monthly_installment.unwrap() > 0.0);

        // Discounting the level schedule at its own rate returns the principal,
        // so only the expected default loss is left
        let exposure = outcome.final_state.bank_exposure();
        let expected_loss = -summary.final_default_probability * exposure;
        assert!((summary.expected_npv.unwrap() - expected_loss).abs() < 1e-6 * exposure);
        let yield_ = summary.risk_adjusted_yield.unwrap();
        assert!(yield_ < rate, "yield {} vs rate {}", yield_, rate);
    }

    #[test]
    fn test_run_ids_follow_seed() {
        let run = |seed| {
            let mut orch = NegotiationOrchestrator::new(
                OrchestratorConfig::default(),
                Collaborators::heuristic(),
                seed,
            )
            .unwrap();
            let mut policy = Fixed {
                index: 1,
                transitions: Vec::new(),
            };
            let first = orch.negotiate(&mut env(), &mut policy).run_id;
            let second = orch.negotiate(&mut env(), &mut policy).run_id;
            (first, second)
        };

        let (a1, a2) = run(9);
        let (b1, b2) = run(9);
        assert_eq!((a1, a2), (b1, b2));
        assert_ne!(a1, a2);
        assert_ne!(a1, run(10).0);
        assert_eq!(a1.get_version_num(), 4);
    }
}
