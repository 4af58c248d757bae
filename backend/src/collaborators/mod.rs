//! Collaborator contracts consumed by the negotiation orchestrator
//!
//! The orchestrator never computes risk, prices, counter-offers, compliance
//! or fairness itself. It calls these traits and treats the results as
//! opaque numbers. Each trait ships one heuristic implementation so a
//! negotiation is runnable end to end; none of them carries a correctness
//! claim.
//!
//! # Example
//!
//! ```rust
//! use credit_negotiation_core::collaborators::{Collaborators, RiskScorer};
//!
//! let collaborators = Collaborators::heuristic();
//! let assessment = collaborators.risk.assess(&[1_000.0, 900.0, 800.0]);
//! assert!(assessment.heatmap.slope < 0.0);
//! ```

use crate::models::contract::{ContractTerms, CounterOfferProposal, LenderOffer, LoanOffer};
use crate::models::state::EnvironmentState;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

pub mod compliance;
pub mod counter;
pub mod fairness;
pub mod pricing;
pub mod risk;

pub use compliance::RuleBasedComplianceValidator;
pub use counter::ConcessionCounterOffer;
pub use fairness::GroupParityFairnessAssessor;
pub use pricing::RiskPricedOfferGenerator;
pub use risk::HeuristicRiskScorer;

// ============================================================================
// Reports
// ============================================================================

/// Distress probabilities per horizon plus the cash-flow shape behind them
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskHeatmap {
    pub distress_30d: f64,
    pub distress_60d: f64,
    pub distress_90d: f64,
    /// Least-squares slope of the forecast
    pub slope: f64,
    pub volatility: f64,
    /// Largest jump relative to the typical jump
    pub structural_break: f64,
}

/// Output of a [`RiskScorer`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub heatmap: RiskHeatmap,
    pub early_intervention_score: f64,
    pub payment_delay_trend: f64,
    pub credit_dependency_growth: f64,
}

/// Output of a [`ComplianceValidator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// [0, 100]
    pub compliance_score: f64,
    pub violations: Vec<String>,
    pub amendments: Vec<String>,
}

/// Output of a [`FairnessAssessor`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FairnessReport {
    /// [0, 1]
    pub fairness_index: f64,
    /// `100 · fairness_index`
    pub fairness_score: f64,
    pub bias_flag: bool,
    pub demographic_parity_gap: f64,
    pub outcome_disparity: f64,
}

// ============================================================================
// Contracts
// ============================================================================

/// Cash-flow forecast → distress assessment
pub trait RiskScorer: Send {
    fn assess(&self, cashflow_forecast: &[f64]) -> RiskAssessment;
}

/// Risk heatmap and exposure → priced lender offer
pub trait OfferGenerator: Send {
    fn offer(&self, heatmap: &RiskHeatmap, exposure: f64, collateral_value: f64) -> LenderOffer;
}

/// Lender offer and negotiation state → borrower counter-offer
pub trait CounterOfferGenerator: Send {
    fn counter_offer(&self, offer: &LoanOffer, state: &EnvironmentState) -> CounterOfferProposal;
}

/// Contract terms → compliance report
pub trait ComplianceValidator: Send {
    fn validate(&self, contract: &ContractTerms) -> ComplianceReport;
}

/// Priced rate and default probability → fairness report
pub trait FairnessAssessor: Send {
    fn assess(&self, rate: f64, default_probability: f64, rng: &mut RngManager) -> FairnessReport;
}

/// The five collaborators of one negotiation
pub struct Collaborators {
    pub risk: Box<dyn RiskScorer>,
    pub pricing: Box<dyn OfferGenerator>,
    pub counter: Box<dyn CounterOfferGenerator>,
    pub compliance: Box<dyn ComplianceValidator>,
    pub fairness: Box<dyn FairnessAssessor>,
}

impl Collaborators {
    /// Heuristic default for every contract
    pub fn heuristic() -> Self {
        Self {
            risk: Box::new(HeuristicRiskScorer),
            pricing: Box::new(RiskPricedOfferGenerator::default()),
            counter: Box::new(ConcessionCounterOffer::default()),
            compliance: Box::new(RuleBasedComplianceValidator::default()),
            fairness: Box::new(GroupParityFairnessAssessor),
        }
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::heuristic()
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
