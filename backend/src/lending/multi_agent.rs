//! Multi-agent negotiation layer
//!
//! Sits between a lending strategy and [`LendingEnvironment::step`]. Before
//! an approval reaches the environment it must be accepted by a
//! [`CustomerAgent`] (possibly after a counter-offer) and cleared by a
//! [`RegulatorAgent`].
//!
//! # Protocol
//!
//! ```text
//! bank proposes (rate Δ, multiplier, approve)
//!   └─ declined by the bank            → BankDeclined
//!   └─ customer evaluates utility
//!        └─ rejects → counter (amount·U(1.0,1.2), rate·U(0.7,0.95))
//!             └─ margin (1−pd)·rate − pd·LGD ≤ 0 → CustomerWalkedAway
//!   └─ regulator checks CAR and portfolio PD
//!        └─ any violation               → RegulatorVeto (penalty)
//!   └─ loan added to portfolio          → Approved (adjusted action)
//! ```

use crate::config::ConfigError;
use crate::core::numeric::EPSILON;
use crate::lending::action::LendingAction;
use crate::lending::environment::LendingEnvironment;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ============================================================================
// Customer
// ============================================================================

/// Borrower acceptance model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomerAgentConfig {
    /// Weight of the default-risk term in the borrower's utility
    pub risk_aversion: f64,
    /// Utility noise std-dev, as a fraction of the loan amount
    pub noise_scale: f64,
}

impl Default for CustomerAgentConfig {
    fn default() -> Self {
        Self {
            risk_aversion: 0.5,
            noise_scale: 0.05,
        }
    }
}

impl CustomerAgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range("customer.risk_aversion", self.risk_aversion, 0.0, f64::MAX)?;
        ConfigError::check_range("customer.noise_scale", self.noise_scale, 0.0, f64::MAX)?;
        Ok(())
    }
}

/// Borrower that accepts or counters the lender's terms
#[derive(Debug, Clone)]
pub struct CustomerAgent {
    config: CustomerAgentConfig,
    rng: RngManager,
}

impl CustomerAgent {
    pub fn new(config: CustomerAgentConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: RngManager::new(seed),
        })
    }

    pub fn config(&self) -> &CustomerAgentConfig {
        &self.config
    }

    /// Net utility of the offer, including noise
    ///
    /// `amount − amount·rate·duration/12 − risk_aversion·pd·amount + N(0, noise·amount)`
    pub fn utility(&mut self, loan_amount: f64, interest_rate: f64, duration: usize, pd: f64) -> f64 {
        let interest_cost = loan_amount * interest_rate * duration as f64 / 12.0;
        let utility = loan_amount - interest_cost - self.config.risk_aversion * pd * loan_amount;
        utility + self.rng.normal(0.0, self.config.noise_scale * loan_amount.abs())
    }

    /// Accept iff utility is strictly positive
    pub fn decide(&mut self, loan_amount: f64, interest_rate: f64, duration: usize, pd: f64) -> bool {
        self.utility(loan_amount, interest_rate, duration, pd) > 0.0
    }

    /// Counter-proposal `(amount, rate)`: more money, cheaper
    pub fn counter_offer(&mut self, loan_amount: f64, interest_rate: f64) -> (f64, f64) {
        let rate = interest_rate * self.rng.uniform(0.7, 0.95);
        let amount = loan_amount * self.rng.uniform(1.0, 1.2);
        (amount, rate)
    }
}

// ============================================================================
// Regulator
// ============================================================================

/// Prudential constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegulatorConfig {
    /// Minimum capital-adequacy ratio
    pub min_car: f64,
    /// Maximum average PD of the booked portfolio
    pub max_portfolio_pd: f64,
    /// Penalty per unit of CAR shortfall
    pub car_penalty: f64,
    /// Penalty per unit of PD excess
    pub pd_penalty: f64,
}

impl Default for RegulatorConfig {
    fn default() -> Self {
        Self {
            min_car: 0.08,
            max_portfolio_pd: 0.15,
            car_penalty: 10_000.0,
            pd_penalty: 5_000.0,
        }
    }
}

impl RegulatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_unit("regulator.min_car", self.min_car)?;
        ConfigError::check_unit("regulator.max_portfolio_pd", self.max_portfolio_pd)?;
        ConfigError::check_range("regulator.car_penalty", self.car_penalty, 0.0, f64::MAX)?;
        ConfigError::check_range("regulator.pd_penalty", self.pd_penalty, 0.0, f64::MAX)?;
        Ok(())
    }
}

/// One booked loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioLoan {
    pub loan_amount: f64,
    pub pd_score: f64,
}

/// Outcome of a regulatory check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryCheck {
    pub approved: bool,
    pub penalty: f64,
    /// Capital-adequacy ratio including the new loan
    pub car: f64,
    pub car_violation: bool,
    pub pd_violation: bool,
}

/// Constraint checker with an append-only loan portfolio
#[derive(Debug, Clone, Default)]
pub struct RegulatorAgent {
    config: RegulatorConfig,
    portfolio: Vec<PortfolioLoan>,
}

impl RegulatorAgent {
    pub fn new(config: RegulatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            portfolio: Vec::new(),
        })
    }

    pub fn config(&self) -> &RegulatorConfig {
        &self.config
    }

    /// Check a new loan against capital and portfolio-risk limits
    ///
    /// ```rust
    /// use credit_negotiation_core::lending::{RegulatorAgent, RegulatorConfig};
    ///
    /// let regulator = RegulatorAgent::new(RegulatorConfig::default()).unwrap();
    /// let check = regulator.check_constraints(5_000.0, 100_000.0, 0.0);
    /// assert!(!check.approved);
    /// assert!((check.penalty - 300.0).abs() < 1e-6); // (0.08 - 0.05) · 10000
    /// ```
    pub fn check_constraints(
        &self,
        bank_capital: f64,
        new_loan_amount: f64,
        portfolio_pd: f64,
    ) -> RegulatoryCheck {
        let total_exposure = self.exposure() + new_loan_amount;
        let car = bank_capital / (total_exposure + EPSILON);

        let mut penalty = 0.0;
        let car_violation = car < self.config.min_car;
        if car_violation {
            penalty += (self.config.min_car - car) * self.config.car_penalty;
        }
        let pd_violation = portfolio_pd > self.config.max_portfolio_pd;
        if pd_violation {
            penalty += (portfolio_pd - self.config.max_portfolio_pd) * self.config.pd_penalty;
        }

        RegulatoryCheck {
            approved: !car_violation && !pd_violation,
            penalty,
            car,
            car_violation,
            pd_violation,
        }
    }

    pub fn add_loan(&mut self, loan_amount: f64, pd_score: f64) {
        self.portfolio.push(PortfolioLoan {
            loan_amount,
            pd_score,
        });
    }

    /// Mean PD of booked loans (0 when empty)
    pub fn portfolio_pd(&self) -> f64 {
        if self.portfolio.is_empty() {
            return 0.0;
        }
        self.portfolio.iter().map(|l| l.pd_score).sum::<f64>() / self.portfolio.len() as f64
    }

    /// Total booked loan amount
    pub fn exposure(&self) -> f64 {
        self.portfolio.iter().map(|l| l.loan_amount).sum()
    }

    pub fn portfolio(&self) -> &[PortfolioLoan] {
        &self.portfolio
    }

    /// Drop the portfolio at the start of a new episode
    pub fn clear_portfolio(&mut self) {
        self.portfolio.clear();
    }
}

// ============================================================================
// Negotiation
// ============================================================================

/// How a proposal was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The bank's own action did not approve
    BankDeclined,
    /// Customer rejected and the counter-offer was unprofitable
    CustomerWalkedAway,
    /// Regulator vetoed the loan
    RegulatorVeto,
    Approved,
}

/// Result of [`negotiate`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NegotiationDecision {
    pub verdict: Verdict,
    /// Adjusted action on approval, the original proposal otherwise
    pub action: LendingAction,
    /// Regulatory penalty (non-zero only on a veto)
    pub penalty: f64,
    /// The customer's counter-offer was taken
    pub counter_accepted: bool,
}

impl NegotiationDecision {
    pub fn approved(&self) -> bool {
        self.verdict == Verdict::Approved
    }

    fn rejected(verdict: Verdict, action: LendingAction, penalty: f64) -> Self {
        Self {
            verdict,
            action,
            penalty,
            counter_accepted: false,
        }
    }
}

/// Resolve a bank proposal against the customer and regulator
///
/// Reads the environment without mutating it. On approval the loan is added
/// to the regulator's portfolio and the returned action encodes the agreed
/// terms relative to the environment's current loan:
/// `(rate − env_rate, amount / (env_outstanding + ε), 1.0)`.
pub fn negotiate(
    proposal: &LendingAction,
    customer: &mut CustomerAgent,
    regulator: &mut RegulatorAgent,
    env: &LendingEnvironment,
) -> NegotiationDecision {
    let proposal = proposal.clipped();
    if !proposal.approve() {
        return NegotiationDecision::rejected(Verdict::BankDeclined, proposal, 0.0);
    }

    let sheet = env.balance_sheet();
    let pd = sheet.pd_score;
    let mut rate = sheet.interest_rate + proposal.rate_delta;
    let mut amount = sheet.outstanding_loan * proposal.loan_multiplier;
    let mut counter_accepted = false;

    if !customer.decide(amount, rate, env.months_remaining(), pd) {
        let (counter_amount, counter_rate) = customer.counter_offer(amount, rate);
        let margin = (1.0 - pd) * counter_rate - pd * env.config().lgd;
        if margin <= 0.0 {
            debug!(margin, "counter-offer unprofitable, customer walked away");
            return NegotiationDecision::rejected(Verdict::CustomerWalkedAway, proposal, 0.0);
        }
        amount = counter_amount;
        rate = counter_rate;
        counter_accepted = true;
    }

    let check = regulator.check_constraints(sheet.capital, amount, regulator.portfolio_pd());
    if !check.approved {
        warn!(
            car = check.car,
            penalty = check.penalty,
            car_violation = check.car_violation,
            pd_violation = check.pd_violation,
            "regulator vetoed loan"
        );
        return NegotiationDecision::rejected(Verdict::RegulatorVeto, proposal, check.penalty);
    }

    regulator.add_loan(amount, pd);

    NegotiationDecision {
        verdict: Verdict::Approved,
        action: LendingAction::new(
            rate - sheet.interest_rate,
            amount / (sheet.outstanding_loan + EPSILON),
            1.0,
        ),
        penalty: check.penalty,
        counter_accepted,
    }
}
