//! Lending Environment - episodic loan lifecycle simulator
//!
//! Simulates one lender servicing a loan month by month under continuous
//! actions:
//! - Repricing and resizing of the active loan
//! - Approval decision with a risk-priced reward
//! - Stochastic monthly default with loss-given-default haircut
//! - Amortized repayment and rollover to a fresh customer
//!
//! # Month loop
//!
//! ```text
//! For each step:
//! 1. Advance the month counter
//! 2. Reprice: rate ← clip(rate + Δ, 0.01, 0.25); balance ← balance · multiplier
//! 3. Drift PD with the rate change and the macro factor
//! 4. Score the decision (−0.01 when declined)
//! 5. On approval: reserve capital, draw default, else collect an installment
//! 6. Macro random walk, clipped to [0.7, 1.3]
//! 7. Default penalty (−2.0) and rollover bonus (+0.5)
//! 8. Terminate with −10.0 when capital ≤ 0, truncate at the horizon
//! 9. Log the month
//! ```
//!
//! # Example
//!
//! ```rust
//! use credit_negotiation_core::lending::{LendingAction, LendingConfig, LendingEnvironment};
//!
//! let mut env = LendingEnvironment::new(LendingConfig::default(), 42).unwrap();
//! env.reset(None);
//!
//! let step = env.step(&LendingAction::new(0.0, 1.0, 0.0)).unwrap();
//! assert_eq!(step.reward, -0.01);
//! assert!(!step.terminated && !step.truncated);
//! assert_eq!(env.log().len(), 1);
//! ```

use crate::lending::action::LendingAction;
use crate::lending::balance_sheet::BankBalanceSheet;
use crate::lending::config::LendingConfig;
use crate::lending::error::LendingError;
use crate::lending::observation::{encode, Observation};
use crate::models::customer::{CustomerPool, CustomerPoolError, CustomerProfile};
use crate::models::event::{LendingStepLog, Transcript};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Reward for a declined month
pub const DECLINE_REWARD: f64 = -0.01;

/// Additional penalty on the month a default fires
pub const DEFAULT_PENALTY: f64 = 2.0;

/// Bonus when a loan is fully repaid and rolled over
pub const ROLLOVER_BONUS: f64 = 0.5;

/// Reward forced on the month capital is depleted
pub const DEPLETION_REWARD: f64 = -10.0;

/// Episode lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeStatus {
    /// Constructed but never reset
    NotStarted,
    AwaitingDecision,
    /// Terminal: capital fell to zero or below
    CapitalDepleted,
    /// Terminal: horizon reached
    HorizonReached,
}

impl EpisodeStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EpisodeStatus::CapitalDepleted | EpisodeStatus::HorizonReached
        )
    }
}

/// Auxiliary per-step information
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub defaulted: bool,
    pub bank_capital: f64,
    pub n_defaults: usize,
    pub n_approved: usize,
    /// Cumulative reward including this step
    pub total_profit: f64,
}

/// Result of one simulated month
#[derive(Debug, Clone, PartialEq)]
pub struct LendingStep {
    pub observation: Observation,
    pub reward: f64,
    /// Capital depleted this month
    pub terminated: bool,
    /// Horizon reached this month (never together with `terminated`)
    pub truncated: bool,
    pub info: StepInfo,
}

impl LendingStep {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Episodic month-by-month loan simulator
///
/// Owns its customer pool, balance sheet and RNG. Two environments built
/// with the same config, pool and seed produce identical trajectories for
/// identical action sequences.
#[derive(Debug, Clone)]
pub struct LendingEnvironment {
    pub(crate) config: LendingConfig,
    pub(crate) pool: CustomerPool,
    pub(crate) rng: RngManager,
    pub(crate) sheet: BankBalanceSheet,
    pub(crate) customer_index: usize,
    pub(crate) current_step: usize,
    pub(crate) n_defaults: usize,
    pub(crate) n_approved: usize,
    pub(crate) total_profit: f64,
    pub(crate) status: EpisodeStatus,
    pub(crate) log: Transcript<LendingStepLog>,
}

impl LendingEnvironment {
    /// Environment over a synthetic pool of `config.pool_size` customers
    ///
    /// The pool is drawn from the same seeded RNG that drives the episodes.
    pub fn new(config: LendingConfig, seed: u64) -> Result<Self, LendingError> {
        config.validate()?;
        let mut rng = RngManager::new(seed);
        let pool = CustomerPool::synthetic(config.pool_size, &mut rng);
        Ok(Self::build(config, pool, rng))
    }

    /// Environment over a caller-supplied pool
    pub fn with_pool(
        config: LendingConfig,
        pool: CustomerPool,
        seed: u64,
    ) -> Result<Self, LendingError> {
        config.validate()?;
        // Deserialized pools bypass `CustomerPool::new`
        if pool.is_empty() {
            return Err(CustomerPoolError::Empty.into());
        }
        Ok(Self::build(config, pool, RngManager::new(seed)))
    }

    fn build(config: LendingConfig, pool: CustomerPool, rng: RngManager) -> Self {
        let customer_index = 0;
        let sheet = BankBalanceSheet::new(
            config.initial_capital,
            1.0,
            &pool.customers()[customer_index],
        );
        Self {
            config,
            pool,
            rng,
            sheet,
            customer_index,
            current_step: 0,
            n_defaults: 0,
            n_approved: 0,
            total_profit: 0.0,
            status: EpisodeStatus::NotStarted,
            log: Transcript::new(),
        }
    }

    /// Start a new episode
    ///
    /// `Some(seed)` reseeds the RNG first; `None` continues the current
    /// stream. Capital is restored to `initial_capital`, a customer is drawn
    /// uniformly from the pool and the macro factor is set to
    /// `1 + N(0, initial_macro_volatility)`.
    pub fn reset(&mut self, seed: Option<u64>) -> Observation {
        if let Some(seed) = seed {
            self.rng = RngManager::new(seed);
        }

        self.customer_index = self.pool.sample_index(&mut self.rng);
        let macro_factor = 1.0 + self.rng.normal(0.0, self.config.initial_macro_volatility);
        self.sheet = BankBalanceSheet::new(
            self.config.initial_capital,
            macro_factor,
            &self.pool.customers()[self.customer_index],
        );

        self.current_step = 0;
        self.n_defaults = 0;
        self.n_approved = 0;
        self.total_profit = 0.0;
        self.status = EpisodeStatus::AwaitingDecision;
        self.log.clear();

        debug!(
            customer = self.customer_index,
            pd = self.sheet.pd_score,
            loan = self.sheet.outstanding_loan,
            "lending episode reset"
        );

        self.observe()
    }

    /// Advance one month under `action` (clipped into the action bounds)
    pub fn step(&mut self, action: &LendingAction) -> Result<LendingStep, LendingError> {
        match self.status {
            EpisodeStatus::NotStarted => return Err(LendingError::NotReset),
            EpisodeStatus::CapitalDepleted | EpisodeStatus::HorizonReached => {
                return Err(LendingError::EpisodeFinished)
            }
            EpisodeStatus::AwaitingDecision => {}
        }

        let action = action.clipped();
        let approve = action.approve();
        self.current_step += 1;

        self.sheet.interest_rate = (self.sheet.interest_rate + action.rate_delta).clamp(0.01, 0.25);
        self.sheet.outstanding_loan *= action.loan_multiplier;

        let pd_adj = 0.02 * action.rate_delta / 0.05;
        let macro_adj = (1.0 - self.sheet.macro_factor) * 0.05;
        self.sheet.pd_score = (self.sheet.pd_score + pd_adj + macro_adj).clamp(0.001, 0.99);

        let mut reward = self.decision_reward(approve);
        let defaulted = approve && self.service_loan();

        self.sheet.macro_factor = (self.sheet.macro_factor
            + self.rng.normal(0.0, self.config.macro_volatility))
        .clamp(0.7, 1.3);

        if defaulted {
            reward -= DEFAULT_PENALTY;
        }

        if self.sheet.outstanding_loan <= 0.0 {
            reward += ROLLOVER_BONUS;
            self.rollover();
        }

        let terminated = self.sheet.capital <= 0.0;
        let truncated = !terminated && self.current_step >= self.config.max_months;
        if terminated {
            reward = DEPLETION_REWARD;
            self.status = EpisodeStatus::CapitalDepleted;
            warn!(
                step = self.current_step,
                capital = self.sheet.capital,
                "capital depleted, episode terminated"
            );
        } else if truncated {
            self.status = EpisodeStatus::HorizonReached;
        }

        self.log.log(LendingStepLog {
            step: self.current_step,
            approved: approve,
            interest_rate: self.sheet.interest_rate,
            outstanding_loan: self.sheet.outstanding_loan,
            pd_score: self.sheet.pd_score,
            reward,
            capital: self.sheet.capital,
            macro_factor: self.sheet.macro_factor,
            defaulted,
        });
        self.total_profit += reward;

        debug!(
            step = self.current_step,
            approve,
            defaulted,
            reward,
            capital = self.sheet.capital,
            "lending step"
        );

        Ok(LendingStep {
            observation: self.observe(),
            reward,
            terminated,
            truncated,
            info: StepInfo {
                defaulted,
                bank_capital: self.sheet.capital,
                n_defaults: self.n_defaults,
                n_approved: self.n_approved,
                total_profit: self.total_profit,
            },
        })
    }

    /// Step with a raw 3-vector action
    pub fn step_slice(&mut self, action: &[f64]) -> Result<LendingStep, LendingError> {
        let action = LendingAction::from_slice(action)?;
        self.step(&action)
    }

    /// Scaled, clipped expected profit of approving the current loan
    fn decision_reward(&self, approve: bool) -> f64 {
        if !approve {
            return DECLINE_REWARD;
        }
        let sheet = &self.sheet;
        let pd = sheet.pd_score;

        let interest_income = sheet.outstanding_loan * sheet.interest_rate / 12.0;
        let expected_loss = pd * self.config.lgd * sheet.outstanding_loan;
        let expected_profit = (1.0 - pd) * interest_income - pd * expected_loss;
        let risk_penalty = self.config.risk_lambda * sheet.capital_consumption();

        ((expected_profit - risk_penalty) / self.config.reward_scale).clamp(-10.0, 10.0)
    }

    /// Book one approved month; returns true when the loan defaulted
    fn service_loan(&mut self) -> bool {
        self.n_approved += 1;
        self.sheet.capital -= self.sheet.capital_consumption();
        self.sheet.risk_budget = (self.sheet.risk_budget - self.sheet.pd_score * 0.005).max(0.0);

        let monthly_pd = self.sheet.pd_score / 12.0;
        if self.rng.bernoulli(monthly_pd) {
            self.sheet.capital -= self.config.lgd * self.sheet.outstanding_loan;
            self.sheet.outstanding_loan *= 1.0 - self.config.lgd;
            self.n_defaults += 1;
            return true;
        }

        let interest = self.sheet.outstanding_loan * self.sheet.interest_rate / 12.0;
        let remaining_months = self.config.max_months.saturating_sub(self.current_step).max(1);
        let principal = self.sheet.outstanding_loan / remaining_months as f64;
        self.sheet.capital += interest + principal;
        self.sheet.outstanding_loan = (self.sheet.outstanding_loan - principal).max(0.0);
        false
    }

    fn rollover(&mut self) {
        self.customer_index = self.pool.sample_index(&mut self.rng);
        self.sheet
            .load_customer(&self.pool.customers()[self.customer_index]);
        debug!(customer = self.customer_index, "loan repaid, rolled over");
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Normalized observation of the current state
    pub fn observe(&self) -> Observation {
        encode(&self.sheet, self.customer(), self.config.initial_capital)
    }

    pub fn config(&self) -> &LendingConfig {
        &self.config
    }

    pub fn pool(&self) -> &CustomerPool {
        &self.pool
    }

    pub fn balance_sheet(&self) -> &BankBalanceSheet {
        &self.sheet
    }

    /// Customer whose loan is currently being serviced
    pub fn customer(&self) -> &CustomerProfile {
        &self.pool.customers()[self.customer_index]
    }

    /// Months elapsed in the current episode
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Months left before the horizon
    pub fn months_remaining(&self) -> usize {
        self.config.max_months.saturating_sub(self.current_step)
    }

    pub fn n_defaults(&self) -> usize {
        self.n_defaults
    }

    pub fn n_approved(&self) -> usize {
        self.n_approved
    }

    pub fn total_profit(&self) -> f64 {
        self.total_profit
    }

    pub fn status(&self) -> EpisodeStatus {
        self.status
    }

    /// Per-month log of the current episode
    pub fn log(&self) -> &Transcript<LendingStepLog> {
        &self.log
    }

    /// Overwrite capital (scenario setup and stress tests)
    pub fn set_capital(&mut self, capital: f64) {
        if capital.is_finite() {
            self.sheet.capital = capital;
        }
    }
}
