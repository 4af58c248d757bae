//! Negotiated episode runner
//!
//! Closes the loop between a [`LendingStrategy`], the multi-agent layer and
//! the [`LendingEnvironment`]: every month the strategy proposes, the
//! customer and regulator resolve the proposal, and the environment steps
//! with the agreed action (or a decline when no agreement was reached).

use crate::lending::environment::LendingEnvironment;
use crate::lending::error::LendingError;
use crate::lending::multi_agent::{negotiate, CustomerAgent, RegulatorAgent, Verdict};
use crate::policy::LendingStrategy;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Aggregate outcome of one negotiated episode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NegotiatedEpisodeReport {
    pub steps: usize,
    /// Proposals the bank itself declined
    pub bank_declines: usize,
    /// Customer rejected and the counter-offer failed the margin check
    pub customer_walkaways: usize,
    pub vetoes: usize,
    pub approvals: usize,
    pub counter_offers_accepted: usize,
    pub total_penalty: f64,
    pub total_reward: f64,
    pub defaults: usize,
    pub final_capital: f64,
    pub terminated: bool,
}

/// Run one episode with customer and regulator in the loop
///
/// The regulator's portfolio is cleared first; it accumulates within the
/// episode only.
pub fn run_negotiated_episode<S: LendingStrategy + ?Sized>(
    env: &mut LendingEnvironment,
    strategy: &mut S,
    customer: &mut CustomerAgent,
    regulator: &mut RegulatorAgent,
    seed: Option<u64>,
) -> Result<NegotiatedEpisodeReport, LendingError> {
    regulator.clear_portfolio();
    let mut observation = env.reset(seed);
    let mut report = NegotiatedEpisodeReport::default();

    for _ in 0..env.config().max_months {
        let proposal = strategy.act(&observation, env.balance_sheet());
        let decision = negotiate(&proposal, customer, regulator, env);

        match decision.verdict {
            Verdict::BankDeclined => report.bank_declines += 1,
            Verdict::CustomerWalkedAway => report.customer_walkaways += 1,
            Verdict::RegulatorVeto => report.vetoes += 1,
            Verdict::Approved => report.approvals += 1,
        }
        if decision.counter_accepted {
            report.counter_offers_accepted += 1;
        }
        report.total_penalty += decision.penalty;

        let action = if decision.approved() {
            decision.action
        } else {
            decision.action.declined()
        };
        let step = env.step(&action)?;

        report.steps += 1;
        report.total_reward += step.reward;
        if step.info.defaulted {
            report.defaults += 1;
        }
        observation = step.observation;

        if step.done() {
            report.terminated = step.terminated;
            break;
        }
    }

    report.final_capital = env.balance_sheet().capital;
    info!(
        strategy = strategy.name(),
        steps = report.steps,
        approvals = report.approvals,
        vetoes = report.vetoes,
        total_reward = report.total_reward,
        "negotiated episode finished"
    );
    Ok(report)
}
