//! Multi-episode strategy evaluation

use crate::lending::environment::LendingEnvironment;
use crate::lending::error::LendingError;
use crate::policy::LendingStrategy;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Aggregate metrics over evaluation episodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub strategy: String,
    pub episodes: usize,
    /// Sum of episode rewards
    pub total_profit: f64,
    pub avg_profit: f64,
    /// Defaults per approved month
    pub default_rate: f64,
    pub total_defaults: usize,
    pub total_approved: usize,
    /// `avg_profit / (1 + default_rate)`
    pub risk_adjusted_return: f64,
    pub avg_final_capital: f64,
}

/// Seed used for evaluation episode `episode`
///
/// Offset by one: the RNG maps seed 0 onto state 1, so raw indices would
/// replay the first trajectory twice.
pub fn evaluation_seed(episode: usize) -> u64 {
    episode as u64 + 1
}

/// Run `episodes` episodes of `strategy`, reseeding per episode
///
/// Episode `i` starts from `env.reset(Some(evaluation_seed(i)))`, so two
/// evaluations of the same strategy on the same environment agree exactly.
pub fn evaluate_strategy<S: LendingStrategy + ?Sized>(
    strategy: &mut S,
    env: &mut LendingEnvironment,
    episodes: usize,
) -> Result<EvaluationReport, LendingError> {
    let mut total_profit = 0.0;
    let mut total_defaults = 0;
    let mut total_approved = 0;
    let mut capital_sum = 0.0;

    for episode in 0..episodes {
        let mut observation = env.reset(Some(evaluation_seed(episode)));

        for _ in 0..env.config().max_months {
            let action = strategy.act(&observation, env.balance_sheet());
            let step = env.step(&action)?;

            total_profit += step.reward;
            if action.approve() {
                total_approved += 1;
            }
            if step.info.defaulted {
                total_defaults += 1;
            }
            observation = step.observation;

            if step.done() {
                break;
            }
        }
        capital_sum += env.balance_sheet().capital;
    }

    let n = episodes.max(1) as f64;
    let avg_profit = total_profit / n;
    let default_rate = total_defaults as f64 / total_approved.max(1) as f64;

    let report = EvaluationReport {
        strategy: strategy.name().to_string(),
        episodes,
        total_profit,
        avg_profit,
        default_rate,
        total_defaults,
        total_approved,
        risk_adjusted_return: avg_profit / (1.0 + default_rate),
        avg_final_capital: capital_sum / n,
    };

    info!(
        strategy = %report.strategy,
        episodes,
        total_profit,
        default_rate,
        "strategy evaluated"
    );
    Ok(report)
}
