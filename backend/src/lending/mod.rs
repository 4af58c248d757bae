//! Lending simulation loop
//!
//! - `environment`: month-by-month loan lifecycle under continuous actions
//! - `multi_agent`: customer acceptance and regulator veto in front of `step`
//! - `episode`: one closed negotiated episode
//! - `evaluation`: multi-episode strategy metrics
//! - `checkpoint`: snapshot and restore mid-episode

pub mod action;
pub mod balance_sheet;
pub mod checkpoint;
pub mod config;
pub mod environment;
pub mod episode;
pub mod error;
pub mod evaluation;
pub mod multi_agent;
pub mod observation;

pub use action::{LendingAction, ACTION_DIM, ACTION_HIGH, ACTION_LOW};
pub use balance_sheet::BankBalanceSheet;
pub use checkpoint::{compute_config_hash, LendingSnapshot};
pub use config::LendingConfig;
pub use environment::{
    EpisodeStatus, LendingEnvironment, LendingStep, StepInfo, DECLINE_REWARD, DEFAULT_PENALTY,
    DEPLETION_REWARD, ROLLOVER_BONUS,
};
pub use episode::{run_negotiated_episode, NegotiatedEpisodeReport};
pub use error::LendingError;
pub use evaluation::{evaluate_strategy, evaluation_seed, EvaluationReport};
pub use multi_agent::{
    negotiate, CustomerAgent, CustomerAgentConfig, NegotiationDecision, PortfolioLoan,
    RegulatorAgent, RegulatorConfig, RegulatoryCheck, Verdict,
};
pub use observation::{Observation, OBS_DIM};
