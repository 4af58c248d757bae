//! credit-sim - Credit Negotiation Simulator
//!
//! Runs the negotiation protocol or the lending environment from the
//! command line and prints the result as JSON on stdout.

mod logging;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use credit_negotiation_core::collaborators::Collaborators;
use credit_negotiation_core::config::streams;
use credit_negotiation_core::lending::{
    evaluate_strategy, run_negotiated_episode, CustomerAgent, LendingEnvironment, RegulatorAgent,
};
use credit_negotiation_core::policy::{LendingStrategy, PdThresholdStrategy, RuleBasedStrategy};
use credit_negotiation_core::{
    NegotiationEnvironment, NegotiationOrchestrator, SimulationConfig, TabularPolicyLearner,
};
use logging::{init_logging, LogFormat};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Debug, Parser)]
#[command(name = "credit-sim", version, about = "Credit negotiation simulator")]
struct Cli {
    /// JSON run configuration (defaults apply to missing keys)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Override the master seed
    #[arg(long, short, global = true)]
    seed: Option<u64>,

    /// Log output format
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the round-by-round negotiation protocol with a Q-learning policy
    Negotiate(NegotiateArgs),
    /// Run lending episodes with customer and regulator in the loop
    Lend(LendArgs),
    /// Evaluate the baseline lending strategies
    Evaluate(EvaluateArgs),
}

#[derive(Debug, Args)]
struct NegotiateArgs {
    /// Override the number of rounds per negotiation
    #[arg(long, short)]
    rounds: Option<usize>,

    /// Negotiations to run; the policy keeps learning across them
    #[arg(long, short, default_value_t = 1)]
    episodes: usize,

    /// Write the learned Q-table as JSON
    #[arg(long)]
    export_q_table: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct LendArgs {
    /// Baseline strategy proposing each month
    #[arg(long, default_value = "rule-based")]
    strategy: StrategyKind,

    #[arg(long, short, default_value_t = 1)]
    episodes: usize,
}

#[derive(Debug, Args)]
struct EvaluateArgs {
    #[arg(long, short, default_value_t = 10)]
    episodes: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyKind {
    RuleBased,
    PdThreshold,
}

impl StrategyKind {
    fn build(self) -> Box<dyn LendingStrategy> {
        match self {
            StrategyKind::RuleBased => Box::new(RuleBasedStrategy::default()),
            StrategyKind::PdThreshold => Box::new(PdThresholdStrategy::default()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, Level::INFO);

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    info!(seed = config.seed, "starting credit-sim");

    match cli.command {
        Command::Negotiate(args) => run_negotiate(config, args),
        Command::Lend(args) => run_lend(&config, args),
        Command::Evaluate(args) => run_evaluate(&config, args),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}

fn run_negotiate(mut config: SimulationConfig, args: NegotiateArgs) -> Result<()> {
    if let Some(rounds) = args.rounds {
        config.negotiation.rounds = rounds;
    }
    config.validate().context("Invalid configuration")?;

    let mut env = NegotiationEnvironment::with_weights(config.reward_weights);
    let mut learner = TabularPolicyLearner::new(
        config.learner.clone(),
        config.component_seed(streams::LEARNER),
    )?;
    let mut orchestrator = NegotiationOrchestrator::new(
        config.negotiation.clone(),
        Collaborators::heuristic(),
        config.component_seed(streams::FAIRNESS),
    )?;

    #[derive(Serialize)]
    struct Run {
        summary: credit_negotiation_core::NegotiationSummary,
        final_contract: credit_negotiation_core::ContractTerms,
        reward_curve: Vec<f64>,
    }

    let mut runs = Vec::with_capacity(args.episodes);
    for _ in 0..args.episodes {
        env.reset(&config.initial_state);
        let outcome = orchestrator.negotiate(&mut env, &mut learner);
        let summary = orchestrator.summarize(&outcome);
        runs.push(Run {
            summary,
            final_contract: outcome.final_contract,
            reward_curve: outcome.reward_curve,
        });
    }

    if let Some(path) = &args.export_q_table {
        let json = learner.export_table()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write Q-table to {}", path.display()))?;
        info!(path = %path.display(), states = learner.q_table().states_visited(), "Q-table exported");
    }

    print_json(&runs)
}

fn run_lend(config: &SimulationConfig, args: LendArgs) -> Result<()> {
    let mut env = LendingEnvironment::new(
        config.lending.clone(),
        config.component_seed(streams::LENDING),
    )?;
    let mut customer = CustomerAgent::new(
        config.customer.clone(),
        config.component_seed(streams::CUSTOMER),
    )?;
    let mut regulator = RegulatorAgent::new(config.regulator.clone())?;
    let mut strategy = args.strategy.build();

    let mut reports = Vec::with_capacity(args.episodes);
    for _ in 0..args.episodes {
        let report = run_negotiated_episode(
            &mut env,
            strategy.as_mut(),
            &mut customer,
            &mut regulator,
            None,
        )?;
        reports.push(report);
    }
    print_json(&reports)
}

fn run_evaluate(config: &SimulationConfig, args: EvaluateArgs) -> Result<()> {
    let mut env = LendingEnvironment::new(
        config.lending.clone(),
        config.component_seed(streams::LENDING),
    )?;

    let mut reports = Vec::new();
    for kind in [StrategyKind::RuleBased, StrategyKind::PdThreshold] {
        let mut strategy = kind.build();
        reports.push(evaluate_strategy(strategy.as_mut(), &mut env, args.episodes)?);
    }
    print_json(&reports)
}
