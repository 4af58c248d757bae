//! Multi-Agent Negotiation Tests
//!
//! Customer and regulator resolve each bank proposal before the lending
//! environment steps.
//!
//! Critical invariants tested:
//! - Regulator penalty arithmetic (capital adequacy and portfolio PD)
//! - Unprofitable counter-offers end in a walk-away
//! - Approved loans land in the regulator's portfolio
//! - Negotiated episode bookkeeping is consistent

use credit_negotiation_core::lending::{
    negotiate, run_negotiated_episode, CustomerAgent, CustomerAgentConfig, LendingAction,
    LendingConfig, LendingEnvironment, RegulatorAgent, RegulatorConfig, Verdict,
};
use credit_negotiation_core::models::{CustomerPool, CustomerProfile};
use credit_negotiation_core::policy::RuleBasedStrategy;

// ============================================================================
// Test Helpers
// ============================================================================

fn env_with(pd: f64, base_rate: f64) -> LendingEnvironment {
    let pool = CustomerPool::new(vec![CustomerProfile {
        pd_score: pd,
        income: 90_000.0,
        credit_amount: 120_000.0,
        annuity: 10_000.0,
        ext_source: 0.7,
        loan_amount: 100_000.0,
        base_interest_rate: base_rate,
        duration_months: 36,
    }])
    .unwrap();
    let config = LendingConfig {
        max_months: 36,
        macro_volatility: 0.0,
        initial_macro_volatility: 0.0,
        ..Default::default()
    };
    let mut env = LendingEnvironment::with_pool(config, pool, 11).unwrap();
    env.reset(None);
    env
}

fn quiet_customer() -> CustomerAgent {
    CustomerAgent::new(
        CustomerAgentConfig {
            risk_aversion: 0.5,
            noise_scale: 0.0,
        },
        5,
    )
    .unwrap()
}

fn regulator() -> RegulatorAgent {
    RegulatorAgent::new(RegulatorConfig::default()).unwrap()
}

// ============================================================================
// Regulator
// ============================================================================

#[test]
fn test_capital_adequacy_penalty() {
    let reg = regulator();
    let check = reg.check_constraints(1_000.0, 100_000.0, 0.0);

    assert!(!check.approved);
    assert!(check.car_violation);
    assert!(!check.pd_violation);
    assert!((check.car - 0.01).abs() < 1e-9);
    assert!((check.penalty - 700.0).abs() < 1e-6);
}

#[test]
fn test_portfolio_pd_penalty() {
    let mut reg = regulator();
    reg.add_loan(1_000.0, 0.2);
    reg.add_loan(1_000.0, 0.4);
    assert!((reg.portfolio_pd() - 0.3).abs() < 1e-12);
    assert_eq!(reg.exposure(), 2_000.0);

    let check = reg.check_constraints(1e9, 0.0, reg.portfolio_pd());
    assert!(!check.approved);
    assert!(check.pd_violation);
    assert!((check.penalty - 750.0).abs() < 1e-6);
}

#[test]
fn test_adequate_bank_passes() {
    let reg = regulator();
    let check = reg.check_constraints(1_000_000.0, 100_000.0, 0.05);
    assert!(check.approved);
    assert_eq!(check.penalty, 0.0);
}

#[test]
fn test_empty_portfolio_pd_is_zero() {
    assert_eq!(regulator().portfolio_pd(), 0.0);
}

// ============================================================================
// Negotiation
// ============================================================================

#[test]
fn test_bank_decline_short_circuits() {
    let env = env_with(0.05, 0.08);
    let mut customer = quiet_customer();
    let mut reg = regulator();

    let decision = negotiate(&LendingAction::new(0.0, 1.0, 0.2), &mut customer, &mut reg, &env);
    assert_eq!(decision.verdict, Verdict::BankDeclined);
    assert!(!decision.approved());
    assert!(reg.portfolio().is_empty());
}

#[test]
fn test_accepted_offer_booked() {
    let env = env_with(0.01, 0.05);
    let mut customer = quiet_customer();
    let mut reg = regulator();

    let decision = negotiate(&LendingAction::APPROVE, &mut customer, &mut reg, &env);
    assert_eq!(decision.verdict, Verdict::Approved);
    assert!(!decision.counter_accepted);
    assert!(decision.action.rate_delta.abs() < 1e-12);
    assert!((decision.action.loan_multiplier - 1.0).abs() < 1e-9);
    assert_eq!(reg.portfolio().len(), 1);
    assert!((reg.exposure() - 100_000.0).abs() < 1e-6);
}

#[test]
fn test_profitable_counter_accepted() {
    // 50% over 36 months costs more than the principal: the customer counters
    let env = env_with(0.01, 0.5);
    let mut customer = quiet_customer();
    let mut reg = regulator();

    let decision = negotiate(&LendingAction::APPROVE, &mut customer, &mut reg, &env);
    assert_eq!(decision.verdict, Verdict::Approved);
    assert!(decision.counter_accepted);
    // Counter rate in [0.35, 0.475], amount in [100k, 120k]
    assert!(decision.action.rate_delta <= -0.025 + 1e-9);
    assert!(decision.action.rate_delta >= -0.15 - 1e-9);
    assert!(decision.action.loan_multiplier >= 1.0 - 1e-9);
    assert!(decision.action.loan_multiplier <= 1.2 + 1e-9);
}

#[test]
fn test_unprofitable_counter_walks_away() {
    // (1 − 0.9)·0.475 − 0.9·0.6 < 0 for any counter rate
    let env = env_with(0.9, 0.5);
    let mut customer = quiet_customer();
    let mut reg = regulator();

    let decision = negotiate(&LendingAction::APPROVE, &mut customer, &mut reg, &env);
    assert_eq!(decision.verdict, Verdict::CustomerWalkedAway);
    assert!(reg.portfolio().is_empty());
}

#[test]
fn test_undercapitalized_bank_vetoed() {
    let mut env = env_with(0.01, 0.05);
    env.set_capital(1_000.0);
    let mut customer = quiet_customer();
    let mut reg = regulator();

    let decision = negotiate(&LendingAction::APPROVE, &mut customer, &mut reg, &env);
    assert_eq!(decision.verdict, Verdict::RegulatorVeto);
    assert!((decision.penalty - 700.0).abs() < 1e-6);
    assert!(reg.portfolio().is_empty());
}

#[test]
fn test_negotiate_does_not_mutate_environment() {
    let env = env_with(0.01, 0.05);
    let before = env.balance_sheet().clone();
    let mut customer = quiet_customer();
    let mut reg = regulator();

    negotiate(&LendingAction::APPROVE, &mut customer, &mut reg, &env);
    assert_eq!(env.balance_sheet(), &before);
    assert_eq!(env.current_step(), 0);
}

// ============================================================================
// Negotiated Episodes
// ============================================================================

#[test]
fn test_negotiated_episode_bookkeeping() {
    let mut env = LendingEnvironment::new(
        LendingConfig {
            pool_size: 100,
            ..Default::default()
        },
        21,
    )
    .unwrap();
    let mut customer = CustomerAgent::new(CustomerAgentConfig::default(), 22).unwrap();
    let mut reg = regulator();
    reg.add_loan(5_000.0, 0.9);
    let mut strategy = RuleBasedStrategy::default();

    let report =
        run_negotiated_episode(&mut env, &mut strategy, &mut customer, &mut reg, Some(3))
            .unwrap();

    assert_eq!(
        report.bank_declines + report.customer_walkaways + report.vetoes + report.approvals,
        report.steps
    );
    assert!(report.counter_offers_accepted <= report.approvals);
    assert_eq!(reg.portfolio().len(), report.approvals);
    if !report.terminated {
        assert_eq!(report.steps, 36);
    }
    assert!((report.total_reward - env.log().total_reward()).abs() < 1e-9);
    assert_eq!(report.final_capital, env.balance_sheet().capital);
}
