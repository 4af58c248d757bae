//! Checkpoint Tests - Save/Restore Lending Episodes
//!
//! Critical invariants tested:
//! - Determinism: a restored environment replays the original's future
//! - Config matching: snapshots from a different config or pool are rejected
//! - Snapshots survive JSON serialization

use credit_negotiation_core::lending::{
    compute_config_hash, LendingAction, LendingConfig, LendingEnvironment, LendingError,
    LendingSnapshot,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn config() -> LendingConfig {
    LendingConfig {
        pool_size: 64,
        ..Default::default()
    }
}

fn action_for(month: usize) -> LendingAction {
    match month % 4 {
        0 => LendingAction::new(0.02, 0.9, 0.0),
        1 => LendingAction::APPROVE,
        2 => LendingAction::new(-0.01, 1.1, 0.8),
        _ => LendingAction::new(0.0, 1.0, 0.6),
    }
}

/// Step from the current month to the horizon, collecting (reward, capital)
fn finish(env: &mut LendingEnvironment) -> Vec<(f64, f64)> {
    let mut trace = Vec::new();
    while env.months_remaining() > 0 {
        let step = env.step(&action_for(env.current_step())).unwrap();
        trace.push((step.reward, step.info.bank_capital));
        if step.done() {
            break;
        }
    }
    trace
}

fn advance(env: &mut LendingEnvironment, months: usize) {
    for month in 0..months {
        env.step(&action_for(month)).unwrap();
    }
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_restore_replays_future() {
    let mut original = LendingEnvironment::new(config(), 42).unwrap();
    original.reset(Some(1));
    advance(&mut original, 10);
    let snapshot = original.snapshot().unwrap();

    let mut restored = LendingEnvironment::new(config(), 42).unwrap();
    restored.restore(&snapshot).unwrap();
    assert_eq!(restored.current_step(), 10);
    assert_eq!(restored.balance_sheet(), original.balance_sheet());
    assert_eq!(restored.log().entries(), original.log().entries());

    assert_eq!(finish(&mut restored), finish(&mut original));
}

#[test]
fn test_restore_rewinds_same_environment() {
    let mut env = LendingEnvironment::new(config(), 7).unwrap();
    env.reset(Some(2));
    advance(&mut env, 5);
    let snapshot = env.snapshot().unwrap();

    let first = finish(&mut env);
    env.restore(&snapshot).unwrap();
    assert_eq!(finish(&mut env), first);
}

#[test]
fn test_snapshot_json_round_trip() {
    let mut env = LendingEnvironment::new(config(), 3).unwrap();
    env.reset(Some(4));
    advance(&mut env, 6);
    let snapshot = env.snapshot().unwrap();

    let json = snapshot.to_json().unwrap();
    let parsed = LendingSnapshot::from_json(&json).unwrap();
    assert_eq!(parsed.config_hash, snapshot.config_hash);
    assert_eq!(parsed.rng_state, snapshot.rng_state);
    assert_eq!(parsed.current_step, 6);
    assert_eq!(parsed.log.len(), 6);

    let mut restored = LendingEnvironment::new(config(), 3).unwrap();
    restored.restore(&parsed).unwrap();
    assert_eq!(restored.current_step(), 6);
    assert_eq!(restored.n_approved(), env.n_approved());
    assert!((restored.balance_sheet().capital - env.balance_sheet().capital).abs() < 1e-6);
}

// ============================================================================
// Config Matching
// ============================================================================

#[test]
fn test_config_mismatch_rejected() {
    let mut env = LendingEnvironment::new(config(), 42).unwrap();
    env.reset(None);
    let snapshot = env.snapshot().unwrap();

    let other_config = LendingConfig {
        lgd: 0.45,
        ..config()
    };
    let mut other = LendingEnvironment::new(other_config, 42).unwrap();
    assert!(matches!(
        other.restore(&snapshot),
        Err(LendingError::ConfigMismatch { .. })
    ));
}

#[test]
fn test_pool_mismatch_rejected() {
    let mut env = LendingEnvironment::new(config(), 42).unwrap();
    env.reset(None);
    let snapshot = env.snapshot().unwrap();

    // Same config, different seed → different synthetic pool
    let mut other = LendingEnvironment::new(config(), 43).unwrap();
    assert_ne!(other.config_hash().unwrap(), snapshot.config_hash);
    assert!(other.restore(&snapshot).is_err());
}

#[test]
fn test_failed_restore_leaves_environment_untouched() {
    let mut env = LendingEnvironment::new(config(), 42).unwrap();
    env.reset(Some(9));
    advance(&mut env, 3);
    let mut snapshot = env.snapshot().unwrap();
    snapshot.current_step = 500;

    let before = env.balance_sheet().clone();
    assert!(matches!(
        env.restore(&snapshot),
        Err(LendingError::InvalidSnapshot(_))
    ));
    assert_eq!(env.current_step(), 3);
    assert_eq!(env.balance_sheet(), &before);
}

#[test]
fn test_hash_stable_across_instances() {
    let a = LendingEnvironment::new(config(), 42).unwrap();
    let b = LendingEnvironment::new(config(), 42).unwrap();
    assert_eq!(a.config_hash().unwrap(), b.config_hash().unwrap());
    assert_eq!(
        compute_config_hash(a.config(), a.pool()).unwrap(),
        a.config_hash().unwrap()
    );
}
