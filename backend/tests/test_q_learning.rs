//! Tabular Q-Learning Tests
//!
//! Critical invariants tested:
//! - Quantization grid edges (11 PD bins × 101 EMI bins)
//! - Greedy ties resolve to the lowest action index
//! - Backup arithmetic `(1 − α)·Q + α·(r + γ·max Q')`
//! - Q-table survives a JSON round trip

use credit_negotiation_core::models::{EnvironmentStateUpdate, NUM_ACTIONS};
use credit_negotiation_core::policy::{
    quantize, LearnerConfig, NegotiationPolicy, TabularPolicyLearner, EMI_BINS, PD_BINS,
};
use credit_negotiation_core::{EnvironmentState, NegotiationEnvironment};

fn learner(epsilon: f64, alpha: f64, gamma: f64) -> TabularPolicyLearner {
    TabularPolicyLearner::new(
        LearnerConfig {
            epsilon,
            alpha,
            gamma,
        },
        42,
    )
    .unwrap()
}

fn state(pd: f64, emi: f64) -> EnvironmentState {
    let mut env = NegotiationEnvironment::new();
    env.reset(&EnvironmentStateUpdate {
        default_probability: Some(pd),
        emi_ratio: Some(emi),
        ..Default::default()
    });
    env.observe().clone()
}

// ============================================================================
// Quantization
// ============================================================================

#[test]
fn test_grid_dimensions() {
    assert_eq!(PD_BINS, 11);
    assert_eq!(EMI_BINS, 101);
}

#[test]
fn test_quantize_edges() {
    let b = quantize(0.0, 0.0);
    assert_eq!((b.pd_bin, b.emi_bin), (0, 0));

    let b = quantize(1.0, 1.0);
    assert_eq!((b.pd_bin, b.emi_bin), (10, 100));

    let b = quantize(0.09, 0.005);
    assert_eq!((b.pd_bin, b.emi_bin), (0, 0));

    let b = quantize(0.5, 0.25);
    assert_eq!((b.pd_bin, b.emi_bin), (5, 25));
}

#[test]
fn test_quantize_saturates() {
    let b = quantize(-0.5, 12.0);
    assert_eq!((b.pd_bin, b.emi_bin), (0, 100));

    let b = quantize(f64::NAN, f64::INFINITY);
    assert_eq!((b.pd_bin, b.emi_bin), (0, 100));
}

// ============================================================================
// Action Selection
// ============================================================================

#[test]
fn test_greedy_tie_breaks_low() {
    let mut l = learner(0.0, 0.5, 0.9);
    for _ in 0..10 {
        assert_eq!(l.select_bucket_action(quantize(0.3, 0.4)), 0);
    }
    assert_eq!(l.stats().exploitation_actions, 10);
    assert_eq!(l.stats().exploration_actions, 0);
}

#[test]
fn test_full_exploration() {
    let mut l = learner(1.0, 0.5, 0.9);
    let s = quantize(0.3, 0.4);
    l.update_bucket(s, 1, 100.0, s);

    // Uniform over the menu despite the trained entry: each count within 5σ of n/3
    const DRAWS: usize = 3000;
    let mut counts = [0usize; NUM_ACTIONS];
    for _ in 0..DRAWS {
        let a = l.select_bucket_action(s);
        assert!(a < NUM_ACTIONS);
        counts[a] += 1;
    }
    assert_eq!(l.stats().exploration_actions, DRAWS as u64);

    let p = 1.0 / NUM_ACTIONS as f64;
    let mean = DRAWS as f64 * p;
    let sigma = (DRAWS as f64 * p * (1.0 - p)).sqrt();
    for (action, &count) in counts.iter().enumerate() {
        assert!(
            (count as f64 - mean).abs() < 5.0 * sigma,
            "action {} drawn {} times, expected {:.0} ± {:.0}",
            action,
            count,
            mean,
            5.0 * sigma
        );
    }
}

#[test]
fn test_policy_trait_uses_state_bucket() {
    let mut l = learner(0.0, 1.0, 0.0);
    let s = state(0.25, 0.16);
    let other = state(0.75, 0.16);

    l.observe_transition(&s, 2, 1.0, &other);
    assert_eq!(l.select_action(&s), 2);
    assert_eq!(l.select_action(&other), 0);
}

// ============================================================================
// Backups
// ============================================================================

#[test]
fn test_backup_arithmetic() {
    let mut l = learner(0.0, 0.5, 0.9);
    let s = quantize(0.2, 0.16);
    let next = quantize(0.3, 0.2);

    l.update_bucket(s, 1, 1.0, next);
    assert!((l.q_table().get(s, 1) - 0.5).abs() < 1e-12);

    // Self-loop: target = 1 + 0.9 · 0.5
    l.update_bucket(s, 1, 1.0, s);
    assert!((l.q_table().get(s, 1) - 0.975).abs() < 1e-12);
    assert_eq!(l.stats().num_updates, 2);
}

#[test]
fn test_zero_alpha_learns_nothing() {
    let mut l = learner(0.0, 0.0, 0.9);
    let s = quantize(0.2, 0.16);
    for action in 0..NUM_ACTIONS {
        l.update_bucket(s, action, 50.0, s);
    }

    for action in 0..NUM_ACTIONS {
        assert_eq!(l.q_table().get(s, action), 0.0);
    }
    assert_eq!(l.select_bucket_action(s), 0);
}

#[test]
fn test_unvisited_values_are_zero() {
    let l = learner(0.0, 0.5, 0.9);
    assert_eq!(l.q_table().get(quantize(0.9, 0.9), 2), 0.0);
    assert!(l.q_table().is_empty());
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_table_json_round_trip() {
    let mut l = learner(0.0, 0.5, 0.9);
    l.update_bucket(quantize(0.1, 0.1), 0, 2.0, quantize(0.2, 0.2));
    l.update_bucket(quantize(0.4, 0.6), 2, -1.5, quantize(0.4, 0.6));
    let json = l.export_table().unwrap();

    let mut restored = learner(0.0, 0.5, 0.9);
    restored.import_table(&json).unwrap();
    assert_eq!(restored.q_table(), l.q_table());
    assert_eq!(
        restored.select_bucket_action(quantize(0.4, 0.6)),
        l.select_bucket_action(quantize(0.4, 0.6))
    );
}

#[test]
fn test_import_rejects_garbage() {
    let mut l = learner(0.0, 0.5, 0.9);
    assert!(l.import_table("{not json").is_err());
}

#[test]
fn test_invalid_hyperparameters_rejected() {
    let config = LearnerConfig {
        epsilon: 1.5,
        ..Default::default()
    };
    assert!(TabularPolicyLearner::new(config, 1).is_err());
}
