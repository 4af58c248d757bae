//! Two-group parity fairness assessment

use crate::collaborators::{FairnessAssessor, FairnessReport};
use crate::rng::RngManager;

/// Compares pricing and default outcomes of two synthetic groups
///
/// Group A is priced at up to 2% below the rate and group B up to 2% above,
/// with a ±5% jitter on the default probability. The index averages pricing
/// equality and outcome parity; below 0.8 the assessment flags bias.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupParityFairnessAssessor;

/// Index below which bias is flagged
pub const BIAS_THRESHOLD: f64 = 0.8;

impl FairnessAssessor for GroupParityFairnessAssessor {
    fn assess(&self, rate: f64, default_probability: f64, rng: &mut RngManager) -> FairnessReport {
        let rate_a = rate * (0.98 + 0.02 * rng.next_f64());
        let rate_b = rate * (1.02 - 0.02 * rng.next_f64());
        let pd_a = default_probability * (0.95 + 0.1 * rng.next_f64());
        let pd_b = default_probability * (1.05 - 0.1 * rng.next_f64());

        let parity_gap = (rate_a - rate_b).abs() / rate.max(1e-6);
        let disparity = (pd_a - pd_b).abs();
        let index = (0.5 * (1.0 - parity_gap) + 0.5 * (1.0 - disparity)).clamp(0.0, 1.0);

        FairnessReport {
            fairness_index: index,
            fairness_score: index * 100.0,
            bias_flag: index < BIAS_THRESHOLD,
            demographic_parity_gap: parity_gap,
            outcome_disparity: disparity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_near_one_for_small_pd() {
        let mut rng = RngManager::new(5);
        for _ in 0..100 {
            let report = GroupParityFairnessAssessor.assess(0.11, 0.05, &mut rng);
            // gap ≤ 0.04, disparity ≤ 0.01
            assert!(report.fairness_index >= 0.97);
            assert!(!report.bias_flag);
            assert!((report.fairness_score - 100.0 * report.fairness_index).abs() < 1e-9);
        }
    }

    #[test]
    fn test_deterministic_under_seed() {
        let a = GroupParityFairnessAssessor.assess(0.1, 0.3, &mut RngManager::new(11));
        let b = GroupParityFairnessAssessor.assess(0.1, 0.3, &mut RngManager::new(11));
        assert_eq!(a, b);
    }
}
