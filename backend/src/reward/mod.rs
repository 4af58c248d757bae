//! Reward engine - multi-objective scalarization
//!
//! Collapses five named negotiation objectives into one scalar reward:
//!
//! ```text
//! reward = + w_profit     · bank_profit
//!          + w_survival   · customer_survival
//!          - w_default    · default_probability
//!          - w_compliance · compliance_violation
//!          - w_fairness   · fairness_deviation
//! ```
//!
//! The reward is the exact dot product of the signed weight vector and the
//! component vector. There is no normalization and no clipping; callers are
//! responsible for clamping their inputs.

use serde::{Deserialize, Serialize};

/// Number of reward objectives
pub const NUM_COMPONENTS: usize = 5;

/// Objective names, in vector order
pub const COMPONENT_NAMES: [&str; NUM_COMPONENTS] = [
    "bank_profit",
    "customer_survival",
    "default_probability",
    "compliance_violation",
    "fairness_deviation",
];

/// Weight magnitudes for each objective
///
/// Signs are applied by [`RewardWeights::signed`]: the first two objectives
/// are rewarded, the last three penalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    pub bank_profit: f64,
    pub customer_survival: f64,
    pub default_probability: f64,
    pub compliance_violation: f64,
    pub fairness_deviation: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            bank_profit: 0.25,
            customer_survival: 0.25,
            default_probability: 0.2,
            compliance_violation: 0.15,
            fairness_deviation: 0.15,
        }
    }
}

impl RewardWeights {
    /// Signed weight vector, in [`COMPONENT_NAMES`] order
    pub fn signed(&self) -> [f64; NUM_COMPONENTS] {
        [
            self.bank_profit,
            self.customer_survival,
            -self.default_probability,
            -self.compliance_violation,
            -self.fairness_deviation,
        ]
    }
}

/// Objective values for one transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardComponents {
    pub bank_profit: f64,
    pub customer_survival: f64,
    pub default_probability: f64,
    pub compliance_violation: f64,
    pub fairness_deviation: f64,
}

impl RewardComponents {
    /// Component vector, in [`COMPONENT_NAMES`] order
    pub fn to_array(&self) -> [f64; NUM_COMPONENTS] {
        [
            self.bank_profit,
            self.customer_survival,
            self.default_probability,
            self.compliance_violation,
            self.fairness_deviation,
        ]
    }
}

/// Auditable record of how a reward was formed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    /// Signed weights actually applied
    pub weights: [f64; NUM_COMPONENTS],
    /// Component values
    pub components: [f64; NUM_COMPONENTS],
}

impl RewardBreakdown {
    /// Per-objective contribution `weight_i · component_i`
    pub fn contributions(&self) -> [f64; NUM_COMPONENTS] {
        let mut out = [0.0; NUM_COMPONENTS];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.weights[i] * self.components[i];
        }
        out
    }

    /// Sum of contributions (equals the reward)
    pub fn total(&self) -> f64 {
        self.contributions().iter().sum()
    }
}

/// Scalarize `components` under `weights`
///
/// # Example
///
/// ```rust
/// use credit_negotiation_core::reward::{compute_reward, RewardComponents, RewardWeights};
///
/// let components = RewardComponents {
///     bank_profit: 1.0,
///     customer_survival: 1.0,
///     ..Default::default()
/// };
/// let (reward, breakdown) = compute_reward(&components, &RewardWeights::default());
/// assert_eq!(reward, 0.5);
/// assert_eq!(breakdown.weights[2], -0.2);
/// ```
pub fn compute_reward(
    components: &RewardComponents,
    weights: &RewardWeights,
) -> (f64, RewardBreakdown) {
    let breakdown = RewardBreakdown {
        weights: weights.signed(),
        components: components.to_array(),
    };
    (breakdown.total(), breakdown)
}
