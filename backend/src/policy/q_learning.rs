//! Tabular Q-learning over the composite action menu
//!
//! The negotiation state is quantized onto an 11 × 101 grid and the learner
//! keeps a Q-value per (bucket, action index). Action selection is
//! epsilon-greedy; greedy ties resolve to the lowest menu index.
//!
//! # Update rule
//!
//! ```text
//! Q(s,a) ← (1 − α)·Q(s,a) + α·(r + γ·max_i Q(s',i))
//! ```
//!
//! Missing table entries read as 0.0. The learner is meant to live for a
//! whole run: it is not reset between rounds.

use crate::config::ConfigError;
use crate::models::action::NUM_ACTIONS;
use crate::models::state::EnvironmentState;
use crate::policy::NegotiationPolicy;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Number of default-probability bins (edges at 0.1, 0.2, ..., 1.0)
pub const PD_BINS: usize = 11;

/// Number of EMI-ratio bins (edges at 0.01, 0.02, ..., 1.0)
pub const EMI_BINS: usize = 101;

/// Discretized negotiation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateBucket {
    /// `floor(clip(pd · 10, 0, 10))`, in `0..=10`
    pub pd_bin: u8,
    /// `floor(clip(emi · 100, 0, 100))`, in `0..=100`
    pub emi_bin: u8,
}

/// Quantize `(default_probability, emi_ratio)` onto the 11 × 101 grid
///
/// Bin `k` of the PD axis covers `[k/10, (k+1)/10)`; everything at or above
/// 1.0 lands in bin 10. The EMI axis works the same with a step of 0.01 and
/// saturates at bin 100. Negative and NaN inputs land in bin 0.
///
/// ```
/// use credit_negotiation_core::policy::quantize;
///
/// let bucket = quantize(0.25, 0.163);
/// assert_eq!((bucket.pd_bin, bucket.emi_bin), (2, 16));
/// assert_eq!(quantize(3.0, 7.0).emi_bin, 100);
/// ```
pub fn quantize(default_probability: f64, emi_ratio: f64) -> StateBucket {
    StateBucket {
        pd_bin: bin(default_probability, 10.0),
        emi_bin: bin(emi_ratio, 100.0),
    }
}

fn bin(value: f64, scale: f64) -> u8 {
    let scaled = value * scale;
    if scaled.is_nan() {
        return 0;
    }
    // Truncation toward zero after clipping
    scaled.clamp(0.0, scale) as u8
}

/// Quantize an environment state
pub fn quantize_state(state: &EnvironmentState) -> StateBucket {
    quantize(state.default_probability(), state.emi_ratio())
}

/// Learner hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Exploration probability
    pub epsilon: f64,
    /// Learning rate
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.2,
            alpha: 0.5,
            gamma: 0.9,
        }
    }
}

impl LearnerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_unit("learner.epsilon", self.epsilon)?;
        ConfigError::check_unit("learner.alpha", self.alpha)?;
        ConfigError::check_unit("learner.gamma", self.gamma)?;
        Ok(())
    }
}

/// Sparse (bucket, action) → value table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<QEntry>", into = "Vec<QEntry>")]
pub struct QTable {
    values: HashMap<(StateBucket, usize), f64>,
}

/// Serialized form of one Q-table cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QEntry {
    pub bucket: StateBucket,
    pub action: usize,
    pub value: f64,
}

impl From<Vec<QEntry>> for QTable {
    fn from(entries: Vec<QEntry>) -> Self {
        let values = entries
            .into_iter()
            .map(|e| ((e.bucket, e.action), e.value))
            .collect();
        Self { values }
    }
}

impl From<QTable> for Vec<QEntry> {
    fn from(table: QTable) -> Self {
        let mut entries: Vec<QEntry> = table
            .values
            .into_iter()
            .map(|((bucket, action), value)| QEntry {
                bucket,
                action,
                value,
            })
            .collect();
        // Stable output for diffs
        entries.sort_by(|a, b| (a.bucket, a.action).cmp(&(b.bucket, b.action)));
        entries
    }
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `(bucket, action)`, 0.0 when unseen
    pub fn get(&self, bucket: StateBucket, action: usize) -> f64 {
        self.values.get(&(bucket, action)).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, bucket: StateBucket, action: usize, value: f64) {
        self.values.insert((bucket, action), value);
    }

    /// Highest value over the action menu
    pub fn max_value(&self, bucket: StateBucket) -> f64 {
        (0..NUM_ACTIONS)
            .map(|a| self.get(bucket, a))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action; ties resolve to the lowest index
    pub fn argmax(&self, bucket: StateBucket) -> usize {
        let mut best = 0;
        let mut best_value = self.get(bucket, 0);
        for action in 1..NUM_ACTIONS {
            let value = self.get(bucket, action);
            if value > best_value {
                best = action;
                best_value = value;
            }
        }
        best
    }

    /// Number of populated cells
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Distinct buckets with at least one populated cell
    pub fn states_visited(&self) -> usize {
        let mut buckets: Vec<StateBucket> = self.values.keys().map(|(b, _)| *b).collect();
        buckets.sort();
        buckets.dedup();
        buckets.len()
    }
}

/// Counters describing the learner's history
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LearnerStats {
    pub exploration_actions: u64,
    pub exploitation_actions: u64,
    pub num_updates: u64,
    pub total_reward: f64,
}

/// Epsilon-greedy tabular Q-learner
///
/// # Example
///
/// ```rust
/// use credit_negotiation_core::policy::{quantize, LearnerConfig, TabularPolicyLearner};
///
/// let config = LearnerConfig { epsilon: 0.0, ..Default::default() };
/// let mut learner = TabularPolicyLearner::new(config, 42).unwrap();
///
/// let s = quantize(0.2, 0.16);
/// assert_eq!(learner.select_bucket_action(s), 0); // all zeros → lowest index
///
/// learner.update_bucket(s, 2, 1.0, s);
/// assert_eq!(learner.select_bucket_action(s), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TabularPolicyLearner {
    config: LearnerConfig,
    q_table: QTable,
    rng: RngManager,
    stats: LearnerStats,
}

impl TabularPolicyLearner {
    /// Create a learner with an empty table and its own seeded RNG
    pub fn new(config: LearnerConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            q_table: QTable::new(),
            rng: RngManager::new(seed),
            stats: LearnerStats::default(),
        })
    }

    /// Resume from a previously exported table
    pub fn with_table(config: LearnerConfig, seed: u64, q_table: QTable) -> Result<Self, ConfigError> {
        let mut learner = Self::new(config, seed)?;
        learner.q_table = q_table;
        Ok(learner)
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn stats(&self) -> &LearnerStats {
        &self.stats
    }

    /// Epsilon-greedy choice for a bucket
    pub fn select_bucket_action(&mut self, bucket: StateBucket) -> usize {
        if self.rng.next_f64() < self.config.epsilon {
            let action = self.rng.index(NUM_ACTIONS);
            self.stats.exploration_actions += 1;
            debug!(?bucket, action, "explore");
            action
        } else {
            let action = self.q_table.argmax(bucket);
            self.stats.exploitation_actions += 1;
            debug!(?bucket, action, "exploit");
            action
        }
    }

    /// Apply one Q-learning backup for the transition `(s, a, r, s')`
    pub fn update_bucket(&mut self, state: StateBucket, action: usize, reward: f64, next: StateBucket) {
        let LearnerConfig { alpha, gamma, .. } = self.config;
        let target = reward + gamma * self.q_table.max_value(next);
        let current = self.q_table.get(state, action);
        self.q_table
            .set(state, action, (1.0 - alpha) * current + alpha * target);

        self.stats.num_updates += 1;
        self.stats.total_reward += reward;
    }

    /// Serialize the Q-table as JSON
    pub fn export_table(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.q_table)
    }

    /// Replace the Q-table from JSON produced by [`Self::export_table`]
    pub fn import_table(&mut self, json: &str) -> Result<(), serde_json::Error> {
        self.q_table = serde_json::from_str(json)?;
        Ok(())
    }
}

impl NegotiationPolicy for TabularPolicyLearner {
    fn select_action(&mut self, state: &EnvironmentState) -> usize {
        self.select_bucket_action(quantize_state(state))
    }

    fn observe_transition(
        &mut self,
        state: &EnvironmentState,
        action: usize,
        reward: f64,
        next_state: &EnvironmentState,
    ) {
        self.update_bucket(quantize_state(state), action, reward, quantize_state(next_state));
    }
}
