//! Decision policies
//!
//! Two seams, one per simulation loop:
//!
//! - [`NegotiationPolicy`]: picks an index into the composite action menu
//!   each negotiation round and learns from the realized transition.
//!   [`TabularPolicyLearner`] is the epsilon-greedy Q-learning implementation.
//! - [`LendingStrategy`]: maps a lending observation to a continuous
//!   3-vector action. Baselines live in `lending.rs`.
//!
//! # Policy Interface
//!
//! ```rust
//! use credit_negotiation_core::policy::NegotiationPolicy;
//! use credit_negotiation_core::EnvironmentState;
//!
//! /// Always concede
//! struct Concede;
//!
//! impl NegotiationPolicy for Concede {
//!     fn select_action(&mut self, _state: &EnvironmentState) -> usize {
//!         0
//!     }
//!
//!     fn observe_transition(
//!         &mut self,
//!         _state: &EnvironmentState,
//!         _action: usize,
//!         _reward: f64,
//!         _next_state: &EnvironmentState,
//!     ) {
//!     }
//! }
//! ```

use crate::models::state::EnvironmentState;

pub mod lending;
pub mod q_learning;

pub use lending::{LendingStrategy, PdThresholdStrategy, RuleBasedStrategy};
pub use q_learning::{
    quantize, quantize_state, LearnerConfig, LearnerStats, QEntry, QTable, StateBucket,
    TabularPolicyLearner, EMI_BINS, PD_BINS,
};

/// Round-by-round negotiation policy
pub trait NegotiationPolicy {
    /// Choose an index into [`crate::models::ACTION_MENU`]
    fn select_action(&mut self, state: &EnvironmentState) -> usize;

    /// Learn from the transition `(state, action, reward, next_state)`
    fn observe_transition(
        &mut self,
        state: &EnvironmentState,
        action: usize,
        reward: f64,
        next_state: &EnvironmentState,
    );
}
