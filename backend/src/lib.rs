//! Credit Negotiation Core - Rust Engine
//!
//! Deterministic simulation of loan negotiation between a lender and a
//! borrower under regulatory and fairness constraints.
//!
//! # Architecture
//!
//! - **models**: Domain types (state, actions, offers, customers, transcripts)
//! - **reward**: Multi-objective reward scalarization
//! - **environment**: Round-by-round negotiation environment
//! - **policy**: Tabular Q-learning and baseline lending strategies
//! - **collaborators**: Risk, pricing, counter-offer, compliance and fairness contracts
//! - **orchestrator**: Fixed-length negotiation protocol
//! - **lending**: Month-by-month loan lifecycle with customer and regulator agents
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded RNG threaded through every draw)
//! 2. Numeric edge cases inside the dynamics are clamped, never raised
//! 3. Transcripts are append-only and read-only outside their owner
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod collaborators;
pub mod config;
pub mod core;
pub mod environment;
pub mod lending;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod reward;
pub mod rng;

// Re-exports for convenience
pub use config::{ConfigError, SimulationConfig};
pub use environment::{NegotiationEnvironment, StepOutcome};
pub use lending::{LendingAction, LendingConfig, LendingEnvironment, LendingError, LendingStep};
pub use models::{
    action::{CompositeAction, ACTION_MENU},
    contract::ContractTerms,
    state::{EnvironmentState, EnvironmentStateUpdate, NegotiationMetrics},
};
pub use orchestrator::{
    NegotiationError, NegotiationOrchestrator, NegotiationOutcome, NegotiationSummary,
    OrchestratorConfig,
};
pub use policy::{NegotiationPolicy, TabularPolicyLearner};
pub use reward::{compute_reward, RewardBreakdown, RewardWeights};
pub use rng::RngManager;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn credit_negotiation_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::lending::PyLendingEnv>()?;
    Ok(())
}
