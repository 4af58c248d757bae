//! Orchestrator - multi-round negotiation protocol
//!
//! Drives a [`crate::NegotiationEnvironment`] and a learning policy through a
//! fixed number of rounds, consulting the collaborators each round.
//!
//! See `engine.rs` for the round loop.

pub mod engine;

// Re-export main types for convenience
pub use engine::{
    NegotiationError, NegotiationOrchestrator, NegotiationOutcome, NegotiationSummary,
    OrchestratorConfig, SIGMOID_EMI_CENTER, SIGMOID_STEEPNESS,
};
