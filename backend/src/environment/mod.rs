//! Negotiation environment
//!
//! See `negotiation.rs` for the transition and reward wiring.

pub mod negotiation;

pub use negotiation::{NegotiationEnvironment, StepOutcome};
