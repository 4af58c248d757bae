//! Domain models for the negotiation and lending simulators

pub mod action;
pub mod contract;
pub mod customer;
pub mod event;
pub mod state;

// Re-exports
pub use action::{CompositeAction, ACTION_MENU, NUM_ACTIONS};
pub use contract::{
    ContractTerms, CounterOffer, CounterOfferProposal, LenderOffer, LoanOffer, OfferEconomics,
};
pub use customer::{CustomerPool, CustomerPoolError, CustomerProfile};
pub use event::{LendingStepLog, NegotiationRound, RoundRecord, Transcript};
pub use state::{EnvironmentState, EnvironmentStateUpdate, NegotiationMetrics};
