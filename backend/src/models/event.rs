//! Transcripts for replay and auditing.
//!
//! Every environment keeps an append-only record of its transitions:
//! - **NegotiationRound**: one `NegotiationEnvironment::step`
//! - **RoundRecord**: one orchestrated negotiation round (offers included)
//! - **LendingStepLog**: one simulated month of the lending environment
//!
//! Entries are never mutated once written; owners expose them read-only.
//!
//! # Example
//!
//! ```rust
//! use credit_negotiation_core::models::{LendingStepLog, Transcript};
//!
//! let log: Transcript<LendingStepLog> = Transcript::new();
//! assert!(log.is_empty());
//! ```

use crate::models::action::CompositeAction;
use crate::models::contract::{CounterOffer, LoanOffer};
use crate::reward::RewardBreakdown;
use serde::{Deserialize, Serialize};

/// One negotiation-environment transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationRound {
    /// Zero-based index within the current episode
    pub round_index: usize,
    pub action: CompositeAction,
    pub reward: f64,
    pub reward_breakdown: RewardBreakdown,
}

/// One orchestrated round, as reported to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// One-based round number
    pub round: usize,
    pub reward: f64,
    pub bank_offer: LoanOffer,
    pub customer_counter: CounterOffer,
    /// Index into the action menu chosen this round
    pub action_index: usize,
    /// Compliance score of the merged contract after this round
    pub compliance_score: f64,
}

/// One simulated month of the lending environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingStepLog {
    /// One-based month number
    pub step: usize,
    pub approved: bool,
    pub interest_rate: f64,
    pub outstanding_loan: f64,
    pub pd_score: f64,
    pub reward: f64,
    pub capital: f64,
    pub macro_factor: f64,
    pub defaulted: bool,
}

/// Append-only ordered log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript<T> {
    entries: Vec<T>,
}

impl<T> Default for Transcript<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Transcript<T> {
    /// Create a new empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub(crate) fn log(&mut self, entry: T) {
        self.entries.push(entry);
    }

    /// Drop all entries (episode reset)
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn last(&self) -> Option<&T> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }
}

impl Transcript<LendingStepLog> {
    /// Steps on which a default event fired
    pub fn defaults(&self) -> Vec<&LendingStepLog> {
        self.entries.iter().filter(|e| e.defaulted).collect()
    }

    /// Sum of rewards over the episode so far
    pub fn total_reward(&self) -> f64 {
        self.entries.iter().map(|e| e.reward).sum()
    }
}
