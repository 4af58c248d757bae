//! Checkpoint - Save/Restore Lending Episodes
//!
//! A [`LendingSnapshot`] captures everything needed to resume an episode
//! mid-flight: balance sheet, active customer, counters, month log and the
//! raw RNG state.
//!
//! # Invariants
//!
//! - **Determinism**: a restored environment produces the same future as the
//!   environment the snapshot was taken from, for the same actions
//! - **Config Matching**: a snapshot only restores into an environment whose
//!   config and customer pool hash to the same value
//! - **Counter Consistency**: `n_defaults ≤ n_approved ≤ current_step`

use crate::lending::balance_sheet::BankBalanceSheet;
use crate::lending::config::LendingConfig;
use crate::lending::environment::{EpisodeStatus, LendingEnvironment};
use crate::lending::error::LendingError;
use crate::models::customer::CustomerPool;
use crate::models::event::{LendingStepLog, Transcript};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Serializable mid-episode state of a [`LendingEnvironment`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingSnapshot {
    /// SHA-256 of the canonical JSON of config + pool
    pub config_hash: String,
    pub rng_state: u64,
    pub balance_sheet: BankBalanceSheet,
    pub customer_index: usize,
    pub current_step: usize,
    pub n_defaults: usize,
    pub n_approved: usize,
    pub total_profit: f64,
    pub status: EpisodeStatus,
    pub log: Vec<LendingStepLog>,
}

impl LendingSnapshot {
    pub fn to_json(&self) -> Result<String, LendingError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, LendingError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Everything that shapes an episode besides the RNG state
#[derive(Serialize)]
struct HashedInputs<'a> {
    config: &'a LendingConfig,
    pool: &'a CustomerPool,
}

/// SHA-256 over the JSON of `config` and `pool`
///
/// Both are plain structs and vectors, so field order is fixed by their
/// declarations and the JSON is canonical as serialized.
pub fn compute_config_hash(
    config: &LendingConfig,
    pool: &CustomerPool,
) -> Result<String, LendingError> {
    let json = serde_json::to_vec(&HashedInputs { config, pool })?;
    Ok(format!("{:x}", Sha256::digest(&json)))
}

// ============================================================================
// Snapshot / Restore
// ============================================================================

impl LendingEnvironment {
    /// Hash identifying this environment's config and customer pool
    pub fn config_hash(&self) -> Result<String, LendingError> {
        compute_config_hash(&self.config, &self.pool)
    }

    /// Capture the current episode
    pub fn snapshot(&self) -> Result<LendingSnapshot, LendingError> {
        Ok(LendingSnapshot {
            config_hash: self.config_hash()?,
            rng_state: self.rng.get_state(),
            balance_sheet: self.sheet.clone(),
            customer_index: self.customer_index,
            current_step: self.current_step,
            n_defaults: self.n_defaults,
            n_approved: self.n_approved,
            total_profit: self.total_profit,
            status: self.status,
            log: self.log.entries().to_vec(),
        })
    }

    /// Resume from `snapshot`
    ///
    /// Fails with [`LendingError::ConfigMismatch`] when the snapshot was taken
    /// under a different config or pool; the environment is left untouched
    /// on any error.
    pub fn restore(&mut self, snapshot: &LendingSnapshot) -> Result<(), LendingError> {
        let expected = self.config_hash()?;
        if snapshot.config_hash != expected {
            return Err(LendingError::ConfigMismatch {
                expected,
                actual: snapshot.config_hash.clone(),
            });
        }
        validate_snapshot(snapshot, &self.config, self.pool.len())?;

        let mut log = Transcript::new();
        for entry in &snapshot.log {
            log.log(entry.clone());
        }

        self.rng = RngManager::new(snapshot.rng_state);
        self.sheet = snapshot.balance_sheet.clone();
        self.customer_index = snapshot.customer_index;
        self.current_step = snapshot.current_step;
        self.n_defaults = snapshot.n_defaults;
        self.n_approved = snapshot.n_approved;
        self.total_profit = snapshot.total_profit;
        self.status = snapshot.status;
        self.log = log;
        Ok(())
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate_snapshot(
    snapshot: &LendingSnapshot,
    config: &LendingConfig,
    pool_len: usize,
) -> Result<(), LendingError> {
    let invalid = |msg: String| Err(LendingError::InvalidSnapshot(msg));

    if snapshot.customer_index >= pool_len {
        return invalid(format!(
            "customer index {} outside pool of {}",
            snapshot.customer_index, pool_len
        ));
    }
    if snapshot.n_defaults > snapshot.n_approved || snapshot.n_approved > snapshot.current_step {
        return invalid(format!(
            "inconsistent counters: {} defaults, {} approvals, {} steps",
            snapshot.n_defaults, snapshot.n_approved, snapshot.current_step
        ));
    }
    if snapshot.current_step > config.max_months {
        return invalid(format!(
            "step {} beyond horizon {}",
            snapshot.current_step, config.max_months
        ));
    }
    if snapshot.log.len() != snapshot.current_step {
        return invalid(format!(
            "log has {} entries for {} steps",
            snapshot.log.len(),
            snapshot.current_step
        ));
    }
    let sheet = &snapshot.balance_sheet;
    if !(0.0..=1.0).contains(&sheet.risk_budget) {
        return invalid(format!("risk budget {} outside [0, 1]", sheet.risk_budget));
    }
    let finite = [
        sheet.capital,
        sheet.macro_factor,
        sheet.outstanding_loan,
        sheet.interest_rate,
        sheet.pd_score,
        snapshot.total_profit,
    ];
    if finite.iter().any(|v| !v.is_finite()) {
        return invalid("non-finite balance sheet value".to_string());
    }
    Ok(())
}
