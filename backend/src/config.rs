//! Simulation configuration
//!
//! Every component takes a small config struct with a `Default` matching the
//! reference parameters and a `validate()` that rejects values the dynamics
//! cannot handle. [`SimulationConfig`] bundles them for callers that load a
//! whole run from JSON.
//!
//! # Example
//!
//! ```rust
//! use credit_negotiation_core::SimulationConfig;
//!
//! let config = SimulationConfig::from_json_str(r#"{
//!     "seed": 7,
//!     "negotiation": { "rounds": 5 },
//!     "lending": { "max_months": 24 }
//! }"#).unwrap();
//!
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.negotiation.rounds, 5);
//! assert_eq!(config.lending.max_months, 24);
//! assert_eq!(config.lending.lgd, 0.6);
//! ```

use crate::lending::config::LendingConfig;
use crate::lending::multi_agent::{CustomerAgentConfig, RegulatorConfig};
use crate::models::state::EnvironmentStateUpdate;
use crate::orchestrator::OrchestratorConfig;
use crate::policy::LearnerConfig;
use crate::reward::RewardWeights;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("Failed to read config: {0}")]
    Io(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Require `value ∈ [0, 1]`
    pub(crate) fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
        Self::check_range(field, value, 0.0, 1.0)
    }

    pub(crate) fn check_range(
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), ConfigError> {
        // NaN fails the range test
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            })
        }
    }

    pub(crate) fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
        if value > 0.0 && value.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::NotPositive { field, value })
        }
    }
}

/// Complete run configuration for both simulation loops
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master seed; component seeds are derived from it
    pub seed: u64,

    /// Negotiation protocol (rounds, initial offer)
    pub negotiation: OrchestratorConfig,

    /// Q-learning hyperparameters
    pub learner: LearnerConfig,

    /// Reward weight magnitudes
    pub reward_weights: RewardWeights,

    /// Starting negotiation state
    pub initial_state: EnvironmentStateUpdate,

    /// Lending environment parameters
    pub lending: LendingConfig,

    /// Borrower acceptance model
    pub customer: CustomerAgentConfig,

    /// Regulator constraints
    pub regulator: RegulatorConfig,
}

impl SimulationConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.negotiation.validate()?;
        self.learner.validate()?;
        self.lending.validate()?;
        self.customer.validate()?;
        self.regulator.validate()?;
        Ok(())
    }

    /// Seed for a named component, derived from the master seed
    ///
    /// Distinct streams keep components independent while the whole run
    /// stays reproducible from one number.
    pub fn component_seed(&self, stream: u64) -> u64 {
        self.seed
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(stream.wrapping_mul(0xBF58_476D_1CE4_E5B9))
    }
}

/// Stream identifiers for [`SimulationConfig::component_seed`]
pub mod streams {
    pub const LEARNER: u64 = 1;
    pub const FAIRNESS: u64 = 2;
    pub const LENDING: u64 = 3;
    pub const CUSTOMER: u64 = 4;
}
