//! Negotiation State
//!
//! Running numeric state of one negotiation: borrower default probability,
//! cash-flow forecast, EMI burden, lender exposure, compliance and fairness.
//!
//! # Critical Invariants
//!
//! 1. All fields are finite
//! 2. `default_probability` ∈ [0, 1], `fairness_index` ∈ [0, 1]
//! 3. `compliance_score` ∈ [0, 100]
//! 4. `emi_ratio` ≥ 0, `bank_exposure` ≥ 0
//! 5. `cashflow_forecast` is never empty
//!
//! Setters clamp finite values into range and ignore non-finite values,
//! keeping the last known value.

use crate::core::numeric::clamp_finite;
use serde::{Deserialize, Serialize};

/// Forecast horizon used when no forecast is provided
pub const DEFAULT_FORECAST_MONTHS: usize = 12;

/// Current state of a negotiation environment
///
/// # Example
///
/// ```rust
/// use credit_negotiation_core::EnvironmentState;
///
/// let state = EnvironmentState::default();
/// assert_eq!(state.compliance_score(), 100.0);
/// assert_eq!(state.fairness_index(), 1.0);
/// assert_eq!(state.cashflow_forecast().len(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    default_probability: f64,
    cashflow_forecast: Vec<f64>,
    emi_ratio: f64,
    bank_exposure: f64,
    compliance_score: f64,
    fairness_index: f64,
}

impl Default for EnvironmentState {
    fn default() -> Self {
        Self {
            default_probability: 0.0,
            cashflow_forecast: vec![0.0; DEFAULT_FORECAST_MONTHS],
            emi_ratio: 0.0,
            bank_exposure: 0.0,
            compliance_score: 100.0,
            fairness_index: 1.0,
        }
    }
}

impl EnvironmentState {
    pub fn default_probability(&self) -> f64 {
        self.default_probability
    }

    pub fn cashflow_forecast(&self) -> &[f64] {
        &self.cashflow_forecast
    }

    pub fn emi_ratio(&self) -> f64 {
        self.emi_ratio
    }

    pub fn bank_exposure(&self) -> f64 {
        self.bank_exposure
    }

    pub fn compliance_score(&self) -> f64 {
        self.compliance_score
    }

    pub fn fairness_index(&self) -> f64 {
        self.fairness_index
    }

    pub(crate) fn set_default_probability(&mut self, value: f64) {
        self.default_probability = clamp_finite(value, 0.0, 1.0, self.default_probability);
    }

    pub(crate) fn set_emi_ratio(&mut self, value: f64) {
        self.emi_ratio = clamp_finite(value, 0.0, f64::MAX, self.emi_ratio);
    }

    pub(crate) fn set_bank_exposure(&mut self, value: f64) {
        self.bank_exposure = clamp_finite(value, 0.0, f64::MAX, self.bank_exposure);
    }

    pub(crate) fn set_compliance_score(&mut self, value: f64) {
        self.compliance_score = clamp_finite(value, 0.0, 100.0, self.compliance_score);
    }

    pub(crate) fn set_fairness_index(&mut self, value: f64) {
        self.fairness_index = clamp_finite(value, 0.0, 1.0, self.fairness_index);
    }

    pub(crate) fn set_cashflow_forecast(&mut self, forecast: &[f64]) {
        if forecast.is_empty() || forecast.iter().any(|v| !v.is_finite()) {
            return;
        }
        self.cashflow_forecast = forecast.to_vec();
    }

    /// Overwrite every field that `update` provides
    pub(crate) fn apply(&mut self, update: &EnvironmentStateUpdate) {
        if let Some(v) = update.default_probability {
            self.set_default_probability(v);
        }
        if let Some(forecast) = &update.cashflow_forecast {
            self.set_cashflow_forecast(forecast);
        }
        if let Some(v) = update.emi_ratio {
            self.set_emi_ratio(v);
        }
        if let Some(v) = update.bank_exposure {
            self.set_bank_exposure(v);
        }
        if let Some(v) = update.compliance_score {
            self.set_compliance_score(v);
        }
        if let Some(v) = update.fairness_index {
            self.set_fairness_index(v);
        }
    }
}

/// Partial state used to seed [`crate::NegotiationEnvironment::reset`]
///
/// Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentStateUpdate {
    pub default_probability: Option<f64>,
    pub cashflow_forecast: Option<Vec<f64>>,
    pub emi_ratio: Option<f64>,
    pub bank_exposure: Option<f64>,
    pub compliance_score: Option<f64>,
    pub fairness_index: Option<f64>,
}

/// Externally computed metrics fed into one negotiation step
///
/// Missing (or non-finite) values fall back to the environment's last
/// known value; `customer_survival` falls back to `1 - default_probability`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NegotiationMetrics {
    pub default_probability: Option<f64>,
    pub compliance_score: Option<f64>,
    pub fairness_index: Option<f64>,
    pub customer_survival: Option<f64>,
}
