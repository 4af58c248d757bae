//! Lending environment parameters

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Parameters of the month-by-month loan simulator
///
/// Defaults reproduce the reference economics: 60% loss given default,
/// a 36-month horizon and one million of starting capital.
///
/// # Example
///
/// ```rust
/// use credit_negotiation_core::lending::LendingConfig;
///
/// let config: LendingConfig = serde_json::from_str(r#"{"max_months": 12}"#).unwrap();
/// assert_eq!(config.max_months, 12);
/// assert_eq!(config.reward_scale, 10_000.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LendingConfig {
    /// Loss given default, fraction of exposure lost on a default
    pub lgd: f64,

    /// Weight of the capital-consumption penalty in the reward
    pub risk_lambda: f64,

    /// Episode horizon in months
    pub max_months: usize,

    pub initial_capital: f64,

    /// Divisor applied to the raw monetary reward
    pub reward_scale: f64,

    /// Std-dev of the monthly macro-factor random walk
    pub macro_volatility: f64,

    /// Std-dev of the macro factor drawn at reset (around 1.0)
    pub initial_macro_volatility: f64,

    /// Number of synthetic customers when no pool is supplied
    pub pool_size: usize,
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            lgd: 0.6,
            risk_lambda: 0.1,
            max_months: 36,
            initial_capital: 1_000_000.0,
            reward_scale: 10_000.0,
            macro_volatility: 0.02,
            initial_macro_volatility: 0.05,
            pool_size: 1000,
        }
    }
}

impl LendingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_unit("lending.lgd", self.lgd)?;
        ConfigError::check_range("lending.risk_lambda", self.risk_lambda, 0.0, f64::MAX)?;
        ConfigError::check_positive("lending.max_months", self.max_months as f64)?;
        ConfigError::check_positive("lending.initial_capital", self.initial_capital)?;
        ConfigError::check_positive("lending.reward_scale", self.reward_scale)?;
        ConfigError::check_range("lending.macro_volatility", self.macro_volatility, 0.0, 1.0)?;
        ConfigError::check_range(
            "lending.initial_macro_volatility",
            self.initial_macro_volatility,
            0.0,
            1.0,
        )?;
        ConfigError::check_positive("lending.pool_size", self.pool_size as f64)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LendingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let config = LendingConfig {
            max_months: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "lending.max_months",
                ..
            })
        ));
    }

    #[test]
    fn test_lgd_out_of_range_rejected() {
        let config = LendingConfig {
            lgd: 1.2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<LendingConfig, _> = serde_json::from_str(r#"{"lgd_pct": 60}"#);
        assert!(result.is_err());
    }
}
