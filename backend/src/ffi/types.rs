//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, lists)

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::lending::{LendingConfig, LendingError, LendingStep};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a field from a Python dict, falling back to `default` when the
/// key is absent.
///
/// # Errors
/// Returns an error only if type conversion fails
///
/// # Example
/// ```ignore
/// let lgd: f64 = extract_with_default(&py_dict, "lgd", 0.6)?;
/// ```
fn extract_with_default<T>(dict: &Bound<'_, PyDict>, key: &str, default: T) -> PyResult<T>
where
    for<'py> T: pyo3::FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

// ========================================================================
// Config Parsing
// ========================================================================

/// Parse a lending config from a Python dict
///
/// Missing keys take their default; the result is validated before it is
/// returned.
pub fn parse_lending_config(py_config: &Bound<'_, PyDict>) -> PyResult<LendingConfig> {
    const KNOWN: [&str; 8] = [
        "lgd",
        "risk_lambda",
        "max_months",
        "initial_capital",
        "reward_scale",
        "macro_volatility",
        "initial_macro_volatility",
        "pool_size",
    ];
    for key in py_config.keys() {
        let key: String = key.extract()?;
        if !KNOWN.contains(&key.as_str()) {
            return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Unknown lending config field '{}'",
                key
            )));
        }
    }

    let defaults = LendingConfig::default();
    let config = LendingConfig {
        lgd: extract_with_default(py_config, "lgd", defaults.lgd)?,
        risk_lambda: extract_with_default(py_config, "risk_lambda", defaults.risk_lambda)?,
        max_months: extract_with_default(py_config, "max_months", defaults.max_months)?,
        initial_capital: extract_with_default(
            py_config,
            "initial_capital",
            defaults.initial_capital,
        )?,
        reward_scale: extract_with_default(py_config, "reward_scale", defaults.reward_scale)?,
        macro_volatility: extract_with_default(
            py_config,
            "macro_volatility",
            defaults.macro_volatility,
        )?,
        initial_macro_volatility: extract_with_default(
            py_config,
            "initial_macro_volatility",
            defaults.initial_macro_volatility,
        )?,
        pool_size: extract_with_default(py_config, "pool_size", defaults.pool_size)?,
    };

    config.validate().map_err(|e| {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("Invalid config: {}", e))
    })?;
    Ok(config)
}

// ========================================================================
// Result Conversion
// ========================================================================

/// Convert the per-step info block to a Python dict
pub fn step_info_to_py(py: Python, step: &LendingStep) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("defaulted", step.info.defaulted)?;
    dict.set_item("bank_capital", step.info.bank_capital)?;
    dict.set_item("n_defaults", step.info.n_defaults)?;
    dict.set_item("n_approved", step.info.n_approved)?;
    dict.set_item("total_profit", step.info.total_profit)?;
    Ok(dict.into())
}

/// Map a lending error to the matching Python exception
pub fn lending_error_to_py(err: LendingError) -> PyErr {
    match err {
        LendingError::InvalidAction { .. }
        | LendingError::InvalidConfig(_)
        | LendingError::InvalidPool(_)
        | LendingError::InvalidSnapshot(_)
        | LendingError::ConfigMismatch { .. }
        | LendingError::Serialization(_) => {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
        }
        LendingError::EpisodeFinished | LendingError::NotReset => {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(err.to_string())
        }
    }
}
