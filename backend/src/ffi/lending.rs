//! Python wrapper for the lending environment

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{lending_error_to_py, parse_lending_config, step_info_to_py};
use crate::lending::{LendingConfig, LendingEnvironment, LendingSnapshot};

/// Python-facing lending environment
///
/// Observations are returned as 11-element lists of floats; actions are
/// 3-element sequences `[rate_delta, loan_multiplier, approve_signal]`.
#[pyclass(name = "LendingEnv")]
pub struct PyLendingEnv {
    inner: LendingEnvironment,
}

#[pymethods]
impl PyLendingEnv {
    /// Create an environment
    ///
    /// # Arguments
    /// * `config` - Optional dict of lending parameters (missing keys use defaults)
    /// * `seed` - RNG seed for the synthetic pool and episode randomness
    #[new]
    #[pyo3(signature = (config=None, seed=42))]
    fn new(config: Option<&Bound<'_, PyDict>>, seed: u64) -> PyResult<Self> {
        let config = match config {
            Some(dict) => parse_lending_config(dict)?,
            None => LendingConfig::default(),
        };
        let inner = LendingEnvironment::new(config, seed).map_err(lending_error_to_py)?;
        Ok(PyLendingEnv { inner })
    }

    /// Start a new episode, optionally reseeding first
    #[pyo3(signature = (seed=None))]
    fn reset(&mut self, seed: Option<u64>) -> Vec<f64> {
        self.inner.reset(seed).to_vec()
    }

    /// Advance one month
    ///
    /// # Returns
    /// Tuple `(observation, reward, terminated, truncated, info)`
    fn step(
        &mut self,
        py: Python,
        action: Vec<f64>,
    ) -> PyResult<(Vec<f64>, f64, bool, bool, Py<PyDict>)> {
        let step = self.inner.step_slice(&action).map_err(lending_error_to_py)?;
        let info = step_info_to_py(py, &step)?;
        Ok((
            step.observation.to_vec(),
            step.reward,
            step.terminated,
            step.truncated,
            info,
        ))
    }

    /// Current observation without advancing
    fn observe(&self) -> Vec<f64> {
        self.inner.observe().to_vec()
    }

    /// Capture the episode as a JSON string
    fn snapshot(&self) -> PyResult<String> {
        self.inner
            .snapshot()
            .and_then(|snapshot| snapshot.to_json())
            .map_err(lending_error_to_py)
    }

    /// Resume from a JSON snapshot produced by `snapshot()`
    fn restore(&mut self, json: &str) -> PyResult<()> {
        let snapshot = LendingSnapshot::from_json(json).map_err(lending_error_to_py)?;
        self.inner.restore(&snapshot).map_err(lending_error_to_py)
    }

    #[getter]
    fn current_step(&self) -> usize {
        self.inner.current_step()
    }

    #[getter]
    fn bank_capital(&self) -> f64 {
        self.inner.balance_sheet().capital
    }
}
