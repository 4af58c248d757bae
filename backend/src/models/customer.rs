//! Borrower profiles for the lending environment
//!
//! A [`CustomerPool`] is either supplied by the caller (e.g. from scored
//! historical data) or generated synthetically from the seeded RNG.
//! Profiles are immutable once sampled for an episode.

use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors building a customer pool
#[derive(Debug, Error, PartialEq)]
pub enum CustomerPoolError {
    #[error("Customer pool must not be empty")]
    Empty,

    #[error("Customer {index} has invalid field '{field}': {value}")]
    InvalidProfile {
        index: usize,
        field: &'static str,
        value: f64,
    },
}

/// One borrower as seen by the lender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    /// Probability of default, [0, 1]
    pub pd_score: f64,
    /// Annual income
    pub income: f64,
    /// Total credit outstanding with other lenders
    pub credit_amount: f64,
    /// Annual repayment on existing credit
    pub annuity: f64,
    /// External credit-bureau score, [0, 1]
    pub ext_source: f64,
    /// Requested principal
    pub loan_amount: f64,
    /// Rate the customer is priced at before any adjustment
    pub base_interest_rate: f64,
    /// Requested term
    pub duration_months: u32,
}

impl CustomerProfile {
    /// Draw one synthetic profile
    ///
    /// PD ~ Beta(2, 10), income ~ LogN(11, 0.8), credit ~ LogN(12, 0.5),
    /// annuity ~ LogN(9, 0.5), ext_source ~ Beta(5, 3), loan ~ LogN(11.5, 0.6),
    /// base rate ~ U(0.05, 0.15), duration ~ U{12..47}.
    pub fn synthetic(rng: &mut RngManager) -> Self {
        Self {
            pd_score: rng.beta(2.0, 10.0),
            income: rng.lognormal(11.0, 0.8),
            credit_amount: rng.lognormal(12.0, 0.5),
            annuity: rng.lognormal(9.0, 0.5),
            ext_source: rng.beta(5.0, 3.0),
            loan_amount: rng.lognormal(11.5, 0.6),
            base_interest_rate: rng.uniform(0.05, 0.15),
            duration_months: rng.range(12, 48) as u32,
        }
    }

    fn validate(&self, index: usize) -> Result<(), CustomerPoolError> {
        let checks: [(&'static str, f64, bool); 7] = [
            ("pd_score", self.pd_score, (0.0..=1.0).contains(&self.pd_score)),
            ("income", self.income, self.income.is_finite()),
            ("credit_amount", self.credit_amount, self.credit_amount.is_finite()),
            ("annuity", self.annuity, self.annuity.is_finite()),
            ("ext_source", self.ext_source, (0.0..=1.0).contains(&self.ext_source)),
            (
                "loan_amount",
                self.loan_amount,
                self.loan_amount.is_finite() && self.loan_amount >= 0.0,
            ),
            (
                "base_interest_rate",
                self.base_interest_rate,
                self.base_interest_rate.is_finite(),
            ),
        ];

        for (field, value, ok) in checks {
            if !ok {
                return Err(CustomerPoolError::InvalidProfile {
                    index,
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Non-empty pool of borrower profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPool {
    customers: Vec<CustomerProfile>,
}

impl CustomerPool {
    /// Wrap caller-supplied profiles, validating each one
    pub fn new(customers: Vec<CustomerProfile>) -> Result<Self, CustomerPoolError> {
        if customers.is_empty() {
            return Err(CustomerPoolError::Empty);
        }
        for (index, customer) in customers.iter().enumerate() {
            customer.validate(index)?;
        }
        Ok(Self { customers })
    }

    /// Generate `size` synthetic profiles (at least one)
    pub fn synthetic(size: usize, rng: &mut RngManager) -> Self {
        let customers = (0..size.max(1))
            .map(|_| CustomerProfile::synthetic(rng))
            .collect();
        Self { customers }
    }

    /// Index of a uniformly drawn profile
    pub fn sample_index(&self, rng: &mut RngManager) -> usize {
        rng.index(self.customers.len())
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn customers(&self) -> &[CustomerProfile] {
        &self.customers
    }
}
