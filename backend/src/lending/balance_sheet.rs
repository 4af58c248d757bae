//! Lender balance sheet for the active loan

use crate::models::customer::CustomerProfile;
use serde::{Deserialize, Serialize};

/// Bank-side state, mutated once per simulated month
///
/// The per-loan fields (`outstanding_loan`, `interest_rate`, `pd_score`) are
/// reloaded from the customer profile at reset and on rollover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankBalanceSheet {
    pub capital: f64,
    /// Remaining risk appetite, [0, 1]
    pub risk_budget: f64,
    /// Macro-economic multiplier, 1.0 is neutral
    pub macro_factor: f64,
    pub outstanding_loan: f64,
    pub interest_rate: f64,
    pub pd_score: f64,
}

impl BankBalanceSheet {
    /// Fresh sheet for a new episode
    pub fn new(capital: f64, macro_factor: f64, customer: &CustomerProfile) -> Self {
        let mut sheet = Self {
            capital,
            risk_budget: 1.0,
            macro_factor,
            outstanding_loan: 0.0,
            interest_rate: 0.0,
            pd_score: 0.0,
        };
        sheet.load_customer(customer);
        sheet
    }

    /// Replace the per-loan fields with a new customer's terms
    pub fn load_customer(&mut self, customer: &CustomerProfile) {
        self.outstanding_loan = customer.loan_amount;
        self.interest_rate = customer.base_interest_rate;
        self.pd_score = customer.pd_score;
    }

    /// Capital reserved against the current loan (8% risk weight)
    pub fn capital_consumption(&self) -> f64 {
        self.pd_score * self.outstanding_loan * 0.08
    }
}
