//! Offers, counter-offers and the merged contract
//!
//! Offers flow lender → borrower, counter-offers flow borrower → lender, and
//! the orchestrator merges every counter-offer into a running
//! [`ContractTerms`]. Later rounds overwrite earlier values field by field.

use serde::{Deserialize, Serialize};

/// Contract terms proposed by the lender
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanOffer {
    pub interest_rate: f64,
    pub tenure_months: u32,
    pub grace_period: bool,
    pub restructure_pct: f64,
    /// Suggested change in collateral requirement
    pub collateral_change: f64,
}

/// Lender-side economics attached to an offer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferEconomics {
    /// Total interest expected over the tenure
    pub profit_expectation: f64,
    /// Distress probability × exposure
    pub risk_exposure: f64,
    /// Whether the lender meets its capital requirement
    pub capital_constraint_ok: bool,
    pub provisioning_cost: f64,
    /// Rate minus the lender's base rate
    pub dynamic_pricing_shift: f64,
}

/// Output of an offer generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LenderOffer {
    pub offer: LoanOffer,
    pub economics: OfferEconomics,
}

/// Contract terms proposed by the borrower
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CounterOffer {
    pub interest_rate: f64,
    pub tenure_months: u32,
    pub grace_period: bool,
    pub restructure_pct: f64,
}

/// Output of a counter-offer generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CounterOfferProposal {
    pub counter_offer: CounterOffer,
    /// Borrower utility of the counter-offer
    pub utility_score: f64,
}

/// Running contract assembled over a negotiation
///
/// Only the keys that have been set are serialized.
///
/// # Example
///
/// ```rust
/// use credit_negotiation_core::models::{ContractTerms, CounterOffer};
///
/// let counter = CounterOffer {
///     interest_rate: 0.11,
///     tenure_months: 132,
///     grace_period: true,
///     restructure_pct: 0.05,
/// };
///
/// let mut contract = ContractTerms::default();
/// contract.merge(&counter);
/// let once = contract.clone();
/// contract.merge(&counter);
/// assert_eq!(contract, once);
/// assert_eq!(contract.keys().len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractTerms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restructure_pct: Option<f64>,
}

impl ContractTerms {
    /// Contract fully populated from a counter-offer
    pub fn from_counter(counter: &CounterOffer) -> Self {
        let mut terms = Self::default();
        terms.merge(counter);
        terms
    }

    /// Overwrite every field with the counter-offer's value
    pub fn merge(&mut self, counter: &CounterOffer) {
        self.interest_rate = Some(counter.interest_rate);
        self.tenure_months = Some(counter.tenure_months);
        self.grace_period = Some(counter.grace_period);
        self.restructure_pct = Some(counter.restructure_pct);
    }

    /// Names of the fields that are set, in declaration order
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::with_capacity(4);
        if self.interest_rate.is_some() {
            keys.push("interest_rate");
        }
        if self.tenure_months.is_some() {
            keys.push("tenure_months");
        }
        if self.grace_period.is_some() {
            keys.push("grace_period");
        }
        if self.restructure_pct.is_some() {
            keys.push("restructure_pct");
        }
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}

impl From<&LoanOffer> for ContractTerms {
    fn from(offer: &LoanOffer) -> Self {
        Self {
            interest_rate: Some(offer.interest_rate),
            tenure_months: Some(offer.tenure_months),
            grace_period: Some(offer.grace_period),
            restructure_pct: Some(offer.restructure_pct),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(rate: f64) -> CounterOffer {
        CounterOffer {
            interest_rate: rate,
            tenure_months: 132,
            grace_period: true,
            restructure_pct: 0.05,
        }
    }

    #[test]
    fn test_empty_contract_serializes_to_empty_object() {
        let json = serde_json::to_string(&ContractTerms::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_later_merge_overrides() {
        let mut contract = ContractTerms::from_counter(&counter(0.11));
        contract.merge(&counter(0.10));
        assert_eq!(contract.interest_rate, Some(0.10));
        assert_eq!(contract.keys().len(), 4);
    }

    #[test]
    fn test_from_offer_drops_collateral_change() {
        let offer = LoanOffer {
            interest_rate: 0.12,
            tenure_months: 120,
            grace_period: false,
            restructure_pct: 0.0,
            collateral_change: 0.03,
        };
        let terms = ContractTerms::from(&offer);
        let value = serde_json::to_value(&terms).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert!(!object.contains_key("collateral_change"));
    }
}
