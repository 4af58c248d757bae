//! Borrower concession counter-offers

use crate::collaborators::CounterOfferGenerator;
use crate::models::contract::{CounterOffer, CounterOfferProposal, LoanOffer};
use crate::models::state::EnvironmentState;

/// Asks for a lower rate, a longer tenure, a grace period and some
/// restructuring, each within a cap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConcessionCounterOffer {
    pub rate_cut: f64,
    pub tenure_extension: u32,
    pub max_tenure: u32,
    pub restructure_step: f64,
    pub max_restructure: f64,
}

impl Default for ConcessionCounterOffer {
    fn default() -> Self {
        Self {
            rate_cut: 0.01,
            tenure_extension: 12,
            max_tenure: 360,
            restructure_step: 0.05,
            max_restructure: 0.2,
        }
    }
}

impl ConcessionCounterOffer {
    /// `−emi − 0.5·rate·tenure/12 + 2·survival`
    pub fn utility(emi: f64, interest_rate: f64, tenure_months: u32, survival: f64) -> f64 {
        -emi - 0.5 * interest_rate * tenure_months as f64 / 12.0 + 2.0 * survival
    }
}

impl CounterOfferGenerator for ConcessionCounterOffer {
    fn counter_offer(&self, offer: &LoanOffer, state: &EnvironmentState) -> CounterOfferProposal {
        let counter = CounterOffer {
            interest_rate: (offer.interest_rate - self.rate_cut).max(0.0),
            tenure_months: (offer.tenure_months + self.tenure_extension).min(self.max_tenure),
            grace_period: true,
            restructure_pct: (offer.restructure_pct + self.restructure_step).min(self.max_restructure),
        };

        // EMI scales with the rate and inversely with the tenure
        let rate_ratio = counter.interest_rate / offer.interest_rate.max(1e-6);
        let tenure_ratio = offer.tenure_months as f64 / counter.tenure_months.max(1) as f64;
        let new_emi = (state.emi_ratio() * rate_ratio * tenure_ratio).max(0.0);
        let survival = (1.0 - state.default_probability() + 0.05).clamp(0.0, 1.0);

        CounterOfferProposal {
            counter_offer: counter,
            utility_score: Self::utility(
                new_emi,
                counter.interest_rate,
                counter.tenure_months,
                survival,
            ),
        }
    }
}
