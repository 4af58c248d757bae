//! Risk-priced lender offers

use crate::collaborators::{OfferGenerator, RiskHeatmap};
use crate::models::contract::{LenderOffer, LoanOffer, OfferEconomics};

/// Prices a base rate plus a premium proportional to 60-day distress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskPricedOfferGenerator {
    pub base_rate: f64,
    pub capital_ratio: f64,
    /// Distress level at which collateral requirements stop loosening
    pub default_threshold: f64,
}

impl Default for RiskPricedOfferGenerator {
    fn default() -> Self {
        Self {
            base_rate: 0.12,
            capital_ratio: 0.12,
            default_threshold: 0.3,
        }
    }
}

const RATE_FLOOR: f64 = 0.05;
const RATE_CAP: f64 = 0.20;
const TENURE_MONTHS: u32 = 120;
const CAPITAL_REQUIREMENT: f64 = 0.12;
const PROVISIONING_LGD: f64 = 0.4;

impl OfferGenerator for RiskPricedOfferGenerator {
    fn offer(&self, heatmap: &RiskHeatmap, exposure: f64, _collateral_value: f64) -> LenderOffer {
        let p = heatmap.distress_60d;
        let premium = (p * 0.05).clamp(0.0, 0.05);
        let rate = (self.base_rate + premium).clamp(RATE_FLOOR, RATE_CAP);
        let collateral_change = ((self.default_threshold - p) * 0.1).clamp(-0.1, 0.1);

        LenderOffer {
            offer: LoanOffer {
                interest_rate: rate,
                tenure_months: TENURE_MONTHS,
                grace_period: false,
                restructure_pct: 0.0,
                collateral_change,
            },
            economics: OfferEconomics {
                profit_expectation: rate * exposure * TENURE_MONTHS as f64 / 12.0,
                risk_exposure: p * exposure,
                capital_constraint_ok: self.capital_ratio >= CAPITAL_REQUIREMENT,
                provisioning_cost: p * exposure * PROVISIONING_LGD * 0.1,
                dynamic_pricing_shift: rate - self.base_rate,
            },
        }
    }
}
