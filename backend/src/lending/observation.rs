//! Normalized observation vector
//!
//! Every feature is mapped into `[-1, 1]` with
//! `clip(2(x − lo)/(hi − lo) − 1, −1, 1)`.
//!
//! | idx | feature            | lo  | hi                  |
//! |-----|--------------------|-----|---------------------|
//! | 0   | pd_score           | 0   | 1                   |
//! | 1   | outstanding_loan   | 0   | 500 000             |
//! | 2   | interest_rate      | 0   | 0.3                 |
//! | 3   | income             | 0   | 500 000             |
//! | 4   | credit_amount      | 0   | 1 000 000           |
//! | 5   | annuity            | 0   | 50 000              |
//! | 6   | ext_source         | 0   | 1                   |
//! | 7   | duration_months    | 0   | 48                  |
//! | 8   | capital            | 0   | 2 · initial_capital |
//! | 9   | risk_budget        | 0   | 1                   |
//! | 10  | macro_factor       | 0.5 | 1.5                 |

use crate::core::numeric::min_max_normalize;
use crate::lending::balance_sheet::BankBalanceSheet;
use crate::models::customer::CustomerProfile;

pub const OBS_DIM: usize = 11;

pub type Observation = [f64; OBS_DIM];

/// Build the observation for `sheet` and the active `customer`
pub fn encode(
    sheet: &BankBalanceSheet,
    customer: &CustomerProfile,
    initial_capital: f64,
) -> Observation {
    [
        min_max_normalize(sheet.pd_score, 0.0, 1.0),
        min_max_normalize(sheet.outstanding_loan, 0.0, 500_000.0),
        min_max_normalize(sheet.interest_rate, 0.0, 0.3),
        min_max_normalize(customer.income, 0.0, 500_000.0),
        min_max_normalize(customer.credit_amount, 0.0, 1_000_000.0),
        min_max_normalize(customer.annuity, 0.0, 50_000.0),
        min_max_normalize(customer.ext_source, 0.0, 1.0),
        min_max_normalize(customer.duration_months as f64, 0.0, 48.0),
        min_max_normalize(sheet.capital, 0.0, 2.0 * initial_capital),
        min_max_normalize(sheet.risk_budget, 0.0, 1.0),
        min_max_normalize(sheet.macro_factor, 0.5, 1.5),
    ]
}
