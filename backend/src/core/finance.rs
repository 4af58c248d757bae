//! Loan arithmetic.

/// Level monthly installment for `principal` at `annual_rate` over `months`.
///
/// Zero months yields 0, a zero rate yields straight-line repayment.
///
/// ```
/// use credit_negotiation_core::core::emi;
///
/// assert_eq!(emi(12_000.0, 0.0, 12), 1_000.0);
/// assert_eq!(emi(12_000.0, 0.1, 0), 0.0);
/// ```
pub fn emi(principal: f64, annual_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return 0.0;
    }
    let r = annual_rate / 12.0;
    let n = months as f64;
    if r == 0.0 {
        return principal / n;
    }
    let f = (1.0 + r).powf(n);
    principal * r * f / (f - 1.0)
}

/// Effective annual rate for a nominal rate compounded `compounding_per_year` times.
pub fn apr(nominal_rate: f64, compounding_per_year: u32) -> f64 {
    let m = compounding_per_year.max(1) as f64;
    (1.0 + nominal_rate / m).powf(m) - 1.0
}

/// Net present value; the first cash flow is undiscounted.
pub fn npv(cashflows: &[f64], discount_rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(i, cf)| cf / (1.0 + discount_rate).powi(i as i32))
        .sum()
}

/// Internal rate of return by bisection on `[-0.99, 10]`.
pub fn irr(cashflows: &[f64]) -> f64 {
    const MAX_ITER: usize = 32;
    const TOL: f64 = 1e-6;

    let (mut lo, mut hi) = (-0.99, 10.0);
    for _ in 0..MAX_ITER {
        let mid = (lo + hi) / 2.0;
        let val = npv(cashflows, mid);
        if val.abs() < TOL {
            return mid;
        }
        if val > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}
