//! Trend-and-volatility risk scorer

use crate::collaborators::{RiskAssessment, RiskHeatmap, RiskScorer};

const EPS: f64 = 1e-6;

/// Scores distress from the shape of the cash-flow forecast
///
/// Falling or volatile cash flow raises the 30-day distress probability;
/// sudden jumps (structural breaks) add to the longer horizons.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicRiskScorer;

impl RiskScorer for HeuristicRiskScorer {
    fn assess(&self, cashflow_forecast: &[f64]) -> RiskAssessment {
        let x = pad_forecast(cashflow_forecast);
        let m = mean(&x);
        let slope = ls_slope(&x);
        let vol = std_dev(&x);

        let diffs: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let max_jump = diffs.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
        let brk = max_jump / (std_dev(&diffs) + EPS);

        let p30 = (0.5 - 0.8 * slope / (m + EPS) + 0.3 * vol / (m + EPS)).clamp(0.0, 1.0);
        let p60 = (p30 + 0.1 * brk).clamp(0.0, 1.0);
        let p90 = (p60 + 0.1 * brk).clamp(0.0, 1.0);

        let falling = diffs.iter().filter(|d| **d < 0.0).count() as f64 / diffs.len() as f64;
        let dependency = (-slope / (m.abs() + EPS) + vol / (m.abs() + EPS)).clamp(0.0, 1.0);

        RiskAssessment {
            heatmap: RiskHeatmap {
                distress_30d: p30,
                distress_60d: p60,
                distress_90d: p90,
                slope,
                volatility: vol,
                structural_break: brk,
            },
            early_intervention_score: (1.0 - p30).clamp(0.0, 1.0),
            payment_delay_trend: falling.clamp(0.0, 1.0),
            credit_dependency_growth: dependency,
        }
    }
}

/// Pad to at least three points with the mean (0 for an empty forecast)
fn pad_forecast(forecast: &[f64]) -> Vec<f64> {
    let mut x: Vec<f64> = forecast.iter().copied().filter(|v| v.is_finite()).collect();
    let fill = if x.is_empty() { 0.0 } else { mean(&x) };
    while x.len() < 3 {
        x.push(fill);
    }
    x
}

fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

/// Population standard deviation
fn std_dev(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let m = mean(x);
    (x.iter().map(|v| (v - m).powi(2)).sum::<f64>() / x.len() as f64).sqrt()
}

/// Slope of the least-squares line through `(i, x[i])`
fn ls_slope(x: &[f64]) -> f64 {
    let n = x.len() as f64;
    let t_mean = (n - 1.0) / 2.0;
    let x_mean = mean(x);
    let (mut num, mut den) = (0.0, 0.0);
    for (i, v) in x.iter().enumerate() {
        let dt = i as f64 - t_mean;
        num += dt * (v - x_mean);
        den += dt * dt;
    }
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}
