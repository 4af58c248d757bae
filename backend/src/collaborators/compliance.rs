//! Keyword-based compliance validation

use crate::collaborators::{ComplianceReport, ComplianceValidator};
use crate::models::contract::ContractTerms;

/// Policy rules a contract is checked against
pub const POLICY_RULES: [&str; 5] = [
    "APR disclosure must be clear",
    "Grace period terms must be explicit",
    "Collateral changes require customer consent",
    "Interest rate changes must respect caps",
    "Tenure cannot exceed policy maximum",
];

/// Scores the serialized contract by which disclosures it mentions
///
/// Base score 60, +10 per disclosure present (APR or interest rate, grace,
/// collateral, tenure), −8 over the rate cap, −6 over the tenure cap,
/// clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleBasedComplianceValidator {
    pub rate_cap: f64,
    pub max_tenure: u32,
}

impl Default for RuleBasedComplianceValidator {
    fn default() -> Self {
        Self {
            rate_cap: 0.20,
            max_tenure: 360,
        }
    }
}

impl ComplianceValidator for RuleBasedComplianceValidator {
    fn validate(&self, contract: &ContractTerms) -> ComplianceReport {
        // Struct fields serialize in a fixed order
        let text = serde_json::to_string(contract)
            .unwrap_or_default()
            .to_lowercase();

        let checks = [
            ("apr", text.contains("apr") || text.contains("interest_rate")),
            ("grace", text.contains("grace")),
            ("collateral", text.contains("collateral")),
            ("tenure", text.contains("tenure")),
        ];
        let passed = checks.iter().filter(|(_, ok)| *ok).count();
        let mut score = 60.0 + 10.0 * passed as f64;
        let mut violations: Vec<String> = checks
            .iter()
            .filter(|(_, ok)| !*ok)
            .map(|(name, _)| format!("missing {}", name))
            .collect();

        if contract.interest_rate.is_some_and(|r| r > self.rate_cap) {
            violations.push("interest rate cap exceeded".to_string());
            score -= 8.0;
        }
        if contract.tenure_months.is_some_and(|t| t > self.max_tenure) {
            violations.push("tenure exceeds policy maximum".to_string());
            score -= 6.0;
        }

        let mentions_rate = text.contains("interest_rate");
        let amendments = violations
            .iter()
            .filter_map(|v| amendment_for(v, mentions_rate))
            .map(str::to_string)
            .collect();

        ComplianceReport {
            compliance_score: score.clamp(0.0, 100.0),
            violations,
            amendments,
        }
    }
}

fn amendment_for(violation: &str, mentions_rate: bool) -> Option<&'static str> {
    if violation.to_lowercase().contains("apr") || mentions_rate {
        Some("add APR disclosure clause")
    } else if violation.contains("grace") {
        Some("define grace period conditions")
    } else if violation.contains("collateral") {
        Some("include collateral change consent section")
    } else if violation.contains("tenure") {
        Some("state maximum tenure and policy reference")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(rate: f64, tenure: u32) -> ContractTerms {
        ContractTerms {
            interest_rate: Some(rate),
            tenure_months: Some(tenure),
            grace_period: Some(true),
            restructure_pct: Some(0.05),
        }
    }

    #[test]
    fn test_full_contract_misses_only_collateral() {
        let report = RuleBasedComplianceValidator::default().validate(&contract(0.11, 132));
        assert_eq!(report.compliance_score, 90.0);
        assert_eq!(report.violations, vec!["missing collateral".to_string()]);
        assert_eq!(report.amendments.len(), 1);
    }

    #[test]
    fn test_caps_penalized() {
        let report = RuleBasedComplianceValidator::default().validate(&contract(0.25, 400));
        assert_eq!(report.compliance_score, 90.0 - 8.0 - 6.0);
        assert_eq!(report.violations.len(), 3);
    }

    #[test]
    fn test_empty_contract() {
        let report = RuleBasedComplianceValidator::default().validate(&ContractTerms::default());
        assert_eq!(report.compliance_score, 60.0);
        assert_eq!(report.violations.len(), 4);
        assert_eq!(
            report.amendments,
            vec![
                "add APR disclosure clause",
                "define grace period conditions",
                "include collateral change consent section",
                "state maximum tenure and policy reference",
            ]
        );
    }
}
