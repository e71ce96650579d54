//! Risk assessor: findings → [`RiskLevel`].
//!
//! Policy is false-positive averse. Operators alone never reach `High`
//! because legitimate pipelines (`echo hi | grep x`, `pwd && date`) are
//! everywhere; only an invoked dangerous command or a substitution does.

use crate::types::{Finding, FindingCategory, RiskLevel};

/// Severity of a single finding.
///
/// | finding                          | level  |
/// |----------------------------------|--------|
/// | `;` `&&` `\|\|` `\|`             | Low    |
/// | background `&`, newline          | Medium |
/// | invoked dangerous token          | High   |
/// | substitution                     | High   |
pub fn severity(finding: &Finding) -> RiskLevel {
    match finding.category {
        FindingCategory::Substitution | FindingCategory::DangerousToken => RiskLevel::High,
        FindingCategory::Piping => RiskLevel::Low,
        FindingCategory::Chaining => match finding.matched_pattern.as_str() {
            "&" | "newline" => RiskLevel::Medium,
            _ => RiskLevel::Low,
        },
    }
}

/// Field risk: the highest severity among its findings, `None` if there are none.
pub fn assess(findings: &[Finding]) -> RiskLevel {
    findings
        .iter()
        .map(severity)
        .max()
        .unwrap_or(RiskLevel::None)
}
