//! Case and spec verification reports.
//!
//! Both are read-only once built; `to_lines` and `to_value` are projections.

use crate::checks::OutputVerificationReport;
use crate::verify::cases::EquivalenceCase;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseVerificationReport {
    pub case: EquivalenceCase,
    pub canonical_output_report: OutputVerificationReport,
    pub candidate_output_report: OutputVerificationReport,
    pub exact_output_match: bool,
    pub passed: bool,
    pub failure_reasons: Vec<String>,
}

impl CaseVerificationReport {
    pub fn new(
        case: EquivalenceCase,
        canonical_output_report: OutputVerificationReport,
        candidate_output_report: OutputVerificationReport,
        exact_output_match: bool,
    ) -> Self {
        let passed =
            canonical_output_report.passed && candidate_output_report.passed && exact_output_match;
        let failure_reasons = failure_reasons(
            &canonical_output_report,
            &candidate_output_report,
            exact_output_match,
        );
        Self {
            case,
            canonical_output_report,
            candidate_output_report,
            exact_output_match,
            passed,
            failure_reasons,
        }
    }

    pub fn to_lines(&self) -> Vec<String> {
        let status = if self.passed { "PASS" } else { "FAIL" };
        let mut lines = vec![
            format!(
                "[{}] case '{}' seed={} count={}",
                status,
                self.case.name(),
                self.case.seed(),
                self.case.count()
            ),
            format!("  exact_output_match: {}", self.exact_output_match),
            "  canonical:".to_string(),
        ];
        lines.extend(
            self.canonical_output_report
                .to_lines()
                .into_iter()
                .map(|l| format!("    {}", l)),
        );
        lines.push("  candidate:".to_string());
        lines.extend(
            self.candidate_output_report
                .to_lines()
                .into_iter()
                .map(|l| format!("    {}", l)),
        );
        if !self.failure_reasons.is_empty() {
            lines.push("  failure_reasons:".to_string());
            lines.extend(self.failure_reasons.iter().map(|r| format!("    - {}", r)));
        }
        lines
    }

    pub fn to_markdown(&self) -> String {
        self.to_lines().join("\n")
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

fn failure_reasons(
    canonical: &OutputVerificationReport,
    candidate: &OutputVerificationReport,
    exact_output_match: bool,
) -> Vec<String> {
    let describe = |side: &str, report: &OutputVerificationReport| -> Vec<String> {
        report
            .failed_results()
            .map(|r| {
                format!(
                    "{}.{}: {}",
                    side,
                    r.name,
                    r.message.as_deref().unwrap_or("failed")
                )
            })
            .collect()
    };

    let mut reasons = describe("canonical", canonical);
    reasons.extend(describe("candidate", candidate));
    if !exact_output_match {
        reasons.push("exact_output_match: canonical and candidate outputs differ".to_string());
    }
    reasons
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecVerificationReport {
    pub family: String,
    pub passed: bool,
    pub case_reports: Vec<CaseVerificationReport>,
}

impl SpecVerificationReport {
    /// Passes iff every case passed.
    pub fn new(family: impl Into<String>, case_reports: Vec<CaseVerificationReport>) -> Self {
        let passed = case_reports.iter().all(|c| c.passed);
        Self {
            family: family.into(),
            passed,
            case_reports,
        }
    }

    pub fn failed_cases(&self) -> impl Iterator<Item = &CaseVerificationReport> {
        self.case_reports.iter().filter(|c| !c.passed)
    }

    pub fn to_lines(&self) -> Vec<String> {
        let status = if self.passed { "PASS" } else { "FAIL" };
        let mut lines = vec![format!(
            "[{}] verification report for family '{}'",
            status, self.family
        )];
        for case_report in &self.case_reports {
            lines.extend(case_report.to_lines().into_iter().map(|l| format!("  {}", l)));
        }
        lines
    }

    pub fn to_markdown(&self) -> String {
        self.to_lines().join("\n")
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CheckResult;
    use pretty_assertions::assert_eq;

    fn passing(family: &str) -> OutputVerificationReport {
        OutputVerificationReport::new(family, vec![CheckResult::pass("length")])
    }

    fn case() -> EquivalenceCase {
        EquivalenceCase::new("seed_1_count_5", 1, 5).unwrap()
    }

    #[test]
    fn failure_reasons_are_prefixed_per_side() {
        let canonical = OutputVerificationReport::new(
            "uniform",
            vec![
                CheckResult::pass("length"),
                CheckResult::fail("in_range", "value 50.0 is outside allowed range [0.0, 50.0)"),
            ],
        );
        let candidate = OutputVerificationReport::new(
            "uniform",
            vec![CheckResult {
                name: "finite_values".to_string(),
                passed: false,
                message: None,
            }],
        );
        let report = CaseVerificationReport::new(case(), canonical, candidate, false);
        assert!(!report.passed);
        assert_eq!(
            report.failure_reasons,
            vec![
                "canonical.in_range: value 50.0 is outside allowed range [0.0, 50.0)",
                "candidate.finite_values: failed",
                "exact_output_match: canonical and candidate outputs differ",
            ]
        );
    }

    #[test]
    fn mismatch_alone_fails_the_case() {
        let report = CaseVerificationReport::new(case(), passing("normal"), passing("normal"), false);
        assert!(!report.passed);
        assert_eq!(report.failure_reasons.len(), 1);
    }

    #[test]
    fn lines_nest_by_hierarchy() {
        let report = CaseVerificationReport::new(case(), passing("normal"), passing("normal"), true);
        let spec_report = SpecVerificationReport::new("normal", vec![report]);
        assert!(spec_report.passed);
        assert_eq!(
            spec_report.to_lines(),
            vec![
                "[PASS] verification report for family 'normal'",
                "  [PASS] case 'seed_1_count_5' seed=1 count=5",
                "    exact_output_match: true",
                "    canonical:",
                "      [PASS] output checks for family 'normal'",
                "        [PASS] length",
                "    candidate:",
                "      [PASS] output checks for family 'normal'",
                "        [PASS] length",
            ]
        );
    }

    #[test]
    fn value_projection_is_structured() {
        let report = CaseVerificationReport::new(case(), passing("normal"), passing("normal"), true);
        let value = SpecVerificationReport::new("normal", vec![report]).to_value().unwrap();
        assert_eq!(value["passed"], serde_json::json!(true));
        assert_eq!(value["case_reports"][0]["case"]["seed"], serde_json::json!(1));
        assert_eq!(
            value["case_reports"][0]["canonical_output_report"]["results"][0]["name"],
            serde_json::json!("length")
        );
    }

    #[test]
    fn any_failed_case_fails_spec() {
        let ok = CaseVerificationReport::new(case(), passing("normal"), passing("normal"), true);
        let bad = CaseVerificationReport::new(case(), passing("normal"), passing("normal"), false);
        let report = SpecVerificationReport::new("normal", vec![ok, bad]);
        assert!(!report.passed);
        assert_eq!(report.failed_cases().count(), 1);
    }
}
