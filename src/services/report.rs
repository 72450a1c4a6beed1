use crate::domain::models::{
    ReachabilityRegression, SuiteOutcome, VerificationReport, Violation,
};
use tracing::error;

/// Log a violation and add it to the suite it belongs to.
pub fn flag(outcome: &mut SuiteOutcome, violation: Violation) {
    error!(
        suite = %outcome.suite(),
        snapshot = outcome.snapshot(),
        category = %violation.category(),
        subject = violation.subject(),
        evidence = ?violation.evidence(),
        "{}",
        violation.detail()
    );
    outcome.record(violation);
}

/// OR-reduction over named suite verdicts (`true` = failed).
pub fn aggregate<S: AsRef<str>>(verdicts: &[(S, bool)]) -> bool {
    verdicts.iter().any(|(_, failed)| *failed)
}

pub fn build_report(
    suites: Vec<SuiteOutcome>,
    regressions: Vec<ReachabilityRegression>,
) -> VerificationReport {
    let verdicts: Vec<(String, bool)> = suites.iter().map(|s| (s.label(), s.failed())).collect();
    let overall_failed = aggregate(&verdicts);
    let failing_suites = verdicts
        .into_iter()
        .filter(|(_, failed)| *failed)
        .map(|(label, _)| label)
        .collect();

    VerificationReport {
        overall: if overall_failed { "fail" } else { "pass" }.to_string(),
        overall_failed,
        failing_suites,
        suites,
        regressions,
    }
}
