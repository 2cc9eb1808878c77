use serde::Serialize;

use crate::audit::{Issue, IssueType, TestResult};

/// Runner whose warnings are treated as errors.
pub const ESCALATED_RUNNER: &str = "axe";

/// Issue totals per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub errors: usize,
    pub warnings: usize,
    pub notices: usize,
}

impl Counts {
    pub fn tally(issues: &[Issue]) -> Self {
        issues.iter().fold(Self::default(), |mut counts, issue| {
            match issue.kind {
                IssueType::Error => counts.errors += 1,
                IssueType::Warning => counts.warnings += 1,
                IssueType::Notice => counts.notices += 1,
            }
            counts
        })
    }
}

/// A result whose severities have been reclassified, with its totals.
///
/// Only [`classify`] builds one, so escalation runs once per result.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedResult {
    result: TestResult,
    counts: Counts,
}

impl ClassifiedResult {
    pub fn result(&self) -> &TestResult {
        &self.result
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    pub fn name(&self) -> &str {
        &self.result.name
    }
}

/// Escalate warnings from [`ESCALATED_RUNNER`] to errors, then count.
pub fn classify(mut result: TestResult) -> ClassifiedResult {
    for issue in &mut result.issues {
        if issue.kind == IssueType::Warning && issue.runner == ESCALATED_RUNNER {
            issue.kind = IssueType::Error;
        }
    }
    let counts = Counts::tally(&result.issues);
    ClassifiedResult { result, counts }
}
