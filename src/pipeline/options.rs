use std::path::{Path, PathBuf};

use crate::config::{PlannedTest, RunOptions, RunPlan};

/// One audit ready to hand to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditJob {
    pub name: String,
    pub url: String,
    pub options: RunOptions,
}

/// Screenshot location for a test: `<reportDir>/<name>.png`.
pub fn screenshot_path(report_dir: &Path, name: &str) -> PathBuf {
    report_dir.join(format!("{name}.png"))
}

/// Overlay a test's overrides on the shared defaults and pin its screenshot
/// path. The screenshot path always wins over any configured value.
pub fn merge_options(defaults: &RunOptions, test: &PlannedTest, report_dir: &Path) -> RunOptions {
    let mut merged = defaults.overlay(&test.overrides);
    merged.screen_capture = Some(screenshot_path(report_dir, &test.name));
    merged
}

/// Build the audit job list, in config order.
pub fn build_jobs(plan: &RunPlan) -> Vec<AuditJob> {
    plan.tests
        .iter()
        .map(|test| AuditJob {
            name: test.name.clone(),
            url: test.url.clone(),
            options: merge_options(&plan.defaults, test, &plan.report_dir),
        })
        .collect()
}
