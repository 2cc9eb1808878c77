#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use a11y::audit::{AuditEngine, Issue, IssueType, TestResult};
use a11y::config::{Config, Environment, RunOptions, TestSpec};
use a11y::metrics::{MetricOutcome, MetricsError, MetricsSink};

pub fn ci_env() -> Environment {
    Environment::from_vars([
        ("MW_SERVER", "http://localhost:8080"),
        ("MEDIAWIKI_USER", "Admin"),
        ("MEDIAWIKI_PASSWORD", "dockerpass"),
        ("WMF_JENKINS_BEACON_URL", "http://beacon.invalid/beacon/statsv?"),
    ])
}

pub fn test_spec(name: &str) -> TestSpec {
    TestSpec {
        name: Some(name.into()),
        url: Some(format!("/wiki/{name}")),
        ..TestSpec::default()
    }
}

pub fn config(report_dir: &Path, names: &[&str]) -> Config {
    Config {
        report_dir: Some(report_dir.to_path_buf()),
        namespace: Some("Vector".into()),
        defaults: RunOptions {
            runners: Some(vec!["axe".into(), "htmlcs".into()]),
            include_warnings: Some(true),
            include_notices: Some(true),
            ..RunOptions::default()
        },
        tests: names.iter().map(|n| test_spec(n)).collect(),
    }
}

pub fn issue(kind: IssueType, runner: &str) -> Issue {
    Issue::new(kind, runner)
}

/// Audit engine answering from a URL-keyed script and recording every call.
#[derive(Default)]
pub struct FakeEngine {
    results: HashMap<String, Vec<Issue>>,
    failing: Vec<String>,
    unavailable: bool,
    pub calls: Mutex<Vec<(String, RunOptions)>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issues(mut self, url: &str, issues: Vec<Issue>) -> Self {
        self.results.insert(url.to_string(), issues);
        self
    }

    pub fn failing_on(mut self, url: &str) -> Self {
        self.failing.push(url.to_string());
        self
    }

    /// Fail the availability check, as a missing pa11y install would.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }
}

impl AuditEngine for FakeEngine {
    fn audit(&self, url: &str, options: &RunOptions) -> anyhow::Result<TestResult> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), options.clone()));
        if self.failing.iter().any(|u| u == url) {
            anyhow::bail!("net::ERR_CONNECTION_REFUSED at {url}");
        }
        Ok(TestResult {
            document_title: Some("Test page".into()),
            page_url: Some(url.to_string()),
            issues: self.results.get(url).cloned().unwrap_or_default(),
            ..TestResult::default()
        })
    }

    fn ensure_available(&self) -> anyhow::Result<()> {
        if self.unavailable {
            anyhow::bail!("failed to invoke `pa11y`; is pa11y installed and on PATH?");
        }
        Ok(())
    }
}

/// Metrics sink that records calls and always succeeds.
#[derive(Default)]
pub struct RecordingSink {
    pub calls: Mutex<Vec<(String, String, usize)>>,
}

impl MetricsSink for RecordingSink {
    fn emit(
        &self,
        namespace: &str,
        name: &str,
        count: usize,
    ) -> Result<MetricOutcome, MetricsError> {
        self.calls
            .lock()
            .unwrap()
            .push((namespace.into(), name.into(), count));
        Ok(MetricOutcome::Logged)
    }
}
