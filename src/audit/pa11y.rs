use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use super::{AuditEngine, Issue, TestResult};
use crate::config::RunOptions;

/// pa11y exits with 2 when the page was audited and issues were found.
const EXIT_ISSUES_FOUND: i32 = 2;

/// Audits pages by running the pa11y CLI once per page.
#[derive(Debug, Clone)]
pub struct Pa11yEngine {
    program: PathBuf,
}

impl Pa11yEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Pa11yEngine {
    fn default() -> Self {
        Self::new("pa11y")
    }
}

impl AuditEngine for Pa11yEngine {
    fn audit(&self, url: &str, options: &RunOptions) -> Result<TestResult> {
        let mut config_file = tempfile::Builder::new()
            .prefix("a11y-pa11y-")
            .suffix(".json")
            .tempfile()
            .context("failed to create pa11y config file")?;
        serde_json::to_writer(&mut config_file, options)
            .context("failed to serialize pa11y options")?;
        config_file.flush()?;

        let output = Command::new(&self.program)
            .args(pa11y_args(config_file.path(), url))
            .output()
            .with_context(|| format!("failed to spawn {}", self.program.display()))?;

        match output.status.code() {
            Some(0) | Some(EXIT_ISSUES_FOUND) => {}
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                bail!(
                    "pa11y failed for {url} ({}): {}",
                    output.status,
                    stderr.trim()
                );
            }
        }

        parse_report(&output.stdout)
            .with_context(|| format!("unreadable pa11y output for {url}"))
    }

    /// Verify that the pa11y executable can be invoked.
    fn ensure_available(&self) -> Result<()> {
        let status = Command::new(&self.program)
            .arg("--version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .with_context(|| {
                format!(
                    "failed to invoke `{}`; is pa11y installed and on PATH?",
                    self.program.display()
                )
            })?;

        if !status.success() {
            bail!("`{} --version` failed ({})", self.program.display(), status);
        }
        Ok(())
    }
}

/// Arguments for one pa11y invocation.
pub fn pa11y_args(config_path: &Path, url: &str) -> Vec<String> {
    vec![
        "--config".into(),
        config_path.display().to_string(),
        "--reporter".into(),
        "json".into(),
        url.to_string(),
    ]
}

/// The json reporter prints either the whole result or only its issues,
/// depending on the pa11y version.
#[derive(Deserialize)]
#[serde(untagged)]
enum Report {
    Full(TestResult),
    IssuesOnly(Vec<Issue>),
}

fn parse_report(stdout: &[u8]) -> Result<TestResult> {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(TestResult::default());
    }
    let report: Report = serde_json::from_str(trimmed)?;
    Ok(match report {
        Report::Full(result) => result,
        Report::IssuesOnly(issues) => TestResult {
            issues,
            ..TestResult::default()
        },
    })
}
