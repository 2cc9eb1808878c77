use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::classify::{ClassifiedResult, Counts};
use super::console::Console;
use crate::config::MetricsTarget;
use crate::metrics::{MetricOutcome, MetricsSink};
use crate::report::Renderer;

pub fn html_report_path(report_dir: &Path, name: &str) -> PathBuf {
    report_dir.join(format!("report-{name}.html"))
}

pub fn json_report_path(report_dir: &Path, name: &str) -> PathBuf {
    report_dir.join(format!("report-{name}.json"))
}

/// Console summary line for one test.
pub fn summary_line(name: &str, counts: Counts) -> String {
    format!(
        "'{name}'- {} errors, {} warnings, {} notices",
        counts.errors, counts.warnings, counts.notices
    )
}

/// What happened to a test's error count on its way to the beacon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricStatus {
    Logged,
    Rejected(u16),
    Failed(String),
}

#[derive(Debug)]
pub struct WriteFailure {
    pub path: PathBuf,
    pub error: anyhow::Error,
}

/// Outcome of reporting one classified result.
#[derive(Debug)]
pub struct Delivery {
    pub name: String,
    pub counts: Counts,
    /// `None` when result logging is off.
    pub metric: Option<MetricStatus>,
    pub write_failures: Vec<WriteFailure>,
}

/// Sends one classified result to every reporting sink.
pub struct Fanout<'a> {
    pub report_dir: &'a Path,
    pub console: &'a Console,
    pub silent: bool,
    pub metrics: Option<(&'a MetricsTarget, &'a dyn MetricsSink)>,
    pub renderer: &'a dyn Renderer,
}

impl Fanout<'_> {
    /// Print the summary, then emit the metric and write both report files
    /// concurrently. Returns once every sink has finished; no sink's failure
    /// stops the others.
    pub fn deliver(&self, classified: &ClassifiedResult) -> Delivery {
        let name = classified.name();
        let counts = classified.counts();

        if !self.silent {
            self.console.out(summary_line(name, counts));
        }

        let (metric, html, json) = std::thread::scope(|scope| {
            let metric = scope.spawn(|| self.emit_metric(name, counts.errors));
            let html = scope.spawn(|| self.write_html(classified));
            let json = scope.spawn(|| self.write_json(classified));
            (metric.join(), html.join(), json.join())
        });

        let metric = metric
            .unwrap_or_else(|_| Some(MetricStatus::Failed("metrics thread panicked".into())));

        let write_failures = [
            (html_report_path(self.report_dir, name), html),
            (json_report_path(self.report_dir, name), json),
        ]
        .into_iter()
        .filter_map(|(path, joined)| {
            match joined.unwrap_or_else(|_| Err(anyhow::anyhow!("writer thread panicked"))) {
                Ok(()) => None,
                Err(error) => {
                    tracing::warn!(path = %path.display(), "report not written: {error:#}");
                    Some(WriteFailure { path, error })
                }
            }
        })
        .collect();

        Delivery {
            name: name.to_string(),
            counts,
            metric,
            write_failures,
        }
    }

    fn emit_metric(&self, name: &str, errors: usize) -> Option<MetricStatus> {
        let (target, sink) = self.metrics?;
        let status = match sink.emit(&target.namespace, name, errors) {
            Ok(MetricOutcome::Logged) => {
                self.console.out(format!("'{name}' results logged successfully"));
                MetricStatus::Logged
            }
            Ok(MetricOutcome::Rejected(code)) => {
                self.console
                    .err(format!("Failed to log '{name}' results (HTTP {code})"));
                MetricStatus::Rejected(code)
            }
            Err(e) => {
                tracing::warn!(%name, "metrics beacon unreachable: {e}");
                self.console.err(format!("Failed to log '{name}' results: {e}"));
                MetricStatus::Failed(e.to_string())
            }
        };
        Some(status)
    }

    fn write_html(&self, classified: &ClassifiedResult) -> Result<()> {
        let path = html_report_path(self.report_dir, classified.name());
        let html = self.renderer.render(classified.result())?;
        std::fs::write(&path, html)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote HTML report");
        Ok(())
    }

    fn write_json(&self, classified: &ClassifiedResult) -> Result<()> {
        let path = json_report_path(self.report_dir, classified.name());
        let json = serde_json::to_string_pretty(classified.result())?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote JSON report");
        Ok(())
    }
}
