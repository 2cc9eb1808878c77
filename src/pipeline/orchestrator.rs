use std::sync::Arc;

use anyhow::{Result, bail};

use super::classify::{Counts, classify};
use super::console::Console;
use super::dispatch::dispatch;
use super::fanout::{Delivery, Fanout, MetricStatus};
use super::options::build_jobs;
use super::report_dir::reset_report_dir;
use crate::audit::AuditEngine;
use crate::config::{Config, Environment, MetricsTarget, RunFlags, RunPlan, validate};
use crate::metrics::{BeaconReporter, MetricsError, MetricsSink, UnavailableSink};
use crate::report::{HtmlReport, Renderer};

/// Per-test outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSummary {
    pub name: String,
    pub counts: Counts,
    pub metric: Option<MetricStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// In config order.
    pub tests: Vec<TestSummary>,
}

impl RunSummary {
    pub fn total(&self) -> Counts {
        self.tests.iter().fold(Counts::default(), |mut acc, t| {
            acc.errors += t.counts.errors;
            acc.warnings += t.counts.warnings;
            acc.notices += t.counts.notices;
            acc
        })
    }
}

/// Builds the metrics sink for a run that logs results.
pub type SinkFactory =
    Box<dyn Fn(&MetricsTarget) -> Result<Box<dyn MetricsSink>, MetricsError> + Send + Sync>;

/// The collaborators a run needs: audit engine, HTML renderer, metrics sink
/// and console.
pub struct Pipeline {
    engine: Box<dyn AuditEngine>,
    renderer: Box<dyn Renderer>,
    metrics: SinkFactory,
    console: Console,
}

impl Pipeline {
    pub fn new(engine: impl AuditEngine + 'static) -> Self {
        Self {
            engine: Box::new(engine),
            renderer: Box::new(HtmlReport),
            metrics: Box::new(|target| {
                let beacon = BeaconReporter::for_target(target)?;
                Ok(Box::new(beacon) as Box<dyn MetricsSink>)
            }),
            console: Console::terminal(),
        }
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Use `sink` instead of the HTTP beacon when result logging is on.
    pub fn with_metrics(mut self, sink: impl MetricsSink + 'static) -> Self {
        let sink = Arc::new(sink);
        self.metrics = Box::new(move |_| Ok(Box::new(Arc::clone(&sink)) as Box<dyn MetricsSink>));
        self
    }

    pub fn with_metrics_factory(
        mut self,
        factory: impl Fn(&MetricsTarget) -> Result<Box<dyn MetricsSink>, MetricsError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.metrics = Box::new(factory);
        self
    }

    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Reset the report directory, audit every page, then report every result.
    ///
    /// The engine is checked before the report directory is touched. All
    /// reporting finishes before this returns. Metrics problems are only
    /// logged; a report file that could not be written fails the run once
    /// every other report is done.
    pub fn run(&self, plan: &RunPlan) -> Result<RunSummary> {
        self.engine.ensure_available()?;
        let metrics = plan.metrics.as_ref().map(|target| self.metrics_sink(target));

        reset_report_dir(&plan.report_dir)?;

        let jobs = build_jobs(plan);
        let results = dispatch(self.engine.as_ref(), &jobs)?;

        let fanout = Fanout {
            report_dir: &plan.report_dir,
            console: &self.console,
            silent: plan.silent,
            metrics: plan.metrics.as_ref().zip(metrics.as_deref()),
            renderer: self.renderer.as_ref(),
        };

        let deliveries: Vec<Delivery> = std::thread::scope(|scope| {
            let handles: Vec<_> = results
                .into_iter()
                .map(|result| {
                    let fanout = &fanout;
                    scope.spawn(move || fanout.deliver(&classify(result)))
                })
                .collect();
            handles
                .into_iter()
                .filter_map(|handle| handle.join().ok())
                .collect()
        });

        if deliveries.len() != jobs.len() {
            bail!(
                "reporting crashed for {} of {} tests",
                jobs.len() - deliveries.len(),
                jobs.len()
            );
        }

        let failed_writes: Vec<String> = deliveries
            .iter()
            .flat_map(|d| &d.write_failures)
            .map(|f| format!("{} ({:#})", f.path.display(), f.error))
            .collect();
        if !failed_writes.is_empty() {
            bail!(
                "{} report files could not be written: {}",
                failed_writes.len(),
                failed_writes.join("; ")
            );
        }

        Ok(RunSummary {
            tests: deliveries
                .into_iter()
                .map(|d| TestSummary {
                    name: d.name,
                    counts: d.counts,
                    metric: d.metric,
                })
                .collect(),
        })
    }

    fn metrics_sink(&self, target: &MetricsTarget) -> Box<dyn MetricsSink> {
        match (self.metrics)(target) {
            Ok(sink) => sink,
            Err(error) => {
                tracing::warn!(beacon = %target.beacon_url, "metrics disabled: {error}");
                Box::new(UnavailableSink::new(error.to_string()))
            }
        }
    }
}

/// Validate `config` against the environment and run it.
///
/// Nothing on disk is touched unless validation passes.
pub fn execute(
    env: &Environment,
    config: Config,
    flags: RunFlags,
    pipeline: &Pipeline,
) -> Result<RunSummary> {
    let config = config.with_environment(env);
    let plan = validate(env, &config, flags)?;
    tracing::debug!(
        tests = plan.tests.len(),
        report_dir = %plan.report_dir.display(),
        metrics = plan.metrics.is_some(),
        "configuration validated"
    );
    pipeline.run(&plan)
}
