use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;

use super::env::{BEACON_URL_VAR, Environment};
use super::{Config, RunOptions};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<&'static str>),
    #[error("config is missing `reportDir`")]
    MissingReportDir,
    #[error("config defines no tests")]
    NoTests,
    #[error("config test #{index} is missing a name")]
    MissingTestName { index: usize },
    #[error("config test '{name}' is missing a url")]
    MissingTestUrl { name: String },
    #[error("config defines test '{name}' more than once")]
    DuplicateTestName { name: String },
    #[error("config test name '{name}' cannot be used as a file name")]
    InvalidTestName { name: String },
    #[error("unable to log results, missing {}", .missing.join(" and "))]
    LoggingUnavailable { missing: Vec<&'static str> },
}

/// Command-line switches that shape a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    pub silent: bool,
    pub log_results: bool,
}

/// Where error counts are sent when result logging is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsTarget {
    pub beacon_url: String,
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTest {
    pub name: String,
    pub url: String,
    pub overrides: RunOptions,
}

/// A validated, immutable description of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub report_dir: PathBuf,
    pub defaults: RunOptions,
    pub tests: Vec<PlannedTest>,
    pub silent: bool,
    /// `Some` only when result logging was requested.
    pub metrics: Option<MetricsTarget>,
}

/// Check the environment and config before anything touches the disk.
pub fn validate(env: &Environment, config: &Config, flags: RunFlags) -> Result<RunPlan, ConfigError> {
    let missing = env.missing_required();
    if !missing.is_empty() {
        return Err(ConfigError::MissingEnv(missing));
    }

    let report_dir = config
        .report_dir
        .clone()
        .filter(|dir| !dir.as_os_str().is_empty())
        .ok_or(ConfigError::MissingReportDir)?;

    if config.tests.is_empty() {
        return Err(ConfigError::NoTests);
    }

    let mut seen = HashSet::new();
    let mut tests = Vec::with_capacity(config.tests.len());
    for (index, test) in config.tests.iter().enumerate() {
        let name = test
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or(ConfigError::MissingTestName { index })?;
        if !is_file_safe(&name) {
            return Err(ConfigError::InvalidTestName { name });
        }
        if !seen.insert(name.clone()) {
            return Err(ConfigError::DuplicateTestName { name });
        }
        let url = test
            .url
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ConfigError::MissingTestUrl { name: name.clone() })?;
        tests.push(PlannedTest {
            name,
            url,
            overrides: test.overrides.clone(),
        });
    }

    let metrics = if flags.log_results {
        let namespace = config.namespace.clone().filter(|n| !n.is_empty());
        match (env.beacon_url.clone(), namespace) {
            (Some(beacon_url), Some(namespace)) => Some(MetricsTarget {
                beacon_url,
                namespace,
            }),
            (beacon_url, namespace) => {
                let mut missing = Vec::new();
                if beacon_url.is_none() {
                    missing.push(BEACON_URL_VAR);
                }
                if namespace.is_none() {
                    missing.push("`namespace`");
                }
                return Err(ConfigError::LoggingUnavailable { missing });
            }
        }
    } else {
        None
    };

    Ok(RunPlan {
        report_dir,
        defaults: config.defaults.clone(),
        tests,
        silent: flags.silent,
        metrics,
    })
}

/// Test names become report and screenshot file names inside `reportDir`.
fn is_file_safe(name: &str) -> bool {
    name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
