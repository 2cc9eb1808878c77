use std::sync::mpsc;

use thiserror::Error;

use super::options::AuditJob;
use crate::audit::{AuditEngine, TestResult};

/// A single audit that did not produce a result.
#[derive(Debug)]
pub struct AuditFailure {
    pub name: String,
    pub error: anyhow::Error,
}

/// The batch failed: at least one audit failed, so no results are returned.
#[derive(Debug, Error)]
#[error("{} of {total} audits failed: {}", .failures.len(), describe(.failures))]
pub struct DispatchError {
    pub total: usize,
    pub failures: Vec<AuditFailure>,
}

fn describe(failures: &[AuditFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("'{}' ({:#})", f.name, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Run every job against the engine at once and wait for all of them.
///
/// Results come back in job order with `name` set from the job. If any audit
/// fails, every other audit is still allowed to finish, then the whole batch
/// is reported as failed.
pub fn dispatch(engine: &dyn AuditEngine, jobs: &[AuditJob]) -> Result<Vec<TestResult>, DispatchError> {
    let (tx, rx) = mpsc::channel();

    std::thread::scope(|scope| {
        for (index, job) in jobs.iter().enumerate() {
            let tx = tx.clone();
            tracing::debug!(name = %job.name, url = %job.url, "dispatching audit");
            scope.spawn(move || {
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    engine.audit(&job.url, &job.options)
                }))
                .unwrap_or_else(|_| Err(anyhow::anyhow!("audit panicked")));
                // Receiver outlives the scope.
                let _ = tx.send((index, outcome));
            });
        }
    });
    drop(tx);

    let mut slots: Vec<Option<TestResult>> = jobs.iter().map(|_| None).collect();
    let mut failures = Vec::new();

    for (index, outcome) in rx {
        let name = &jobs[index].name;
        match outcome {
            Ok(mut result) => {
                tracing::debug!(%name, issues = result.issues.len(), "audit finished");
                result.name = name.clone();
                slots[index] = Some(result);
            }
            Err(error) => {
                tracing::warn!(%name, "audit failed: {error:#}");
                failures.push((index, AuditFailure {
                    name: name.clone(),
                    error,
                }));
            }
        }
    }

    if !failures.is_empty() {
        failures.sort_by_key(|(index, _)| *index);
        return Err(DispatchError {
            total: jobs.len(),
            failures: failures.into_iter().map(|(_, f)| f).collect(),
        });
    }

    Ok(slots.into_iter().flatten().collect())
}
