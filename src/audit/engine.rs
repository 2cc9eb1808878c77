use std::sync::Arc;

use anyhow::Result;

use super::TestResult;
use crate::config::RunOptions;

/// Something that can load a page and report its accessibility issues.
///
/// Implementations are shared across audit threads.
pub trait AuditEngine: Send + Sync {
    fn audit(&self, url: &str, options: &RunOptions) -> Result<TestResult>;

    /// Checked once per run, after validation and before any audit.
    fn ensure_available(&self) -> Result<()> {
        Ok(())
    }
}

impl<T: AuditEngine + ?Sized> AuditEngine for Arc<T> {
    fn audit(&self, url: &str, options: &RunOptions) -> Result<TestResult> {
        (**self).audit(url, options)
    }

    fn ensure_available(&self) -> Result<()> {
        (**self).ensure_available()
    }
}
