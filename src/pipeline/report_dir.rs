use std::path::Path;

use anyhow::{Context, Result};

/// Delete and recreate the report directory so it exists and is empty.
///
/// Must finish before any audit or report write touches the directory.
pub fn reset_report_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("failed to remove report directory {}", dir.display()))?;
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create report directory {}", dir.display()))?;
    tracing::debug!(dir = %dir.display(), "report directory reset");
    Ok(())
}
