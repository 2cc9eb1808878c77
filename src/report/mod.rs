//! Human-readable report rendering.

mod html;

use anyhow::Result;

use crate::audit::TestResult;

pub use html::HtmlReport;

/// Turns a classified result into a document.
pub trait Renderer: Send + Sync {
    fn render(&self, result: &TestResult) -> Result<String>;
}
