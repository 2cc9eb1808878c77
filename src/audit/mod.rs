// Audit engine boundary: result types and the pa11y subprocess engine.

mod engine;
pub mod pa11y;
mod types;

pub use engine::AuditEngine;
pub use pa11y::Pa11yEngine;
pub use types::{Issue, IssueType, TestResult};
