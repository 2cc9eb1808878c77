// Audit pipeline: report directory, option merge, dispatch, classification, fan-out.

pub mod classify;
mod console;
pub mod dispatch;
pub mod fanout;
pub mod options;
pub mod orchestrator;
mod report_dir;

pub use classify::{ClassifiedResult, Counts, ESCALATED_RUNNER, classify};
pub use console::{Console, ConsoleLine};
pub use dispatch::{AuditFailure, DispatchError, dispatch};
pub use fanout::{Delivery, Fanout, MetricStatus, WriteFailure, summary_line};
pub use options::{AuditJob, build_jobs, merge_options, screenshot_path};
pub use orchestrator::{Pipeline, RunSummary, TestSummary, execute};
pub use report_dir::reset_report_dir;
