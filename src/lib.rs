//! Accessibility audit runner: audits configured pages with pa11y and
//! reports each result to the console, a CI metrics beacon and per-test
//! HTML/JSON report files.

pub mod audit;
pub mod cli;
pub mod config;
pub mod metrics;
pub mod pipeline;
pub mod report;
