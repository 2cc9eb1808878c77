use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_CONFIG_PATH, RunFlags};

/// Run pa11y accessibility audits for the pages listed in a config file.
#[derive(Debug, Parser)]
#[command(name = "a11y", version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file to use
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Don't print the per-test results summary
    #[arg(short, long)]
    pub silent: bool,

    /// Send error counts to the metrics beacon (CI only)
    #[arg(short = 'l', long = "logResults", visible_alias = "log-results")]
    pub log_results: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// pa11y executable
    #[arg(long, env = "A11Y_PA11Y_BIN", default_value = "pa11y")]
    pub pa11y: PathBuf,
}

impl Cli {
    pub fn flags(&self) -> RunFlags {
        RunFlags {
            silent: self.silent,
            log_results: self.log_results,
        }
    }
}
