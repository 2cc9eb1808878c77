use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use a11y::audit::Pa11yEngine;
use a11y::cli::Cli;
use a11y::config::{self, Environment};
use a11y::pipeline::{self, Pipeline};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let env = Environment::from_env();
    let cfg = config::load(&cli.config)?;

    // pa11y itself is checked after validation, inside the run.
    let pipeline = Pipeline::new(Pa11yEngine::new(cli.pa11y.clone()));

    let summary = pipeline::execute(&env, cfg, cli.flags(), &pipeline)?;
    let total = summary.total();
    tracing::info!(
        tests = summary.tests.len(),
        errors = total.errors,
        warnings = total.warnings,
        notices = total.notices,
        "run finished"
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "a11y=debug" } else { "a11y=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
