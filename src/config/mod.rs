// Run configuration: environment, config file, validation.

mod env;
mod loader;
mod types;
mod validate;

pub use env::{
    BEACON_URL_VAR, Environment, LOGIN_PASSWORD_VAR, LOGIN_USER_VAR, REPORT_DIR_VAR,
    SERVER_URL_VAR,
};
pub use loader::{DEFAULT_CONFIG_PATH, load};
pub use types::{ChromeLaunchConfig, Config, RunOptions, TestSpec, Viewport};
pub use validate::{ConfigError, MetricsTarget, PlannedTest, RunFlags, RunPlan, validate};
