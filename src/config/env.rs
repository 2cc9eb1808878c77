use std::ffi::{OsStr, OsString};
use std::fmt;

pub const SERVER_URL_VAR: &str = "MW_SERVER";
pub const LOGIN_USER_VAR: &str = "MEDIAWIKI_USER";
pub const LOGIN_PASSWORD_VAR: &str = "MEDIAWIKI_PASSWORD";
pub const BEACON_URL_VAR: &str = "WMF_JENKINS_BEACON_URL";
pub const REPORT_DIR_VAR: &str = "LOG_DIR";

/// Process environment relevant to a run, captured once at startup.
///
/// Empty values are treated as unset, and so are values that are not valid
/// UTF-8. Variables the run does not read are never decoded.
#[derive(Clone, Default)]
pub struct Environment {
    pub server_url: Option<String>,
    pub login_user: Option<String>,
    pub login_password: Option<String>,
    /// Only defined in CI.
    pub beacon_url: Option<String>,
    pub report_dir: Option<String>,
}

impl Environment {
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars_os())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: Into<OsString>,
    {
        let mut env = Self::default();
        for (key, value) in vars {
            let Some(key) = key.as_ref().to_str() else {
                continue;
            };
            let slot = match key {
                SERVER_URL_VAR => &mut env.server_url,
                LOGIN_USER_VAR => &mut env.login_user,
                LOGIN_PASSWORD_VAR => &mut env.login_password,
                BEACON_URL_VAR => &mut env.beacon_url,
                REPORT_DIR_VAR => &mut env.report_dir,
                _ => continue,
            };
            match value.into().into_string() {
                Ok(value) if value.is_empty() => {}
                Ok(value) => *slot = Some(value),
                Err(_) => tracing::warn!(var = key, "ignoring value that is not valid UTF-8"),
            }
        }
        env
    }

    /// Names of required variables that are not set.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            (SERVER_URL_VAR, &self.server_url),
            (LOGIN_USER_VAR, &self.login_user),
            (LOGIN_PASSWORD_VAR, &self.login_password),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("server_url", &self.server_url)
            .field("login_user", &self.login_user)
            .field(
                "login_password",
                &self.login_password.as_ref().map(|_| "<redacted>"),
            )
            .field("beacon_url", &self.beacon_url)
            .field("report_dir", &self.report_dir)
            .finish()
    }
}
