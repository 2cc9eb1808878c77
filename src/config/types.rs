use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Environment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_scale_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mobile: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChromeLaunchConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headless: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable_path: Option<String>,
    /// Launch options passed through to Chromium untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options handed to the audit engine for one page.
///
/// Every field is optional so the same shape serves as shared defaults, as a
/// test's overrides and as the merged result. Serialized field names are the
/// ones pa11y reads from its config file. Keys without a typed field
/// (`userAgent`, `rules`, `level` and so on) are carried in `extra` and reach
/// pa11y unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runners: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_warnings: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_notices: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_elements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_element: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    /// Milliseconds pa11y waits for the page before giving up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Milliseconds to wait after load before auditing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_launch_config: Option<ChromeLaunchConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_capture: Option<PathBuf>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RunOptions {
    /// Overlay `overrides` on top of `self`, field by field.
    ///
    /// A field set in `overrides` wins; an unset one falls through to `self`.
    /// Nested values (`viewport`, `chromeLaunchConfig`, lists) are replaced
    /// whole, never merged. Untyped keys follow the same rule one key at a
    /// time.
    pub fn overlay(&self, overrides: &RunOptions) -> RunOptions {
        fn pick<T: Clone>(over: &Option<T>, base: &Option<T>) -> Option<T> {
            over.as_ref().or(base.as_ref()).cloned()
        }

        RunOptions {
            viewport: pick(&overrides.viewport, &self.viewport),
            runners: pick(&overrides.runners, &self.runners),
            include_warnings: pick(&overrides.include_warnings, &self.include_warnings),
            include_notices: pick(&overrides.include_notices, &self.include_notices),
            hide_elements: pick(&overrides.hide_elements, &self.hide_elements),
            root_element: pick(&overrides.root_element, &self.root_element),
            standard: pick(&overrides.standard, &self.standard),
            timeout: pick(&overrides.timeout, &self.timeout),
            wait: pick(&overrides.wait, &self.wait),
            actions: pick(&overrides.actions, &self.actions),
            headers: pick(&overrides.headers, &self.headers),
            ignore: pick(&overrides.ignore, &self.ignore),
            chrome_launch_config: pick(&overrides.chrome_launch_config, &self.chrome_launch_config),
            screen_capture: pick(&overrides.screen_capture, &self.screen_capture),
            extra: self
                .extra
                .iter()
                .chain(&overrides.extra)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }
}

/// One page to audit, as declared in the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub overrides: RunOptions,
}

/// Contents of the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub report_dir: Option<PathBuf>,
    pub namespace: Option<String>,
    pub defaults: RunOptions,
    pub tests: Vec<TestSpec>,
}

impl Config {
    /// Apply environment-driven settings: `LOG_DIR` replaces `reportDir`, and
    /// test URLs starting with `/` are resolved against the server base URL.
    pub fn with_environment(mut self, env: &Environment) -> Self {
        if let Some(dir) = &env.report_dir {
            self.report_dir = Some(PathBuf::from(dir));
        }

        if let Some(server) = &env.server_url {
            let base = server.trim_end_matches('/');
            for test in &mut self.tests {
                if let Some(url) = &test.url
                    && url.starts_with('/')
                {
                    test.url = Some(format!("{base}{url}"));
                }
            }
        }

        self
    }
}
