//! Run configuration read once from the process environment.
//!
//! Four variables shape a run: `SERVER` picks the environment from the
//! catalogue, `PROXY_SERVER` routes requests through a proxy, and `DEBUG` and
//! `FAIL_FAST` are switches that count as on when their value is `on` or
//! `true` (case-insensitive). `SHELFCHECK_ENVIRONMENTS` and `SHELFCHECK_DATA`
//! relocate the environments catalogue and the test-data records. Extraction
//! goes through `figment` so the values are layered the same way as other
//! configuration sources.

use crate::data::YamlDataProvider;
use crate::environments::{EnvironmentCatalog, ServiceRegistry};
use crate::error::{AcceptanceError, Result};
use camino::Utf8PathBuf;
use ortho_config::figment::{Figment, providers::Env};
use serde::{Deserialize, Deserializer};
use shelf_env::{
    DATA_FILE_ENV, DEBUG_ENV, DEFAULT_DATA_FILE, DEFAULT_ENVIRONMENTS_FILE, DEFAULT_SERVER,
    ENVIRONMENTS_FILE_ENV, FAIL_FAST_ENV, PROXY_ENV, SERVER_ENV,
};

/// Settings shared by every scenario in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConfig {
    /// Environment name looked up in the catalogue.
    pub server: String,
    /// Optional proxy URI for outbound requests.
    pub proxy: Option<String>,
    /// Whether debug logging is enabled.
    pub debug: bool,
    /// Whether runners should stop at the first failure.
    pub fail_fast: bool,
    /// Location of the environments catalogue.
    pub environments_file: Utf8PathBuf,
    /// Location of the YAML test-data records.
    pub data_file: Utf8PathBuf,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            server: String::from(DEFAULT_SERVER),
            proxy: None,
            debug: false,
            fail_fast: false,
            environments_file: Utf8PathBuf::from(DEFAULT_ENVIRONMENTS_FILE),
            data_file: Utf8PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

/// Raw variable values as figment extracts them.
///
/// Figment turns `true` into a boolean and `on` into a string, so the switches
/// accept either shape.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    server: Option<String>,
    proxy_server: Option<String>,
    #[serde(default, deserialize_with = "switch")]
    debug: bool,
    #[serde(default, deserialize_with = "switch")]
    fail_fast: bool,
    shelfcheck_environments: Option<String>,
    shelfcheck_data: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SwitchValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

fn switch<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match SwitchValue::deserialize(deserializer)? {
        SwitchValue::Bool(flag) => flag,
        // Only `on` and `true` enable a switch, so `1` stays off.
        SwitchValue::Int(_) => false,
        SwitchValue::Text(text) => switch_is_on(&text),
    })
}

/// Return `true` when `value` reads as an enabled switch.
///
/// # Examples
///
/// ```
/// use shelfcheck::config::switch_is_on;
///
/// assert!(switch_is_on("ON"));
/// assert!(switch_is_on("true"));
/// assert!(!switch_is_on("yes"));
/// ```
#[must_use]
pub fn switch_is_on(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.eq_ignore_ascii_case("on") || trimmed.eq_ignore_ascii_case("true")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl TestConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Configuration`] when a variable holds a
    /// value of the wrong shape.
    pub fn from_env() -> Result<Self> {
        let provider = Env::raw().only(&[
            SERVER_ENV,
            PROXY_ENV,
            DEBUG_ENV,
            FAIL_FAST_ENV,
            ENVIRONMENTS_FILE_ENV,
            DATA_FILE_ENV,
        ]);
        let raw: RawConfig = Figment::from(provider).extract().map_err(|err| {
            AcceptanceError::configuration(format!("invalid environment configuration: {err}"))
        })?;
        let defaults = Self::default();
        let config = Self {
            server: non_empty(raw.server).unwrap_or(defaults.server),
            proxy: non_empty(raw.proxy_server),
            debug: raw.debug,
            fail_fast: raw.fail_fast,
            environments_file: non_empty(raw.shelfcheck_environments)
                .map_or(defaults.environments_file, Utf8PathBuf::from),
            data_file: non_empty(raw.shelfcheck_data).map_or(defaults.data_file, Utf8PathBuf::from),
        };
        tracing::info!(
            server = %config.server,
            proxy = ?config.proxy,
            debug = config.debug,
            fail_fast = config.fail_fast,
            "loaded test configuration"
        );
        Ok(config)
    }

    /// Load the catalogue and build the registry for the selected server.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Configuration`] when the catalogue cannot be
    /// read or does not describe the selected environment.
    pub fn service_registry(&self) -> Result<ServiceRegistry> {
        EnvironmentCatalog::from_path(&self.environments_file)?.registry(&self.server)
    }

    /// Load the test-data records named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Data`] when the file cannot be read or
    /// parsed.
    pub fn data_provider(&self) -> Result<YamlDataProvider> {
        YamlDataProvider::from_path(&self.data_file)
    }
}
