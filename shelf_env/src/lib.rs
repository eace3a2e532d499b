#![forbid(unsafe_code)]

//! Environment variable names shared by the shelfcheck library, its
//! behavioural tests, and the `test_support` stub services.

/// Selects the named environment whose servers the checks run against.
///
/// # Examples
///
/// ```
/// use shelf_env::SERVER_ENV;
/// assert_eq!(SERVER_ENV, "SERVER");
/// ```
pub const SERVER_ENV: &str = "SERVER";

/// Environment selected when [`SERVER_ENV`] is unset.
pub const DEFAULT_SERVER: &str = "DEV_INT";

/// Optional HTTP proxy URI applied to every outbound request.
pub const PROXY_ENV: &str = "PROXY_SERVER";

/// Turns on debug logging when set to `on` or `true`.
pub const DEBUG_ENV: &str = "DEBUG";

/// Asks runners to stop at the first failing scenario when set to `on` or
/// `true`.
pub const FAIL_FAST_ENV: &str = "FAIL_FAST";

/// Overrides the location of the environments catalogue.
pub const ENVIRONMENTS_FILE_ENV: &str = "SHELFCHECK_ENVIRONMENTS";

/// Catalogue location used when [`ENVIRONMENTS_FILE_ENV`] is unset.
pub const DEFAULT_ENVIRONMENTS_FILE: &str = "config/environments.yml";

/// Overrides the location of the YAML test-data records.
pub const DATA_FILE_ENV: &str = "SHELFCHECK_DATA";

/// Test-data location used when [`DATA_FILE_ENV`] is unset.
pub const DEFAULT_DATA_FILE: &str = "config/test_data.yml";

/// Points the behavioural scenarios at a live environment instead of the
/// local stub services.
pub const LIVE_ENV: &str = "SHELFCHECK_LIVE";
