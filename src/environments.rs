//! Service registry and the environments catalogue it is built from.
//!
//! The catalogue is a YAML document naming each environment and the base URI
//! of every service in it:
//!
//! ```yaml
//! DEV_INT:
//!   servers:
//!     auth: https://auth.dev.example.test
//!     consumer_api: https://api.dev.example.test/service
//! ```
//!
//! Selecting an environment yields a [`ServiceRegistry`], which is read-only
//! for the rest of the run.

use crate::error::{AcceptanceError, Result};
use camino::Utf8Path;
use indexmap::IndexMap;
use serde::Deserialize;
use std::{collections::BTreeMap, fmt, fs, str::FromStr};
use url::Url;

/// Logical name of a backend service reachable over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceName {
    /// OAuth2 token and registration endpoint.
    Auth,
    /// Public consumer API serving the library.
    ConsumerApi,
    /// Administrative API.
    AdminApi,
    /// Shopping basket service.
    Basket,
    /// Payment service.
    Payment,
}

impl ServiceName {
    /// Every known service, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Auth,
        Self::ConsumerApi,
        Self::AdminApi,
        Self::Basket,
        Self::Payment,
    ];

    /// Configuration key for the service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::ConsumerApi => "consumer_api",
            Self::AdminApi => "admin_api",
            Self::Basket => "basket",
            Self::Payment => "payment",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceName {
    type Err = AcceptanceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| AcceptanceError::configuration(format!("unknown service '{s}'")))
    }
}

/// Base URIs of the services available to a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceRegistry {
    servers: BTreeMap<ServiceName, Url>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `base` as the location of `service`.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Configuration`] when `base` is not an
    /// absolute URI.
    pub fn with_service(mut self, service: ServiceName, base: &str) -> Result<Self> {
        let url = Url::parse(base).map_err(|err| {
            AcceptanceError::configuration(format!("invalid URI '{base}' for {service}: {err}"))
        })?;
        self.servers.insert(service, url);
        Ok(self)
    }

    /// Register every service against the same base URI.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Configuration`] when `base` is not an
    /// absolute URI.
    pub fn uniform(base: &str) -> Result<Self> {
        ServiceName::ALL
            .into_iter()
            .try_fold(Self::new(), |registry, service| {
                registry.with_service(service, base)
            })
    }

    /// Base URI of `service`.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Configuration`] when the service has no
    /// configured location.
    pub fn base_uri(&self, service: ServiceName) -> Result<&Url> {
        self.servers.get(&service).ok_or_else(|| {
            AcceptanceError::configuration(format!("service '{service}' is not configured"))
        })
    }

    /// Join the base URI of `service` with `path`.
    ///
    /// Exactly one `/` separates the two, whether or not `path` starts with
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Configuration`] when the service is unknown
    /// or the joined URI does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfcheck::environments::{ServiceName, ServiceRegistry};
    ///
    /// let registry = ServiceRegistry::new()
    ///     .with_service(ServiceName::AdminApi, "https://admin.example.test/")
    ///     .expect("valid base URI");
    /// let uri = registry
    ///     .qualified_uri(ServiceName::AdminApi, "admin/users/1/library")
    ///     .expect("joined URI");
    /// assert_eq!(uri.as_str(), "https://admin.example.test/admin/users/1/library");
    /// ```
    pub fn qualified_uri(&self, service: ServiceName, path: &str) -> Result<Url> {
        let base = self.base_uri(service)?;
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|err| {
            AcceptanceError::configuration(format!("invalid URI '{joined}' for {service}: {err}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct EnvironmentEntry {
    servers: IndexMap<String, String>,
}

/// Named environments loaded from the catalogue file.
#[derive(Debug, Default)]
pub struct EnvironmentCatalog {
    environments: IndexMap<String, EnvironmentEntry>,
}

impl EnvironmentCatalog {
    /// Parse a catalogue from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Configuration`] when the document is not a
    /// mapping of environments to `servers` maps.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let environments: IndexMap<String, EnvironmentEntry> = serde_saphyr::from_str(yaml)
            .map_err(|err| {
                AcceptanceError::configuration(format!("invalid environments catalogue: {err}"))
            })?;
        Ok(Self { environments })
    }

    /// Read and parse the catalogue at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Configuration`] when the file cannot be
    /// read or parsed.
    pub fn from_path(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| {
            AcceptanceError::configuration(format!("cannot read environments file {path}: {err}"))
        })?;
        Self::from_yaml(&text)
    }

    /// Names of every environment in the catalogue.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(String::as_str)
    }

    /// Build the registry for `environment`, matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Configuration`] when the environment is not
    /// in the catalogue, names an unknown service, or holds an invalid URI.
    pub fn registry(&self, environment: &str) -> Result<ServiceRegistry> {
        let entry = self
            .environments
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(environment))
            .map(|(_, entry)| entry)
            .ok_or_else(|| {
                AcceptanceError::configuration(format!("unknown environment '{environment}'"))
            })?;
        entry
            .servers
            .iter()
            .try_fold(ServiceRegistry::new(), |registry, (name, base)| {
                registry.with_service(name.parse()?, base)
            })
    }
}
