//! Per-scenario context passed to every helper.
//!
//! A [`Session`] owns everything a scenario mutates: the access token of the
//! current user, the token cache, and the most recent exchange. Each scenario
//! builds its own, so concurrently running scenarios share nothing.

use crate::auth::{self, Credentials, RegisteredUser, Registration, TokenCache};
use crate::config::TestConfig;
use crate::environments::{ServiceName, ServiceRegistry};
use crate::error::{AcceptanceError, Result};
use crate::http::{CapturedResponse, Headers, HttpClient, Method};
use crate::response;
use serde_json::Value;

/// Mutable state of one scenario.
#[derive(Debug)]
pub struct Session {
    client: HttpClient,
    tokens: TokenCache,
    access_token: Option<String>,
    user: Option<RegisteredUser>,
    response: Option<CapturedResponse>,
    response_data: Option<Value>,
}

impl Session {
    /// Create a session sending requests through `client`.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            tokens: TokenCache::default(),
            access_token: None,
            user: None,
            response: None,
            response_data: None,
        }
    }

    /// Create a session for the services in `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Configuration`] when `proxy` is invalid.
    pub fn for_registry(registry: ServiceRegistry, proxy: Option<&str>) -> Result<Self> {
        HttpClient::new(registry, proxy).map(Self::new)
    }

    /// Create a session for the environment selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Configuration`] when the environment or
    /// proxy cannot be resolved.
    pub fn from_config(config: &TestConfig) -> Result<Self> {
        Self::for_registry(config.service_registry()?, config.proxy.as_deref())
    }

    /// Client used for every request.
    #[must_use]
    pub const fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Tokens issued so far, keyed by username.
    #[must_use]
    pub const fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// Bearer token attached to subsequent requests.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Replace the bearer token attached to subsequent requests.
    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    /// User registered by this scenario, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&RegisteredUser> {
        self.user.as_ref()
    }

    /// Authenticate `credentials` and act as that user from now on.
    ///
    /// # Errors
    ///
    /// Propagates [`auth::get_token`] failures.
    pub fn authenticate(&mut self, credentials: &Credentials) -> Result<&str> {
        let token = auth::get_token(&self.client, &mut self.tokens, credentials)?;
        Ok(self.access_token.insert(token).as_str())
    }

    /// Register a fresh user and act as them from now on.
    ///
    /// The registration token is not cached, so a following
    /// [`Session::authenticate`] signs the new account in with its password.
    ///
    /// # Errors
    ///
    /// Propagates [`auth::register_new_user`] failures.
    pub fn register_new_user(&mut self, registration: &Registration) -> Result<&RegisteredUser> {
        let user = auth::register_new_user(&self.client, &mut rand::thread_rng(), registration)?;
        self.access_token = Some(user.access_token.clone());
        Ok(self.user.insert(user))
    }

    /// Send a request, attaching the bearer token unless `headers` carries
    /// its own `Authorization`, and keep the response as the current capture.
    ///
    /// Any previously parsed response data is discarded.
    ///
    /// # Errors
    ///
    /// Propagates [`HttpClient::request`] failures.
    pub fn request(
        &mut self,
        service: ServiceName,
        method: Method,
        path: &str,
        body: Option<&Value>,
        mut headers: Headers,
    ) -> Result<&CapturedResponse> {
        if let Some(token) = &self.access_token
            && headers.get("Authorization").is_none()
        {
            headers.insert("Authorization", &format!("Bearer {token}"));
        }
        let captured = self
            .client
            .request(service, method, path, body, &headers)?;
        self.response_data = None;
        Ok(self.response.insert(captured))
    }

    /// `GET` helper around [`Session::request`].
    ///
    /// # Errors
    ///
    /// Propagates [`Session::request`] failures.
    pub fn get(
        &mut self,
        service: ServiceName,
        path: &str,
        headers: Headers,
    ) -> Result<&CapturedResponse> {
        self.request(service, Method::Get, path, None, headers)
    }

    /// `POST` helper around [`Session::request`].
    ///
    /// # Errors
    ///
    /// Propagates [`Session::request`] failures.
    pub fn post(
        &mut self,
        service: ServiceName,
        path: &str,
        body: &Value,
        headers: Headers,
    ) -> Result<&CapturedResponse> {
        self.request(service, Method::Post, path, Some(body), headers)
    }

    /// `DELETE` helper around [`Session::request`].
    ///
    /// # Errors
    ///
    /// Propagates [`Session::request`] failures.
    pub fn delete(
        &mut self,
        service: ServiceName,
        path: &str,
        headers: Headers,
    ) -> Result<&CapturedResponse> {
        self.request(service, Method::Delete, path, None, headers)
    }

    /// The most recent exchange.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::NoCapturedResponse`] before the first
    /// request.
    pub fn last_response(&self) -> Result<&CapturedResponse> {
        self.response
            .as_ref()
            .ok_or(AcceptanceError::NoCapturedResponse)
    }

    /// Parse the most recent exchange and keep the result as response data.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::NoCapturedResponse`] before the first
    /// request and [`AcceptanceError::Parse`] when the body is not JSON.
    pub fn parse_last_response(&mut self) -> Result<&Value> {
        let parsed = response::parse(self.last_response()?)?;
        Ok(self.response_data.insert(parsed))
    }

    /// Parse the most recent exchange unless its body is empty.
    ///
    /// Error statuses often come back without a body; this keeps such
    /// responses available for status assertions.
    ///
    /// # Errors
    ///
    /// As [`Session::parse_last_response`].
    pub fn parse_last_response_if_present(&mut self) -> Result<Option<&Value>> {
        if self.last_response()?.is_body_empty() {
            self.response_data = None;
            return Ok(None);
        }
        self.parse_last_response().map(Some)
    }

    /// Response data parsed from the most recent exchange.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::NoCapturedResponse`] when nothing has been
    /// parsed since the last request.
    pub fn response_data(&self) -> Result<&Value> {
        self.response_data
            .as_ref()
            .ok_or(AcceptanceError::NoCapturedResponse)
    }
}
