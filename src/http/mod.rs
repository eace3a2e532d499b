//! Blocking HTTP client addressing services by logical name.
//!
//! [`HttpClient::request`] resolves a [`ServiceName`] through the
//! [`ServiceRegistry`], encodes the body for the declared content type, and
//! returns the whole exchange as a [`CapturedResponse`]. Error statuses are
//! ordinary responses; only failures to obtain a response at all are errors.

mod body;

pub use body::{EncodedBody, FORM_MEDIA_TYPE, JSON_MEDIA_TYPE};

use crate::environments::{ServiceName, ServiceRegistry};
use crate::error::{AcceptanceError, Result};
use serde_json::Value;
use std::{fmt, io::Read, time::Duration};
use url::Url;

/// Upper bound on the number of body bytes retained from one response.
const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

/// HTTP methods used by the acceptance helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered request headers with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace `name`, returning the updated set.
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace `name`.
    pub fn insert(&mut self, name: &str, value: &str) {
        self.entries
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.entries.push((name.to_owned(), value.to_owned()));
    }

    /// Value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// A complete HTTP exchange as observed by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedResponse {
    method: Method,
    url: Url,
    status: u16,
    headers: Headers,
    body: Vec<u8>,
}

impl CapturedResponse {
    /// Assemble a captured response from its parts.
    #[must_use]
    pub const fn new(method: Method, url: Url, status: u16, headers: Headers, body: Vec<u8>) -> Self {
        Self {
            method,
            url,
            status,
            headers,
            body,
        }
    }

    /// Request method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Fully qualified request URI.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Response status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response header `name`, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether the body is empty or whitespace only.
    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// Client bound to one service registry.
#[derive(Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
    registry: ServiceRegistry,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("agent", &"<ureq agent>")
            .field("registry", &self.registry)
            .finish()
    }
}

impl HttpClient {
    /// Build a client for `registry`, optionally routed through `proxy`.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Configuration`] when `proxy` is not a valid
    /// proxy URI.
    pub fn new(registry: ServiceRegistry, proxy: Option<&str>) -> Result<Self> {
        let mut builder = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(30))
            .timeout_write(Duration::from_secs(30))
            .timeout(Duration::from_secs(60));
        if let Some(uri) = proxy {
            let route = ureq::Proxy::new(uri).map_err(|err| {
                AcceptanceError::configuration(format!("invalid proxy '{uri}': {err}"))
            })?;
            builder = builder.proxy(route);
        }
        Ok(Self {
            agent: builder.build(),
            registry,
        })
    }

    /// Registry used to resolve service names.
    #[must_use]
    pub const fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Send one request and capture the response.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Configuration`] when the service cannot be
    /// resolved or the body cannot be encoded, and
    /// [`AcceptanceError::Transport`] when no response was received.
    pub fn request(
        &self,
        service: ServiceName,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: &Headers,
    ) -> Result<CapturedResponse> {
        let url = self.registry.qualified_uri(service, path)?;
        let encoded = body
            .map(|payload| body::encode(payload, headers.get("Content-Type")))
            .transpose()?;

        let mut request = self.agent.request(method.as_str(), url.as_str());
        for (name, value) in headers.iter() {
            request = request.set(name, value);
        }
        tracing::debug!(%method, %url, has_body = encoded.is_some(), "sending request");

        let outcome = match encoded {
            Some(payload) => request
                .set("Content-Type", &payload.content_type)
                .send_bytes(&payload.bytes),
            None => request.call(),
        };
        let response = match outcome {
            Ok(response) | Err(ureq::Error::Status(_, response)) => response,
            Err(err) => return Err(transport_error(&url, &err)),
        };
        let captured = capture(method, url, response)?;
        tracing::debug!(
            %method,
            url = %captured.url(),
            status = captured.status(),
            bytes = captured.body().len(),
            "received response"
        );
        Ok(captured)
    }
}

fn transport_error(url: &Url, err: &impl fmt::Display) -> AcceptanceError {
    AcceptanceError::Transport {
        url: url.to_string(),
        message: err.to_string(),
    }
}

fn capture(method: Method, url: Url, response: ureq::Response) -> Result<CapturedResponse> {
    let status = response.status();
    let mut headers = Headers::new();
    for name in response.headers_names() {
        if let Some(value) = response.header(&name) {
            headers.insert(&name, value);
        }
    }
    let mut body = Vec::new();
    response
        .into_reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut body)
        .map_err(|err| transport_error(&url, &err))?;
    Ok(CapturedResponse::new(method, url, status, headers, body))
}
