//! Decoding and status assertions over a captured response.

use crate::error::{AcceptanceError, Result};
use crate::http::CapturedResponse;
use serde_json::Value;
use std::{fmt, str::FromStr};

/// Decode the body of `captured` as JSON.
///
/// # Errors
///
/// Returns [`AcceptanceError::Parse`] when the body is empty or not JSON.
pub fn parse(captured: &CapturedResponse) -> Result<Value> {
    if captured.is_body_empty() {
        return Err(AcceptanceError::Parse {
            message: format!(
                "{} {} answered {} with an empty body",
                captured.method(),
                captured.url(),
                captured.status()
            ),
        });
    }
    serde_json::from_slice(captured.body()).map_err(|err| AcceptanceError::Parse {
        message: format!("{} {}: {err}", captured.method(), captured.url()),
    })
}

/// Require the captured status to equal `expected`.
///
/// # Errors
///
/// Returns [`AcceptanceError::StatusAssertion`] on mismatch.
pub fn assert_status(captured: &CapturedResponse, expected: u16) -> Result<()> {
    if captured.status() == expected {
        Ok(())
    } else {
        Err(AcceptanceError::StatusAssertion {
            expected: expected.to_string(),
            observed: captured.status(),
        })
    }
}

/// Families of HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// `1xx`
    Informational,
    /// `2xx`
    Success,
    /// `3xx`
    Redirection,
    /// `4xx`
    ClientError,
    /// `5xx`
    ServerError,
}

impl StatusClass {
    /// Class of `status`, if it is a valid HTTP status.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfcheck::response::StatusClass;
    ///
    /// assert_eq!(StatusClass::of(204), Some(StatusClass::Success));
    /// assert_eq!(StatusClass::of(99), None);
    /// ```
    #[must_use]
    pub const fn of(status: u16) -> Option<Self> {
        match status {
            100..=199 => Some(Self::Informational),
            200..=299 => Some(Self::Success),
            300..=399 => Some(Self::Redirection),
            400..=499 => Some(Self::ClientError),
            500..=599 => Some(Self::ServerError),
            _ => None,
        }
    }

    /// Snake-case name used in scenarios.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Success => "success",
            Self::Redirection => "redirection",
            Self::ClientError => "client_error",
            Self::ServerError => "server_error",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusClass {
    type Err = AcceptanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(' ', "_").as_str() {
            "informational" => Ok(Self::Informational),
            "success" => Ok(Self::Success),
            "redirection" => Ok(Self::Redirection),
            "client_error" => Ok(Self::ClientError),
            "server_error" => Ok(Self::ServerError),
            _ => Err(AcceptanceError::configuration(format!(
                "unknown status class '{s}'"
            ))),
        }
    }
}

/// Require the captured status to belong to `class`.
///
/// # Errors
///
/// Returns [`AcceptanceError::StatusAssertion`] on mismatch.
pub fn assert_status_class(captured: &CapturedResponse, class: StatusClass) -> Result<()> {
    if StatusClass::of(captured.status()) == Some(class) {
        Ok(())
    } else {
        Err(AcceptanceError::StatusAssertion {
            expected: class.to_string(),
            observed: captured.status(),
        })
    }
}

/// Require a `204 No Content` answer with an empty body.
///
/// # Errors
///
/// Returns [`AcceptanceError::StatusAssertion`] for any other status and
/// [`AcceptanceError::Validation`] when a 204 carries a body.
pub fn assert_empty_response(captured: &CapturedResponse) -> Result<()> {
    assert_status(captured, 204)?;
    if captured.is_body_empty() {
        Ok(())
    } else {
        Err(AcceptanceError::validation(format!(
            "expected an empty body, got {:?}",
            captured.body_text()
        )))
    }
}
