//! Error taxonomy shared by every acceptance helper.
//!
//! Each variant maps to one failure class of an acceptance run. None of them
//! are retried: a step that returns an error fails its scenario.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = AcceptanceError> = std::result::Result<T, E>;

/// Errors raised while talking to, or asserting on, the remote services.
#[derive(Debug, Error, Diagnostic)]
pub enum AcceptanceError {
    /// A service, environment or URI could not be resolved from configuration.
    #[error("configuration error: {message}")]
    #[diagnostic(
        code(shelfcheck::config),
        help("check the environments catalogue and the SERVER variable")
    )]
    Configuration {
        /// Description of the misconfiguration.
        message: String,
    },

    /// The request never produced an HTTP response.
    #[error("transport error calling {url}: {message}")]
    #[diagnostic(code(shelfcheck::transport))]
    Transport {
        /// Fully qualified request URI.
        url: String,
        /// Underlying client failure.
        message: String,
    },

    /// A grant exchange was rejected or returned no access token.
    #[error("authentication failed for {username}: {reason}")]
    #[diagnostic(code(shelfcheck::auth))]
    Authentication {
        /// Username presented to the auth service.
        username: String,
        /// Why the exchange is considered failed.
        reason: String,
    },

    /// A response body expected to hold JSON did not.
    #[error("response body is not valid JSON: {message}")]
    #[diagnostic(
        code(shelfcheck::parse),
        help("check the status and body emptiness before parsing")
    )]
    Parse {
        /// Decoder failure description.
        message: String,
    },

    /// The captured status did not satisfy the expectation.
    #[error("expected status {expected}, got {observed}")]
    #[diagnostic(code(shelfcheck::status))]
    StatusAssertion {
        /// Expected status code or class.
        expected: String,
        /// Observed status code.
        observed: u16,
    },

    /// The response payload did not match the scenario's expectations.
    #[error("response validation failed:\n{}", .problems.join("\n"))]
    #[diagnostic(code(shelfcheck::validation))]
    Validation {
        /// Every individual mismatch found.
        problems: Vec<String>,
    },

    /// A response assertion ran before any request was made.
    #[error("no response has been captured yet")]
    #[diagnostic(
        code(shelfcheck::no_response),
        help("a request step must run before response assertions")
    )]
    NoCapturedResponse,

    /// The test-data provider could not satisfy a lookup.
    #[error("test data error: {message}")]
    #[diagnostic(code(shelfcheck::data))]
    Data {
        /// Description of the failed lookup.
        message: String,
    },
}

impl AcceptanceError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn validation(problem: impl Into<String>) -> Self {
        Self::Validation {
            problems: vec![problem.into()],
        }
    }

    pub(crate) fn data(message: impl Into<String>) -> Self {
        Self::Data {
            message: message.into(),
        }
    }
}
