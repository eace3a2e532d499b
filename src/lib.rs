//! Shelfcheck acceptance support library.
//!
//! This library provides the helpers behind the books library acceptance
//! scenarios: test-user authentication, requests against the named backend
//! services, and validation of the captured responses against scenario
//! tables. All mutable state of a scenario lives in one [`Session`].

pub mod auth;
pub mod config;
pub mod data;
pub mod environments;
pub mod error;
pub mod http;
pub mod logging;
pub mod response;
pub mod services;
pub mod session;
pub mod transforms;
pub mod validation;

pub use error::{AcceptanceError, Result};
pub use session::Session;
