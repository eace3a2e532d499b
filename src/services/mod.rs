//! Route helpers for each remote API surface.
//!
//! Every helper sends its request through the [`Session`](crate::Session), so
//! the response becomes the current capture, and parses the body into the
//! session's response data when there is one to parse.

pub mod admin;
pub mod basket;
pub mod library;
pub mod purchasing;

/// Versioned media type spoken by the library and admin APIs.
pub const BOOKS_MEDIA_TYPE: &str = "application/vnd.blinkbox.books.v2+json";
