//! Admin library API.

use super::BOOKS_MEDIA_TYPE;
use crate::environments::ServiceName;
use crate::error::Result;
use crate::http::Headers;
use crate::session::Session;
use serde_json::Value;

/// Put a book described by `payload` into the library of `user_id`.
///
/// The session must hold a token with admin rights.
///
/// # Errors
///
/// Propagates request failures, and parse failures for non-empty bodies.
pub fn add_book_to_library(session: &mut Session, user_id: u64, payload: &Value) -> Result<()> {
    let path = format!("admin/users/{user_id}/library");
    let headers = Headers::new().with("Content-Type", BOOKS_MEDIA_TYPE);
    session.post(ServiceName::AdminApi, &path, payload, headers)?;
    session.parse_last_response_if_present()?;
    Ok(())
}
