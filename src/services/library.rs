//! Consumer library API.

use super::BOOKS_MEDIA_TYPE;
use crate::environments::ServiceName;
use crate::error::Result;
use crate::http::Headers;
use crate::session::Session;
use serde_json::json;

fn accept() -> Headers {
    Headers::new().with("Accept", BOOKS_MEDIA_TYPE)
}

/// Fetch the current user's library.
///
/// # Errors
///
/// Propagates request failures, and parse failures for non-empty bodies.
pub fn get_library(session: &mut Session) -> Result<()> {
    session.get(ServiceName::ConsumerApi, "/my/library", accept())?;
    session.parse_last_response_if_present()?;
    Ok(())
}

/// Fetch one item of the current user's library.
///
/// # Errors
///
/// As [`get_library`].
pub fn get_library_item(session: &mut Session, isbn: &str) -> Result<()> {
    let path = format!("/my/library/{isbn}");
    session.get(ServiceName::ConsumerApi, &path, accept())?;
    session.parse_last_response_if_present()?;
    Ok(())
}

/// Add the sample edition of `isbn` to the current user's library.
///
/// # Errors
///
/// As [`get_library`].
pub fn add_sample(session: &mut Session, isbn: &str) -> Result<()> {
    session.post(
        ServiceName::ConsumerApi,
        "/my/library/samples",
        &json!({ "isbn": isbn }),
        accept(),
    )?;
    session.parse_last_response_if_present()?;
    Ok(())
}
