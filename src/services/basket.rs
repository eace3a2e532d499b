//! Basket API.
//!
//! Reads accept a `process_response` flag; when set, the body is parsed into
//! the session's response data.

use crate::environments::ServiceName;
use crate::error::Result;
use crate::http::Headers;
use crate::session::Session;
use serde_json::Value;

fn process(session: &mut Session, process_response: bool) -> Result<()> {
    if process_response {
        session.parse_last_response_if_present()?;
    }
    Ok(())
}

/// Empty the current user's basket.
///
/// # Errors
///
/// Propagates request failures.
pub fn clear_basket(session: &mut Session) -> Result<()> {
    session.delete(ServiceName::Basket, "/my/baskets", Headers::new())?;
    Ok(())
}

/// Add `item` to the current user's basket.
///
/// # Errors
///
/// Propagates request failures.
pub fn add_to_basket(session: &mut Session, item: &Value) -> Result<()> {
    session.post(ServiceName::Basket, "/my/baskets/items", item, Headers::new())?;
    Ok(())
}

/// List the current user's basket.
///
/// # Errors
///
/// Propagates request failures, and parse failures when processing.
pub fn basket_item_list(session: &mut Session, process_response: bool) -> Result<()> {
    session.get(ServiceName::Basket, "/my/baskets", Headers::new())?;
    process(session, process_response)
}

/// Fetch basket item `id`.
///
/// # Errors
///
/// As [`basket_item_list`].
pub fn get_basket_item(session: &mut Session, id: &str, process_response: bool) -> Result<()> {
    let path = format!("/my/baskets/items/{id}");
    session.get(ServiceName::Basket, &path, Headers::new())?;
    process(session, process_response)
}

/// Remove basket item `id`.
///
/// # Errors
///
/// As [`basket_item_list`].
pub fn remove_basket_item(session: &mut Session, id: &str, process_response: bool) -> Result<()> {
    let path = format!("/my/baskets/items/{id}");
    session.delete(ServiceName::Basket, &path, Headers::new())?;
    process(session, process_response)
}
