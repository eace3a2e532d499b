//! Checkout through the payment API.

use super::basket;
use crate::environments::ServiceName;
use crate::error::Result;
use crate::http::Headers;
use crate::session::Session;
use serde_json::{Value, json};

/// Put `book` in the basket and pay for the basket with `credit_card`.
///
/// The payment exchange is left as the current capture.
///
/// # Errors
///
/// Propagates request failures of either step.
pub fn purchase_book(session: &mut Session, book: &Value, credit_card: &Value) -> Result<()> {
    basket::add_to_basket(session, book)?;
    let order = json!({ "creditCard": credit_card });
    session.post(ServiceName::Payment, "/my/payments", &order, Headers::new())?;
    Ok(())
}
