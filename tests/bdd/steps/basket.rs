//! Step definitions for the basket and payment APIs.

use crate::bdd::fixtures::TestWorld;
use crate::bdd::types::Count;
use anyhow::{Context, Result};
use rstest_bdd_macros::{given, then, when};
use serde_json::Value;
use shelfcheck::data::DataKind;
use shelfcheck::services::{basket, purchasing};
use shelfcheck::validation;

const PURCHASABLE_BOOKS: &str = "is currently available for purchase";

#[given("my basket is empty")]
fn empty_basket(world: &TestWorld) -> Result<()> {
    world.with_session(basket::clear_basket)
}

#[when("I add a book to my basket")]
fn add_book(world: &TestWorld) -> Result<()> {
    let book = world.one_for(DataKind::Book, PURCHASABLE_BOOKS)?;
    let added = world.with_session(|session| {
        basket::add_to_basket(session, &book)?;
        session.parse_last_response().cloned()
    })?;
    let id = added
        .get("id")
        .and_then(Value::as_str)
        .context("basket items carry a string id")?;
    world.basket_item.set(id.to_owned());
    Ok(())
}

fn basket_item_id(world: &TestWorld) -> Result<String> {
    world
        .basket_item
        .get()
        .context("a book must be added to the basket first")
}

#[when("I request my basket")]
fn request_basket(world: &TestWorld) -> Result<()> {
    world.with_session(|session| basket::basket_item_list(session, true))
}

#[when("I request the basket item")]
fn request_basket_item(world: &TestWorld) -> Result<()> {
    let id = basket_item_id(world)?;
    world.with_session(|session| basket::get_basket_item(session, &id, true))
}

#[when("I remove the basket item")]
fn remove_basket_item(world: &TestWorld) -> Result<()> {
    let id = basket_item_id(world)?;
    world.with_session(|session| basket::remove_basket_item(session, &id, false))
}

#[when("I buy a book")]
fn buy_book(world: &TestWorld) -> Result<()> {
    let book = world.one_for(DataKind::Book, PURCHASABLE_BOOKS)?;
    let card = world.one_for(DataKind::CreditCard, "is usable in tests")?;
    world.with_session(|session| {
        purchasing::purchase_book(session, &book, &card)?;
        session.parse_last_response_if_present()?;
        Ok(())
    })
}

#[then("the basket contains {count} items")]
fn basket_holds(world: &TestWorld, count: Count) -> Result<()> {
    world.with_session(|session| {
        validation::assert_item_count(session.response_data()?, count.get())
    })
}

#[then("the basket contains {count} item")]
fn basket_holds_one(world: &TestWorld, count: Count) -> Result<()> {
    world.with_session(|session| {
        validation::assert_item_count(session.response_data()?, count.get())
    })
}
