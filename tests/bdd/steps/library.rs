//! Step definitions for the consumer library API.

use crate::bdd::fixtures::TestWorld;
use crate::bdd::types::Count;
use anyhow::Result;
use rstest_bdd_macros::{given, then, when};
use shelfcheck::data::DataKind;
use shelfcheck::response::{self, StatusClass};
use shelfcheck::services::{basket, library, purchasing};
use shelfcheck::validation;

/// A book every environment keeps out of new libraries.
const MISSING_ISBN: &str = "9780297859406";
/// The book provisioned first by sample scenarios.
const PRESENT_ISBN: &str = "9780007197545";

fn provision_owned(world: &TestWorld, count: Count) -> Result<()> {
    if count.get() == 0 {
        return Ok(());
    }
    let books = world.data_for(
        DataKind::Book,
        "is currently available for purchase",
        count.get(),
    )?;
    let card = world.one_for(DataKind::CreditCard, "is usable in tests")?;
    for book in &books {
        world.with_session(|session| {
            basket::clear_basket(session)?;
            purchasing::purchase_book(session, book, &card)?;
            response::assert_status_class(session.last_response()?, StatusClass::Success)
        })?;
    }
    Ok(())
}

#[given("I have {count} library items in my library")]
fn owned_items(world: &TestWorld, count: Count) -> Result<()> {
    provision_owned(world, count)
}

#[given("I have {count} library item in my library")]
fn owned_item(world: &TestWorld, count: Count) -> Result<()> {
    provision_owned(world, count)
}

#[when("I request my library")]
fn request_library(world: &TestWorld) -> Result<()> {
    world.with_session(library::get_library)
}

#[when("I request a library item")]
fn request_present_item(world: &TestWorld) -> Result<()> {
    world.with_session(|session| library::get_library_item(session, PRESENT_ISBN))
}

#[when("I request a library item which does not exist in my library")]
fn request_missing_item(world: &TestWorld) -> Result<()> {
    world.with_session(|session| library::get_library_item(session, MISSING_ISBN))
}

fn assert_items(
    world: &TestWorld,
    check: impl FnOnce(&serde_json::Value) -> shelfcheck::Result<()>,
) -> Result<()> {
    world.with_session(|session| check(session.response_data()?))
}

#[then("the response is a list that is empty")]
fn list_is_empty(world: &TestWorld) -> Result<()> {
    assert_items(world, |data| validation::assert_item_count(data, 0))
}

#[then("the response is a list containing at least {count} library items")]
fn list_has_at_least(world: &TestWorld, count: Count) -> Result<()> {
    assert_items(world, |data| validation::assert_min_item_count(data, count.get()))
}

#[then("the response is a list containing at least {count} library item")]
fn list_has_at_least_one(world: &TestWorld, count: Count) -> Result<()> {
    assert_items(world, |data| validation::assert_min_item_count(data, count.get()))
}

#[then("the response is a list containing exactly {count} library items")]
fn list_has_exactly(world: &TestWorld, count: Count) -> Result<()> {
    assert_items(world, |data| validation::assert_item_count(data, count.get()))
}

#[then("the response is a list containing exactly {count} library item")]
fn list_has_exactly_one(world: &TestWorld, count: Count) -> Result<()> {
    assert_items(world, |data| validation::assert_item_count(data, count.get()))
}
