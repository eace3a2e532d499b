//! Step definitions for the admin library API.

use crate::bdd::fixtures::TestWorld;
use anyhow::{Context, Result};
use rstest_bdd_macros::{given, when};
use shelfcheck::auth::{self, Registration};
use shelfcheck::data::DataKind;
use shelfcheck::services::admin;

#[given("I have a customer id who I want to give a book to")]
fn register_customer(world: &TestWorld) -> Result<()> {
    let customer = world.with_session(|session| {
        auth::register_new_user(
            session.client(),
            &mut rand::thread_rng(),
            &Registration::default(),
        )
    })?;
    let user_id = customer
        .user_id
        .context("registration returned no usable user_id for the customer")?;
    world.customer_id.set(user_id);
    Ok(())
}

#[when("I add a book with a valid ISBN")]
fn add_book_for_customer(world: &TestWorld) -> Result<()> {
    let customer = world
        .customer_id
        .get()
        .context("a customer must be registered first")?;
    let mut book = world.one_for(DataKind::Book, "is currently available for purchase")?;
    book.as_object_mut()
        .context("book records must be objects")?
        .insert("ownership".into(), "Owned".into());
    world.with_session(|session| admin::add_book_to_library(session, customer, &book))
}
