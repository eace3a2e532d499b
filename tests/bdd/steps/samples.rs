//! Step definitions for sample books.

use crate::bdd::fixtures::TestWorld;
use crate::bdd::helpers::tables;
use crate::bdd::types::Count;
use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rstest_bdd_macros::{given, then, when};
use serde_json::{Value, json};
use shelfcheck::data::DataKind;
use shelfcheck::response::{self, StatusClass};
use shelfcheck::services::library;
use shelfcheck::validation::{self, KeyMatch, Target};

const SAMPLE_BOOKS: &str = "is currently available as sample";

fn isbn_of(book: &Value) -> Result<String> {
    book.get("isbn")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .context("book records need a string 'isbn'")
}

fn provision_samples(world: &TestWorld, count: Count) -> Result<()> {
    let books = world.data_for(DataKind::Book, SAMPLE_BOOKS, count.get())?;
    let mut isbns = Vec::with_capacity(books.len());
    for book in &books {
        let isbn = isbn_of(book)?;
        world.with_session(|session| {
            library::add_sample(session, &isbn)?;
            response::assert_status_class(session.last_response()?, StatusClass::Success)
        })?;
        isbns.push(isbn);
    }
    world.samples.set(isbns);
    Ok(())
}

#[given("I have {count} sample library items")]
fn sample_items(world: &TestWorld, count: Count) -> Result<()> {
    provision_samples(world, count)
}

#[given("I have {count} sample library item")]
fn sample_item(world: &TestWorld, count: Count) -> Result<()> {
    provision_samples(world, count)
}

/// Pick one provisioned sample, or a sample book outside the library when
/// none were provisioned.
fn sample_isbn(world: &TestWorld) -> Result<String> {
    let provisioned = world.samples.get().unwrap_or_default();
    if let Some(isbn) = provisioned.choose(&mut rand::thread_rng()) {
        return Ok(isbn.clone());
    }
    isbn_of(&world.one_for(DataKind::Book, SAMPLE_BOOKS)?)
}

#[when("I request a sample book's details")]
fn request_a_sample(world: &TestWorld) -> Result<()> {
    let isbn = sample_isbn(world)?;
    world.with_session(|session| library::get_library_item(session, &isbn))
}

#[when("I request the sample book's details")]
fn request_the_sample(world: &TestWorld) -> Result<()> {
    let isbn = sample_isbn(world)?;
    world.with_session(|session| library::get_library_item(session, &isbn))
}

#[then("the ownership status is {ownership}")]
fn ownership_status(world: &TestWorld, ownership: String) -> Result<()> {
    world.with_session(|session| {
        validation::assert_field_eq(session.response_data()?, "ownership", &json!(ownership))
    })
}

#[then("the response contains the following items")]
fn response_contains(world: &TestWorld, datatable: Vec<Vec<String>>) -> Result<()> {
    let table = tables::expectation_table(datatable)?;
    world.with_session(|session| {
        validation::validate_attributes(
            session.response_data()?,
            &table,
            KeyMatch::Subset,
            Target::Document,
        )
    })
}
