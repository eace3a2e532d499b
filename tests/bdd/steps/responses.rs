//! Step definitions asserting on the captured response.

use crate::bdd::fixtures::TestWorld;
use crate::bdd::helpers::tables;
use anyhow::Result;
use rstest_bdd_macros::then;
use shelfcheck::response::{self, StatusClass};
use shelfcheck::validation::{self, ExpectationTable, KeyMatch, RelationKind, Target};

fn check_attributes(
    world: &TestWorld,
    datatable: Vec<Vec<String>>,
    key_match: KeyMatch,
    target: Target,
) -> Result<()> {
    let table: ExpectationTable = tables::expectation_table(datatable)?;
    world.with_session(|session| {
        validation::validate_attributes(session.response_data()?, &table, key_match, target)
    })
}

fn check_relations(
    world: &TestWorld,
    datatable: Vec<Vec<String>>,
    kind: RelationKind,
    target: Target,
) -> Result<()> {
    let expected = tables::relation_names(datatable)?;
    world.with_session(|session| {
        validation::validate_relations(session.response_data()?, kind, &expected, target)
    })
}

#[then("a valid reason for the failure is returned")]
fn failure_reason(world: &TestWorld) -> Result<()> {
    world.with_session(|session| validation::assert_failure_reason(session.response_data()?))
}

#[then("the error reason is {reason:string}")]
fn error_reason(world: &TestWorld, reason: &str) -> Result<()> {
    world.with_session(|session| validation::assert_error_code(session.response_data()?, reason))
}

#[then("each {subject} has the following attributes:")]
fn each_has(world: &TestWorld, subject: String, datatable: Vec<Vec<String>>) -> Result<()> {
    tracing::debug!(%subject, "checking exact attributes of each item");
    check_attributes(world, datatable, KeyMatch::Exact, Target::EachItem)
}

#[then("each {subject} includes the following attributes:")]
fn each_includes(world: &TestWorld, subject: String, datatable: Vec<Vec<String>>) -> Result<()> {
    tracing::debug!(%subject, "checking attributes of each item");
    check_attributes(world, datatable, KeyMatch::Subset, Target::EachItem)
}

#[then("the {subject} has the following attributes:")]
fn document_has(world: &TestWorld, subject: String, datatable: Vec<Vec<String>>) -> Result<()> {
    tracing::debug!(%subject, "checking exact attributes");
    check_attributes(world, datatable, KeyMatch::Exact, Target::Document)
}

#[then("the {subject} includes the following attributes:")]
fn document_includes(
    world: &TestWorld,
    subject: String,
    datatable: Vec<Vec<String>>,
) -> Result<()> {
    tracing::debug!(%subject, "checking attributes");
    check_attributes(world, datatable, KeyMatch::Subset, Target::Document)
}

#[then("each {subject} has the following links:")]
fn each_links(world: &TestWorld, subject: String, datatable: Vec<Vec<String>>) -> Result<()> {
    tracing::debug!(%subject, "checking links of each item");
    check_relations(world, datatable, RelationKind::Links, Target::EachItem)
}

#[then("the {subject} has the following links:")]
fn document_links(world: &TestWorld, subject: String, datatable: Vec<Vec<String>>) -> Result<()> {
    tracing::debug!(%subject, "checking links");
    check_relations(world, datatable, RelationKind::Links, Target::Document)
}

#[then("each {subject} has the following images:")]
fn each_images(world: &TestWorld, subject: String, datatable: Vec<Vec<String>>) -> Result<()> {
    tracing::debug!(%subject, "checking images of each item");
    check_relations(world, datatable, RelationKind::Images, Target::EachItem)
}

#[then("the {subject} has the following images:")]
fn document_images(world: &TestWorld, subject: String, datatable: Vec<Vec<String>>) -> Result<()> {
    tracing::debug!(%subject, "checking images");
    check_relations(world, datatable, RelationKind::Images, Target::Document)
}

#[then("the request was successful and an empty response is returned")]
fn empty_success(world: &TestWorld) -> Result<()> {
    world.with_session(|session| response::assert_empty_response(session.last_response()?))
}

#[then("the response status is {status:u16}")]
fn status_is(world: &TestWorld, status: u16) -> Result<()> {
    world.with_session(|session| response::assert_status(session.last_response()?, status))
}

#[then("the response status class is {class}")]
fn status_class_is(world: &TestWorld, class: StatusClass) -> Result<()> {
    world.with_session(|session| response::assert_status_class(session.last_response()?, class))
}
