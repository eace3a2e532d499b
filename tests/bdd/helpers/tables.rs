//! Conversions from Gherkin data tables.
//!
//! rstest-bdd hands tables over as rows of cells. Header rows are recognised
//! by their cell text and dropped.

use anyhow::{Context, Result};
use shelfcheck::validation::ExpectationTable;

const FIELD_HEADERS: [&str; 2] = ["name", "type"];
const RELATION_HEADERS: [&str; 1] = ["rel"];

fn is_header(row: &[String], header: &[&str]) -> bool {
    row.len() == header.len()
        && row
            .iter()
            .zip(header)
            .all(|(cell, name)| cell.trim().eq_ignore_ascii_case(name))
}

fn without_header(rows: Vec<Vec<String>>, header: &[&str]) -> Vec<Vec<String>> {
    let mut remaining = rows.into_iter().peekable();
    if remaining.peek().is_some_and(|row| is_header(row, header)) {
        remaining.next();
    }
    remaining.collect()
}

/// Parse a `| name | type |` table into expectations.
///
/// # Errors
///
/// Fails on short rows or unknown kinds.
pub fn expectation_table(rows: Vec<Vec<String>>) -> Result<ExpectationTable> {
    ExpectationTable::from_rows(without_header(rows, &FIELD_HEADERS)).context("invalid attribute table")
}

/// Collect the relation names of a `| rel |` table.
///
/// # Errors
///
/// Fails when a row is empty.
pub fn relation_names(rows: Vec<Vec<String>>) -> Result<Vec<String>> {
    without_header(rows, &RELATION_HEADERS)
        .into_iter()
        .map(|row| {
            row.into_iter()
                .next()
                .map(|cell| cell.trim().to_owned())
                .context("relation rows need one cell")
        })
        .collect()
}
