//! Payload validators driven by scenario tables.
//!
//! Validators take a parsed JSON document and an expectation, collect every
//! mismatch, and report them together as one
//! [`AcceptanceError::Validation`]. Attribute and relation checks apply either
//! to the document itself or to each element of its `items` array, selected
//! by [`Target`].

mod timestamp;

use crate::error::{AcceptanceError, Result};
use indexmap::IndexSet;
use itertools::Itertools;
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

/// Key holding the elements of a collection response.
pub const ITEMS_KEY: &str = "items";

/// Value kinds a scenario may require of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// JSON string.
    String,
    /// JSON number. Also named `Integer`, `Fixnum`, `Float` or `Numeric`.
    Number,
    /// JSON boolean.
    Boolean,
    /// String holding a calendar date or timestamp.
    Date,
    /// String holding a timestamp. Also named `Time`.
    DateTime,
    /// JSON object. Also named `Hash`.
    Object,
    /// JSON array.
    Array,
}

impl FieldKind {
    /// Canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::Object => "Object",
            Self::Array => "Array",
        }
    }

    /// Whether `value` is of this kind.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Date | Self::DateTime => value.as_str().is_some_and(timestamp::is_timestamp),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = AcceptanceError;

    fn from_str(s: &str) -> Result<Self> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "string" => Self::String,
            "number" | "integer" | "fixnum" | "float" | "numeric" => Self::Number,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "datetime" | "time" => Self::DateTime,
            "object" | "hash" => Self::Object,
            "array" => Self::Array,
            _ => {
                return Err(AcceptanceError::validation(format!(
                    "unknown field kind '{s}'"
                )));
            }
        };
        Ok(kind)
    }
}

/// One `(field, kind)` row of an expectation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExpectation {
    /// Field name.
    pub name: String,
    /// Required kind of the field's value.
    pub kind: FieldKind,
}

/// Ordered field expectations declared by a scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectationTable {
    fields: Vec<FieldExpectation>,
}

impl ExpectationTable {
    /// Build a table from `(name, kind)` rows.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Validation`] listing every row that lacks
    /// two cells or names an unknown kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfcheck::validation::{ExpectationTable, FieldKind};
    ///
    /// let table = ExpectationTable::from_rows([["isbn", "String"], ["addedDate", "Date"]])?;
    /// assert_eq!(table.names().collect::<Vec<_>>(), ["isbn", "addedDate"]);
    /// # Ok::<(), shelfcheck::AcceptanceError>(())
    /// ```
    pub fn from_rows<I, R, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = Vec::new();
        let mut problems = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            let mut cells = row.into_iter();
            match (cells.next(), cells.next()) {
                (Some(name), Some(kind_text)) => match kind_text.as_ref().parse::<FieldKind>() {
                    Ok(kind) => fields.push(FieldExpectation {
                        name: name.as_ref().trim().to_owned(),
                        kind,
                    }),
                    Err(_) => problems.push(format!(
                        "row {}: unknown field kind '{}' for '{}'",
                        index + 1,
                        kind_text.as_ref(),
                        name.as_ref()
                    )),
                },
                _ => problems.push(format!("row {}: expected a field name and a kind", index + 1)),
            }
        }
        if problems.is_empty() {
            Ok(Self { fields })
        } else {
            Err(AcceptanceError::Validation { problems })
        }
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Iterate over the expectations.
    pub fn iter(&self) -> impl Iterator<Item = &FieldExpectation> {
        self.fields.iter()
    }

    /// Number of expectations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the table holds no expectations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// How an object's key set must relate to the expected names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    /// The key set equals the expected names.
    Exact,
    /// The key set includes the expected names.
    Subset,
}

/// What a validator inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Every element of the document's `items` array.
    EachItem,
    /// The document itself.
    Document,
}

/// Embedded relation arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Hyperlinks under `links`.
    Links,
    /// Image references under `images`.
    Images,
}

impl RelationKind {
    /// Key of the relation array.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Links => "links",
            Self::Images => "images",
        }
    }
}

/// Report collected problems, if any.
fn finish(problems: Vec<String>) -> Result<()> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(AcceptanceError::Validation { problems })
    }
}

/// Resolve `target` into labelled objects, recording problems for anything
/// that is not an object.
fn targets<'a>(
    value: &'a Value,
    target: Target,
    problems: &mut Vec<String>,
) -> Vec<(String, &'a Map<String, Value>)> {
    match target {
        Target::Document => match value.as_object() {
            Some(object) => vec![(String::from("document"), object)],
            None => {
                problems.push(format!("document is not an object: {value}"));
                Vec::new()
            }
        },
        Target::EachItem => match value.get(ITEMS_KEY).and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    let label = format!("{ITEMS_KEY}[{index}]");
                    let Some(object) = item.as_object() else {
                        problems.push(format!("{label} is not an object: {item}"));
                        return None;
                    };
                    Some((label, object))
                })
                .collect(),
            None => {
                problems.push(format!("document has no '{ITEMS_KEY}' array"));
                Vec::new()
            }
        },
    }
}

fn check_object(
    label: &str,
    object: &Map<String, Value>,
    table: &ExpectationTable,
    key_match: KeyMatch,
    problems: &mut Vec<String>,
) {
    let expected: IndexSet<&str> = table.names().collect();
    let missing = expected
        .iter()
        .filter(|name| !object.contains_key(**name))
        .join(", ");
    if !missing.is_empty() {
        problems.push(format!("{label} is missing keys: {missing}"));
    }
    if key_match == KeyMatch::Exact {
        let unexpected = object
            .keys()
            .filter(|key| !expected.contains(key.as_str()))
            .join(", ");
        if !unexpected.is_empty() {
            problems.push(format!("{label} has unexpected keys: {unexpected}"));
        }
    }
    for field in table.iter() {
        if let Some(value) = object.get(&field.name)
            && !field.kind.accepts(value)
        {
            problems.push(format!(
                "{label}.{} should be {} but was {value}",
                field.name, field.kind
            ));
        }
    }
}

/// Check that the target objects carry the tabled fields with the tabled
/// kinds.
///
/// # Errors
///
/// Returns [`AcceptanceError::Validation`] listing every mismatch across all
/// targeted objects.
pub fn validate_attributes(
    value: &Value,
    table: &ExpectationTable,
    key_match: KeyMatch,
    target: Target,
) -> Result<()> {
    let mut problems = Vec::new();
    for (label, object) in targets(value, target, &mut problems) {
        check_object(&label, object, table, key_match, &mut problems);
    }
    finish(problems)
}

fn relation_name(entry: &Value) -> Option<&str> {
    entry
        .get("rel")
        .or_else(|| entry.get("relationship"))
        .and_then(Value::as_str)
}

/// Check that each target object exposes exactly the `expected` relations in
/// its `links` or `images` array.
///
/// Entries name their relation with `rel`, or `relationship` when `rel` is
/// absent.
///
/// # Errors
///
/// Returns [`AcceptanceError::Validation`] naming the missing and unexpected
/// relations of every targeted object.
pub fn validate_relations<S: AsRef<str>>(
    value: &Value,
    kind: RelationKind,
    expected: &[S],
    target: Target,
) -> Result<()> {
    let wanted: IndexSet<&str> = expected.iter().map(AsRef::as_ref).collect();
    let mut problems = Vec::new();
    for (label, object) in targets(value, target, &mut problems) {
        let Some(entries) = object.get(kind.key()).and_then(Value::as_array) else {
            problems.push(format!("{label} has no '{}' array", kind.key()));
            continue;
        };
        let mut actual = IndexSet::new();
        for (index, entry) in entries.iter().enumerate() {
            match relation_name(entry) {
                Some(name) => {
                    actual.insert(name);
                }
                None => problems.push(format!(
                    "{label}.{}[{index}] has no relation name",
                    kind.key()
                )),
            }
        }
        let missing = wanted.difference(&actual).join(", ");
        if !missing.is_empty() {
            problems.push(format!("{label} is missing {}: {missing}", kind.key()));
        }
        let unexpected = actual.difference(&wanted).join(", ");
        if !unexpected.is_empty() {
            problems.push(format!("{label} has unexpected {}: {unexpected}", kind.key()));
        }
    }
    finish(problems)
}

/// Require an error body whose keys are exactly `code` and `description`.
///
/// # Errors
///
/// Returns [`AcceptanceError::Validation`] otherwise.
pub fn assert_failure_reason(value: &Value) -> Result<()> {
    let Some(object) = value.as_object() else {
        return Err(AcceptanceError::validation(format!(
            "error body is not an object: {value}"
        )));
    };
    let keys: IndexSet<&str> = object.keys().map(String::as_str).collect();
    let expected: IndexSet<&str> = ["code", "description"].into_iter().collect();
    if keys == expected {
        Ok(())
    } else {
        Err(AcceptanceError::validation(format!(
            "error body keys should be exactly code, description but were {}",
            keys.iter().join(", ")
        )))
    }
}

/// Require the error `code` to end with `reason`, spaces read as underscores.
///
/// # Errors
///
/// Returns [`AcceptanceError::Validation`] when `code` is absent, not a
/// string, or has a different suffix.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use shelfcheck::validation::assert_error_code;
///
/// let body = json!({"code": "LibraryItemNotFound.item_not_found", "description": "x"});
/// assert!(assert_error_code(&body, "item not found").is_ok());
/// ```
pub fn assert_error_code(value: &Value, reason: &str) -> Result<()> {
    let suffix = reason.trim().replace(' ', "_");
    match value.get("code").and_then(Value::as_str) {
        Some(code) if code.ends_with(&suffix) => Ok(()),
        Some(code) => Err(AcceptanceError::validation(format!(
            "error code '{code}' does not end with '{suffix}'"
        ))),
        None => Err(AcceptanceError::validation(format!(
            "error body has no string 'code': {value}"
        ))),
    }
}

fn items(value: &Value) -> Result<&Vec<Value>> {
    value
        .get(ITEMS_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| AcceptanceError::validation(format!("document has no '{ITEMS_KEY}' array")))
}

/// Require exactly `expected` elements in `items`.
///
/// # Errors
///
/// Returns [`AcceptanceError::Validation`] on a different count or a missing
/// `items` array.
pub fn assert_item_count(value: &Value, expected: usize) -> Result<()> {
    let count = items(value)?.len();
    if count == expected {
        Ok(())
    } else {
        Err(AcceptanceError::validation(format!(
            "expected {expected} items, found {count}"
        )))
    }
}

/// Require at least `minimum` elements in `items`.
///
/// # Errors
///
/// Returns [`AcceptanceError::Validation`] on a smaller count or a missing
/// `items` array.
pub fn assert_min_item_count(value: &Value, minimum: usize) -> Result<()> {
    let count = items(value)?.len();
    if count >= minimum {
        Ok(())
    } else {
        Err(AcceptanceError::validation(format!(
            "expected at least {minimum} items, found {count}"
        )))
    }
}

/// Require `field` of the document to equal `expected`.
///
/// # Errors
///
/// Returns [`AcceptanceError::Validation`] when the field is absent or
/// differs.
pub fn assert_field_eq(value: &Value, field: &str, expected: &Value) -> Result<()> {
    match value.get(field) {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(AcceptanceError::validation(format!(
            "expected {field} to be {expected}, was {actual}"
        ))),
        None => Err(AcceptanceError::validation(format!(
            "document has no '{field}' field"
        ))),
    }
}
