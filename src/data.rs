//! Named fixture records looked up by scenarios.
//!
//! Scenarios ask for data by kind and description, for example "a book which
//! is currently available as sample". The [`DataProvider`] trait abstracts
//! where such records come from; [`YamlDataProvider`] reads them from a YAML
//! document keyed by kind and then by description.

use crate::error::{AcceptanceError, Result};
use camino::Utf8Path;
use indexmap::IndexMap;
use serde_json::Value;
use std::{fmt, fs, str::FromStr};

/// Kinds of fixture record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// A catalogue book.
    Book,
    /// A pre-provisioned account.
    User,
    /// A payment card.
    CreditCard,
}

impl DataKind {
    /// Key used for this kind in data files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::User => "user",
            Self::CreditCard => "credit_card",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = AcceptanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "book" => Ok(Self::Book),
            "user" => Ok(Self::User),
            "credit_card" => Ok(Self::CreditCard),
            _ => Err(AcceptanceError::data(format!("unknown data kind '{s}'"))),
        }
    }
}

/// Source of fixture records.
pub trait DataProvider {
    /// Return `instances` records of `kind` matching the description `which`.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Data`] when fewer than `instances` records
    /// match.
    fn data_for(&self, kind: DataKind, which: &str, instances: usize) -> Result<Vec<Value>>;

    /// Return a single record of `kind` matching `which`.
    ///
    /// # Errors
    ///
    /// As [`DataProvider::data_for`].
    fn one_for(&self, kind: DataKind, which: &str) -> Result<Value> {
        self.data_for(kind, which, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| AcceptanceError::data(format!("no {kind} which {which}")))
    }
}

/// Records grouped by kind and description, loaded from YAML.
///
/// ```yaml
/// book:
///   is currently available as sample:
///     - isbn: "9780007197545"
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlDataProvider {
    records: IndexMap<String, IndexMap<String, Vec<Value>>>,
}

impl YamlDataProvider {
    /// Parse records from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Data`] when the document does not have the
    /// kind, description, records shape.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let records = serde_saphyr::from_str(yaml)
            .map_err(|err| AcceptanceError::data(format!("invalid test data: {err}")))?;
        Ok(Self { records })
    }

    /// Read and parse the records at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceError::Data`] when the file cannot be read or
    /// parsed.
    pub fn from_path(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|err| AcceptanceError::data(format!("cannot read test data {path}: {err}")))?;
        Self::from_yaml(&text)
    }
}

impl DataProvider for YamlDataProvider {
    fn data_for(&self, kind: DataKind, which: &str, instances: usize) -> Result<Vec<Value>> {
        let available = self
            .records
            .get(kind.as_str())
            .and_then(|by_description| by_description.get(which))
            .map_or(&[][..], Vec::as_slice);
        if available.len() < instances {
            return Err(AcceptanceError::data(format!(
                "wanted {instances} {kind} records which {which}, found {}",
                available.len()
            )));
        }
        tracing::debug!(%kind, which, instances, "resolved test data");
        Ok(available.iter().take(instances).cloned().collect())
    }
}
