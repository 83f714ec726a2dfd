//! Corpus types
//!
//! A document in the corpus is addressed by id plus an optional as-of
//! date, since the same act has different consolidated texts over time.
//! Bodies arrive pre-formatted from the upstream provider and are treated
//! as opaque markup.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of one version of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    pub id: String,
    /// Validity date of the consolidated text; `None` means current.
    pub as_of: Option<NaiveDate>,
}

impl DocumentKey {
    pub fn new(id: impl Into<String>, as_of: Option<NaiveDate>) -> Self {
        Self {
            id: id.into(),
            as_of,
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_of {
            Some(date) => write!(f, "{}@{}", self.id, date),
            None => write!(f, "{}@current", self.id),
        }
    }
}

/// A fetched document body plus its advisory metadata.
///
/// Immutable per render; the anchoring engine never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedBody {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
}

/// Corpus failures. "Not found" is distinct from "fetch failed": the
/// first is a property of the corpus, the second of the transport.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("corpus fetch failed: {0}")]
    Fetch(String),
}
