//! Catalog records as seen by the search core.
//!
//! The core only reads a handful of fields (title, description, authors);
//! everything else a catalog record carries is kept in `fields` and passed
//! through to the response untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A catalog record returned by the index store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Stable identifier of the record.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Long-form description, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Author names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// Remaining catalog fields, opaque to search.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CatalogDocument {
    /// Create a document with a title and nothing else.
    pub fn new<S: Into<String>, T: Into<String>>(id: S, title: T) -> Self {
        CatalogDocument {
            id: id.into(),
            title: title.into(),
            description: None,
            authors: Vec::new(),
            fields: Map::new(),
        }
    }

    /// Set the description.
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an author.
    pub fn with_author<S: Into<String>>(mut self, author: S) -> Self {
        self.authors.push(author.into());
        self
    }

    /// Attach an opaque catalog field.
    pub fn with_field<S: Into<String>>(mut self, name: S, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

/// A mutation of the catalog. Every kind invalidates the whole search cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum CatalogEvent {
    Created(String),
    Updated(String),
    Deleted(String),
}

impl CatalogEvent {
    /// Identifier of the affected record.
    pub fn document_id(&self) -> &str {
        match self {
            CatalogEvent::Created(id) | CatalogEvent::Updated(id) | CatalogEvent::Deleted(id) => {
                id
            }
        }
    }

    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogEvent::Created(_) => "created",
            CatalogEvent::Updated(_) => "updated",
            CatalogEvent::Deleted(_) => "deleted",
        }
    }
}
