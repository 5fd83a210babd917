//! Header metadata records.

use serde::{Deserialize, Serialize};

/// Bibliographic metadata of a digitized publication.
///
/// `title` is required by the header builder; it is optional here so that a
/// missing title surfaces as a validation error instead of a JSON error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderMetadata {
    /// Publication title
    pub title: Option<String>,

    /// URL of the source record
    pub source: Option<String>,

    /// Author of the publication
    pub author: Option<Author>,

    /// Physical description (extent)
    pub physical_description: Option<PhysicalDescription>,

    /// Publisher, date and places of publication
    pub origin_info: Option<OriginInfo>,

    /// Typed identifiers (ISBN, URN, ...)
    #[serde(default)]
    pub identifiers: Vec<Identifier>,

    /// Tools that have processed the publication so far
    #[serde(default)]
    pub processed_by: Vec<ProcessingApp>,
}

impl HeaderMetadata {
    /// Create metadata with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Parse metadata from a JSON record.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Kind of author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorKind {
    /// An organization
    Corporate,
    /// A natural person
    #[default]
    Person,
}

/// Author of the publication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Corporate or personal author
    #[serde(rename = "type", default)]
    pub kind: AuthorKind,

    /// Display name
    pub name: Option<String>,

    /// Name identifier (authority record)
    pub identifier: Option<String>,
}

/// Physical description of the publication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalDescription {
    /// Extent (e.g. "123 s.")
    pub extent: Option<String>,
}

/// Publication origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginInfo {
    pub publisher: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub places: Vec<String>,
}

/// A typed identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl Identifier {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// A processing step recorded in `encodingDesc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingApp {
    pub identifier: Option<String>,
    pub version: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub when: Option<String>,
    pub label: Option<String>,
}
