//! Error types for teiconv library.

use std::io;
use thiserror::Error;

/// Result type alias for teiconv operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or merging TEI trees.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required input field is missing (title, page id, token data).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A header or page artifact is not a well-formed XML tree.
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// An input record is not valid JSON for its model.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error while rendering a tree to text.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Check whether this error is caused by missing input data.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(e) => Error::Io(io::Error::new(e.kind(), e.to_string())),
            _ => Error::Parse(err.to_string()),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Parse(format!("invalid attribute: {}", err))
    }
}
