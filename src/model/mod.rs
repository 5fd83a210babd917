//! Input records consumed by the builders.
//!
//! These mirror the JSON objects produced by the upstream digitization
//! pipeline: a header metadata record per publication and a page record
//! per scanned page, each carrying UDPipe, NameTag and ALTO annotations.

mod metadata;
mod page;

pub use metadata::{
    Author, AuthorKind, HeaderMetadata, Identifier, OriginInfo, PhysicalDescription,
    ProcessingApp,
};
pub use page::{AltoMetadata, LinguisticMetadata, Page, Token, NO_SPACE_AFTER, PUNCT_TAG};
