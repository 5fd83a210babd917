//! Minimal XML tree used for every intermediate and final artifact.
//!
//! Header trees, page trees and merged documents are all plain [`Element`]
//! values. Builders produce them, the merger rewrites them, and the
//! renderer serializes them.

mod element;
mod parse;

pub use element::{Descendants, Element};
pub use parse::parse_xml;
