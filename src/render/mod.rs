//! Rendering module for serializing trees to XML text.

mod options;
mod stats;
mod xml;

pub use options::RenderOptions;
pub use stats::DocumentStats;
pub use xml::{to_xml, XML_DECLARATION};
