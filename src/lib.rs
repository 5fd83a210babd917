//! # teiconv
//!
//! Compiler from linguistically annotated pages to TEI XML documents.
//!
//! Each scanned page arrives as a list of tokens carrying UDPipe
//! morphology, NameTag named-entity labels and ALTO coordinates. The
//! library turns a publication's metadata into a `teiHeader`, every page
//! into a `div` of sentences with nested entity elements, and finally
//! merges them into one `TEI` document with an optional `facsimile`
//! section for word geometry.
//!
//! ## Quick Start
//!
//! ```
//! use teiconv::model::{HeaderMetadata, Page, Token};
//! use teiconv::Teiconv;
//!
//! fn main() -> teiconv::Result<()> {
//!     let header = HeaderMetadata::with_title("Kronika");
//!     let mut page = Page::new("uuid:1");
//!     page.add_token(Token::new("Praha", 1).with_labels("B-gu"));
//!
//!     let xml = Teiconv::new()
//!         .with_udpipe(["lemma", "pos"])
//!         .convert(&header, &[page])?
//!         .to_xml()?;
//!     assert!(xml.contains("<settlement"));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Entity spans**: B-/I- labels become nested TEI elements
//! - **Normalization**: bibliography, person names and dates are rewritten
//! - **Retention filters**: drop NameTag categories, UDPipe attributes or
//!   ALTO fields at merge time
//! - **Geometry**: word coordinates projected into `facsimile` zones
//! - **Validation**: structural checks that report but never block output

pub mod convert;
pub mod error;
pub mod merge;
pub mod model;
pub mod render;
pub mod tables;
pub mod tree;
pub mod validate;

// Re-export commonly used types
pub use convert::{build_header, build_header_at, build_page, PageBuilder};
pub use error::{Error, Result};
pub use merge::{merge, merge_files, merge_trees, RetentionConfig};
pub use model::{HeaderMetadata, Page, Token};
pub use render::{DocumentStats, RenderOptions};
pub use tree::{parse_xml, Element};
pub use validate::{validate_logged, SchemaValidator, SchemaViolation, StructuralValidator};

use std::fs;
use std::path::Path;

/// Build a `teiHeader` tree from a JSON metadata record.
///
/// # Example
///
/// ```
/// let header = teiconv::header_from_json(r#"{"title": "Kronika"}"#).unwrap();
/// assert_eq!(header.name, "teiHeader");
/// ```
pub fn header_from_json(json: &str) -> Result<Element> {
    let metadata = HeaderMetadata::from_json(json)?;
    build_header(&metadata)
}

/// Build a page `div` tree from a JSON page record.
pub fn page_from_json(json: &str) -> Result<Element> {
    let page = Page::from_json(json)?;
    build_page(&page)
}

/// Serialize a tree with default render options.
pub fn to_xml(root: &Element) -> Result<String> {
    render::to_xml(root, &RenderOptions::default())
}

/// Convert JSON records on disk straight to a merged document.
///
/// # Example
///
/// ```no_run
/// use teiconv::{convert_files, RetentionConfig};
///
/// let doc = convert_files("header.json", &["page1.json"], &RetentionConfig::default())?;
/// std::fs::write("document.xml", teiconv::to_xml(&doc)?)?;
/// # Ok::<(), teiconv::Error>(())
/// ```
pub fn convert_files<P: AsRef<Path>>(
    header_path: P,
    page_paths: &[P],
    config: &RetentionConfig,
) -> Result<Element> {
    let header = header_from_json(&fs::read_to_string(header_path.as_ref())?)?;
    let pages = page_paths
        .iter()
        .map(|path| page_from_json(&fs::read_to_string(path.as_ref())?))
        .collect::<Result<Vec<_>>>()?;
    Ok(merge_trees(header, pages, config))
}

/// Builder for converting and merging annotated documents.
///
/// # Example
///
/// ```
/// use teiconv::model::{HeaderMetadata, Page, Token};
/// use teiconv::Teiconv;
///
/// let mut page = Page::new("uuid:1");
/// page.add_token(Token::new("Slovo", 1));
///
/// let doc = Teiconv::new()
///     .with_alto(Vec::<String>::new())
///     .with_indent(4)
///     .convert(&HeaderMetadata::with_title("Kniha"), &[page])?;
/// assert!(doc.element().find("facsimile").is_none());
/// # Ok::<(), teiconv::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Teiconv {
    retention: RetentionConfig,
    render_options: RenderOptions,
}

impl Teiconv {
    /// Create a new builder that retains every annotation layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the retention configuration.
    pub fn with_retention(mut self, retention: RetentionConfig) -> Self {
        self.retention = retention;
        self
    }

    /// Retain only these NameTag categories.
    pub fn with_name_tag<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.retention = self.retention.with_name_tag(codes);
        self
    }

    /// Retain only these UDPipe attributes.
    pub fn with_udpipe<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.retention = self.retention.with_udpipe(attrs);
        self
    }

    /// Retain only these ALTO fields.
    pub fn with_alto<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.retention = self.retention.with_alto(fields);
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Set the indentation width of rendered output.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.render_options = self.render_options.with_indent(indent);
        self
    }

    /// Omit the XML declaration from rendered output.
    pub fn without_declaration(mut self) -> Self {
        self.render_options = self.render_options.with_declaration(false);
        self
    }

    /// The active retention configuration.
    pub fn retention(&self) -> &RetentionConfig {
        &self.retention
    }

    /// Build a header tree.
    pub fn header(&self, metadata: &HeaderMetadata) -> Result<Element> {
        build_header(metadata)
    }

    /// Build a page tree.
    pub fn page(&self, page: &Page) -> Result<Element> {
        build_page(page)
    }

    /// Merge already-built trees into a document.
    pub fn merge(&self, header: Element, pages: Vec<Element>) -> TeiDocument {
        TeiDocument {
            root: merge_trees(header, pages, &self.retention),
            render_options: self.render_options.clone(),
        }
    }

    /// Merge serialized header and page artifacts.
    pub fn merge_xml<S: AsRef<str>>(&self, header_xml: &str, page_xmls: &[S]) -> Result<TeiDocument> {
        Ok(TeiDocument {
            root: merge(header_xml, page_xmls, &self.retention)?,
            render_options: self.render_options.clone(),
        })
    }

    /// Build the header and every page, then merge them.
    pub fn convert(&self, metadata: &HeaderMetadata, pages: &[Page]) -> Result<TeiDocument> {
        let header = self.header(metadata)?;
        let pages = pages
            .iter()
            .map(|page| self.page(page))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.merge(header, pages))
    }

    /// Serialize any tree with this builder's render options.
    pub fn render(&self, root: &Element) -> Result<String> {
        render::to_xml(root, &self.render_options)
    }
}

/// A merged document together with its render options.
#[derive(Debug, Clone)]
pub struct TeiDocument {
    root: Element,
    render_options: RenderOptions,
}

impl TeiDocument {
    /// The `TEI` root element.
    pub fn element(&self) -> &Element {
        &self.root
    }

    /// Take the root element.
    pub fn into_element(self) -> Element {
        self.root
    }

    /// Render the document to XML.
    pub fn to_xml(&self) -> Result<String> {
        render::to_xml(&self.root, &self.render_options)
    }

    /// Count pages, sentences, tokens, entities and zones.
    pub fn stats(&self) -> DocumentStats {
        DocumentStats::collect(&self.root)
    }

    /// Render and validate, logging any violation.
    ///
    /// Returns the rendered text regardless of the validation outcome.
    pub fn to_validated_xml(&self, validator: &dyn SchemaValidator) -> Result<String> {
        let xml = self.to_xml()?;
        validate_logged(&xml, validator);
        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AltoMetadata;

    fn sample_page() -> Page {
        let mut page = Page::new("uuid:1");
        page.add_token(
            Token::new("Praha", 1)
                .with_labels("B-gu")
                .with_lemma("Praha")
                .with_alto(AltoMetadata::new(8.0, 5.0, 20.0, 10.0)),
        );
        page.add_token(Token::new(".", 2).with_pos("PUNCT").with_lemma("."));
        page
    }

    #[test]
    fn test_builder_default_keeps_everything() {
        let doc = Teiconv::new()
            .convert(&HeaderMetadata::with_title("Kniha"), &[sample_page()])
            .unwrap();
        let root = doc.element();
        assert_eq!(root.name, "TEI");
        assert_eq!(root.count("zone"), 1);
        assert_eq!(root.count("settlement"), 1);

        let stats = doc.stats();
        assert_eq!(stats.page_count, 1);
        assert_eq!(stats.token_count(), 2);
        assert_eq!(stats.zone_count, 1);
    }

    #[test]
    fn test_builder_filters_and_renders() {
        let teiconv = Teiconv::new()
            .with_name_tag(Vec::<String>::new())
            .with_alto(Vec::<String>::new())
            .without_declaration();
        let doc = teiconv
            .convert(&HeaderMetadata::with_title("Kniha"), &[sample_page()])
            .unwrap();
        let xml = doc.to_validated_xml(&StructuralValidator).unwrap();

        assert!(xml.starts_with("<TEI"));
        assert!(!xml.contains("placeName"));
        assert!(!xml.contains("<facsimile"));
        assert!(StructuralValidator.validate(&xml).is_ok());
    }

    #[test]
    fn test_convert_missing_title() {
        let err = Teiconv::new()
            .convert(&HeaderMetadata::default(), &[sample_page()])
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_json_helpers() {
        let header = header_from_json(r#"{"title": "Kniha"}"#).unwrap();
        let page = page_from_json(
            r#"{"id": "uuid:9", "tokens": [
                {"content": "Ahoj", "linguisticMetadata": {"position": 1, "lemma": "ahoj"}}
            ]}"#,
        )
        .unwrap();
        let doc = merge_trees(header, vec![page], &RetentionConfig::default());
        let xml = to_xml(&doc).unwrap();
        assert!(xml.contains(r#"<pb xml:id="uuid-9"/>"#));
        assert!(validate_logged(&xml, &StructuralValidator));
    }
}
