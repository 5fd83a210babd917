//! Composition of a header and pages into one TEI document.
//!
//! The merge step takes ownership of the intermediate trees, filters the
//! annotation layers according to a [`RetentionConfig`], moves ALTO
//! coordinates into a `facsimile` section and assembles the final `TEI`
//! element.

mod geometry;
mod options;
mod prune;

pub use geometry::GeometryProjector;
pub use options::{parse_filter, RetentionConfig};
pub use prune::{is_removed_entity, prune_classification, prune_entities, strip_udpipe};

use crate::error::Result;
use crate::tables::TEI_NAMESPACE;
use crate::tree::{parse_xml, Element};
use std::fs;
use std::path::Path;

/// Merge serialized header and page artifacts.
///
/// # Errors
///
/// Returns [`crate::Error::Parse`] if any artifact is not well-formed XML.
pub fn merge<S: AsRef<str>>(
    header_xml: &str,
    page_xmls: &[S],
    config: &RetentionConfig,
) -> Result<Element> {
    let header = parse_xml(header_xml)?;
    let pages = page_xmls
        .iter()
        .map(|xml| parse_xml(xml.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    Ok(merge_trees(header, pages, config))
}

/// Merge header and page artifacts stored on disk.
pub fn merge_files<P: AsRef<Path>>(
    header_path: P,
    page_paths: &[P],
    config: &RetentionConfig,
) -> Result<Element> {
    let header = fs::read_to_string(header_path.as_ref())?;
    let pages = page_paths
        .iter()
        .map(|path| fs::read_to_string(path.as_ref()))
        .collect::<std::io::Result<Vec<_>>>()?;
    merge(&header, &pages, config)
}

/// Merge already-parsed trees. The trees are consumed.
pub fn merge_trees(mut header: Element, pages: Vec<Element>, config: &RetentionConfig) -> Element {
    let removed_name_tags = config.removed_name_tags();
    let removed_udpipe = config.removed_udpipe();

    let mut tei = Element::new("TEI").with_attr("xmlns", TEI_NAMESPACE);
    for (key, value) in header.attributes.drain(..) {
        tei.set(key, value);
    }
    let dropped = prune_classification(&mut header, &removed_name_tags);
    tei.push(header);

    let mut projector = GeometryProjector::new(config);
    let mut body = Element::new("body");
    let page_count = pages.len();
    for mut page in pages {
        projector.project_page(&mut page);
        strip_udpipe(&mut page, &removed_udpipe);
        prune_entities(&mut page, &removed_name_tags);
        body.push(page);
    }

    log::debug!(
        "Merged {} pages: {} zones, {} classification entries dropped",
        page_count,
        projector.zone_count(),
        dropped
    );

    if let Some(facsimile) = projector.into_facsimile() {
        tei.push(facsimile);
    }
    tei.push(Element::new("text").with_child(body));
    tei
}
