//! `teiHeader` construction from publication metadata.

use crate::error::{Error, Result};
use crate::model::{AuthorKind, HeaderMetadata, ProcessingApp};
use crate::tables::{
    ANNOTATION_LICENCE, CLASSIFICATION, CONVERTER_ID, INTERP_ID_PREFIX, LANGUAGE, NAMETAG_SCHEME,
};
use crate::tree::Element;
use chrono::{Local, NaiveDateTime};

/// Timestamp format of processing records.
pub const WHEN_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Build a `teiHeader` element, stamping the current local time.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the metadata has no title.
pub fn build_header(metadata: &HeaderMetadata) -> Result<Element> {
    build_header_at(metadata, Local::now().naive_local())
}

/// Build a `teiHeader` element with a fixed processing timestamp.
pub fn build_header_at(metadata: &HeaderMetadata, now: NaiveDateTime) -> Result<Element> {
    let title = metadata
        .title
        .as_deref()
        .ok_or_else(|| Error::validation("Attribute title is required."))?;

    let mut header = Element::new("teiHeader");
    if let Some(ref source) = metadata.source {
        header.set("corresp", source);
    }

    header.push(file_desc(metadata, title));
    header.push(encoding_desc(metadata, now));
    header.push(profile_desc());

    log::debug!(
        "Built teiHeader for {:?} with {} processing records",
        title,
        metadata.processed_by.len() + 1
    );
    Ok(header)
}

fn file_desc(metadata: &HeaderMetadata, title: &str) -> Element {
    let mut file_desc = Element::new("fileDesc");

    let title_stmt = file_desc.push(Element::new("titleStmt"));
    title_stmt.push(Element::new("title").with_text(title));
    if let Some(ref author) = metadata.author {
        let node = title_stmt.push(Element::new("author"));
        if let Some(ref name) = author.name {
            let tag = match author.kind {
                AuthorKind::Corporate => "orgName",
                AuthorKind::Person => "persName",
            };
            node.push(Element::new(tag).with_text(name));
        }
        if let Some(ref identifier) = author.identifier {
            node.push(
                Element::new("idno")
                    .with_attr("type", "mods:nameIdentifier")
                    .with_text(identifier),
            );
        }
    }

    if let Some(extent) = metadata
        .physical_description
        .as_ref()
        .and_then(|d| d.extent.as_ref())
    {
        file_desc.push(Element::new("extent").with_text(extent));
    }

    let publication = file_desc.push(Element::new("publicationStmt"));
    if let Some(ref origin) = metadata.origin_info {
        if let Some(ref publisher) = origin.publisher {
            publication.push(Element::new("publisher").with_text(publisher));
        }
        for place in &origin.places {
            publication.push(Element::new("pubPlace").with_text(place));
        }
        if let Some(ref date) = origin.date {
            publication.push(Element::new("date").with_text(date));
        }
    }
    for identifier in &metadata.identifiers {
        publication.push(
            Element::new("idno")
                .with_attr("type", format!("mods:{}", identifier.kind))
                .with_text(&identifier.value),
        );
    }
    for layer in ["#NameTag", "#UDPipe"] {
        publication.push(
            Element::new("availability").with_child(
                Element::new("licence")
                    .with_attr("resp", layer)
                    .with_text(ANNOTATION_LICENCE),
            ),
        );
    }

    file_desc.push(Element::new("sourceDesc").with_child(Element::new("bibl")));
    file_desc
}

/// The record the compiler appends for itself.
pub fn self_record(now: NaiveDateTime) -> ProcessingApp {
    ProcessingApp {
        identifier: Some(CONVERTER_ID.to_string()),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        when: Some(now.format(WHEN_FORMAT).to_string()),
        ..Default::default()
    }
}

fn encoding_desc(metadata: &HeaderMetadata, now: NaiveDateTime) -> Element {
    let mut encoding = Element::new("encodingDesc");
    let own = self_record(now);

    for app in metadata.processed_by.iter().chain(std::iter::once(&own)) {
        let mut application = Element::new("application");
        if let Some(ref identifier) = app.identifier {
            application.set("xml:id", identifier);
            application.set("ident", identifier);
        }
        let optional = [
            ("version", &app.version),
            ("from", &app.from),
            ("when", &app.when),
            ("to", &app.to),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                application.set(key, value);
            }
        }
        let mut label = Element::new("label");
        label.text = app.label.clone();
        application.push(label);

        encoding.push(Element::new("appInfo").with_child(application));
    }
    encoding
}

fn profile_desc() -> Element {
    let mut interp_grp = Element::new("interpGrp");
    for (code, description) in CLASSIFICATION {
        interp_grp.push(
            Element::new("interp")
                .with_attr("xml:id", format!("{}{}", INTERP_ID_PREFIX, code))
                .with_text(*description),
        );
    }

    let class_code = Element::new("classCode")
        .with_attr("scheme", NAMETAG_SCHEME)
        .with_child(interp_grp);

    Element::new("profileDesc")
        .with_child(Element::new("textClass").with_child(class_code))
        .with_child(
            Element::new("langUsage").with_child(
                Element::new("language")
                    .with_attr("ident", LANGUAGE)
                    .with_text(LANGUAGE),
            ),
        )
}
