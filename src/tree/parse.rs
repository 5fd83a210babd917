//! Reading serialized XML back into an [`Element`] tree.

use super::Element;
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse an XML document with a single root element.
///
/// Whitespace-only text is dropped and text of elements with children is
/// trimmed; other text is kept as written. Declarations, comments, doctypes
/// and processing instructions are skipped.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the input is not well-formed: mismatched or
/// unclosed tags, invalid attributes, no root element, more than one root
/// element, or text outside the root.
pub fn parse_xml(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::Parse(format!("{} at byte {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(e) => {
                ensure_no_second_root(&root)?;
                stack.push(start_element(&e)?);
            }
            Event::Empty(e) => {
                ensure_no_second_root(&root)?;
                let element = start_element(&e)?;
                attach(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| Error::Parse("unexpected closing tag".into()))?;
                trim_mixed_text(&mut element);
                attach(element, &mut stack, &mut root);
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                append_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::Parse(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| Error::Parse("document has no root element".into()))
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn append_text(stack: &mut [Element], text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    let current = stack
        .last_mut()
        .ok_or_else(|| Error::Parse(format!("text outside root element: {:?}", text)))?;
    match current.text {
        Some(ref mut existing) => existing.push_str(text),
        None => current.text = Some(text.to_string()),
    }
    Ok(())
}

fn trim_mixed_text(element: &mut Element) {
    if element.children.is_empty() {
        return;
    }
    if let Some(text) = element.text.take() {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            element.text = Some(trimmed.to_string());
        }
    }
}

fn ensure_no_second_root(root: &Option<Element>) -> Result<()> {
    match root {
        Some(existing) => Err(Error::Parse(format!(
            "more than one root element (first was <{}>)",
            existing.name
        ))),
        None => Ok(()),
    }
}
