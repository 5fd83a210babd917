//! Indented XML serialization.

use super::RenderOptions;
use crate::error::{Error, Result};
use crate::tree::Element;
use quick_xml::escape::{escape, partial_escape};

/// XML declaration written before the root element.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Serialize a tree to indented XML.
///
/// Text-only elements are written on one line with their text unchanged,
/// elements without text or children are self-closed, and whitespace-only
/// text is dropped. Text next to children goes on its own trimmed line.
/// The output is deterministic for a given tree.
///
/// # Errors
///
/// Returns [`Error::Render`] if an element or attribute name is empty or
/// contains characters that cannot appear in an XML name.
pub fn to_xml(root: &Element, options: &RenderOptions) -> Result<String> {
    let mut lines = Vec::new();
    if options.declaration {
        lines.push(XML_DECLARATION.to_string());
    }
    write_element(root, 0, options, &mut lines)?;

    let mut output = lines.join("\n");
    output.push('\n');
    Ok(output)
}

fn write_element(
    element: &Element,
    depth: usize,
    options: &RenderOptions,
    lines: &mut Vec<String>,
) -> Result<()> {
    check_name(&element.name)?;
    let indent = " ".repeat(options.indent * depth);

    let mut open = format!("{}<{}", indent, element.name);
    for (key, value) in &element.attributes {
        check_name(key)?;
        open.push_str(&format!(" {}=\"{}\"", key, escape(value)));
    }

    let text = element.text.as_deref().filter(|t| !t.trim().is_empty());

    match (text, element.children.is_empty()) {
        (None, true) => lines.push(format!("{}/>", open)),
        (Some(text), true) => lines.push(format!(
            "{}>{}</{}>",
            open,
            partial_escape(text),
            element.name
        )),
        (text, false) => {
            lines.push(format!("{}>", open));
            if let Some(text) = text {
                let inner = " ".repeat(options.indent * (depth + 1));
                lines.push(format!("{}{}", inner, partial_escape(text.trim())));
            }
            for child in &element.children {
                write_element(child, depth + 1, options, lines)?;
            }
            lines.push(format!("{}</{}>", indent, element.name));
        }
    }
    Ok(())
}

fn check_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.')
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'));
    if valid {
        Ok(())
    } else {
        Err(Error::Render(format!("invalid XML name {:?}", name)))
    }
}
