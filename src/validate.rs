//! Structural checks on rendered TEI documents.
//!
//! Validation never blocks output: callers that only want a report use
//! [`validate_logged`], which logs the first violation and returns.

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// A document that does not satisfy a validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ERROR ON LINE {line}: {message}")]
pub struct SchemaViolation {
    /// 1-based line of the offending markup
    pub line: usize,
    /// Human-readable description
    pub message: String,
}

impl SchemaViolation {
    /// Create a new violation.
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Checks a rendered document against a schema.
pub trait SchemaValidator {
    /// Validate a serialized document.
    fn validate(&self, document: &str) -> Result<(), SchemaViolation>;
}

/// Validator for the document layout produced by the merger.
///
/// Checks that the root is `TEI`, its first child is a `teiHeader` holding
/// a `title`, a `text/body` exists, tokens hold no elements, `surface`
/// only appears in `facsimile` and `zone` only in `surface`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl StructuralValidator {
    /// Create a new structural validator.
    pub fn new() -> Self {
        Self
    }
}

impl SchemaValidator for StructuralValidator {
    fn validate(&self, document: &str) -> Result<(), SchemaViolation> {
        let mut reader = Reader::from_str(document);
        reader.trim_text(true);

        let mut state = WalkState::default();
        loop {
            let event = reader.read_event();
            let line = line_at(document, reader.buffer_position());
            match event {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    state.open(&name, line)?;
                    state.stack.push(OpenElement::new(name));
                }
                Ok(Event::Empty(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    state.open(&name, line)?;
                    state.close(OpenElement::new(name), line)?;
                }
                Ok(Event::End(_)) => {
                    if let Some(element) = state.stack.pop() {
                        state.close(element, line)?;
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(SchemaViolation::new(line, e.to_string())),
            }
        }

        let last_line = line_at(document, document.len());
        if !state.seen_root {
            return Err(SchemaViolation::new(last_line, "document has no root element"));
        }
        if !state.seen_body {
            return Err(SchemaViolation::new(last_line, "missing text/body"));
        }
        Ok(())
    }
}

/// Validate a document and log the first violation.
///
/// Returns whether the document is valid. Never fails.
pub fn validate_logged(document: &str, validator: &dyn SchemaValidator) -> bool {
    match validator.validate(document) {
        Ok(()) => true,
        Err(violation) => {
            log::error!("{}", violation);
            false
        }
    }
}

#[derive(Debug)]
struct OpenElement {
    name: String,
    children: usize,
    has_title: bool,
}

impl OpenElement {
    fn new(name: String) -> Self {
        Self {
            name,
            children: 0,
            has_title: false,
        }
    }
}

#[derive(Debug, Default)]
struct WalkState {
    stack: Vec<OpenElement>,
    seen_root: bool,
    seen_body: bool,
}

impl WalkState {
    fn parent_name(&self) -> Option<&str> {
        self.stack.last().map(|e| e.name.as_str())
    }

    fn open(&mut self, name: &str, line: usize) -> Result<(), SchemaViolation> {
        if self.stack.is_empty() {
            if self.seen_root {
                return Err(SchemaViolation::new(line, "more than one root element"));
            }
            if name != "TEI" {
                return Err(SchemaViolation::new(
                    line,
                    format!("root element must be TEI, found {}", name),
                ));
            }
            self.seen_root = true;
            return Ok(());
        }

        let parent = self.parent_name().unwrap_or_default().to_string();
        if parent == "w" || parent == "pc" {
            return Err(SchemaViolation::new(
                line,
                format!("element {} not allowed in {}", name, parent),
            ));
        }
        if name == "surface" && parent != "facsimile" {
            return Err(SchemaViolation::new(line, "surface outside facsimile"));
        }
        if name == "zone" && parent != "surface" {
            return Err(SchemaViolation::new(line, "zone outside surface"));
        }
        if parent == "TEI" {
            let first = self.stack.last().is_some_and(|e| e.children == 0);
            if first && name != "teiHeader" {
                return Err(SchemaViolation::new(
                    line,
                    format!("expected teiHeader as first child of TEI, found {}", name),
                ));
            }
        }
        if name == "title" {
            if let Some(header) = self.stack.iter_mut().find(|e| e.name == "teiHeader") {
                header.has_title = true;
            }
        }
        if name == "body" && parent == "text" && self.stack.len() == 2 {
            self.seen_body = true;
        }

        if let Some(parent) = self.stack.last_mut() {
            parent.children += 1;
        }
        Ok(())
    }

    fn close(&mut self, element: OpenElement, line: usize) -> Result<(), SchemaViolation> {
        if element.name == "teiHeader" && self.stack.len() == 1 && !element.has_title {
            return Err(SchemaViolation::new(line, "teiHeader has no title"));
        }
        Ok(())
    }
}

fn line_at(document: &str, position: usize) -> usize {
    let end = position.min(document.len());
    document.as_bytes()[..end]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}
