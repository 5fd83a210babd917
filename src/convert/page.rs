//! Page tree construction from a token stream.
//!
//! Tokens are placed into sentences (`s`) and nested named-entity spans.
//! Spans are tracked on a stack of open frames: a frame owns its element
//! until it is closed, at which point it is appended to the frame below it.
//! Only the top frame ever receives new children, so attaching on close
//! preserves document order.

use super::normalize;
use crate::error::{Error, Result};
use crate::model::{LinguisticMetadata, Page, Token};
use crate::tables::{self, Derived, ALTO_ATTR_PREFIX, GENERIC_GROUP};
use crate::tree::Element;

/// Build a page `div` from a page record.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the page has no id, or if any token is
/// missing its content, linguistic metadata or position.
pub fn build_page(page: &Page) -> Result<Element> {
    let id = page
        .id
        .as_deref()
        .ok_or_else(|| Error::validation("Attribute id is required."))?;

    let mut builder = PageBuilder::new();
    for (index, token) in page.tokens.iter().enumerate() {
        builder.push_token(token, index)?;
    }

    let mut pb = Element::new("pb").with_attr("xml:id", id.replace(':', "-"));
    if let Some(ref title) = page.title {
        pb.set("n", title);
    }
    if let Some(ref source) = page.source {
        pb.set("corresp", source);
    }

    let sentences = builder.sentence_count();
    let mut div = Element::new("div")
        .with_child(pb)
        .with_child(builder.finish());
    normalize::normalize(&mut div);

    log::debug!(
        "Built page {} with {} tokens in {} sentences",
        id,
        page.tokens.len(),
        sentences
    );
    Ok(div)
}

/// An open element on the span stack.
#[derive(Debug)]
struct Frame {
    node: Element,
    wrapper: Option<Element>,
}

impl Frame {
    fn new(node: Element) -> Self {
        Self {
            node,
            wrapper: None,
        }
    }

    fn into_element(self) -> Element {
        match self.wrapper {
            Some(mut wrapper) => {
                wrapper.children.push(self.node);
                wrapper
            }
            None => self.node,
        }
    }
}

/// Incremental builder of one page's paragraph.
///
/// The first frame of the stack is always the current sentence; entity
/// spans sit above it.
#[derive(Debug)]
pub struct PageBuilder {
    paragraph: Element,
    stack: Vec<Frame>,
    last_position: Option<u32>,
    sentences: usize,
}

impl PageBuilder {
    /// Create a builder with an empty paragraph.
    pub fn new() -> Self {
        Self {
            paragraph: Element::new("p"),
            stack: Vec::new(),
            last_position: None,
            sentences: 0,
        }
    }

    /// Number of sentences opened so far.
    pub fn sentence_count(&self) -> usize {
        self.sentences
    }

    /// Current depth of the span stack (the sentence counts as one).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Add one token. `index` is only used in error messages.
    pub fn push_token(&mut self, token: &Token, index: usize) -> Result<()> {
        let content = token.content.as_deref().ok_or_else(|| {
            Error::validation(format!(
                "Attribute `content` is required in all tokens (token {}).",
                index + 1
            ))
        })?;
        let linguistic = token.linguistic_metadata.as_ref().ok_or_else(|| {
            Error::validation(format!(
                "Attribute `linguisticMetadata` is required in all tokens (token {}).",
                index + 1
            ))
        })?;
        let position = linguistic.position.ok_or_else(|| {
            Error::validation(format!(
                "Attribute `position` is required in all tokens' linguistic metadata (token {}).",
                index + 1
            ))
        })?;

        if self.last_position.map_or(true, |last| position <= last) {
            self.start_sentence();
        }
        self.last_position = Some(position);

        let labels = token.labels();
        if !labels.is_empty() || self.stack.len() > 1 {
            let continued = 1 + labels.iter().filter(|l| l.starts_with("I-")).count();
            self.close_to(continued);
            for code in labels.iter().filter_map(|l| l.strip_prefix("B-")) {
                self.open_span(code, content, linguistic);
            }
        }

        let word = token_element(token, content, linguistic, position);
        self.top().children.push(word);
        Ok(())
    }

    /// Close every open frame and return the finished paragraph.
    pub fn finish(mut self) -> Element {
        self.close_to(0);
        self.paragraph
    }

    fn start_sentence(&mut self) {
        self.close_to(0);
        self.stack.push(Frame::new(Element::new("s")));
        self.sentences += 1;
    }

    fn close_to(&mut self, depth: usize) {
        while self.stack.len() > depth {
            let Some(frame) = self.stack.pop() else {
                break;
            };
            let element = frame.into_element();
            match self.stack.last_mut() {
                Some(parent) => parent.node.children.push(element),
                None => self.paragraph.children.push(element),
            }
        }
    }

    fn top(&mut self) -> &mut Element {
        if self.stack.is_empty() {
            self.start_sentence();
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last].node
    }

    fn open_span(&mut self, code: &str, content: &str, linguistic: &LinguisticMetadata) {
        let ana = tables::ana_for(code);
        let frame = match tables::entity_spec(code) {
            Some(spec) => {
                let mut node = Element::new(spec.name);
                for (key, value) in spec.attrs {
                    node.set(*key, *value);
                }
                if let Some((key, value)) = derived_attr(spec.derived, content, linguistic) {
                    node.set(key, value);
                }
                node.set("ana", &ana);
                Frame {
                    node,
                    wrapper: spec
                        .wrapper
                        .map(|name| Element::new(name).with_attr("ana", &ana)),
                }
            }
            None => Frame::new(
                Element::new(GENERIC_GROUP)
                    .with_attr("type", code)
                    .with_attr("ana", &ana),
            ),
        };
        self.stack.push(frame);
    }
}

impl Default for PageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Attribute computed from the token opening a span, if it can be derived.
fn derived_attr(
    derived: Derived,
    content: &str,
    linguistic: &LinguisticMetadata,
) -> Option<(&'static str, String)> {
    match derived {
        Derived::None => None,
        Derived::Target => Some(("target", content.to_string())),
        Derived::Day => parse_number(content).map(|day| ("when", format!("---{:02}", day))),
        Derived::Month => {
            let lemma = linguistic.lemma.as_deref().unwrap_or("");
            resolve_month(lemma).map(|month| ("when", format!("--{}", month)))
        }
        Derived::Year => Some(("when", content.to_string())),
    }
}

/// Parse an unsigned decimal number, tolerating surrounding whitespace.
pub(crate) fn parse_number(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

/// Resolve a month lemma (name or number 1-12) to two digits.
pub(crate) fn resolve_month(lemma: &str) -> Option<String> {
    if let Some(number) = tables::month_number(lemma) {
        return Some(number.to_string());
    }
    parse_number(lemma)
        .filter(|m| (1..=12).contains(m))
        .map(|m| format!("{:02}", m))
}

fn token_element(
    token: &Token,
    content: &str,
    linguistic: &LinguisticMetadata,
    position: u32,
) -> Element {
    let punctuation = linguistic.is_punctuation();
    let mut word = Element::new(if punctuation { "pc" } else { "w" });

    word.set("n", position.to_string());
    word.set("pos", linguistic.u_pos_tag.as_deref().unwrap_or(""));
    if punctuation {
        let join = if linguistic.space_after() { "left" } else { "both" };
        word.set("join", join);
    }
    word.set("msd", linguistic.feats.as_deref().unwrap_or(""));
    word.set("lemma", linguistic.lemma.as_deref().unwrap_or(""));

    if let Some(ref alto) = token.alto_metadata {
        for (field, value) in alto.fields() {
            word.set(format!("{}{}", ALTO_ATTR_PREFIX, field), value.to_string());
        }
    }

    word.text = Some(content.to_string());
    word
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AltoMetadata;

    fn page_with(tokens: Vec<Token>) -> Page {
        let mut page = Page::new("uuid:0001");
        page.tokens = tokens;
        page
    }

    fn sentences(div: &Element) -> &[Element] {
        &div.child("p").unwrap().children
    }

    #[test]
    fn test_missing_id() {
        let page = Page::default();
        assert!(matches!(build_page(&page), Err(Error::Validation(_))));
    }

    #[test]
    fn test_missing_token_fields() {
        let mut token = Token::new("a", 1);
        token.content = None;
        assert!(build_page(&page_with(vec![token])).is_err());

        let mut token = Token::new("a", 1);
        token.linguistic_metadata = None;
        assert!(build_page(&page_with(vec![token])).is_err());

        let mut token = Token::new("a", 1);
        token.linguistic_metadata.as_mut().unwrap().position = None;
        let err = build_page(&page_with(vec![token])).unwrap_err();
        assert!(err.to_string().contains("position"));
    }

    #[test]
    fn test_page_break_attributes() {
        let mut page = page_with(vec![]);
        page.title = Some("[5]".into());
        page.source = Some("https://example.org/p5".into());
        let div = build_page(&page).unwrap();

        let pb = div.child("pb").unwrap();
        assert_eq!(pb.get("xml:id"), Some("uuid-0001"));
        assert_eq!(pb.get("n"), Some("[5]"));
        assert_eq!(pb.get("corresp"), Some("https://example.org/p5"));
        assert!(sentences(&div).is_empty());
    }

    #[test]
    fn test_single_sentence() {
        let div = build_page(&page_with(vec![
            Token::new("Byl", 1),
            Token::new("pozdní", 2),
            Token::new("večer", 3),
        ]))
        .unwrap();

        let s = sentences(&div);
        assert_eq!(s.len(), 1);
        let texts: Vec<_> = s[0].children.iter().map(|w| w.text_or_empty()).collect();
        assert_eq!(texts, vec!["Byl", "pozdní", "večer"]);
        assert!(s[0].children.iter().all(|w| w.name == "w"));
    }

    #[test]
    fn test_position_decrease_splits_sentences() {
        let div = build_page(&page_with(vec![
            Token::new("Ano", 1),
            Token::new(".", 2),
            Token::new("Ne", 1),
        ]))
        .unwrap();
        let s = sentences(&div);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].children.len(), 2);
        assert_eq!(s[1].children[0].text_or_empty(), "Ne");
    }

    #[test]
    fn test_equal_position_starts_sentence() {
        let div = build_page(&page_with(vec![Token::new("A", 1), Token::new("B", 1)])).unwrap();
        assert_eq!(sentences(&div).len(), 2);
    }

    #[test]
    fn test_continued_span_then_close() {
        let div = build_page(&page_with(vec![
            Token::new("Karel", 1).with_labels("B-ps"),
            Token::new("Čapek", 2).with_labels("I-ps"),
            Token::new("psal", 3),
        ]))
        .unwrap();

        let s = &sentences(&div)[0];
        assert_eq!(s.children.len(), 2);
        let surname = &s.children[0];
        assert_eq!(surname.name, "surname");
        assert_eq!(surname.get("ana"), Some("#nametag-ps"));
        assert_eq!(surname.children.len(), 2);
        assert_eq!(s.children[1].name, "w");
        assert_eq!(s.children[1].text_or_empty(), "psal");
    }

    #[test]
    fn test_nested_spans() {
        // B-P opens a person, B-pf a forename inside it; the next token
        // continues P but opens a surname.
        let div = build_page(&page_with(vec![
            Token::new("Karel", 1).with_labels("B-P|B-pf"),
            Token::new("Čapek", 2).with_labels("I-P|B-ps"),
        ]))
        .unwrap();

        let s = &sentences(&div)[0];
        assert_eq!(s.children.len(), 1);
        let person = &s.children[0];
        assert_eq!(person.name, "persName");
        let names: Vec<_> = person.children.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["forename", "surname"]);
    }

    #[test]
    fn test_two_level_mapping() {
        let div = build_page(&page_with(vec![
            Token::new("Nové", 1).with_labels("B-gu"),
            Token::new("Město", 2).with_labels("I-gu"),
        ]))
        .unwrap();

        let place = &sentences(&div)[0].children[0];
        assert_eq!(place.name, "placeName");
        assert_eq!(place.get("ana"), Some("#nametag-gu"));
        assert_eq!(place.children.len(), 1);
        let settlement = &place.children[0];
        assert_eq!(settlement.name, "settlement");
        assert_eq!(settlement.get("ana"), Some("#nametag-gu"));
        assert_eq!(settlement.children.len(), 2);
    }

    #[test]
    fn test_unknown_code_falls_back_to_group() {
        let div = build_page(&page_with(vec![Token::new("x", 1).with_labels("B-zz")])).unwrap();
        let group = &sentences(&div)[0].children[0];
        assert_eq!(group.name, "group");
        assert_eq!(group.get("type"), Some("zz"));
        assert_eq!(group.get("ana"), Some("#nametag-zz"));
    }

    #[test]
    fn test_derived_attributes() {
        let div = build_page(&page_with(vec![
            Token::new("http://example.org", 1).with_labels("B-mi"),
            Token::new("5", 2).with_labels("B-td"),
            Token::new("ledna", 3).with_labels("B-tm").with_lemma("leden"),
            Token::new("pátého", 4).with_labels("B-td"),
        ]))
        .unwrap();

        let s = &sentences(&div)[0];
        assert_eq!(s.children[0].get("target"), Some("http://example.org"));
        assert_eq!(s.children[1].get("when"), Some("---05"));
        assert_eq!(s.children[2].get("when"), Some("--01"));
        assert_eq!(s.children[3].get("when"), None);
    }

    #[test]
    fn test_bare_label_only_closes_spans() {
        let div = build_page(&page_with(vec![
            Token::new("Praha", 1).with_labels("B-gu"),
            Token::new("je", 2).with_labels("O"),
        ]))
        .unwrap();
        let s = &sentences(&div)[0];
        assert_eq!(s.children.len(), 2);
        assert_eq!(s.children[1].name, "w");
    }

    #[test]
    fn test_token_attributes() {
        let div = build_page(&page_with(vec![
            Token::new("Psi", 1)
                .with_pos("NOUN")
                .with_lemma("pes")
                .with_feats("Case=Nom")
                .with_alto(AltoMetadata::new(8.0, 5.0, 20.0, 10.5)),
            Token::new(".", 2).with_pos("PUNCT").with_misc("SpaceAfter=No"),
            Token::new("!", 3).with_pos("PUNCT"),
        ]))
        .unwrap();

        let s = &sentences(&div)[0];
        let keys: Vec<_> = s.children[0]
            .attributes
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(
            keys,
            vec![
                "n",
                "pos",
                "msd",
                "lemma",
                "alto-height",
                "alto-width",
                "alto-vpos",
                "alto-hpos"
            ]
        );
        assert_eq!(s.children[0].get("alto-height"), Some("8"));
        assert_eq!(s.children[0].get("alto-hpos"), Some("10.5"));

        assert_eq!(s.children[1].name, "pc");
        assert_eq!(s.children[1].get("join"), Some("both"));
        assert_eq!(s.children[2].get("join"), Some("left"));
        assert_eq!(s.children[2].get("msd"), Some(""));
    }

    #[test]
    fn test_sentence_resets_span_stack() {
        let mut builder = PageBuilder::new();
        builder
            .push_token(&Token::new("Praha", 1).with_labels("B-gu"), 0)
            .unwrap();
        assert_eq!(builder.depth(), 2);
        builder
            .push_token(&Token::new("Brno", 1).with_labels("I-gu"), 1)
            .unwrap();
        assert_eq!(builder.depth(), 1);
        assert_eq!(builder.sentence_count(), 2);
    }

    #[test]
    fn test_resolve_month() {
        assert_eq!(resolve_month("Březen").as_deref(), Some("03"));
        assert_eq!(resolve_month("7").as_deref(), Some("07"));
        assert_eq!(resolve_month("13"), None);
        assert_eq!(resolve_month("xyz"), None);
    }
}
