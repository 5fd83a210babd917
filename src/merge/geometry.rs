//! Projection of ALTO token coordinates into the `facsimile` section.

use super::RetentionConfig;
use crate::tables::{ALTO_ATTR_PREFIX, ALTO_DEFAULTS};
use crate::tree::Element;

/// Collects one `surface` per page and one `zone` per located token.
///
/// The token identifier counter is owned by the projector, so identifiers
/// are unique within one merged document.
#[derive(Debug)]
pub struct GeometryProjector {
    facsimile: Option<Element>,
    retained: Vec<String>,
    next_id: usize,
}

impl GeometryProjector {
    /// Create a projector; geometry is disabled when no ALTO field is retained.
    pub fn new(config: &RetentionConfig) -> Self {
        let retained = config.retained_alto_attrs();
        let facsimile = if retained.is_empty() {
            None
        } else {
            Some(Element::new("facsimile"))
        };
        Self {
            facsimile,
            retained,
            next_id: 1,
        }
    }

    /// Whether zones are being produced.
    pub fn is_enabled(&self) -> bool {
        self.facsimile.is_some()
    }

    /// Number of token identifiers assigned so far.
    pub fn zone_count(&self) -> usize {
        self.next_id - 1
    }

    /// Project every token of a page and strip its ALTO attributes.
    ///
    /// Within a page, all `w` tokens are numbered before any `pc` token.
    /// Attributes are stripped even from tokens that get no zone.
    pub fn project_page(&mut self, page: &mut Element) {
        if let Some(ref mut facsimile) = self.facsimile {
            let mut surface = Element::new("surface");
            if let Some(start) = page_break_id(page) {
                surface.set("start", format!("#{}", start));
            }

            let retained = &self.retained;
            let next_id = &mut self.next_id;
            for tag in ["w", "pc"] {
                page.walk_mut(&mut |element: &mut Element| {
                    if element.name != tag || !retained.iter().any(|attr| element.has_attr(attr)) {
                        return;
                    }
                    let id = format!("W-{}", next_id);
                    *next_id += 1;
                    element.set("xml:id", &id);
                    surface.push(zone_for(element, &id, retained));
                });
            }

            facsimile.push(surface);
        }

        page.walk_mut(&mut |element: &mut Element| {
            if element.is_token() {
                strip_alto(element);
            }
        });
    }

    /// The finished `facsimile` element, if geometry is enabled.
    pub fn into_facsimile(self) -> Option<Element> {
        self.facsimile
    }
}

/// Identifier of the last page break in a page tree.
fn page_break_id(page: &Element) -> Option<String> {
    page.descendants()
        .filter(|e| e.name == "pb")
        .last()
        .and_then(|pb| {
            pb.attributes
                .iter()
                .find(|(key, _)| key.ends_with("id"))
                .map(|(_, value)| value.clone())
        })
}

fn alto_attr(field: &str) -> String {
    format!("{}{}", ALTO_ATTR_PREFIX, field)
}

fn zone_for(word: &Element, id: &str, retained: &[String]) -> Element {
    let kept = |field: &str| {
        let attr = alto_attr(field);
        if retained.contains(&attr) {
            word.get(&attr)
        } else {
            None
        }
    };

    let mut zone = Element::new("zone").with_attr("start", format!("#{}", id));
    if let Some(hpos) = kept("hpos") {
        zone.set("ulx", hpos);
    }
    if let Some(vpos) = kept("vpos") {
        zone.set("uly", vpos);
    }
    if let Some(lrx) = kept("width").and_then(|w| add(word.get("alto-hpos")?, w)) {
        zone.set("lrx", lrx);
    }
    if let Some(lry) = kept("height").and_then(|h| add(word.get("alto-vpos")?, h)) {
        zone.set("lry", lry);
    }
    zone
}

fn add(origin: &str, extent: &str) -> Option<String> {
    match (origin.trim().parse::<f64>(), extent.trim().parse::<f64>()) {
        (Ok(origin), Ok(extent)) => Some((origin + extent).to_string()),
        _ => {
            log::warn!("Non-numeric ALTO coordinates {:?} + {:?}", origin, extent);
            None
        }
    }
}

fn strip_alto(element: &mut Element) {
    for field in ALTO_DEFAULTS {
        element.remove_attr(&alto_attr(field));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located_word(hpos: &str, vpos: &str, width: &str, height: &str) -> Element {
        Element::new("w")
            .with_attr("n", "1")
            .with_attr("alto-height", height)
            .with_attr("alto-width", width)
            .with_attr("alto-vpos", vpos)
            .with_attr("alto-hpos", hpos)
            .with_text("slovo")
    }

    fn page(words: Vec<Element>) -> Element {
        let mut s = Element::new("s");
        s.children = words;
        Element::new("div")
            .with_child(Element::new("pb").with_attr("xml:id", "uuid-7"))
            .with_child(Element::new("p").with_child(s))
    }

    #[test]
    fn test_zone_corners() {
        let mut projector = GeometryProjector::new(&RetentionConfig::default());
        let mut div = page(vec![located_word("10", "20", "5", "8")]);
        projector.project_page(&mut div);

        let facsimile = projector.into_facsimile().unwrap();
        let surface = &facsimile.children[0];
        assert_eq!(surface.get("start"), Some("#uuid-7"));
        let zone = &surface.children[0];
        assert_eq!(zone.get("start"), Some("#W-1"));
        assert_eq!(zone.get("ulx"), Some("10"));
        assert_eq!(zone.get("uly"), Some("20"));
        assert_eq!(zone.get("lrx"), Some("15"));
        assert_eq!(zone.get("lry"), Some("28"));

        let word = div.find("w").unwrap();
        assert_eq!(word.get("xml:id"), Some("W-1"));
        assert!(word.attributes.iter().all(|(k, _)| !k.starts_with("alto-")));
    }

    #[test]
    fn test_ids_continue_across_pages() {
        let mut projector = GeometryProjector::new(&RetentionConfig::default());
        let mut first = page(vec![located_word("1", "1", "1", "1")]);
        let mut second = page(vec![
            located_word("2", "2", "2", "2"),
            Element::new("pc").with_text("."),
        ]);
        projector.project_page(&mut first);
        projector.project_page(&mut second);

        assert_eq!(projector.zone_count(), 2);
        assert_eq!(second.find("w").unwrap().get("xml:id"), Some("W-2"));
        assert_eq!(second.find("pc").unwrap().get("xml:id"), None);
        let facsimile = projector.into_facsimile().unwrap();
        assert_eq!(facsimile.children.len(), 2);
        assert!(facsimile.children[1].find("zone").is_some());
    }

    #[test]
    fn test_words_numbered_before_punctuation() {
        let mut projector = GeometryProjector::new(&RetentionConfig::default());
        let comma = Element::new("pc")
            .with_attr("alto-hpos", "6")
            .with_attr("alto-vpos", "1")
            .with_text(",");
        let mut div = page(vec![
            located_word("1", "1", "4", "2").with_text("A"),
            comma,
            located_word("8", "1", "4", "2").with_text("B"),
        ]);
        projector.project_page(&mut div);

        let ids: Vec<_> = div
            .descendants()
            .filter(|e| e.is_token())
            .map(|e| (e.text_or_empty(), e.get("xml:id").unwrap_or("")))
            .collect();
        assert_eq!(ids, vec![("A", "W-1"), (",", "W-3"), ("B", "W-2")]);

        let facsimile = projector.into_facsimile().unwrap();
        let zones: Vec<_> = facsimile
            .descendants()
            .filter(|e| e.name == "zone")
            .filter_map(|z| z.get("ulx"))
            .collect();
        assert_eq!(zones, vec!["1", "8", "6"]);
    }

    #[test]
    fn test_partial_retention() {
        let config = RetentionConfig::new().with_alto(["hpos", "width"]);
        let mut projector = GeometryProjector::new(&config);
        let mut div = page(vec![located_word("10.5", "20", "4", "8")]);
        projector.project_page(&mut div);

        let facsimile = projector.into_facsimile().unwrap();
        let zone = facsimile.find("zone").unwrap();
        assert_eq!(zone.get("ulx"), Some("10.5"));
        assert_eq!(zone.get("lrx"), Some("14.5"));
        assert_eq!(zone.get("uly"), None);
        assert_eq!(zone.get("lry"), None);
    }

    #[test]
    fn test_width_without_hpos_gives_no_lrx() {
        let mut projector = GeometryProjector::new(&RetentionConfig::default());
        let mut div = page(vec![Element::new("w")
            .with_attr("alto-width", "5")
            .with_attr("alto-height", "3")]);
        projector.project_page(&mut div);

        let facsimile = projector.into_facsimile().unwrap();
        let zone = facsimile.find("zone").unwrap();
        assert_eq!(zone.attributes.len(), 1);
        assert!(div.find("w").unwrap().attributes.iter().all(|(k, _)| k == "xml:id"));
    }

    #[test]
    fn test_disabled_geometry_still_strips() {
        let config = RetentionConfig::new().with_alto(Vec::<String>::new());
        let mut projector = GeometryProjector::new(&config);
        assert!(!projector.is_enabled());

        let mut div = page(vec![located_word("10", "20", "5", "8")]);
        projector.project_page(&mut div);

        let word = div.find("w").unwrap();
        assert_eq!(word.attributes, vec![("n".to_string(), "1".to_string())]);
        assert!(projector.into_facsimile().is_none());
    }
}
