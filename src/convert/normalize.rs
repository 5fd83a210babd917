//! Rewrite passes applied to a finished page tree.
//!
//! Each pass is idempotent. They must run in the order of [`normalize`]:
//! bibliography flattening, person-name promotion, date assembly.

use super::page::{parse_number, resolve_month};
use crate::tables::{ana_for, GENERIC_GROUP};
use crate::tree::Element;

/// Element names allowed inside a person group promoted to `persName`.
const PERSON_PARTS: &[&str] = &["forename", "placeName", "abbr", "w", "pc"];

/// Run all passes in order.
pub fn normalize(root: &mut Element) {
    flatten_bibliography(root);
    promote_person_names(root);
    assemble_dates(root);
}

/// Retag a sentence's lone bibliography span as `bibl`.
///
/// Applies to every `s` whose only child is `objectName type="bibliography"`;
/// the span becomes `bibl` without a `type` and stays under the sentence.
pub fn flatten_bibliography(root: &mut Element) {
    root.walk_mut(&mut |element: &mut Element| {
        if element.name != "s" || element.children.len() != 1 {
            return;
        }
        let only = &mut element.children[0];
        if only.name == "objectName" && only.get("type") == Some("bibliography") {
            only.name = "bibl".to_string();
            only.remove_attr("type");
        }
    });
}

/// Promote generic person groups made of name parts to `persName`.
pub fn promote_person_names(root: &mut Element) {
    let person = ana_for("P");
    root.walk_mut(&mut |element: &mut Element| {
        if element.name == GENERIC_GROUP
            && element.get("ana") == Some(person.as_str())
            && element
                .children
                .iter()
                .all(|child| PERSON_PARTS.contains(&child.name.as_str()))
        {
            element.name = "persName".to_string();
            element.remove_attr("type");
        }
    });
}

/// Day, month and year sub-span codes.
const DATE_PARTS: [&str; 3] = ["td", "tm", "ty"];

/// Merge day/month/year sub-spans into their enclosing date group.
///
/// Sub-span children are spliced in place of the sub-span, each re-tagged
/// with the sub-span's back-reference, and the group gets a truncated
/// ISO 8601 `when` when the parts form a supported combination.
pub fn assemble_dates(root: &mut Element) {
    for child in &mut root.children {
        assemble_dates(child);
    }
    if root.name == "date" && root.get("ana") == Some(ana_for("T").as_str()) {
        merge_date_parts(root);
    }
}

fn date_part(element: &Element) -> Option<&'static str> {
    if element.name != "date" {
        return None;
    }
    let ana = element.get("ana")?;
    DATE_PARTS
        .iter()
        .copied()
        .find(|code| ana == ana_for(code))
}

/// A date component extracted from a sub-span.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Absent,
    Valid(String),
    Invalid(String),
}

fn merge_date_parts(group: &mut Element) {
    if !group.children.iter().any(|c| date_part(c).is_some()) {
        return;
    }

    let mut day = Part::Absent;
    let mut month = Part::Absent;
    let mut year = Part::Absent;

    let children = std::mem::take(&mut group.children);
    for child in children {
        let Some(code) = date_part(&child) else {
            group.children.push(child);
            continue;
        };

        let lemma = last_word_lemma(&child);
        match code {
            "td" => day = day_part(lemma),
            "tm" => month = month_part(lemma),
            _ => year = year_part(lemma),
        }

        let ana = ana_for(code);
        for mut lifted in child.children {
            lifted.set("ana", &ana);
            group.children.push(lifted);
        }
    }

    match compose_when(&day, &month, &year) {
        Some(when) => group.set("when", when),
        None => {
            for part in [&day, &month, &year] {
                if let Part::Invalid(value) = part {
                    log::warn!("Date part {:?} is not usable, leaving date without when", value);
                }
            }
        }
    }
}

/// Lemma of the last word in a sub-span; empty when the span holds no word.
fn last_word_lemma(span: &Element) -> String {
    span.descendants()
        .filter(|e| e.name == "w")
        .last()
        .map(|w| w.get("lemma").unwrap_or("").to_string())
        .unwrap_or_default()
}

fn day_part(value: String) -> Part {
    match parse_number(&value).filter(|d| (1..=31).contains(d)) {
        Some(day) => Part::Valid(format!("{:02}", day)),
        None => Part::Invalid(value),
    }
}

fn month_part(value: String) -> Part {
    match resolve_month(&value) {
        Some(month) => Part::Valid(month),
        None => Part::Invalid(value),
    }
}

fn year_part(value: String) -> Part {
    let trimmed = value.trim();
    if trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        Part::Valid(trimmed.to_string())
    } else {
        Part::Invalid(value)
    }
}

/// Truncated ISO 8601 value for the supported part combinations.
fn compose_when(day: &Part, month: &Part, year: &Part) -> Option<String> {
    use Part::{Absent, Valid};
    match (year, month, day) {
        (Valid(y), Valid(m), Valid(d)) => Some(format!("{}-{}-{}", y, m, d)),
        (Absent, Valid(m), Valid(d)) => Some(format!("--{}-{}", m, d)),
        (Absent, Absent, Valid(d)) => Some(format!("---{}", d)),
        (Absent, Valid(m), Absent) => Some(format!("--{}", m)),
        (Valid(y), Valid(m), Absent) => Some(format!("{}-{}", y, m)),
        (Valid(y), Absent, Absent) => Some(y.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, lemma: &str) -> Element {
        Element::new("w")
            .with_attr("n", "1")
            .with_attr("lemma", lemma)
            .with_text(text)
    }

    fn sub_span(code: &str, text: &str, lemma: &str) -> Element {
        Element::new("date")
            .with_attr("ana", ana_for(code))
            .with_child(word(text, lemma))
    }

    fn date_group(parts: Vec<Element>) -> Element {
        let mut group = Element::new("date").with_attr("ana", ana_for("T"));
        group.children = parts;
        group
    }

    #[test]
    fn test_flatten_bibliography() {
        let mut s = Element::new("s").with_child(
            Element::new("objectName")
                .with_attr("type", "bibliography")
                .with_attr("ana", "#nametag-c")
                .with_child(word("Babička", "babička")),
        );
        flatten_bibliography(&mut s);
        let bibl = &s.children[0];
        assert_eq!(bibl.name, "bibl");
        assert_eq!(bibl.get("type"), None);
        assert_eq!(bibl.get("ana"), Some("#nametag-c"));

        let snapshot = s.clone();
        flatten_bibliography(&mut s);
        assert_eq!(s, snapshot);
    }

    #[test]
    fn test_flatten_bibliography_needs_lone_child() {
        let mut s = Element::new("s")
            .with_child(Element::new("objectName").with_attr("type", "bibliography"))
            .with_child(word("a", "a"));
        flatten_bibliography(&mut s);
        assert_eq!(s.children[0].name, "objectName");
    }

    #[test]
    fn test_promote_person_names() {
        let mut group = Element::new("group")
            .with_attr("type", "P")
            .with_attr("ana", "#nametag-P")
            .with_child(Element::new("forename").with_child(word("Jan", "Jan")))
            .with_child(word("Neruda", "Neruda"));
        promote_person_names(&mut group);
        assert_eq!(group.name, "persName");
        assert_eq!(group.get("type"), None);
    }

    #[test]
    fn test_person_group_with_other_parts_is_kept() {
        let mut group = Element::new("group")
            .with_attr("type", "P")
            .with_attr("ana", "#nametag-P")
            .with_child(Element::new("surname"));
        promote_person_names(&mut group);
        assert_eq!(group.name, "group");
        assert_eq!(group.get("type"), Some("P"));
    }

    #[test]
    fn test_full_date() {
        let mut group = date_group(vec![
            sub_span("td", "15", "15"),
            Element::new("pc").with_text("."),
            sub_span("tm", "ledna", "leden"),
            sub_span("ty", "1989", "1989"),
        ]);
        assemble_dates(&mut group);

        assert_eq!(group.get("when"), Some("1989-01-15"));
        let names: Vec<_> = group.children.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["w", "pc", "w", "w"]);
        assert_eq!(group.children[0].get("ana"), Some("#nametag-td"));
        assert_eq!(group.children[2].get("ana"), Some("#nametag-tm"));
        assert_eq!(group.children[3].get("ana"), Some("#nametag-ty"));
        assert_eq!(group.children[2].text_or_empty(), "ledna");
    }

    #[test]
    fn test_partial_dates() {
        let cases = vec![
            (vec![sub_span("tm", "března", "březen"), sub_span("td", "3", "3")], Some("--03-03")),
            (vec![sub_span("td", "7", "7")], Some("---07")),
            (vec![sub_span("tm", "května", "květen")], Some("--05")),
            (vec![sub_span("ty", "1918", "1918"), sub_span("tm", "října", "říjen")], Some("1918-10")),
            (vec![sub_span("ty", "1918", "1918")], Some("1918")),
            (vec![sub_span("td", "28", "28"), sub_span("ty", "1918", "1918")], None),
        ];
        for (parts, expected) in cases {
            let mut group = date_group(parts);
            assemble_dates(&mut group);
            assert_eq!(group.get("when"), expected);
        }
    }

    #[test]
    fn test_non_numeric_day_leaves_no_when() {
        let mut group = date_group(vec![
            sub_span("td", "patnáctého", "patnáctý"),
            sub_span("tm", "ledna", "leden"),
            sub_span("ty", "1989", "1989"),
        ]);
        assemble_dates(&mut group);
        assert_eq!(group.get("when"), None);
        assert_eq!(group.children.len(), 3);
        assert!(group.children.iter().all(|c| c.name == "w"));
    }

    #[test]
    fn test_sub_span_without_word_is_invalid() {
        let day = Element::new("date")
            .with_attr("ana", ana_for("td"))
            .with_child(Element::new("pc").with_text("."));
        let mut group = date_group(vec![day, sub_span("ty", "1918", "1918")]);
        assemble_dates(&mut group);

        assert_eq!(group.get("when"), None);
        let names: Vec<_> = group.children.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["pc", "w"]);
    }

    #[test]
    fn test_date_without_parts_untouched() {
        let mut group = date_group(vec![word("včera", "včera")]);
        let snapshot = group.clone();
        assemble_dates(&mut group);
        assert_eq!(group, snapshot);
    }

    #[test]
    fn test_assemble_dates_idempotent() {
        let mut group = date_group(vec![sub_span("ty", "2001", "2001")]);
        assemble_dates(&mut group);
        let snapshot = group.clone();
        assemble_dates(&mut group);
        assert_eq!(group, snapshot);
    }
}
