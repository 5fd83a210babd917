//! Removal of filtered annotation layers from page and header trees.

use crate::tables::{ANA_PREFIX, INTERP_ID_PREFIX};
use crate::tree::Element;

/// Group-code prefix of an element's back-reference, lowercased.
fn ana_prefix(element: &Element) -> Option<String> {
    let ana = element.get("ana")?.to_lowercase();
    let code = ana.strip_prefix(ANA_PREFIX)?;
    code.chars().next().map(String::from)
}

/// Whether an element is an entity wrapper of a removed NameTag category.
///
/// Tokens never count as wrappers, even when a lifted date part left a
/// back-reference on them.
pub fn is_removed_entity(element: &Element, removed: &[String]) -> bool {
    !element.is_token() && ana_prefix(element).is_some_and(|prefix| removed.contains(&prefix))
}

/// Replace removed entity wrappers by their children, bottom-up.
///
/// Each child list is taken out of its parent and rebuilt, so nested
/// removable wrappers are resolved before their ancestors and every
/// surviving node appears exactly once, in order.
pub fn prune_entities(element: &mut Element, removed: &[String]) {
    if removed.is_empty() {
        return;
    }
    let children = std::mem::take(&mut element.children);
    for mut child in children {
        prune_entities(&mut child, removed);
        if is_removed_entity(&child, removed) {
            element.children.append(&mut child.children);
        } else {
            element.children.push(child);
        }
    }
}

/// Drop UDPipe attributes from every token.
pub fn strip_udpipe(element: &mut Element, removed: &[String]) {
    if removed.is_empty() {
        return;
    }
    element.walk_mut(&mut |node: &mut Element| {
        if node.is_token() {
            for attr in removed {
                node.remove_attr(attr);
            }
        }
    });
}

/// Drop classification entries of removed NameTag categories.
///
/// Returns the number of entries removed.
pub fn prune_classification(header: &mut Element, removed: &[String]) -> usize {
    let mut count = 0;
    header.walk_mut(&mut |node: &mut Element| {
        if node.name != "interpGrp" {
            return;
        }
        let before = node.children.len();
        node.children.retain(|interp| !interp_removed(interp, removed));
        count += before - node.children.len();
    });
    count
}

fn interp_removed(interp: &Element, removed: &[String]) -> bool {
    interp
        .attributes
        .iter()
        .filter(|(key, _)| key.ends_with("id"))
        .any(|(_, value)| {
            value
                .to_lowercase()
                .strip_prefix(INTERP_ID_PREFIX)
                .and_then(|code| code.chars().next())
                .is_some_and(|prefix| removed.contains(&prefix.to_string()))
        })
}
